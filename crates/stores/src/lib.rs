//! # Stores Crate
//!
//! In-memory aggregation services over a film dataset.
//!
//! ## Components
//!
//! - **credits**: `Credits`, cast and crew per film plus per-person film lists
//! - **ratings**: `Ratings`, user ratings with per-user and per-film averages
//! - **records**: per-film snapshots and per-person aggregates owned by `Credits`
//! - **statistics**: running count and sum behind every average
//! - **catalog**: `FilmCatalog`, the "does this film exist" capability
//! - **types**: ids and value records shared with loaders and front ends
//!
//! Both services are single-threaded and own every record they hold. Queries
//! never return sentinel numbers: unknown ids come back as `None` or an empty
//! slice.

pub mod catalog;
pub mod credits;
pub mod ratings;
pub mod records;
pub mod statistics;
pub mod types;

pub use catalog::{EmptyCatalog, FilmCatalog};
pub use credits::{Credits, DEFAULT_TOP_BILLING_CUTOFF};
pub use ratings::{RatingKey, Ratings};
pub use records::{CastData, CrewData, FilmCredits};
pub use statistics::Statistics;
pub use types::*;
