//! # Data Loader Crate
//!
//! Reads a film dataset from `::`-separated files and loads it into the
//! `stores` services.
//!
//! ## Main Components
//!
//! - **types**: `Film`, parsed credit lines, `LoadOptions` and `Dataset`
//! - **parser**: Parse .dat files into records
//! - **index**: Build a `Dataset` from parsed records
//! - **error**: Error types for data loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::{Dataset, LoadOptions};
//! use std::path::Path;
//!
//! let dataset = Dataset::load_from_files(Path::new("data/films"), &LoadOptions::default())?;
//!
//! let cast = dataset.credits().film_cast(862);
//! let average = dataset.ratings().movie_average_rating(862);
//! ```

pub mod error;
pub mod index;
pub mod parser;
pub mod types;

pub use error::{DataLoadError, Result};
pub use types::{CastLine, CrewLine, Dataset, Film, LoadOptions};
