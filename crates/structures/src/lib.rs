//! # Structures Crate
//!
//! Hand-built containers that back the film stores.
//!
//! ## Components
//!
//! - **sequence**: `GrowableSeq`, an array-backed list with doubling growth
//!   and shift-on-remove, used for result accumulation and membership lists
//! - **chaining_map**: `ChainingHashMap`, a separate-chaining hash table that
//!   rehashes into a prime capacity once its load factor passes 1.5
//! - **rank_heap**: `RankHeap`, a fixed-capacity min-heap of `(key, id)` pairs
//!   used both for streaming top-K selection and as a heap sort
//! - **hasher**: the deterministic identity hasher the map uses by default
//! - **error**: programmer-error conditions raised by the containers
//!
//! ## Example Usage
//!
//! ```ignore
//! use structures::{ChainingHashMap, RankHeap, RankPair};
//!
//! let mut counts: ChainingHashMap<u32, u32> = ChainingHashMap::new();
//! counts.add(7, 12);
//! counts.add(9, 40);
//!
//! // Two largest counts, largest first
//! let top = RankHeap::top_k(counts.iter().map(|(&id, &n)| RankPair::new(n, id)), 2);
//! assert_eq!(top, vec![9, 7]);
//! ```

pub mod chaining_map;
pub mod error;
pub mod hasher;
pub mod rank_heap;
pub mod sequence;

pub use chaining_map::{ChainingHashMap, DEFAULT_CAPACITY, MAX_LOAD_FACTOR};
pub use error::{Result, StructureError};
pub use hasher::{BuildIdentityHasher, IdentityHasher};
pub use rank_heap::{FloatKey, RankHeap, RankPair};
pub use sequence::GrowableSeq;
