//! Film-existence capability.
//!
//! The ratings store answers "is this film known at all?" by asking a
//! catalog it does not own. Whatever holds the film records implements
//! [`FilmCatalog`].

use crate::types::FilmId;
use std::collections::HashSet;
use std::hash::BuildHasher;
use structures::ChainingHashMap;

/// Answers whether a film exists, independently of any ratings for it
pub trait FilmCatalog {
    fn contains_film(&self, film_id: FilmId) -> bool;
}

/// Catalog that knows no films
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyCatalog;

impl FilmCatalog for EmptyCatalog {
    fn contains_film(&self, _film_id: FilmId) -> bool {
        false
    }
}

impl<S: BuildHasher> FilmCatalog for HashSet<FilmId, S> {
    fn contains_film(&self, film_id: FilmId) -> bool {
        self.contains(&film_id)
    }
}

impl<V, S: BuildHasher> FilmCatalog for ChainingHashMap<FilmId, V, S> {
    fn contains_film(&self, film_id: FilmId) -> bool {
        self.contains_key(&film_id)
    }
}
