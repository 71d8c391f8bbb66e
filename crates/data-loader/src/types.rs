//! Records produced by the parser and the loaded [`Dataset`].

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use stores::{CastCredit, Credits, CrewCredit, FilmId, Ratings};
use structures::ChainingHashMap;

/// A film listed in `films.dat`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Film {
    pub id: FilmId,
    pub title: String,
    /// Release year taken from a trailing "(YYYY)" in the title
    pub year: Option<u16>,
}

/// One line of `cast.dat`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CastLine {
    pub film_id: FilmId,
    pub credit: CastCredit,
}

/// One line of `crew.dat`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrewLine {
    pub film_id: FilmId,
    pub credit: CrewCredit,
}

/// Knobs for [`Dataset::load_from_files`]
#[derive(Debug, Clone, Copy, Default)]
pub struct LoadOptions {
    /// Fail with `MissingReference` when a rating or credit names a film
    /// absent from `films.dat`, instead of loading it anyway
    pub strict_references: bool,
}

impl LoadOptions {
    pub fn strict() -> Self {
        Self {
            strict_references: true,
        }
    }
}

/// A film catalog with its credits and ratings loaded into the stores.
///
/// The film table is shared with `Ratings` as its catalog, so films nobody
/// rated still report an average of 0.0.
pub struct Dataset {
    pub(crate) films: Arc<ChainingHashMap<FilmId, Film>>,
    pub(crate) credits: Credits,
    pub(crate) ratings: Ratings,
    /// Rating lines `Ratings` refused (repeated user/film pair or bad value)
    pub(crate) skipped_ratings: usize,
}

impl Dataset {
    pub fn film(&self, id: FilmId) -> Option<&Film> {
        self.films.get(&id)
    }

    pub fn films(&self) -> &ChainingHashMap<FilmId, Film> {
        &self.films
    }

    /// Films whose title contains `pattern` (case-sensitive), by id
    pub fn find_films(&self, pattern: &str) -> Vec<&Film> {
        let mut found: Vec<&Film> = self
            .films
            .iter()
            .map(|(_, film)| film)
            .filter(|film| film.title.contains(pattern))
            .collect();
        found.sort_by_key(|film| film.id);
        found
    }

    pub fn credits(&self) -> &Credits {
        &self.credits
    }

    pub fn ratings(&self) -> &Ratings {
        &self.ratings
    }

    pub fn skipped_ratings(&self) -> usize {
        self.skipped_ratings
    }

    /// (films, films with credits, ratings)
    pub fn counts(&self) -> (usize, usize, usize) {
        (self.films.len(), self.credits.len(), self.ratings.len())
    }
}
