//! Building a [`Dataset`] from parsed records.
//!
//! Loading runs in two phases:
//! 1. Parse the four files in parallel with Rayon
//! 2. Feed films into the catalog table, credits grouped per film into
//!    `Credits`, and ratings into `Ratings`
//!
//! Only the parsing phase is parallel; the stores are filled from one thread.

use crate::error::{DataLoadError, Result};
use crate::parser;
use crate::types::{CastLine, CrewLine, Dataset, Film, LoadOptions};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use stores::{CastCredit, Credits, CrewCredit, FilmId, Rating, Ratings};
use structures::{ChainingHashMap, DEFAULT_CAPACITY};
use tracing::{debug, info, instrument, warn};

impl Dataset {
    /// Load a dataset from a directory holding films.dat and ratings.dat,
    /// and optionally cast.dat and crew.dat
    #[instrument(skip(data_dir, options), fields(dir = %data_dir.display(), strict = options.strict_references))]
    pub fn load_from_files(data_dir: &Path, options: &LoadOptions) -> Result<Self> {
        let films_path = data_dir.join(parser::FILMS_FILE);
        let ratings_path = data_dir.join(parser::RATINGS_FILE);
        let cast_path = data_dir.join(parser::CAST_FILE);
        let crew_path = data_dir.join(parser::CREW_FILE);

        let ((films, ratings), (cast, crew)) = rayon::join(
            || {
                rayon::join(
                    || parser::parse_films(&films_path),
                    || parser::parse_ratings(&ratings_path),
                )
            },
            || {
                rayon::join(
                    || optional(&cast_path, parser::parse_cast),
                    || optional(&crew_path, parser::parse_crew),
                )
            },
        );

        let films = films?;
        let ratings = ratings?;
        let cast = cast?;
        let crew = crew?;

        info!(
            films = films.len(),
            ratings = ratings.len(),
            cast_lines = cast.len(),
            crew_lines = crew.len(),
            "parsed dataset files"
        );

        Self::build(films, cast, crew, ratings, options)
    }

    /// Index already-parsed records into the stores
    pub fn build(
        films: Vec<Film>,
        cast: Vec<CastLine>,
        crew: Vec<CrewLine>,
        ratings: Vec<Rating>,
        options: &LoadOptions,
    ) -> Result<Self> {
        let mut catalog = ChainingHashMap::with_capacity(DEFAULT_CAPACITY);
        for film in films {
            let id = film.id;
            if !catalog.add(id, film) {
                warn!(film_id = id, "ignoring repeated film id");
            }
        }
        let films = Arc::new(catalog);

        let credits = build_credits(&films, cast, crew, options)?;

        let mut store = Ratings::new().with_catalog(films.clone());
        let mut skipped_ratings = 0;
        for rating in ratings {
            if options.strict_references && !films.contains_key(&rating.film_id) {
                return Err(missing_film(rating.film_id));
            }
            if !store.add(rating.user_id, rating.film_id, rating.rating, rating.timestamp) {
                skipped_ratings += 1;
            }
        }
        if skipped_ratings > 0 {
            warn!(skipped_ratings, "some ratings were repeated or out of range");
        }

        let dataset = Self {
            films,
            credits,
            ratings: store,
            skipped_ratings,
        };
        let (films, credited, ratings) = dataset.counts();
        info!(films, credited, ratings, "dataset ready");
        Ok(dataset)
    }
}

/// Cast and crew collected for one film
#[derive(Default)]
struct FilmLines {
    cast: Vec<CastCredit>,
    crew: Vec<CrewCredit>,
}

fn build_credits(
    films: &ChainingHashMap<FilmId, Film>,
    cast: Vec<CastLine>,
    crew: Vec<CrewLine>,
    options: &LoadOptions,
) -> Result<Credits> {
    // BTreeMap so films enter the store in id order
    let mut grouped: BTreeMap<FilmId, FilmLines> = BTreeMap::new();
    for line in cast {
        grouped.entry(line.film_id).or_default().cast.push(line.credit);
    }
    for line in crew {
        grouped.entry(line.film_id).or_default().crew.push(line.credit);
    }

    let mut credits = Credits::new();
    for (film_id, lines) in grouped {
        if !films.contains_key(&film_id) {
            if options.strict_references {
                return Err(missing_film(film_id));
            }
            debug!(film_id, "credits for a film missing from the catalog");
        }
        credits.add(lines.cast, lines.crew, film_id);
    }
    Ok(credits)
}

fn optional<T>(path: &Path, parse: fn(&Path) -> Result<Vec<T>>) -> Result<Vec<T>> {
    if !path.exists() {
        debug!(path = %path.display(), "optional file not present");
        return Ok(Vec::new());
    }
    parse(path)
}

fn missing_film(id: FilmId) -> DataLoadError {
    DataLoadError::MissingReference {
        entity: "Film".to_string(),
        id,
    }
}
