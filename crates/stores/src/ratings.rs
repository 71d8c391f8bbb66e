//! Ratings aggregation service.
//!
//! Each rating is stored once, in a table keyed by its `(user, film)` pair.
//! Two secondary indexes map a user to their films and a film to its users,
//! both pointing back at that key, and running [`Statistics`] are kept per
//! user and per film so averages and counts never rescan the ratings.
//!
//! ## Example Usage
//! ```ignore
//! let mut ratings = Ratings::new().with_catalog(films);
//! ratings.add(1, 862, 4.0, 964982703);
//!
//! let average = ratings.movie_average_rating(862);
//! let popular = ratings.most_rated_movies(10);
//! ```

use crate::catalog::{EmptyCatalog, FilmCatalog};
use crate::statistics::Statistics;
use crate::types::{FilmId, Rating, Timestamp, UserId, is_valid_rating};
use std::sync::Arc;
use structures::{ChainingHashMap, DEFAULT_CAPACITY, FloatKey, GrowableSeq, RankHeap, RankPair};
use tracing::{debug, instrument, warn};

/// Initial capacity of each per-user and per-film index
const NESTED_CAPACITY: usize = 13;

/// Identifies one rating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RatingKey {
    pub user_id: UserId,
    pub film_id: FilmId,
}

impl RatingKey {
    pub fn new(user_id: UserId, film_id: FilmId) -> Self {
        Self { user_id, film_id }
    }
}

/// Outer id → (inner id → rating key)
type RatingIndex = ChainingHashMap<u32, ChainingHashMap<u32, RatingKey>>;

type StatisticsTable = ChainingHashMap<u32, Statistics>;

pub struct Ratings {
    records: ChainingHashMap<RatingKey, Rating>,
    by_user: RatingIndex,
    by_film: RatingIndex,
    user_stats: StatisticsTable,
    film_stats: StatisticsTable,
    catalog: Arc<dyn FilmCatalog + Send + Sync>,
}

impl Ratings {
    pub fn new() -> Self {
        Self {
            records: ChainingHashMap::with_capacity(DEFAULT_CAPACITY),
            by_user: ChainingHashMap::with_capacity(DEFAULT_CAPACITY),
            by_film: ChainingHashMap::with_capacity(DEFAULT_CAPACITY),
            user_stats: ChainingHashMap::with_capacity(DEFAULT_CAPACITY),
            film_stats: ChainingHashMap::with_capacity(DEFAULT_CAPACITY),
            catalog: Arc::new(EmptyCatalog),
        }
    }

    /// Films known to `catalog` but never rated average 0.0 instead of `None`
    pub fn with_catalog(mut self, catalog: Arc<dyn FilmCatalog + Send + Sync>) -> Self {
        self.catalog = catalog;
        self
    }

    /// Stores a new rating.
    ///
    /// Returns `false` if this user already rated this film, or if the value
    /// is outside 0.0..=5.0.
    pub fn add(&mut self, user_id: UserId, film_id: FilmId, rating: f32, timestamp: Timestamp) -> bool {
        if !is_valid_rating(rating) {
            warn!(user_id, film_id, rating, "rejected rating outside 0-5");
            return false;
        }

        let key = RatingKey::new(user_id, film_id);
        let record = Rating {
            user_id,
            film_id,
            rating,
            timestamp,
        };
        if !self.records.add(key, record) {
            return false;
        }

        link(&mut self.by_user, user_id, film_id, key);
        link(&mut self.by_film, film_id, user_id, key);
        record_value(&mut self.user_stats, user_id, rating);
        record_value(&mut self.film_stats, film_id, rating);
        true
    }

    /// Stores a rating, replacing the value and timestamp of an existing one
    pub fn set(&mut self, user_id: UserId, film_id: FilmId, rating: f32, timestamp: Timestamp) -> bool {
        if !is_valid_rating(rating) {
            warn!(user_id, film_id, rating, "rejected rating outside 0-5");
            return false;
        }

        let key = RatingKey::new(user_id, film_id);
        if let Some(record) = self.records.get_mut(&key) {
            let previous = std::mem::replace(&mut record.rating, rating);
            record.timestamp = timestamp;

            revise_value(&mut self.user_stats, user_id, previous, rating);
            revise_value(&mut self.film_stats, film_id, previous, rating);
            debug!(user_id, film_id, previous, rating, "updated rating");
            return true;
        }

        self.add(user_id, film_id, rating, timestamp)
    }

    /// Deletes a rating and takes it out of both averages
    pub fn remove(&mut self, user_id: UserId, film_id: FilmId) -> bool {
        let Some(record) = self.records.remove(&RatingKey::new(user_id, film_id)) else {
            return false;
        };

        unlink(&mut self.by_user, user_id, film_id);
        unlink(&mut self.by_film, film_id, user_id);
        retract_value(&mut self.user_stats, user_id, record.rating);
        retract_value(&mut self.film_stats, film_id, record.rating);
        debug!(user_id, film_id, "removed rating");
        true
    }

    pub fn rating(&self, user_id: UserId, film_id: FilmId) -> Option<&Rating> {
        self.records.get(&RatingKey::new(user_id, film_id))
    }

    /// Every rating value given to a film
    pub fn movie_ratings(&self, film_id: FilmId) -> Vec<f32> {
        self.collect_values(self.by_film.get(&film_id))
    }

    /// Every rating value a user has given
    pub fn user_ratings(&self, user_id: UserId) -> Vec<f32> {
        self.collect_values(self.by_user.get(&user_id))
    }

    fn collect_values(&self, index: Option<&ChainingHashMap<u32, RatingKey>>) -> Vec<f32> {
        let Some(index) = index else {
            return Vec::new();
        };

        let mut values = GrowableSeq::with_capacity(index.len());
        for (_, key) in index {
            if let Some(record) = self.records.get(key) {
                values.push(record.rating);
            }
        }
        values.into_vec()
    }

    /// Mean rating of a film.
    ///
    /// `Some(0.0)` when the catalog knows the film but nobody has rated it,
    /// `None` when the film is unknown everywhere.
    pub fn movie_average_rating(&self, film_id: FilmId) -> Option<f32> {
        match self.film_stats.get(&film_id) {
            Some(stats) => Some(stats.average()),
            None if self.catalog.contains_film(film_id) => Some(0.0),
            None => None,
        }
    }

    pub fn user_average_rating(&self, user_id: UserId) -> Option<f32> {
        self.user_stats.get(&user_id).map(|stats| stats.average())
    }

    /// Number of ratings for a film, with the same catalog fallback as
    /// [`Ratings::movie_average_rating`]
    pub fn num_ratings(&self, film_id: FilmId) -> Option<u32> {
        match self.film_stats.get(&film_id) {
            Some(stats) => Some(stats.count()),
            None if self.catalog.contains_film(film_id) => Some(0),
            None => None,
        }
    }

    /// Number of ratings a user has given
    pub fn num_user_ratings(&self, user_id: UserId) -> Option<u32> {
        self.user_stats.get(&user_id).map(|stats| stats.count())
    }

    /// The `k` films with the most ratings, most first
    #[instrument(skip(self), fields(films = self.film_stats.len()))]
    pub fn most_rated_movies(&self, k: usize) -> Vec<FilmId> {
        top_by(&self.film_stats, k, |stats| stats.count())
    }

    /// The `k` users who have rated the most films, most first
    #[instrument(skip(self), fields(users = self.user_stats.len()))]
    pub fn most_rated_users(&self, k: usize) -> Vec<UserId> {
        top_by(&self.user_stats, k, |stats| stats.count())
    }

    /// The `k` films with the highest average rating, highest first
    #[instrument(skip(self), fields(films = self.film_stats.len()))]
    pub fn top_average_rated_movies(&self, k: usize) -> Vec<FilmId> {
        top_by(&self.film_stats, k, |stats| FloatKey(stats.average()))
    }

    /// Number of stored ratings
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl Default for Ratings {
    fn default() -> Self {
        Self::new()
    }
}

fn link(index: &mut RatingIndex, outer: u32, inner: u32, key: RatingKey) {
    if let Some(entries) = index.get_mut(&outer) {
        entries.add(inner, key);
    } else {
        let mut entries = ChainingHashMap::with_capacity(NESTED_CAPACITY);
        entries.add(inner, key);
        index.add(outer, entries);
    }
}

fn unlink(index: &mut RatingIndex, outer: u32, inner: u32) {
    let emptied = index.get_mut(&outer).is_some_and(|entries| {
        entries.remove(&inner);
        entries.is_empty()
    });
    if emptied {
        index.remove(&outer);
    }
}

fn record_value(table: &mut StatisticsTable, id: u32, value: f32) {
    if let Some(stats) = table.get_mut(&id) {
        stats.record(value);
    } else {
        let mut stats = Statistics::new();
        stats.record(value);
        table.add(id, stats);
    }
}

fn revise_value(table: &mut StatisticsTable, id: u32, previous: f32, value: f32) {
    if let Some(stats) = table.get_mut(&id) {
        stats.revise(previous, value);
    }
}

fn retract_value(table: &mut StatisticsTable, id: u32, value: f32) {
    let emptied = table.get_mut(&id).is_some_and(|stats| stats.retract(value));
    if emptied {
        table.remove(&id);
    }
}

fn top_by<K: Ord>(table: &StatisticsTable, k: usize, rank_key: impl Fn(&Statistics) -> K) -> Vec<u32> {
    let candidates = table
        .iter()
        .map(|(&id, stats)| RankPair::new(rank_key(stats), id));
    RankHeap::top_k(candidates, k.min(table.len()))
}
