//! Credits aggregation service.
//!
//! `Credits` owns three tables:
//! - film id → [`FilmCredits`], the sorted cast/crew snapshot taken at `add`
//! - person id → [`CastData`] for everyone with at least one cast credit
//! - person id → [`CrewData`] for everyone with at least one crew job
//!
//! Every per-person update made by [`Credits::add`] is reversed exactly by
//! [`Credits::remove`]; a person record that ends up empty is dropped.
//!
//! ## Example Usage
//! ```ignore
//! let mut credits = Credits::new();
//! credits.add(cast, crew, 862);
//!
//! let leads = credits.cast_stars_in_films(31);
//! let busiest = credits.most_cast_credits(10);
//! ```

use crate::records::{CastData, CrewData, FilmCredits};
use crate::types::{CastCredit, CrewCredit, FilmId, Person, PersonId};
use structures::{ChainingHashMap, DEFAULT_CAPACITY, GrowableSeq, RankHeap, RankPair};
use tracing::{debug, instrument, trace};

/// Highest billing order that still counts as a starring role
pub const DEFAULT_TOP_BILLING_CUTOFF: u32 = 3;

pub struct Credits {
    films: ChainingHashMap<FilmId, FilmCredits>,
    cast: ChainingHashMap<PersonId, CastData>,
    crew: ChainingHashMap<PersonId, CrewData>,
    top_billing_cutoff: u32,
}

impl Credits {
    pub fn new() -> Self {
        Self {
            films: ChainingHashMap::with_capacity(DEFAULT_CAPACITY),
            cast: ChainingHashMap::with_capacity(DEFAULT_CAPACITY),
            crew: ChainingHashMap::with_capacity(DEFAULT_CAPACITY),
            top_billing_cutoff: DEFAULT_TOP_BILLING_CUTOFF,
        }
    }

    /// Sets the highest billing order counted by [`Credits::cast_stars_in_films`]
    pub fn with_top_billing_cutoff(mut self, cutoff: u32) -> Self {
        self.top_billing_cutoff = cutoff;
        self
    }

    /// Stores the credits for a film and indexes every person in them.
    ///
    /// Returns `false` without changing anything when the film already has
    /// credits.
    pub fn add(&mut self, cast: Vec<CastCredit>, crew: Vec<CrewCredit>, film_id: FilmId) -> bool {
        if self.films.contains_key(&film_id) {
            debug!(film_id, "film already has credits");
            return false;
        }

        let credits = FilmCredits::new(cast, crew);

        for credit in credits.cast() {
            let top_billed = self.is_top_billed(credit);
            if let Some(data) = self.cast.get_mut(&credit.id) {
                data.record_credit(film_id, top_billed);
            } else {
                let mut data = CastData::new(credit.person());
                data.record_credit(film_id, top_billed);
                self.cast.add(credit.id, data);
            }
            trace!(person_id = credit.id, film_id, top_billed, "recorded cast credit");
        }

        for credit in credits.crew() {
            if let Some(data) = self.crew.get_mut(&credit.id) {
                data.record_film(film_id);
            } else {
                let mut data = CrewData::new(credit.person());
                data.record_film(film_id);
                self.crew.add(credit.id, data);
            }
            trace!(person_id = credit.id, film_id, "recorded crew credit");
        }

        debug!(
            film_id,
            cast = credits.cast().len(),
            crew = credits.crew().len(),
            "added film credits"
        );
        self.films.add(film_id, credits)
    }

    /// Removes a film's credits, undoing every per-person update `add` made
    pub fn remove(&mut self, film_id: FilmId) -> bool {
        let Some(credits) = self.films.remove(&film_id) else {
            return false;
        };

        for credit in credits.cast() {
            let emptied = self
                .cast
                .get_mut(&credit.id)
                .is_some_and(|data| data.retract_credit(film_id));
            if emptied {
                self.cast.remove(&credit.id);
                trace!(person_id = credit.id, "dropped cast member without credits");
            }
        }

        for credit in credits.crew() {
            let emptied = self
                .crew
                .get_mut(&credit.id)
                .is_some_and(|data| data.retract_film(film_id));
            if emptied {
                self.crew.remove(&credit.id);
                trace!(person_id = credit.id, "dropped crew member without films");
            }
        }

        debug!(film_id, "removed film credits");
        true
    }

    fn is_top_billed(&self, credit: &CastCredit) -> bool {
        credit.order <= self.top_billing_cutoff
    }

    /// Cast of a film in billing order, empty if the film is unknown
    pub fn film_cast(&self, film_id: FilmId) -> &[CastCredit] {
        self.films
            .get(&film_id)
            .map(|credits| credits.cast())
            .unwrap_or(&[])
    }

    /// Crew of a film ordered by person id, empty if the film is unknown
    pub fn film_crew(&self, film_id: FilmId) -> &[CrewCredit] {
        self.films
            .get(&film_id)
            .map(|credits| credits.crew())
            .unwrap_or(&[])
    }

    pub fn size_of_cast(&self, film_id: FilmId) -> Option<usize> {
        self.films.get(&film_id).map(|credits| credits.cast().len())
    }

    pub fn size_of_crew(&self, film_id: FilmId) -> Option<usize> {
        self.films.get(&film_id).map(|credits| credits.crew().len())
    }

    /// Every distinct cast member
    pub fn unique_cast(&self) -> Vec<&Person> {
        collect_people(self.cast.iter().map(|(_, data)| data.person()), self.cast.len())
    }

    /// Every distinct crew member
    pub fn unique_crew(&self) -> Vec<&Person> {
        collect_people(self.crew.iter().map(|(_, data)| data.person()), self.crew.len())
    }

    /// Cast members whose name contains `pattern` (case-sensitive)
    pub fn find_cast(&self, pattern: &str) -> Vec<&Person> {
        collect_people(
            self.cast
                .iter()
                .map(|(_, data)| data.person())
                .filter(|person| person.name.contains(pattern)),
            0,
        )
    }

    /// Crew members whose name contains `pattern` (case-sensitive)
    pub fn find_crew(&self, pattern: &str) -> Vec<&Person> {
        collect_people(
            self.crew
                .iter()
                .map(|(_, data)| data.person())
                .filter(|person| person.name.contains(pattern)),
            0,
        )
    }

    pub fn cast(&self, person_id: PersonId) -> Option<&Person> {
        self.cast.get(&person_id).map(|data| data.person())
    }

    pub fn crew(&self, person_id: PersonId) -> Option<&Person> {
        self.crew.get(&person_id).map(|data| data.person())
    }

    /// Films a cast member appears in, in the order they were added
    pub fn cast_films(&self, person_id: PersonId) -> &[FilmId] {
        self.cast
            .get(&person_id)
            .map(|data| data.films())
            .unwrap_or(&[])
    }

    pub fn crew_films(&self, person_id: PersonId) -> &[FilmId] {
        self.crew
            .get(&person_id)
            .map(|data| data.films())
            .unwrap_or(&[])
    }

    /// Films where the cast member was billed within the top-billing cutoff
    pub fn cast_stars_in_films(&self, person_id: PersonId) -> &[FilmId] {
        self.cast
            .get(&person_id)
            .map(|data| data.starring())
            .unwrap_or(&[])
    }

    /// The `k` cast members with the most credits, most first
    #[instrument(skip(self), fields(cast_members = self.cast.len()))]
    pub fn most_cast_credits(&self, k: usize) -> Vec<&Person> {
        let candidates = self
            .cast
            .iter()
            .map(|(&id, data)| RankPair::new(data.credits(), id));
        let ranked = RankHeap::top_k(candidates, k.min(self.cast.len()));

        collect_people(
            ranked.iter().filter_map(|id| self.cast(*id)),
            ranked.len(),
        )
    }

    pub fn num_cast_credits(&self, person_id: PersonId) -> Option<u32> {
        self.cast.get(&person_id).map(|data| data.credits())
    }

    /// Number of films with stored credits
    pub fn len(&self) -> usize {
        self.films.len()
    }

    pub fn is_empty(&self) -> bool {
        self.films.is_empty()
    }
}

impl Default for Credits {
    fn default() -> Self {
        Self::new()
    }
}

fn collect_people<'a>(people: impl Iterator<Item = &'a Person>, expected: usize) -> Vec<&'a Person> {
    let mut found = GrowableSeq::with_capacity(expected);
    found.extend(people);
    found.into_vec()
}
