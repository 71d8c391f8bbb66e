//! Per-film and per-person records kept by [`Credits`](crate::Credits).

use crate::types::{CastCredit, CrewCredit, FilmId, Person};
use structures::{GrowableSeq, RankHeap, RankPair};

/// A film's cast and crew, each in billing order
#[derive(Debug, Clone, Default)]
pub struct FilmCredits {
    cast: Vec<CastCredit>,
    crew: Vec<CrewCredit>,
}

impl FilmCredits {
    /// Snapshots the credits for one film.
    ///
    /// Cast is sorted ascending by `order`; crew by person id. Entries that
    /// tie keep their submission order.
    pub fn new(cast: Vec<CastCredit>, crew: Vec<CrewCredit>) -> Self {
        Self {
            cast: sorted_by_rank(cast, |credit| credit.order),
            crew: sorted_by_rank(crew, |credit| credit.id),
        }
    }

    pub fn cast(&self) -> &[CastCredit] {
        &self.cast
    }

    pub fn crew(&self) -> &[CrewCredit] {
        &self.crew
    }
}

/// Heap sort on `(key, position)`; the position tiebreak keeps it stable
fn sorted_by_rank<T>(items: Vec<T>, key: impl Fn(&T) -> u32) -> Vec<T> {
    let mut heap = RankHeap::new(items.len());
    for (position, item) in items.iter().enumerate() {
        heap.add(RankPair::new(key(item), position));
    }

    let mut slots: Vec<Option<T>> = items.into_iter().map(Some).collect();
    heap.into_ascending_ids()
        .into_iter()
        .filter_map(|position| slots[position].take())
        .collect()
}

/// What the credits store knows about one cast member
#[derive(Debug, Clone)]
pub struct CastData {
    person: Person,
    /// Films in first-credit order, one entry per film
    films: GrowableSeq<FilmId>,
    /// Films where this person was billed within the top-billing cutoff
    starring: GrowableSeq<FilmId>,
    credits: u32,
}

impl CastData {
    pub fn new(person: Person) -> Self {
        Self {
            person,
            films: GrowableSeq::new(),
            starring: GrowableSeq::new(),
            credits: 0,
        }
    }

    /// Counts one more role in `film_id`
    pub fn record_credit(&mut self, film_id: FilmId, top_billed: bool) {
        self.credits += 1;
        self.films.push_unique(film_id);
        if top_billed {
            self.starring.push_unique(film_id);
        }
    }

    /// Undoes one role in `film_id`, dropping the film from both film lists.
    /// A film's credits are always retracted together.
    ///
    /// Returns `true` once no credits remain and the record should be dropped.
    pub fn retract_credit(&mut self, film_id: FilmId) -> bool {
        self.credits = self.credits.saturating_sub(1);
        self.films.remove(&film_id);
        self.starring.remove(&film_id);
        self.credits == 0
    }

    pub fn person(&self) -> &Person {
        &self.person
    }

    pub fn films(&self) -> &[FilmId] {
        self.films.as_slice()
    }

    pub fn starring(&self) -> &[FilmId] {
        self.starring.as_slice()
    }

    pub fn credits(&self) -> u32 {
        self.credits
    }
}

/// What the credits store knows about one crew member
#[derive(Debug, Clone)]
pub struct CrewData {
    person: Person,
    films: GrowableSeq<FilmId>,
}

impl CrewData {
    pub fn new(person: Person) -> Self {
        Self {
            person,
            films: GrowableSeq::new(),
        }
    }

    pub fn record_film(&mut self, film_id: FilmId) {
        self.films.push_unique(film_id);
    }

    /// Returns `true` once the person has no films left
    pub fn retract_film(&mut self, film_id: FilmId) -> bool {
        self.films.remove(&film_id);
        self.films.is_empty()
    }

    pub fn person(&self) -> &Person {
        &self.person
    }

    pub fn films(&self) -> &[FilmId] {
        self.films.as_slice()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cast(id: u32, order: u32, character: &str) -> CastCredit {
        CastCredit {
            id,
            name: format!("person {}", id),
            character: character.to_string(),
            order,
        }
    }

    fn crew(id: u32, job: &str) -> CrewCredit {
        CrewCredit {
            id,
            name: format!("person {}", id),
            department: "Crew".to_string(),
            job: job.to_string(),
        }
    }

    #[test]
    fn test_cast_sorted_by_order() {
        let credits = FilmCredits::new(
            vec![cast(3, 2, "c"), cast(1, 0, "a"), cast(2, 1, "b")],
            Vec::new(),
        );
        let orders: Vec<u32> = credits.cast().iter().map(|c| c.order).collect();
        assert_eq!(orders, vec![0, 1, 2]);
    }

    #[test]
    fn test_sort_is_stable_on_ties() {
        let credits = FilmCredits::new(
            vec![cast(9, 1, "first"), cast(4, 0, "lead"), cast(7, 1, "second")],
            vec![crew(5, "Director"), crew(2, "Editor"), crew(5, "Writer")],
        );
        let characters: Vec<&str> = credits.cast().iter().map(|c| c.character.as_str()).collect();
        assert_eq!(characters, vec!["lead", "first", "second"]);

        let jobs: Vec<&str> = credits.crew().iter().map(|c| c.job.as_str()).collect();
        assert_eq!(jobs, vec!["Editor", "Director", "Writer"]);
    }

    #[test]
    fn test_empty_credits() {
        let credits = FilmCredits::new(Vec::new(), Vec::new());
        assert!(credits.cast().is_empty());
        assert!(credits.crew().is_empty());
    }

    #[test]
    fn test_cast_data_counts_every_role() {
        let mut data = CastData::new(cast(1, 0, "a").person());
        data.record_credit(10, true);
        data.record_credit(10, false);
        data.record_credit(20, false);

        assert_eq!(data.credits(), 3);
        assert_eq!(data.films(), &[10, 20]);
        assert_eq!(data.starring(), &[10]);

        assert!(!data.retract_credit(10));
        assert!(!data.retract_credit(10));
        assert_eq!(data.films(), &[20]);
        assert!(data.starring().is_empty());
        assert!(data.retract_credit(20));
    }

    #[test]
    fn test_crew_data_empties() {
        let mut data = CrewData::new(crew(5, "Director").person());
        data.record_film(1);
        data.record_film(1);
        data.record_film(2);
        assert_eq!(data.films(), &[1, 2]);
        assert!(!data.retract_film(1));
        assert!(data.retract_film(2));
    }
}
