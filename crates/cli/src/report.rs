//! Query results, printable as colored text or serialized as JSON.

use colored::Colorize;
use data_loader::{Dataset, Film};
use serde::Serialize;
use stores::{CastCredit, CrewCredit, FilmId, Person, PersonId};

/// Anything a subcommand prints
pub trait Report: Serialize {
    fn print_text(&self);
}

/// A film id with its title when the catalog has one
#[derive(Serialize)]
pub struct FilmRef<'a> {
    pub id: FilmId,
    pub title: Option<&'a str>,
}

impl<'a> FilmRef<'a> {
    fn new(dataset: &'a Dataset, id: FilmId) -> Self {
        Self {
            id,
            title: dataset.film(id).map(|film| film.title.as_str()),
        }
    }

    fn label(&self) -> String {
        match self.title {
            Some(title) => format!("{} ({})", title, self.id),
            None => format!("film {}", self.id),
        }
    }
}

fn film_refs<'a>(dataset: &'a Dataset, ids: &[FilmId]) -> Vec<FilmRef<'a>> {
    ids.iter().map(|&id| FilmRef::new(dataset, id)).collect()
}

#[derive(Serialize)]
pub struct FilmReport<'a> {
    pub film: FilmRef<'a>,
    pub year: Option<u16>,
    pub average_rating: Option<f32>,
    pub num_ratings: Option<u32>,
    pub cast: &'a [CastCredit],
    pub crew: &'a [CrewCredit],
}

impl<'a> FilmReport<'a> {
    pub fn build(dataset: &'a Dataset, film_id: FilmId) -> Option<Self> {
        let credits = dataset.credits();
        let ratings = dataset.ratings();
        let known = dataset.film(film_id).is_some()
            || credits.size_of_cast(film_id).is_some()
            || ratings.num_ratings(film_id).is_some();
        if !known {
            return None;
        }

        Some(Self {
            film: FilmRef::new(dataset, film_id),
            year: dataset.film(film_id).and_then(|film| film.year),
            average_rating: ratings.movie_average_rating(film_id),
            num_ratings: ratings.num_ratings(film_id),
            cast: credits.film_cast(film_id),
            crew: credits.film_crew(film_id),
        })
    }
}

impl Report for FilmReport<'_> {
    fn print_text(&self) {
        println!("{}", self.film.label().bold().blue());
        if let Some(year) = self.year {
            println!("{}Year: {}", "• ".green(), year);
        }
        match (self.average_rating, self.num_ratings) {
            (Some(average), Some(count)) => {
                println!("{}Average rating: {:.2} ({} ratings)", "• ".cyan(), average, count)
            }
            _ => println!("{}No ratings", "• ".cyan()),
        }

        println!("Cast:");
        for credit in self.cast {
            println!("  {:>3}. {} as {}", credit.order, credit.name, credit.character);
        }
        println!("Crew:");
        for credit in self.crew {
            println!("  - {} ({}, {})", credit.name, credit.job, credit.department);
        }
    }
}

#[derive(Serialize)]
pub struct PersonReport<'a> {
    pub person: &'a Person,
    pub cast_credits: Option<u32>,
    pub films: Vec<FilmRef<'a>>,
    pub starring: Vec<FilmRef<'a>>,
    pub crew_films: Vec<FilmRef<'a>>,
}

impl<'a> PersonReport<'a> {
    pub fn build(dataset: &'a Dataset, person_id: PersonId) -> Option<Self> {
        let credits = dataset.credits();
        let person = credits.cast(person_id).or_else(|| credits.crew(person_id))?;

        Some(Self {
            person,
            cast_credits: credits.num_cast_credits(person_id),
            films: film_refs(dataset, credits.cast_films(person_id)),
            starring: film_refs(dataset, credits.cast_stars_in_films(person_id)),
            crew_films: film_refs(dataset, credits.crew_films(person_id)),
        })
    }
}

impl Report for PersonReport<'_> {
    fn print_text(&self) {
        println!("{}", format!("{} ({})", self.person.name, self.person.id).bold().blue());
        if let Some(count) = self.cast_credits {
            println!("{}Cast credits: {}", "• ".green(), count);
        }
        for (heading, films) in [
            ("Appears in", &self.films),
            ("Top billed in", &self.starring),
            ("Crew on", &self.crew_films),
        ] {
            if films.is_empty() {
                continue;
            }
            println!("{}:", heading);
            for film in films {
                println!("  - {}", film.label());
            }
        }
    }
}

#[derive(Serialize)]
pub struct SearchReport<'a> {
    pub query: &'a str,
    pub films: Vec<&'a Film>,
    pub cast: Vec<&'a Person>,
    pub crew: Vec<&'a Person>,
}

impl<'a> SearchReport<'a> {
    pub fn build(dataset: &'a Dataset, query: &'a str) -> Self {
        let credits = dataset.credits();
        let mut cast = credits.find_cast(query);
        let mut crew = credits.find_crew(query);
        cast.sort_by_key(|person| person.id);
        crew.sort_by_key(|person| person.id);

        Self {
            query,
            films: dataset.find_films(query),
            cast,
            crew,
        }
    }
}

impl Report for SearchReport<'_> {
    fn print_text(&self) {
        println!("{}", format!("Search results for '{}':", self.query).bold().blue());
        for film in &self.films {
            println!("  film {}: {}", film.id, film.title);
        }
        for person in &self.cast {
            println!("  cast {}: {}", person.id, person.name);
        }
        for person in &self.crew {
            println!("  crew {}: {}", person.id, person.name);
        }
        if self.films.is_empty() && self.cast.is_empty() && self.crew.is_empty() {
            println!("  (no matches)");
        }
    }
}

#[derive(Serialize)]
pub struct RankedEntry<'a> {
    pub rank: usize,
    pub id: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average: Option<f32>,
}

#[derive(Serialize)]
pub struct Ranking<'a> {
    pub title: &'static str,
    /// What `count` counts, for text output
    #[serde(skip)]
    pub unit: &'static str,
    pub entries: Vec<RankedEntry<'a>>,
}

impl<'a> Ranking<'a> {
    pub fn top_cast(dataset: &'a Dataset, limit: usize) -> Self {
        let credits = dataset.credits();
        let entries = credits
            .most_cast_credits(limit)
            .into_iter()
            .enumerate()
            .map(|(idx, person)| RankedEntry {
                rank: idx + 1,
                id: person.id,
                name: Some(person.name.as_str()),
                count: credits.num_cast_credits(person.id),
                average: None,
            })
            .collect();
        Self {
            title: "Cast members with the most credits",
            unit: "credits",
            entries,
        }
    }

    pub fn most_rated_films(dataset: &'a Dataset, limit: usize) -> Self {
        let ids = dataset.ratings().most_rated_movies(limit);
        Self {
            title: "Most rated films",
            unit: "ratings",
            entries: film_entries(dataset, ids),
        }
    }

    pub fn top_average_films(dataset: &'a Dataset, limit: usize) -> Self {
        let ids = dataset.ratings().top_average_rated_movies(limit);
        Self {
            title: "Films with the highest average rating",
            unit: "ratings",
            entries: film_entries(dataset, ids),
        }
    }

    pub fn most_rated_users(dataset: &'a Dataset, limit: usize) -> Self {
        let ratings = dataset.ratings();
        let entries = ratings
            .most_rated_users(limit)
            .into_iter()
            .enumerate()
            .map(|(idx, user_id)| RankedEntry {
                rank: idx + 1,
                id: user_id,
                name: None,
                count: ratings.num_user_ratings(user_id),
                average: ratings.user_average_rating(user_id),
            })
            .collect();
        Self {
            title: "Users with the most ratings",
            unit: "ratings",
            entries,
        }
    }
}

fn film_entries(dataset: &Dataset, ids: Vec<FilmId>) -> Vec<RankedEntry<'_>> {
    let ratings = dataset.ratings();
    ids.into_iter()
        .enumerate()
        .map(|(idx, film_id)| RankedEntry {
            rank: idx + 1,
            id: film_id,
            name: dataset.film(film_id).map(|film| film.title.as_str()),
            count: ratings.num_ratings(film_id),
            average: ratings.movie_average_rating(film_id),
        })
        .collect()
}

impl Report for Ranking<'_> {
    fn print_text(&self) {
        println!("{}", self.title.bold().blue());
        for entry in &self.entries {
            let mut line = format!("{}. {}", entry.rank.to_string().green(), entry.id);
            if let Some(name) = entry.name {
                line.push_str(&format!(" {}", name));
            }
            if let Some(count) = entry.count {
                line.push_str(&format!(" - {} {}", count, self.unit));
            }
            if let Some(average) = entry.average {
                line.push_str(&format!(" - avg {:.2}", average));
            }
            println!("{}", line);
        }
    }
}
