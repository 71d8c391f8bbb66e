use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use data_loader::{Dataset, LoadOptions};
use stores::{FilmId, PersonId};
use std::path::PathBuf;
use std::time::Instant;
use tracing::debug;

mod report;

use report::{FilmReport, PersonReport, Ranking, Report, SearchReport};

/// film-stores - query film credits and ratings
#[derive(Parser)]
#[command(name = "film-stores")]
#[command(about = "Query cast, crew and ratings of a film dataset", long_about = None)]
struct Cli {
    /// Directory holding films.dat, ratings.dat, cast.dat and crew.dat
    #[arg(short, long, default_value = "data/films", global = true)]
    data_dir: PathBuf,

    /// Refuse ratings and credits for films missing from films.dat
    #[arg(long, global = true)]
    strict: bool,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show a film's cast, crew and rating summary
    Film {
        #[arg(long)]
        film_id: FilmId,
    },

    /// Show the films a cast or crew member worked on
    Person {
        #[arg(long)]
        person_id: PersonId,
    },

    /// Find films, cast and crew whose title or name contains a string
    Search {
        /// Case-sensitive substring
        query: String,
    },

    /// Cast members with the most credits
    TopCast {
        #[arg(long, default_value = "10")]
        limit: usize,
    },

    /// Films (or users) with the most ratings
    MostRated {
        #[arg(long, default_value = "10")]
        limit: usize,

        /// Rank users by how many films they rated instead
        #[arg(long)]
        users: bool,
    },

    /// Films with the highest average rating
    TopAverage {
        #[arg(long, default_value = "10")]
        limit: usize,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    debug!(strict = cli.strict, json = cli.json, "parsed arguments");

    // Progress goes to stderr so --json output stays parseable
    eprintln!("Loading film dataset from {}...", cli.data_dir.display());
    let start = Instant::now();
    let options = LoadOptions {
        strict_references: cli.strict,
    };
    let dataset = Dataset::load_from_files(&cli.data_dir, &options)
        .with_context(|| format!("Failed to load dataset from {}", cli.data_dir.display()))?;
    eprintln!("{} Loaded dataset in {:?}", "✓".green(), start.elapsed());

    run(&dataset, cli.command, cli.json)
}

fn run(dataset: &Dataset, command: Commands, json: bool) -> Result<()> {
    match command {
        Commands::Film { film_id } => {
            let report = FilmReport::build(dataset, film_id)
                .ok_or_else(|| anyhow!("Film {} not found", film_id))?;
            emit(&report, json)
        }
        Commands::Person { person_id } => {
            let report = PersonReport::build(dataset, person_id)
                .ok_or_else(|| anyhow!("Person {} not found", person_id))?;
            emit(&report, json)
        }
        Commands::Search { query } => emit(&SearchReport::build(dataset, &query), json),
        Commands::TopCast { limit } => emit(&Ranking::top_cast(dataset, limit), json),
        Commands::MostRated { limit, users } => {
            let ranking = if users {
                Ranking::most_rated_users(dataset, limit)
            } else {
                Ranking::most_rated_films(dataset, limit)
            };
            emit(&ranking, json)
        }
        Commands::TopAverage { limit } => emit(&Ranking::top_average_films(dataset, limit), json),
    }
}

fn emit<R: Report>(report: &R, json: bool) -> Result<()> {
    if json {
        let text = serde_json::to_string_pretty(report).context("Failed to serialize result")?;
        println!("{}", text);
    } else {
        report.print_text();
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use data_loader::{CastLine, CrewLine, Film};
    use stores::{CastCredit, CrewCredit, Rating};

    fn sample_dataset() -> Dataset {
        let films = vec![
            Film {
                id: 862,
                title: "Toy Story (1995)".to_string(),
                year: Some(1995),
            },
            Film {
                id: 13,
                title: "Forrest Gump (1994)".to_string(),
                year: Some(1994),
            },
        ];
        let cast = vec![
            CastLine {
                film_id: 862,
                credit: CastCredit {
                    id: 31,
                    name: "Tom Hanks".to_string(),
                    character: "Woody (voice)".to_string(),
                    order: 0,
                },
            },
            CastLine {
                film_id: 13,
                credit: CastCredit {
                    id: 31,
                    name: "Tom Hanks".to_string(),
                    character: "Forrest Gump".to_string(),
                    order: 0,
                },
            },
            CastLine {
                film_id: 13,
                credit: CastCredit {
                    id: 32,
                    name: "Robin Wright".to_string(),
                    character: "Jenny Curran".to_string(),
                    order: 6,
                },
            },
        ];
        let crew = vec![CrewLine {
            film_id: 13,
            credit: CrewCredit {
                id: 24,
                name: "Robert Zemeckis".to_string(),
                department: "Directing".to_string(),
                job: "Director".to_string(),
            },
        }];
        let ratings = vec![
            Rating {
                user_id: 1,
                film_id: 862,
                rating: 4.0,
                timestamp: 0,
            },
            Rating {
                user_id: 2,
                film_id: 862,
                rating: 3.0,
                timestamp: 0,
            },
            Rating {
                user_id: 1,
                film_id: 13,
                rating: 5.0,
                timestamp: 0,
            },
        ];
        Dataset::build(films, cast, crew, ratings, &LoadOptions::default()).unwrap()
    }

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_subcommands() {
        let cli = Cli::try_parse_from(["film-stores", "--json", "most-rated", "--users", "--limit", "3"])
            .unwrap();
        assert!(cli.json);
        assert!(matches!(cli.command, Commands::MostRated { limit: 3, users: true }));

        let cli = Cli::try_parse_from(["film-stores", "film", "--film-id", "862", "--strict"]).unwrap();
        assert!(cli.strict);
        assert!(matches!(cli.command, Commands::Film { film_id: 862 }));
    }

    #[test]
    fn test_film_report() {
        let dataset = sample_dataset();
        let report = FilmReport::build(&dataset, 13).unwrap();

        assert_eq!(report.film.title, Some("Forrest Gump (1994)"));
        assert_eq!(report.cast.len(), 2);
        assert_eq!(report.crew[0].name, "Robert Zemeckis");
        assert_eq!(report.average_rating, Some(5.0));
        assert!(FilmReport::build(&dataset, 999).is_none());
    }

    #[test]
    fn test_person_report() {
        let dataset = sample_dataset();

        let hanks = PersonReport::build(&dataset, 31).unwrap();
        assert_eq!(hanks.cast_credits, Some(2));
        assert_eq!(hanks.starring.len(), 2);

        let wright = PersonReport::build(&dataset, 32).unwrap();
        assert!(wright.starring.is_empty());

        let zemeckis = PersonReport::build(&dataset, 24).unwrap();
        assert_eq!(zemeckis.cast_credits, None);
        assert_eq!(zemeckis.crew_films[0].id, 13);
    }

    #[test]
    fn test_rankings_serialize() {
        let dataset = sample_dataset();

        let ranking = Ranking::most_rated_films(&dataset, 1);
        let value = serde_json::to_value(&ranking).unwrap();
        assert_eq!(value["entries"][0]["id"], 862);
        assert_eq!(value["entries"][0]["count"], 2);
        assert!(value.get("unit").is_none());

        let top = Ranking::top_average_films(&dataset, 2);
        let ids: Vec<u32> = top.entries.iter().map(|entry| entry.id).collect();
        assert_eq!(ids, vec![13, 862]);

        let cast = Ranking::top_cast(&dataset, 5);
        assert_eq!(cast.entries[0].name, Some("Tom Hanks"));

        let users = Ranking::most_rated_users(&dataset, 2);
        assert_eq!(users.entries[0].id, 1);
        assert_eq!(users.entries[0].count, Some(2));
        assert_eq!(users.entries[1].count, Some(1));
    }

    #[test]
    fn test_search_report() {
        let dataset = sample_dataset();
        let report = SearchReport::build(&dataset, "Forrest");
        assert_eq!(report.films.len(), 1);
        assert!(report.cast.is_empty());

        let report = SearchReport::build(&dataset, "Robert");
        assert_eq!(report.crew.len(), 1);
    }
}
