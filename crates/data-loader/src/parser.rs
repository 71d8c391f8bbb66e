//! Parser for the dataset files.
//!
//! Every file is `::`-separated, one record per line:
//! - films.dat: filmId::title
//! - ratings.dat: userId::filmId::rating::timestamp
//! - cast.dat: filmId::personId::order::character::name
//! - crew.dat: filmId::personId::department::job::name
//!
//! The last column of each file takes the remainder of the line, so titles
//! and names may themselves contain `::`. Blank lines are skipped.

use crate::error::{DataLoadError, Result};
use crate::types::{CastLine, CrewLine, Film};
use std::fmt::Display;
use std::io::ErrorKind;
use std::path::Path;
use std::str::{FromStr, SplitN};
use stores::{CastCredit, CrewCredit, Rating};

pub const FILMS_FILE: &str = "films.dat";
pub const RATINGS_FILE: &str = "ratings.dat";
pub const CAST_FILE: &str = "cast.dat";
pub const CREW_FILE: &str = "crew.dat";

/// Reads a whole file, replacing invalid UTF-8 rather than failing on it
fn read_content(path: &Path) -> Result<String> {
    match std::fs::read(path) {
        Ok(bytes) => Ok(String::from_utf8_lossy(&bytes).into_owned()),
        Err(e) if e.kind() == ErrorKind::NotFound => Err(DataLoadError::FileNotFound {
            path: path.display().to_string(),
        }),
        Err(e) => Err(e.into()),
    }
}

/// Cursor over the columns of one line
struct Fields<'a> {
    file: &'static str,
    line: usize,
    parts: SplitN<'a, &'static str>,
}

impl<'a> Fields<'a> {
    fn new(file: &'static str, line: usize, text: &'a str, columns: usize) -> Self {
        Self {
            file,
            line,
            parts: text.splitn(columns, "::"),
        }
    }

    fn error(&self, reason: String) -> DataLoadError {
        DataLoadError::ParseError {
            file: self.file.to_string(),
            line: self.line,
            reason,
        }
    }

    fn text(&mut self, name: &str) -> Result<&'a str> {
        match self.parts.next() {
            Some(value) => Ok(value),
            None => Err(self.error(format!("Missing {}", name))),
        }
    }

    fn number<T>(&mut self, name: &str) -> Result<T>
    where
        T: FromStr,
        T::Err: Display,
    {
        let raw = self.text(name)?;
        raw.trim()
            .parse()
            .map_err(|e| self.error(format!("Invalid {}: {}", name, e)))
    }
}

fn parse_content<T>(
    content: &str,
    file: &'static str,
    columns: usize,
    parse_line: impl Fn(&mut Fields<'_>) -> Result<T>,
) -> Result<Vec<T>> {
    let mut records = Vec::new();
    for (idx, line) in content.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let mut fields = Fields::new(file, idx + 1, trimmed, columns);
        records.push(parse_line(&mut fields)?);
    }
    Ok(records)
}

fn parse_film(fields: &mut Fields<'_>) -> Result<Film> {
    let id = fields.number("filmId")?;
    let title = fields.text("title")?;
    Ok(Film {
        id,
        title: title.to_string(),
        year: extract_year_from_title(title),
    })
}

fn parse_rating(fields: &mut Fields<'_>) -> Result<Rating> {
    Ok(Rating {
        user_id: fields.number("userId")?,
        film_id: fields.number("filmId")?,
        rating: fields.number("rating")?,
        timestamp: fields.number("timestamp")?,
    })
}

fn parse_cast_line(fields: &mut Fields<'_>) -> Result<CastLine> {
    let film_id = fields.number("filmId")?;
    let id = fields.number("personId")?;
    let order = fields.number("order")?;
    let character = fields.text("character")?;
    let name = fields.text("name")?;
    Ok(CastLine {
        film_id,
        credit: CastCredit {
            id,
            name: name.to_string(),
            character: character.to_string(),
            order,
        },
    })
}

fn parse_crew_line(fields: &mut Fields<'_>) -> Result<CrewLine> {
    let film_id = fields.number("filmId")?;
    let id = fields.number("personId")?;
    let department = fields.text("department")?;
    let job = fields.text("job")?;
    let name = fields.text("name")?;
    Ok(CrewLine {
        film_id,
        credit: CrewCredit {
            id,
            name: name.to_string(),
            department: department.to_string(),
            job: job.to_string(),
        },
    })
}

/// Parse the films.dat file
pub fn parse_films(path: &Path) -> Result<Vec<Film>> {
    parse_content(&read_content(path)?, FILMS_FILE, 2, parse_film)
}

/// Parse the ratings.dat file
pub fn parse_ratings(path: &Path) -> Result<Vec<Rating>> {
    parse_content(&read_content(path)?, RATINGS_FILE, 4, parse_rating)
}

/// Parse the cast.dat file
pub fn parse_cast(path: &Path) -> Result<Vec<CastLine>> {
    parse_content(&read_content(path)?, CAST_FILE, 5, parse_cast_line)
}

/// Parse the crew.dat file
pub fn parse_crew(path: &Path) -> Result<Vec<CrewLine>> {
    parse_content(&read_content(path)?, CREW_FILE, 5, parse_crew_line)
}

/// Extract year from film title
///
/// Example: "Toy Story (1995)" -> Some(1995)
///          "Film Title" -> None
fn extract_year_from_title(title: &str) -> Option<u16> {
    let start = title.rfind('(')?;
    let end = title.rfind(')')?;
    if start < end {
        return title[start + 1..end].parse::<u16>().ok();
    }
    None
}
