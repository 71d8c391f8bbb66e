//! Value records shared by the stores and their collaborators.
//!
//! These are plain data: the aggregation services own and index them but
//! never mutate a credit or a person once it has been handed in.

use serde::{Deserialize, Serialize};

/// Unique identifier for a film
pub type FilmId = u32;

/// Unique identifier for a cast or crew member
pub type PersonId = u32;

/// Unique identifier for a user who rates films
pub type UserId = u32;

/// Unix timestamp (seconds) of a rating
pub type Timestamp = i64;

/// Lowest accepted rating value
pub const MIN_RATING: f32 = 0.0;

/// Highest accepted rating value
pub const MAX_RATING: f32 = 5.0;

/// A cast or crew member
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub id: PersonId,
    pub name: String,
}

/// One role played by a cast member in a film
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CastCredit {
    pub id: PersonId,
    pub name: String,
    pub character: String,
    /// Billing position, 0 for the lead
    pub order: u32,
}

impl CastCredit {
    pub fn person(&self) -> Person {
        Person {
            id: self.id,
            name: self.name.clone(),
        }
    }
}

/// One job held by a crew member on a film
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrewCredit {
    pub id: PersonId,
    pub name: String,
    pub department: String,
    pub job: String,
}

impl CrewCredit {
    pub fn person(&self) -> Person {
        Person {
            id: self.id,
            name: self.name.clone(),
        }
    }
}

/// A single rating from a user for a film
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    pub user_id: UserId,
    pub film_id: FilmId,
    /// Rating value from 0.0 to 5.0
    pub rating: f32,
    pub timestamp: Timestamp,
}

/// Whether `value` is an acceptable rating (NaN never is)
pub fn is_valid_rating(value: f32) -> bool {
    (MIN_RATING..=MAX_RATING).contains(&value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_range() {
        assert!(is_valid_rating(0.0));
        assert!(is_valid_rating(3.5));
        assert!(is_valid_rating(5.0));
        assert!(!is_valid_rating(5.5));
        assert!(!is_valid_rating(-0.5));
        assert!(!is_valid_rating(f32::NAN));
    }

    #[test]
    fn test_credit_person() {
        let credit = CastCredit {
            id: 31,
            name: "Tom Hanks".to_string(),
            character: "Woody".to_string(),
            order: 0,
        };
        assert_eq!(
            credit.person(),
            Person {
                id: 31,
                name: "Tom Hanks".to_string()
            }
        );
    }
}
