//! Genre entity model and DTOs.

use cinecat_core::sorting::SortKey;
use cinecat_core::types::DbId;
use cinecat_core::validation::first_letter_uppercase;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::mapping::EntityMapping;

/// A row from the `genres` table.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Genre {
    pub id: DbId,
    pub name: String,
}

/// Client-facing genre. Also inlined into movie details.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct GenreDto {
    pub id: DbId,
    pub name: String,
}

/// DTO for creating, replacing or patching a genre.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct CreateGenre {
    #[validate(
        length(min = 1, max = 40),
        custom(function = "first_letter_uppercase")
    )]
    pub name: String,
}

/// A genre not yet persisted.
#[derive(Debug, Clone)]
pub struct NewGenre {
    pub name: String,
}

impl NewGenre {
    pub fn into_entity(self, id: DbId) -> Genre {
        Genre {
            id,
            name: self.name,
        }
    }
}

/// Query-string criteria for `GET /genres`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenreFilter {
    /// Substring of the genre name.
    pub name: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenreSort {
    Name,
    Id,
}

impl SortKey for GenreSort {
    const DEFAULT: Self = GenreSort::Name;

    fn from_name(name: &str) -> Option<Self> {
        match name {
            "name" => Some(GenreSort::Name),
            "id" => Some(GenreSort::Id),
            _ => None,
        }
    }

    fn column(self) -> &'static str {
        match self {
            GenreSort::Name => "t.name",
            GenreSort::Id => "t.id",
        }
    }

    fn is_unique(self) -> bool {
        matches!(self, GenreSort::Id)
    }
}

impl EntityMapping for Genre {
    type Draft = NewGenre;
    type Read = GenreDto;
    type Create = CreateGenre;
    type Patch = CreateGenre;

    fn id(&self) -> DbId {
        self.id
    }

    fn to_read(self) -> GenreDto {
        GenreDto {
            id: self.id,
            name: self.name,
        }
    }

    fn to_draft(input: &CreateGenre) -> NewGenre {
        NewGenre {
            name: input.name.clone(),
        }
    }

    fn apply_update(&mut self, input: &CreateGenre) {
        self.name = input.name.clone();
    }

    fn to_patch(&self) -> CreateGenre {
        CreateGenre {
            name: self.name.clone(),
        }
    }

    fn merge_patch(&mut self, patch: CreateGenre) {
        self.name = patch.name;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_round_trips_through_entity() {
        let input = CreateGenre {
            name: "Drama".into(),
        };
        let dto = Genre::to_draft(&input).into_entity(7).to_read();
        assert_eq!(
            dto,
            GenreDto {
                id: 7,
                name: "Drama".into()
            }
        );
    }

    #[test]
    fn lowercase_name_fails_validation() {
        let input = CreateGenre {
            name: "drama".into(),
        };
        let errors = input.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("name"));
    }

    #[test]
    fn overlong_name_fails_validation() {
        let input = CreateGenre {
            name: format!("D{}", "a".repeat(40)),
        };
        assert!(input.validate().is_err());
    }
}
