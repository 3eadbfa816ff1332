//! Movie entity model, its owned relation rows, and DTOs.
//!
//! A movie owns two relation lists: the set of genres it belongs to and the
//! ordered cast. Both are replaced wholesale on full update; patching only
//! touches the scalar columns.

use chrono::NaiveDate;
use cinecat_core::sorting::SortKey;
use cinecat_core::types::DbId;
use cinecat_core::validation::{unique_ids, UploadRules};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::{Validate, ValidationError};

use crate::mapping::{AssetField, EntityMapping};
use crate::models::genre::GenreDto;

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

/// A row from the `movies` table together with its loaded relation rows.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Movie {
    pub id: DbId,
    pub title: String,
    pub in_theaters: bool,
    pub release_date: NaiveDate,
    pub poster: Option<String>,
    #[sqlx(skip)]
    pub genres: Vec<MovieGenre>,
    #[sqlx(skip)]
    pub actors: Vec<MovieActor>,
}

/// A `movie_genres` row without its movie id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromRow)]
pub struct MovieGenre {
    pub genre_id: DbId,
}

/// A `movie_actors` row without its movie id.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct MovieActor {
    pub actor_id: DbId,
    pub role: String,
    pub display_order: i32,
}

// ---------------------------------------------------------------------------
// DTOs
// ---------------------------------------------------------------------------

/// Flat projection used by lists and the index.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct MovieDto {
    pub id: DbId,
    pub title: String,
    pub in_theaters: bool,
    pub release_date: NaiveDate,
    pub poster: Option<String>,
}

/// Get-by-id projection with genres and cast inlined.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieDetailDto {
    pub id: DbId,
    pub title: String,
    pub in_theaters: bool,
    pub release_date: NaiveDate,
    pub poster: Option<String>,
    pub genres: Vec<GenreDto>,
    /// Ordered by display order.
    pub actors: Vec<MovieActorDto>,
}

#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct MovieActorDto {
    pub actor_id: DbId,
    pub character: String,
    pub actor_name: String,
}

/// Response of `GET /movies`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieIndexDto {
    pub upcoming_releases: Vec<MovieDto>,
    pub in_theaters: Vec<MovieDto>,
}

/// One cast entry in a create/replace payload. Display order comes from the
/// entry's position in the list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct ActorRoleInput {
    pub actor_id: DbId,
    #[serde(default)]
    #[validate(length(max = 100))]
    pub character: String,
}

/// DTO for creating or fully replacing a movie.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct CreateMovie {
    #[validate(length(min = 1, max = 300))]
    pub title: String,
    #[serde(default)]
    pub in_theaters: bool,
    pub release_date: NaiveDate,
    #[serde(default)]
    #[validate(custom(function = "unique_ids"))]
    pub genre_ids: Vec<DbId>,
    #[serde(default)]
    #[validate(nested, custom(function = "unique_actor_ids"))]
    pub actors: Vec<ActorRoleInput>,
}

/// The scalar projection patch documents address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct MoviePatch {
    #[validate(length(min = 1, max = 300))]
    pub title: String,
    pub in_theaters: bool,
    pub release_date: NaiveDate,
}

fn unique_actor_ids(actors: &[ActorRoleInput]) -> Result<(), ValidationError> {
    let ids: Vec<DbId> = actors.iter().map(|a| a.actor_id).collect();
    unique_ids(&ids)
}

/// Turn the payload's cast list into relation rows numbered 1..n.
pub fn cast_rows(actors: &[ActorRoleInput]) -> Vec<MovieActor> {
    actors
        .iter()
        .zip(1..)
        .map(|(input, display_order)| MovieActor {
            actor_id: input.actor_id,
            role: input.character.clone(),
            display_order,
        })
        .collect()
}

fn genre_rows(genre_ids: &[DbId]) -> Vec<MovieGenre> {
    genre_ids
        .iter()
        .map(|&genre_id| MovieGenre { genre_id })
        .collect()
}

#[derive(Debug, Clone)]
pub struct NewMovie {
    pub title: String,
    pub in_theaters: bool,
    pub release_date: NaiveDate,
    pub poster: Option<String>,
    pub genres: Vec<MovieGenre>,
    pub actors: Vec<MovieActor>,
}

impl NewMovie {
    pub fn into_entity(self, id: DbId) -> Movie {
        Movie {
            id,
            title: self.title,
            in_theaters: self.in_theaters,
            release_date: self.release_date,
            poster: self.poster,
            genres: self.genres,
            actors: self.actors,
        }
    }
}

// ---------------------------------------------------------------------------
// Listing
// ---------------------------------------------------------------------------

/// Query-string criteria for `GET /movies/filter`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MovieFilter {
    pub title: Option<String>,
    /// Only `true` restricts.
    pub in_theaters: Option<bool>,
    /// Only `true` restricts, to release dates after today.
    pub upcoming_releases: Option<bool>,
    #[serde(default, deserialize_with = "cinecat_core::filtering::comma_separated_ids")]
    pub genre_ids: Vec<DbId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovieSort {
    Title,
    ReleaseDate,
    InTheaters,
    Id,
}

impl SortKey for MovieSort {
    const DEFAULT: Self = MovieSort::Title;

    fn from_name(name: &str) -> Option<Self> {
        match name {
            "title" => Some(MovieSort::Title),
            "release_date" | "releasedate" => Some(MovieSort::ReleaseDate),
            "in_theaters" | "intheaters" => Some(MovieSort::InTheaters),
            "id" => Some(MovieSort::Id),
            _ => None,
        }
    }

    fn column(self) -> &'static str {
        match self {
            MovieSort::Title => "t.title",
            MovieSort::ReleaseDate => "t.release_date",
            MovieSort::InTheaters => "t.in_theaters",
            MovieSort::Id => "t.id",
        }
    }

    fn is_unique(self) -> bool {
        matches!(self, MovieSort::Id)
    }
}

// ---------------------------------------------------------------------------
// Mapping
// ---------------------------------------------------------------------------

impl EntityMapping for Movie {
    type Draft = NewMovie;
    type Read = MovieDto;
    type Create = CreateMovie;
    type Patch = MoviePatch;

    fn id(&self) -> DbId {
        self.id
    }

    fn to_read(self) -> MovieDto {
        MovieDto {
            id: self.id,
            title: self.title,
            in_theaters: self.in_theaters,
            release_date: self.release_date,
            poster: self.poster,
        }
    }

    fn to_draft(input: &CreateMovie) -> NewMovie {
        NewMovie {
            title: input.title.clone(),
            in_theaters: input.in_theaters,
            release_date: input.release_date,
            poster: None,
            genres: genre_rows(&input.genre_ids),
            actors: cast_rows(&input.actors),
        }
    }

    fn apply_update(&mut self, input: &CreateMovie) {
        self.title = input.title.clone();
        self.in_theaters = input.in_theaters;
        self.release_date = input.release_date;
        self.genres = genre_rows(&input.genre_ids);
        self.actors = cast_rows(&input.actors);
    }

    fn to_patch(&self) -> MoviePatch {
        MoviePatch {
            title: self.title.clone(),
            in_theaters: self.in_theaters,
            release_date: self.release_date,
        }
    }

    fn merge_patch(&mut self, patch: MoviePatch) {
        self.title = patch.title;
        self.in_theaters = patch.in_theaters;
        self.release_date = patch.release_date;
    }
}

impl AssetField for Movie {
    const CONTAINER: &'static str = "movies";
    const FIELD: &'static str = "poster";
    const RULES: UploadRules = UploadRules::images(4);

    fn asset(&self) -> Option<&str> {
        self.poster.as_deref()
    }

    fn set_asset(&mut self, reference: String) {
        self.poster = Some(reference);
    }

    fn set_draft_asset(draft: &mut NewMovie, reference: String) {
        draft.poster = Some(reference);
    }
}
