//! Actor entity model and DTOs.

use chrono::NaiveDate;
use cinecat_core::sorting::SortKey;
use cinecat_core::types::DbId;
use cinecat_core::validation::UploadRules;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::mapping::{AssetField, EntityMapping};

/// A row from the `actors` table.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Actor {
    pub id: DbId,
    pub name: String,
    pub birth_date: NaiveDate,
    /// Asset reference of the uploaded photo.
    pub photo: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActorDto {
    pub id: DbId,
    pub name: String,
    pub birth_date: NaiveDate,
    pub photo: Option<String>,
}

/// DTO for creating, replacing or patching an actor. The photo travels
/// separately as a multipart file part.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct CreateActor {
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    pub birth_date: NaiveDate,
}

#[derive(Debug, Clone)]
pub struct NewActor {
    pub name: String,
    pub birth_date: NaiveDate,
    pub photo: Option<String>,
}

impl NewActor {
    pub fn into_entity(self, id: DbId) -> Actor {
        Actor {
            id,
            name: self.name,
            birth_date: self.birth_date,
            photo: self.photo,
        }
    }
}

/// Query-string criteria for `GET /actors`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActorFilter {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActorSort {
    Name,
    BirthDate,
    Id,
}

impl SortKey for ActorSort {
    const DEFAULT: Self = ActorSort::Name;

    fn from_name(name: &str) -> Option<Self> {
        match name {
            "name" => Some(ActorSort::Name),
            "birth_date" | "birthdate" => Some(ActorSort::BirthDate),
            "id" => Some(ActorSort::Id),
            _ => None,
        }
    }

    fn column(self) -> &'static str {
        match self {
            ActorSort::Name => "t.name",
            ActorSort::BirthDate => "t.birth_date",
            ActorSort::Id => "t.id",
        }
    }

    fn is_unique(self) -> bool {
        matches!(self, ActorSort::Id)
    }
}

impl EntityMapping for Actor {
    type Draft = NewActor;
    type Read = ActorDto;
    type Create = CreateActor;
    type Patch = CreateActor;

    fn id(&self) -> DbId {
        self.id
    }

    fn to_read(self) -> ActorDto {
        ActorDto {
            id: self.id,
            name: self.name,
            birth_date: self.birth_date,
            photo: self.photo,
        }
    }

    fn to_draft(input: &CreateActor) -> NewActor {
        NewActor {
            name: input.name.clone(),
            birth_date: input.birth_date,
            photo: None,
        }
    }

    fn apply_update(&mut self, input: &CreateActor) {
        self.name = input.name.clone();
        self.birth_date = input.birth_date;
    }

    fn to_patch(&self) -> CreateActor {
        CreateActor {
            name: self.name.clone(),
            birth_date: self.birth_date,
        }
    }

    fn merge_patch(&mut self, patch: CreateActor) {
        self.name = patch.name;
        self.birth_date = patch.birth_date;
    }
}

impl AssetField for Actor {
    const CONTAINER: &'static str = "actors";
    const FIELD: &'static str = "photo";
    const RULES: UploadRules = UploadRules::images(5);

    fn asset(&self) -> Option<&str> {
        self.photo.as_deref()
    }

    fn set_asset(&mut self, reference: String) {
        self.photo = Some(reference);
    }

    fn set_draft_asset(draft: &mut NewActor, reference: String) {
        draft.photo = Some(reference);
    }
}
