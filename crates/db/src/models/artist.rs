//! Artist profile model and DTOs.
//!
//! An artist profile is linked 1:1 to a user and is deactivated rather than
//! deleted, so albums keep pointing at a valid row.

use beatmarket_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

use crate::entity::{push_some, Entity, Fields, Lifecycle, Value};
use crate::models::user::UserResponse;
use crate::repositories::memory::MemoryEntity;

/// An artist row from the `artists` table.
#[derive(Debug, Clone, FromRow)]
pub struct Artist {
    pub id: DbId,
    pub user_id: DbId,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Artist profile with its user embedded.
#[derive(Debug, Clone, Serialize)]
pub struct ArtistResponse {
    pub id: DbId,
    pub user: UserResponse,
    pub description: Option<String>,
}

impl ArtistResponse {
    pub fn new(artist: Artist, user: UserResponse) -> Self {
        Self {
            id: artist.id,
            user,
            description: artist.description,
        }
    }
}

/// DTO for creating an artist profile.
#[derive(Debug, Clone)]
pub struct CreateArtist {
    pub user_id: DbId,
    pub description: Option<String>,
}

/// DTO for updating an artist profile.
#[derive(Debug, Clone, Default)]
pub struct UpdateArtist {
    pub description: Option<String>,
}

impl Entity for Artist {
    type Create = CreateArtist;
    type Update = UpdateArtist;

    const NAME: &'static str = "Artist";
    const TABLE: &'static str = "artists";
    const COLUMNS: &'static str = "id, user_id, description, is_active, created_at, updated_at";
    const OWNER_COLUMN: Option<&'static str> = Some("user_id");
    const LIFECYCLE: Lifecycle = Lifecycle::Deactivate;
    const FILTERABLE: &'static [&'static str] = &["user_id"];

    fn id(&self) -> DbId {
        self.id
    }

    fn owner_id(&self) -> Option<DbId> {
        Some(self.user_id)
    }

    fn column_value(&self, column: &str) -> Option<Value> {
        match column {
            "id" => Some(self.id.into()),
            "user_id" => Some(self.user_id.into()),
            _ => None,
        }
    }

    fn insert_fields(input: &CreateArtist) -> Fields {
        vec![
            ("user_id", input.user_id.into()),
            ("description", input.description.clone().into()),
        ]
    }

    fn update_fields(input: &UpdateArtist) -> Fields {
        let mut fields = Fields::new();
        push_some(&mut fields, "description", &input.description);
        fields
    }
}

impl MemoryEntity for Artist {
    const UNIQUE: &'static [&'static str] = &["user_id"];

    fn materialize(id: DbId, input: &CreateArtist, now: Timestamp) -> Self {
        Self {
            id,
            user_id: input.user_id,
            description: input.description.clone(),
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply_update(&mut self, input: &UpdateArtist) {
        if let Some(description) = &input.description {
            self.description = Some(description.clone());
        }
    }

    fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    fn set_updated_at(&mut self, at: Timestamp) {
        self.updated_at = at;
    }

    fn is_live(&self) -> bool {
        self.is_active
    }

    fn retire(&mut self, _now: Timestamp) {
        self.is_active = false;
    }
}
