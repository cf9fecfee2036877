//! Beat entity model and DTOs.
//!
//! A beat is created from an audio upload with a provisional title and stays
//! unavailable until its owner releases it.

use beatmarket_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

use crate::entity::{push_some, Entity, Fields, Lifecycle, Value};
use crate::repositories::memory::MemoryEntity;

/// A beat row from the `beats` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Beat {
    pub id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub picture_url: Option<String>,
    pub file_url: String,
    pub co_prod: Option<String>,
    pub prod_by: Option<String>,
    pub user_id: DbId,
    pub is_available: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a beat from an uploaded audio file.
#[derive(Debug, Clone)]
pub struct CreateBeat {
    pub title: String,
    pub description: Option<String>,
    pub picture_url: Option<String>,
    pub file_url: String,
    pub co_prod: Option<String>,
    pub prod_by: Option<String>,
    pub user_id: DbId,
}

/// DTO for updating a beat. All fields are optional.
#[derive(Debug, Clone, Default)]
pub struct UpdateBeat {
    pub title: Option<String>,
    pub description: Option<String>,
    pub picture_url: Option<String>,
    pub co_prod: Option<String>,
    pub prod_by: Option<String>,
    pub is_available: Option<bool>,
}

impl Entity for Beat {
    type Create = CreateBeat;
    type Update = UpdateBeat;

    const NAME: &'static str = "Beat";
    const TABLE: &'static str = "beats";
    const COLUMNS: &'static str = "id, title, description, picture_url, file_url, co_prod, \
                                   prod_by, user_id, is_available, created_at, updated_at";
    const OWNER_COLUMN: Option<&'static str> = Some("user_id");
    const LIFECYCLE: Lifecycle = Lifecycle::HardDelete;
    const FILTERABLE: &'static [&'static str] = &["user_id", "is_available"];

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
            "is_available" => Some(self.is_available.into()),
            _ => None,
        }
    }

    fn insert_fields(input: &CreateBeat) -> Fields {
        vec![
            ("title", input.title.clone().into()),
            ("description", input.description.clone().into()),
            ("picture_url", input.picture_url.clone().into()),
            ("file_url", input.file_url.clone().into()),
            ("co_prod", input.co_prod.clone().into()),
            ("prod_by", input.prod_by.clone().into()),
            ("user_id", input.user_id.into()),
        ]
    }

    fn update_fields(input: &UpdateBeat) -> Fields {
        let mut fields = Fields::new();
        push_some(&mut fields, "title", &input.title);
        push_some(&mut fields, "description", &input.description);
        push_some(&mut fields, "picture_url", &input.picture_url);
        push_some(&mut fields, "co_prod", &input.co_prod);
        push_some(&mut fields, "prod_by", &input.prod_by);
        push_some(&mut fields, "is_available", &input.is_available);
        fields
    }
}

impl MemoryEntity for Beat {
    fn materialize(id: DbId, input: &CreateBeat, now: Timestamp) -> Self {
        Self {
            id,
            title: input.title.clone(),
            description: input.description.clone(),
            picture_url: input.picture_url.clone(),
            file_url: input.file_url.clone(),
            co_prod: input.co_prod.clone(),
            prod_by: input.prod_by.clone(),
            user_id: input.user_id,
            is_available: false,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply_update(&mut self, input: &UpdateBeat) {
        if let Some(v) = &input.title {
            self.title = v.clone();
        }
        if let Some(v) = &input.description {
            self.description = Some(v.clone());
        }
        if let Some(v) = &input.picture_url {
            self.picture_url = Some(v.clone());
        }
        if let Some(v) = &input.co_prod {
            self.co_prod = Some(v.clone());
        }
        if let Some(v) = &input.prod_by {
            self.prod_by = Some(v.clone());
        }
        if let Some(v) = input.is_available {
            self.is_available = v;
        }
    }

    fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    fn set_updated_at(&mut self, at: Timestamp) {
        self.updated_at = at;
    }
}
