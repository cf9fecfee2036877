//! License entity model and DTOs.
//!
//! A license is a priced usage right offered by its owner, optionally tied to
//! a playlist and a beat pack. Prices are kept as the decimal string the
//! owner entered.

use beatmarket_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

use crate::entity::{push_some, Entity, Fields, Lifecycle, Value};
use crate::repositories::memory::MemoryEntity;

/// A license row from the `licenses` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct License {
    pub id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub picture_url: Option<String>,
    pub file_url: Option<String>,
    pub co_prod: Option<String>,
    pub prod_by: Option<String>,
    pub price: String,
    pub playlist_id: Option<DbId>,
    pub beat_pack_id: Option<DbId>,
    pub user_id: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a license.
#[derive(Debug, Clone)]
pub struct CreateLicense {
    pub title: String,
    pub description: Option<String>,
    pub price: String,
    pub file_url: Option<String>,
    pub prod_by: Option<String>,
    pub playlist_id: Option<DbId>,
    pub beat_pack_id: Option<DbId>,
    pub user_id: DbId,
}

/// DTO for updating a license. All fields are optional.
#[derive(Debug, Clone, Default)]
pub struct UpdateLicense {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<String>,
    pub picture_url: Option<String>,
    pub file_url: Option<String>,
    pub playlist_id: Option<DbId>,
    pub beat_pack_id: Option<DbId>,
}

impl Entity for License {
    type Create = CreateLicense;
    type Update = UpdateLicense;

    const NAME: &'static str = "License";
    const TABLE: &'static str = "licenses";
    const COLUMNS: &'static str = "id, title, description, picture_url, file_url, co_prod, \
                                   prod_by, price, playlist_id, beat_pack_id, user_id, \
                                   created_at, updated_at";
    const OWNER_COLUMN: Option<&'static str> = Some("user_id");
    const LIFECYCLE: Lifecycle = Lifecycle::HardDelete;
    const FILTERABLE: &'static [&'static str] = &["user_id", "playlist_id", "beat_pack_id"];

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
            "playlist_id" => Some(self.playlist_id.into()),
            "beat_pack_id" => Some(self.beat_pack_id.into()),
            _ => None,
        }
    }

    fn insert_fields(input: &CreateLicense) -> Fields {
        vec![
            ("title", input.title.clone().into()),
            ("description", input.description.clone().into()),
            ("price", input.price.clone().into()),
            ("file_url", input.file_url.clone().into()),
            ("prod_by", input.prod_by.clone().into()),
            ("playlist_id", input.playlist_id.into()),
            ("beat_pack_id", input.beat_pack_id.into()),
            ("user_id", input.user_id.into()),
        ]
    }

    fn update_fields(input: &UpdateLicense) -> Fields {
        let mut fields = Fields::new();
        push_some(&mut fields, "title", &input.title);
        push_some(&mut fields, "description", &input.description);
        push_some(&mut fields, "price", &input.price);
        push_some(&mut fields, "picture_url", &input.picture_url);
        push_some(&mut fields, "file_url", &input.file_url);
        push_some(&mut fields, "playlist_id", &input.playlist_id);
        push_some(&mut fields, "beat_pack_id", &input.beat_pack_id);
        fields
    }
}

impl MemoryEntity for License {
    fn materialize(id: DbId, input: &CreateLicense, now: Timestamp) -> Self {
        Self {
            id,
            title: input.title.clone(),
            description: input.description.clone(),
            picture_url: None,
            file_url: input.file_url.clone(),
            co_prod: None,
            prod_by: input.prod_by.clone(),
            price: input.price.clone(),
            playlist_id: input.playlist_id,
            beat_pack_id: input.beat_pack_id,
            user_id: input.user_id,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply_update(&mut self, input: &UpdateLicense) {
        if let Some(v) = &input.title {
            self.title = v.clone();
        }
        if let Some(v) = &input.description {
            self.description = Some(v.clone());
        }
        if let Some(v) = &input.price {
            self.price = v.clone();
        }
        if let Some(v) = &input.picture_url {
            self.picture_url = Some(v.clone());
        }
        if let Some(v) = &input.file_url {
            self.file_url = Some(v.clone());
        }
        if let Some(v) = input.playlist_id {
            self.playlist_id = Some(v);
        }
        if let Some(v) = input.beat_pack_id {
            self.beat_pack_id = Some(v);
        }
    }

    fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    fn set_updated_at(&mut self, at: Timestamp) {
        self.updated_at = at;
    }
}
