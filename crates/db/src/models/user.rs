//! User entity model and DTOs.

use beatmarket_core::types::{DbId, Timestamp};
use chrono::NaiveDate;
use serde::Serialize;
use sqlx::FromRow;

use crate::entity::{push_some, Entity, Fields, Lifecycle, Value};
use crate::repositories::memory::MemoryEntity;

/// Full user row from the `users` table.
///
/// Contains the password hash -- NEVER serialize this to API responses directly.
/// Use [`UserResponse`] for external-facing output.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub picture_url: Option<String>,
    pub birthday: NaiveDate,
    pub roles: Vec<String>,
    pub tags: Vec<String>,
    pub deleted_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Safe user representation for API responses (no password hash).
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: DbId,
    pub username: String,
    pub email: String,
    pub picture_url: Option<String>,
    pub birthday: NaiveDate,
    pub roles: Vec<String>,
    pub created_at: Timestamp,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            picture_url: user.picture_url,
            birthday: user.birthday,
            roles: user.roles,
            created_at: user.created_at,
        }
    }
}

/// DTO for creating a new user.
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub picture_url: Option<String>,
    pub birthday: NaiveDate,
    pub roles: Vec<String>,
    pub tags: Vec<String>,
}

/// DTO for updating an existing user. All fields are optional.
#[derive(Debug, Clone, Default)]
pub struct UpdateUser {
    pub username: Option<String>,
    pub picture_url: Option<String>,
    pub birthday: Option<NaiveDate>,
}

impl User {
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }
}

impl Entity for User {
    type Create = CreateUser;
    type Update = UpdateUser;

    const NAME: &'static str = "User";
    const TABLE: &'static str = "users";
    const COLUMNS: &'static str = "id, username, email, password_hash, picture_url, birthday, \
                                   roles, tags, deleted_at, created_at, updated_at";
    const OWNER_COLUMN: Option<&'static str> = Some("id");
    const LIFECYCLE: Lifecycle = Lifecycle::SoftDelete;
    const FILTERABLE: &'static [&'static str] = &["email", "username"];

    fn id(&self) -> DbId {
        self.id
    }

    fn owner_id(&self) -> Option<DbId> {
        Some(self.id)
    }

    fn column_value(&self, column: &str) -> Option<Value> {
        match column {
            "id" => Some(self.id.into()),
            "email" => Some(self.email.clone().into()),
            "username" => Some(self.username.clone().into()),
            _ => None,
        }
    }

    fn insert_fields(input: &CreateUser) -> Fields {
        vec![
            ("username", input.username.clone().into()),
            ("email", input.email.clone().into()),
            ("password_hash", input.password_hash.clone().into()),
            ("picture_url", input.picture_url.clone().into()),
            ("birthday", input.birthday.into()),
            ("roles", input.roles.clone().into()),
            ("tags", input.tags.clone().into()),
        ]
    }

    fn update_fields(input: &UpdateUser) -> Fields {
        let mut fields = Fields::new();
        push_some(&mut fields, "username", &input.username);
        push_some(&mut fields, "picture_url", &input.picture_url);
        push_some(&mut fields, "birthday", &input.birthday);
        fields
    }
}

impl MemoryEntity for User {
    const UNIQUE: &'static [&'static str] = &["email"];

    fn materialize(id: DbId, input: &CreateUser, now: Timestamp) -> Self {
        Self {
            id,
            username: input.username.clone(),
            email: input.email.clone(),
            password_hash: input.password_hash.clone(),
            picture_url: input.picture_url.clone(),
            birthday: input.birthday,
            roles: input.roles.clone(),
            tags: input.tags.clone(),
            deleted_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply_update(&mut self, input: &UpdateUser) {
        if let Some(username) = &input.username {
            self.username = username.clone();
        }
        if let Some(picture_url) = &input.picture_url {
            self.picture_url = Some(picture_url.clone());
        }
        if let Some(birthday) = input.birthday {
            self.birthday = birthday;
        }
    }

    fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    fn set_updated_at(&mut self, at: Timestamp) {
        self.updated_at = at;
    }

    fn is_live(&self) -> bool {
        self.deleted_at.is_none()
    }

    fn retire(&mut self, now: Timestamp) {
        self.deleted_at = Some(now);
    }
}
