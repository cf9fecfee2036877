//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` entity struct matching the database row, plus its
//!   [`Entity`](crate::entity::Entity) configuration
//! - A create DTO for inserts
//! - An update DTO (all `Option` fields) for partial updates
//! - A response DTO where the row carries fields that must not leave the
//!   repository boundary

pub mod album;
pub mod artist;
pub mod beat;
pub mod license;
pub mod producer;
pub mod soundkit;
pub mod telegram;
pub mod user;
