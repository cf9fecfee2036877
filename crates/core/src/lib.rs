//! Domain building blocks shared by the database and HTTP layers.
//!
//! Nothing in this crate talks to Postgres or axum; it holds the error
//! taxonomy, the paged-listing envelope, role and ownership rules, and the
//! media naming/storage seam.

pub mod catalog;
pub mod error;
pub mod media;
pub mod ownership;
pub mod pagination;
pub mod roles;
pub mod storage;
pub mod subscriptions;
pub mod types;
