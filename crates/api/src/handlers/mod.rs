//! Request handlers, one submodule per resource.
//!
//! Handlers stay thin: they extract and validate input, call the repositories
//! in `beatmarket_db` (directly or through the owner-checked helpers) and wrap
//! results in the `{ "data": ... }` envelope. Errors map via [`AppError`].
//!
//! [`AppError`]: crate::error::AppError

pub mod albums;
pub mod auth;
pub mod beats;
pub mod details;
pub mod licenses;
pub mod profiles;
pub mod soundkits;
pub mod subscriptions;
pub mod upload;
pub mod users;
