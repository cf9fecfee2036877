//! Request extractors enforcing authentication and roles.

pub mod auth;
pub mod rbac;
