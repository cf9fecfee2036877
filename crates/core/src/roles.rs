//! Account roles.
//!
//! Roles are stored on the `users.roles` TEXT[] column as their lowercase
//! names and travel inside access tokens the same way.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

pub const ROLE_USER: &str = "user";
pub const ROLE_ARTIST: &str = "artist";
pub const ROLE_PRODUCER: &str = "producer";
pub const ROLE_ADMIN: &str = "admin";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Artist,
    Producer,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => ROLE_USER,
            Role::Artist => ROLE_ARTIST,
            Role::Producer => ROLE_PRODUCER,
            Role::Admin => ROLE_ADMIN,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            ROLE_USER => Ok(Role::User),
            ROLE_ARTIST => Ok(Role::Artist),
            ROLE_PRODUCER => Ok(Role::Producer),
            ROLE_ADMIN => Ok(Role::Admin),
            other => Err(CoreError::Validation(format!("Unknown role '{other}'"))),
        }
    }
}

/// Normalize the roles requested at registration.
///
/// `user` is always granted, duplicates are dropped, and `admin` can never be
/// self-assigned. The result is the list persisted on the user row, in a
/// stable order.
pub fn registration_roles(requested: &[Role]) -> Result<Vec<String>, CoreError> {
    if requested.contains(&Role::Admin) {
        return Err(CoreError::Validation(
            "The admin role cannot be requested at registration".into(),
        ));
    }

    let mut roles = vec![ROLE_USER.to_string()];
    for role in [Role::Artist, Role::Producer] {
        if requested.contains(&role) {
            roles.push(role.as_str().to_string());
        }
    }
    Ok(roles)
}

/// Whether `granted` includes any of `required`. Admins pass every check.
pub fn has_any_role(granted: &[String], required: &[Role]) -> bool {
    granted
        .iter()
        .any(|r| r == ROLE_ADMIN || required.iter().any(|req| req.as_str() == r))
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn round_trips_through_strings() {
        for role in [Role::User, Role::Artist, Role::Producer, Role::Admin] {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
    }

    #[test]
    fn unknown_role_is_rejected() {
        assert_matches!("superuser".parse::<Role>(), Err(CoreError::Validation(_)));
    }

    #[test]
    fn registration_always_grants_user() {
        let roles = registration_roles(&[Role::Producer]).unwrap();
        assert_eq!(roles, vec!["user".to_string(), "producer".to_string()]);
    }

    #[test]
    fn registration_drops_duplicates() {
        let roles = registration_roles(&[Role::Artist, Role::Artist, Role::User]).unwrap();
        assert_eq!(roles, vec!["user".to_string(), "artist".to_string()]);
    }

    #[test]
    fn registration_refuses_admin() {
        assert_matches!(
            registration_roles(&[Role::Admin]),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn admin_passes_role_checks() {
        let granted = vec!["user".to_string(), "admin".to_string()];
        assert!(has_any_role(&granted, &[Role::Producer]));
    }

    #[test]
    fn missing_role_fails_check() {
        let granted = vec!["user".to_string(), "artist".to_string()];
        assert!(!has_any_role(&granted, &[Role::Producer]));
        assert!(has_any_role(&granted, &[Role::Artist]));
    }
}
