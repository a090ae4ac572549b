//! Capability checks.

use std::collections::HashSet;

use thiserror::Error;

use crate::{Action, Permission, Principal};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("forbidden: missing permission '{0}'")]
    Forbidden(String),
}

/// May `principal` perform `action` on `resource`?
///
/// - No IO
/// - No panics
/// - No business logic (pure policy check)
pub fn allowed(principal: &Principal, action: Action, resource: &str) -> bool {
    let required = Permission::for_action(resource, action);
    let held: HashSet<&str> = principal.permissions.iter().map(Permission::as_str).collect();
    held.contains("*") || held.contains(required.as_str())
}

/// Same check as [`allowed`] with the missing permission in the error.
pub fn authorize(principal: &Principal, action: Action, resource: &str) -> Result<(), AuthzError> {
    if allowed(principal, action, resource) {
        Ok(())
    } else {
        Err(AuthzError::Forbidden(
            Permission::for_action(resource, action).as_str().to_string(),
        ))
    }
}
