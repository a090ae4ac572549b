//! API-side authorization guard for catalog operations.
//!
//! This enforces authorization at the handler boundary (before any storage
//! access), while keeping the catalog and store crates auth-agnostic.

use stockroom_auth::{authorize, Action, AuthzError, Permission, Principal, Role};

use crate::context::PrincipalContext;

/// Resource name catalog permissions are keyed under
/// (`products.view`, `products.add`, ...).
pub const PRODUCTS_RESOURCE: &str = "products";

/// Check that the current request may perform `action` on the catalog.
///
/// This is intended to be called **before** touching storage.
pub fn require(principal: &PrincipalContext, action: Action) -> Result<(), AuthzError> {
    let principal = Principal {
        principal_id: principal.principal_id(),
        roles: principal.roles().to_vec(),
        permissions: permissions_from_roles(principal.roles()),
    };

    authorize(&principal, action, PRODUCTS_RESOURCE)
}

/// Role→permission mapping.
///
/// This is intentionally simple until a real policy source exists (e.g. DB-backed).
fn permissions_from_roles(roles: &[Role]) -> Vec<Permission> {
    let mut permissions = Vec::new();
    for role in roles {
        match role.as_str() {
            // Convention: "admin" grants all permissions.
            "admin" => return vec![Permission::new("*")],
            "manager" => permissions.extend([
                Permission::for_action(PRODUCTS_RESOURCE, Action::View),
                Permission::for_action(PRODUCTS_RESOURCE, Action::Add),
                Permission::for_action(PRODUCTS_RESOURCE, Action::Change),
                Permission::for_action(PRODUCTS_RESOURCE, Action::Delete),
            ]),
            "clerk" => permissions.extend([
                Permission::for_action(PRODUCTS_RESOURCE, Action::View),
                Permission::for_action(PRODUCTS_RESOURCE, Action::Add),
                Permission::for_action(PRODUCTS_RESOURCE, Action::Change),
            ]),
            "viewer" => {
                permissions.push(Permission::for_action(PRODUCTS_RESOURCE, Action::View));
            }
            _ => {}
        }
    }
    permissions
}
