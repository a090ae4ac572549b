//! `stockroom-auth` — authentication and authorization boundary.
//!
//! Claims validation and the capability check are pure functions; only token
//! decoding touches a crypto library. The crate stays decoupled from HTTP and
//! storage.

pub mod authorize;
pub mod claims;
pub mod permissions;
pub mod principal;
pub mod roles;
pub mod token;

pub use authorize::{allowed, authorize, AuthzError};
pub use claims::{validate_claims, JwtClaims, TokenValidationError};
pub use permissions::{Action, Permission};
pub use principal::{Principal, PrincipalId};
pub use roles::Role;
pub use token::{Hs256JwtValidator, JwtValidator, TokenError};
