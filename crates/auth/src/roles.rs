//! Role model.

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Role name carried in a token.
///
/// Roles are opaque strings here; mapping roles to permissions happens at the
/// API boundary where policy lives.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(Cow<'static, str>);

impl Role {
    pub fn new(value: impl Into<Cow<'static, str>>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
