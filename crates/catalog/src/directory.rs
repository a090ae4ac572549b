//! Category and brand lookup rows.
//!
//! Both tables are owned outside the catalog module; these types mirror the
//! rows the module reads for filter dropdowns, display names, and referential
//! checks.

use serde::{Deserialize, Serialize};

use stockroom_core::{BrandId, CategoryId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Brand {
    pub id: BrandId,
    pub name: String,
}
