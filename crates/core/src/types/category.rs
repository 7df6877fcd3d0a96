//! Product category reference data.

use serde::{Deserialize, Serialize};

use super::CategoryId;

/// A product category as served by the remote catalog API.
///
/// Categories are read-only here: they are fetched once per form session
/// and only used to populate the category selector and to label list rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
}

impl Category {
    /// Create a category.
    #[must_use]
    pub fn new(id: impl Into<CategoryId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Find the display name for a category id, if the id is known.
#[must_use]
pub fn category_name<'a>(categories: &'a [Category], id: &CategoryId) -> Option<&'a str> {
    categories
        .iter()
        .find(|c| &c.id == id)
        .map(|c| c.name.as_str())
}
