//! Article domain model.
//!
//! # Responsibility
//! - Define the `Article` record and its stable identity.
//! - Provide the title helpers used by validation rules and storage lookup.
//!
//! # Invariants
//! - `id` is stable and never reused for another article.
//! - `title` is stored exactly as submitted; no trimming is applied.
//! - Two titles collide when their `title_key` values are equal.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for every article.
pub type ArticleId = Uuid;

/// Canonical article record.
///
/// `title` stays optional so an absent value can be told apart from an
/// empty string when reporting validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    /// Stable global ID.
    pub id: ArticleId,
    /// User-submitted title, `None` when the field was not provided.
    #[serde(default)]
    pub title: Option<String>,
}

impl Article {
    /// Creates a new article with a generated stable ID.
    pub fn new(title: Option<String>) -> Self {
        Self::with_id(Uuid::new_v4(), title)
    }

    /// Creates an article with a caller-provided ID.
    ///
    /// Used by update paths where the identity already exists in the store.
    pub fn with_id(id: ArticleId, title: Option<String>) -> Self {
        Self { id, title }
    }

    /// Convenience constructor for a present title.
    pub fn titled(title: impl Into<String>) -> Self {
        Self::new(Some(title.into()))
    }

    /// Returns the title when it is present and not blank.
    pub fn present_title(&self) -> Option<&str> {
        self.title.as_deref().filter(|title| !is_blank(title))
    }
}

/// Returns whether a title counts as blank for presence checks.
///
/// Empty strings and strings made only of Unicode whitespace are blank.
pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Number of characters in a title, counted as Unicode scalar values.
pub fn title_char_count(value: &str) -> usize {
    value.chars().count()
}

/// Case-folded lookup key used for uniqueness checks and the storage index.
pub fn title_key(value: &str) -> String {
    value.to_lowercase()
}
