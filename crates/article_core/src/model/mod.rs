//! Article domain model.
//!
//! # Responsibility
//! - Define the canonical record written to and read from the Record Store.
//! - Own the case-folding rule shared by validation and storage lookup.
//!
//! # Invariants
//! - Every article is identified by a stable, non-nil `ArticleId`.
//! - Title keys are derived from the raw title, never stored independently.

pub mod article;
