//! Record Store contracts and persistence implementations.
//!
//! # Responsibility
//! - Define the store interface the validator and services depend on.
//! - Isolate SQLite query details from service/business orchestration.
//!
//! # Invariants
//! - Repository writes run the store-free field rules before persistence.
//! - Storage-level uniqueness violations surface as validation errors, not
//!   as raw transport errors.

pub mod article_repo;
