//! Core domain logic for article storage.
//! This crate is the single source of truth for article write invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod validation;

pub use logging::{default_log_level, init_logging, logging_status, LogConfig};
pub use model::article::{Article, ArticleId};
pub use repo::article_repo::{
    ArticleListQuery, ArticleStore, RepoError, RepoResult, SqliteArticleRepository,
};
pub use service::article_service::ArticleService;
pub use validation::errors::{ArticleField, FieldError, ValidationError, ValidationErrors};
pub use validation::validator::{Validator, TITLE_MAX_CHARS};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
