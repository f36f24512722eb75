//! Article use-case service.
//!
//! # Responsibility
//! - Provide create/update/get/list entry points for core callers.
//! - Run the full validator before every write and delegate persistence.
//!
//! # Invariants
//! - No write reaches the store without passing `Validator::validate()`.
//! - Updates re-run every rule, with the article's own id excluded from the
//!   uniqueness lookup.
//! - Service layer remains storage-agnostic.
//! - Log lines carry ids and error codes, never title text.

use crate::model::article::{Article, ArticleId};
use crate::repo::article_repo::{ArticleListQuery, ArticleStore, RepoError, RepoResult};
use crate::validation::errors::ValidationErrors;
use crate::validation::validator::Validator;
use log::{error, info, warn};

/// Use-case service wrapper for article writes and reads.
pub struct ArticleService<S: ArticleStore> {
    store: S,
    validator: Validator,
}

impl<S: ArticleStore> ArticleService<S> {
    /// Creates a service using the provided store implementation.
    pub fn new(store: S) -> Self {
        Self {
            store,
            validator: Validator::new(),
        }
    }

    /// Borrows the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Creates an article with a fresh id.
    ///
    /// # Errors
    /// - `RepoError::Validation` with every violated rule.
    /// - Store errors unchanged.
    pub fn create_article(&self, title: Option<String>) -> RepoResult<Article> {
        let article = Article::new(title);
        self.write("article_create", &article)
    }

    /// Re-validates and persists an existing article.
    ///
    /// Returns `RepoError::NotFound` when the id is unknown to the store.
    pub fn update_article(&self, article: &Article) -> RepoResult<Article> {
        if self.store.get_article(article.id)?.is_none() {
            warn!(
                "event=article_update module=service status=error error_code=not_found id={}",
                article.id
            );
            return Err(RepoError::NotFound(article.id));
        }
        self.write("article_update", article)
    }

    /// Replaces the title of an existing article.
    pub fn rename_article(&self, id: ArticleId, title: Option<String>) -> RepoResult<Article> {
        self.update_article(&Article::with_id(id, title))
    }

    /// Runs every rule without persisting.
    pub fn validate_article(&self, article: &Article) -> RepoResult<ValidationErrors> {
        self.validator.check(article, &self.store)
    }

    pub fn get_article(&self, id: ArticleId) -> RepoResult<Option<Article>> {
        self.store.get_article(id)
    }

    pub fn list_articles(&self, query: &ArticleListQuery) -> RepoResult<Vec<Article>> {
        self.store.list_articles(query)
    }

    fn write(&self, event: &'static str, article: &Article) -> RepoResult<Article> {
        let result = self
            .validator
            .validate(article, &self.store)
            .and_then(|()| self.store.persist(article));

        match &result {
            Ok(stored) => info!("event={event} module=service status=ok id={}", stored.id),
            Err(RepoError::Validation(errors)) => warn!(
                "event={event} module=service status=rejected id={} error_codes={}",
                article.id,
                errors.codes().join(",")
            ),
            Err(err) => error!(
                "event={event} module=service status=error id={} error={err}",
                article.id
            ),
        }
        result
    }
}
