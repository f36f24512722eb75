//! Article validator.
//!
//! # Responsibility
//! - Evaluate a candidate article against the declared title rules.
//! - Collect every violation instead of stopping at the first one.
//!
//! # Invariants
//! - The validator never writes; its only side effect is one uniqueness read.
//! - Absent titles fail presence only; length runs on any present string.
//! - Uniqueness runs only for non-blank titles and always excludes the
//!   candidate's own id.
//! - The uniqueness read is a fast path. Concurrent writers are stopped by
//!   the storage unique index, not by this check.

use crate::model::article::{is_blank, title_char_count, Article};
use crate::repo::article_repo::{ArticleStore, RepoError, RepoResult};
use crate::validation::errors::{ArticleField, ValidationError, ValidationErrors};

/// Maximum number of characters allowed in an article title.
pub const TITLE_MAX_CHARS: usize = 10;

/// Rule applied to one field value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rule {
    Presence,
    MaxLength(usize),
    UniqueIgnoringCase,
}

impl Rule {
    fn needs_store(self) -> bool {
        matches!(self, Self::UniqueIgnoringCase)
    }
}

#[derive(Clone, Copy)]
struct FieldRule {
    field: ArticleField,
    value: fn(&Article) -> Option<&str>,
    rule: Rule,
}

fn title_of(article: &Article) -> Option<&str> {
    article.title.as_deref()
}

const ARTICLE_RULES: &[FieldRule] = &[
    FieldRule {
        field: ArticleField::Title,
        value: title_of,
        rule: Rule::Presence,
    },
    FieldRule {
        field: ArticleField::Title,
        value: title_of,
        rule: Rule::UniqueIgnoringCase,
    },
    FieldRule {
        field: ArticleField::Title,
        value: title_of,
        rule: Rule::MaxLength(TITLE_MAX_CHARS),
    },
];

/// Stateless validator for article writes.
#[derive(Debug, Clone, Copy, Default)]
pub struct Validator;

impl Validator {
    pub fn new() -> Self {
        Self
    }

    /// Runs every rule, including the store-backed uniqueness rule.
    ///
    /// Returns the collected violations; an empty set means the candidate
    /// may be persisted.
    ///
    /// # Errors
    /// - Returns the store error when the uniqueness lookup fails.
    pub fn check<S>(&self, candidate: &Article, store: &S) -> RepoResult<ValidationErrors>
    where
        S: ArticleStore + ?Sized,
    {
        let mut errors = ValidationErrors::new();
        for entry in ARTICLE_RULES {
            let value = (entry.value)(candidate);
            if let Some(error) = apply_rule(entry.rule, value, candidate, Some(store))? {
                errors.add(entry.field, error);
            }
        }
        Ok(errors)
    }

    /// Runs every rule and turns violations into `RepoError::Validation`.
    pub fn validate<S>(&self, candidate: &Article, store: &S) -> RepoResult<()>
    where
        S: ArticleStore + ?Sized,
    {
        self.check(candidate, store)?
            .into_result()
            .map_err(RepoError::Validation)
    }

    /// Runs only the rules that need no store access (presence and length).
    pub fn check_fields(&self, candidate: &Article) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        for entry in ARTICLE_RULES.iter().filter(|entry| !entry.rule.needs_store()) {
            let value = (entry.value)(candidate);
            // Store-free rules never return `Err`.
            let outcome = apply_rule::<dyn ArticleStore>(entry.rule, value, candidate, None);
            if let Ok(Some(error)) = outcome {
                errors.add(entry.field, error);
            }
        }
        errors
    }
}

fn apply_rule<S>(
    rule: Rule,
    value: Option<&str>,
    candidate: &Article,
    store: Option<&S>,
) -> RepoResult<Option<ValidationError>>
where
    S: ArticleStore + ?Sized,
{
    let error = match rule {
        Rule::Presence => match value {
            Some(text) if !is_blank(text) => None,
            _ => Some(ValidationError::Presence),
        },
        Rule::MaxLength(maximum) => value
            .map(title_char_count)
            .filter(|actual| *actual > maximum)
            .map(|actual| ValidationError::Length { maximum, actual }),
        Rule::UniqueIgnoringCase => match (value, store) {
            (Some(text), Some(store)) if !is_blank(text) => store
                .find_by_title_case_insensitive(text, Some(candidate.id))?
                .map(|existing| ValidationError::Uniqueness {
                    existing: existing.id,
                }),
            _ => None,
        },
    };
    Ok(error)
}

#[cfg(test)]
mod tests {
    use super::{Validator, TITLE_MAX_CHARS};
    use crate::db::DbError;
    use crate::model::article::{title_key, Article, ArticleId};
    use crate::repo::article_repo::{ArticleListQuery, ArticleStore, RepoError, RepoResult};
    use crate::validation::errors::{ArticleField, ValidationError};
    use std::cell::Cell;

    /// In-process store over a fixed article list.
    struct FixedStore {
        articles: Vec<Article>,
        lookups: Cell<usize>,
    }

    impl FixedStore {
        fn new(titles: &[&str]) -> Self {
            Self {
                articles: titles.iter().map(|title| Article::titled(*title)).collect(),
                lookups: Cell::new(0),
            }
        }
    }

    impl ArticleStore for FixedStore {
        fn find_by_title_case_insensitive(
            &self,
            title: &str,
            exclude_id: Option<ArticleId>,
        ) -> RepoResult<Option<Article>> {
            self.lookups.set(self.lookups.get() + 1);
            let key = title_key(title);
            Ok(self
                .articles
                .iter()
                .filter(|article| Some(article.id) != exclude_id)
                .find(|article| article.title.as_deref().map(title_key) == Some(key.clone()))
                .cloned())
        }

        fn persist(&self, article: &Article) -> RepoResult<Article> {
            Ok(article.clone())
        }

        fn get_article(&self, id: ArticleId) -> RepoResult<Option<Article>> {
            Ok(self.articles.iter().find(|a| a.id == id).cloned())
        }

        fn list_articles(&self, _query: &ArticleListQuery) -> RepoResult<Vec<Article>> {
            Ok(self.articles.clone())
        }
    }

    struct FailingStore;

    impl ArticleStore for FailingStore {
        fn find_by_title_case_insensitive(
            &self,
            _title: &str,
            _exclude_id: Option<ArticleId>,
        ) -> RepoResult<Option<Article>> {
            Err(RepoError::Db(DbError::Sqlite(
                rusqlite::Error::InvalidQuery,
            )))
        }

        fn persist(&self, article: &Article) -> RepoResult<Article> {
            Ok(article.clone())
        }

        fn get_article(&self, _id: ArticleId) -> RepoResult<Option<Article>> {
            Ok(None)
        }

        fn list_articles(&self, _query: &ArticleListQuery) -> RepoResult<Vec<Article>> {
            Ok(Vec::new())
        }
    }

    #[test]
    fn titles_within_bounds_pass() {
        let store = FixedStore::new(&[]);
        for title in ["a", "Hello", "0123456789", "日本語のタイトル"] {
            let errors = Validator::new().check(&Article::titled(title), &store).unwrap();
            assert!(errors.is_empty(), "`{title}` should pass: {errors}");
        }
    }

    #[test]
    fn absent_title_reports_presence_only() {
        let store = FixedStore::new(&[]);
        let errors = Validator::new()
            .check(&Article::new(None), &store)
            .unwrap();
        assert_eq!(errors.codes(), vec!["blank"]);
        assert_eq!(store.lookups.get(), 0);
    }

    #[test]
    fn empty_title_reports_presence_only() {
        let store = FixedStore::new(&[]);
        let errors = Validator::new().check(&Article::titled(""), &store).unwrap();
        assert_eq!(errors.codes(), vec!["blank"]);
    }

    #[test]
    fn long_whitespace_title_reports_presence_and_length() {
        let store = FixedStore::new(&[]);
        let errors = Validator::new()
            .check(&Article::titled(" ".repeat(12)), &store)
            .unwrap();
        assert_eq!(errors.codes(), vec!["blank", "too_long"]);
        assert_eq!(store.lookups.get(), 0);
    }

    #[test]
    fn eleven_characters_is_too_long() {
        let store = FixedStore::new(&[]);
        let errors = Validator::new()
            .check(&Article::titled("ABCDEFGHIJK"), &store)
            .unwrap();
        let reported: Vec<_> = errors.on(ArticleField::Title).cloned().collect();
        assert_eq!(
            reported,
            vec![ValidationError::Length {
                maximum: TITLE_MAX_CHARS,
                actual: 11,
            }]
        );
    }

    #[test]
    fn duplicate_and_too_long_are_both_reported() {
        let store = FixedStore::new(&["ABCDEFGHIJK"]);
        let errors = Validator::new()
            .check(&Article::titled("abcdefghijk"), &store)
            .unwrap();
        assert_eq!(errors.codes(), vec!["taken", "too_long"]);
    }

    #[test]
    fn case_insensitive_duplicate_is_rejected() {
        let store = FixedStore::new(&["Hello"]);
        let existing = store.articles[0].id;

        let errors = Validator::new()
            .check(&Article::titled("hello"), &store)
            .unwrap();
        assert_eq!(
            errors.iter().map(|e| e.error.clone()).collect::<Vec<_>>(),
            vec![ValidationError::Uniqueness { existing }]
        );

        let errors = Validator::new()
            .check(&Article::titled("Hellos"), &store)
            .unwrap();
        assert!(errors.is_empty());
    }

    #[test]
    fn own_record_is_excluded_from_uniqueness() {
        let store = FixedStore::new(&["Hello"]);
        let own = store.articles[0].clone();

        Validator::new().validate(&own, &store).unwrap();

        let recased = Article::with_id(own.id, Some("HELLO".to_string()));
        Validator::new().validate(&recased, &store).unwrap();
    }

    #[test]
    fn validate_wraps_violations_in_repo_error() {
        let store = FixedStore::new(&[]);
        let err = Validator::new()
            .validate(&Article::new(None), &store)
            .unwrap_err();
        assert!(matches!(err, RepoError::Validation(errors) if errors.has_presence_error()));
    }

    #[test]
    fn store_failure_propagates_as_db_error() {
        let err = Validator::new()
            .check(&Article::titled("Hello"), &FailingStore)
            .unwrap_err();
        assert!(matches!(err, RepoError::Db(_)));
    }

    #[test]
    fn check_fields_skips_store_rules() {
        let errors = Validator::new().check_fields(&Article::titled("ABCDEFGHIJK"));
        assert_eq!(errors.codes(), vec!["too_long"]);
        assert!(Validator::new()
            .check_fields(&Article::titled("Hello"))
            .is_empty());
    }
}
