//! Article Record Store contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide lookup-by-title and persist APIs over canonical `articles` storage.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Write paths run `Validator::check_fields()` before SQL mutations.
//! - `title_key` is always written as the case-folded `title`.
//! - The `title_key` unique index is the authoritative uniqueness guard;
//!   violations are reported as `RepoError::Validation`.
//! - Read paths reject invalid persisted state instead of masking it.

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::article::{is_blank, title_key, Article, ArticleId};
use crate::validation::errors::{ArticleField, ValidationError, ValidationErrors};
use crate::validation::validator::Validator;
use log::warn;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const ARTICLE_SELECT_SQL: &str = "SELECT
    id,
    title,
    title_key
FROM articles";

const REQUIRED_ARTICLE_COLUMNS: [&str; 5] =
    ["id", "title", "title_key", "created_at", "updated_at"];

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for article persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    /// Candidate violated one or more rules; nothing was written.
    Validation(ValidationErrors),
    Db(DbError),
    NotFound(ArticleId),
    InvalidData(String),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "article not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted article data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}; open it with db::open_db"
            ),
            Self::MissingRequiredTable(table) => write!(f, "missing required table `{table}`"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "missing required column `{table}.{column}`")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationErrors> for RepoError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Query options for listing articles.
#[derive(Debug, Clone, Default)]
pub struct ArticleListQuery {
    pub limit: Option<u32>,
    pub offset: u32,
}

/// Record Store interface consumed by the validator and services.
pub trait ArticleStore {
    /// Finds an article whose case-folded title equals `title` case-folded,
    /// skipping `exclude_id` when given.
    fn find_by_title_case_insensitive(
        &self,
        title: &str,
        exclude_id: Option<ArticleId>,
    ) -> RepoResult<Option<Article>>;
    /// Inserts a new article or updates the one with the same id.
    fn persist(&self, article: &Article) -> RepoResult<Article>;
    fn get_article(&self, id: ArticleId) -> RepoResult<Option<Article>>;
    fn list_articles(&self, query: &ArticleListQuery) -> RepoResult<Vec<Article>>;
}

/// SQLite-backed article store.
pub struct SqliteArticleRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteArticleRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_article_connection_ready(conn)?;
        Ok(Self { conn })
    }

    fn uniqueness_conflict(&self, article: &Article, title: &str) -> RepoResult<RepoError> {
        match self.find_by_title_case_insensitive(title, Some(article.id))? {
            Some(existing) => {
                warn!(
                    "event=article_persist module=repo status=rejected error_code=taken source=unique_index id={} existing_id={}",
                    article.id, existing.id
                );
                Ok(RepoError::Validation(ValidationErrors::single(
                    ArticleField::Title,
                    ValidationError::Uniqueness {
                        existing: existing.id,
                    },
                )))
            }
            None => Ok(RepoError::InvalidData(format!(
                "unique constraint on articles.title_key failed for {} but no conflicting row was found",
                article.id
            ))),
        }
    }
}

impl ArticleStore for SqliteArticleRepository<'_> {
    fn find_by_title_case_insensitive(
        &self,
        title: &str,
        exclude_id: Option<ArticleId>,
    ) -> RepoResult<Option<Article>> {
        let mut stmt = self.conn.prepare(&format!(
            "{ARTICLE_SELECT_SQL}
             WHERE title_key = ?1
               AND (?2 IS NULL OR id <> ?2)
             ORDER BY id ASC
             LIMIT 1;"
        ))?;

        let mut rows = stmt.query(params![
            title_key(title),
            exclude_id.map(|id| id.to_string()),
        ])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_article_row(row)?));
        }

        Ok(None)
    }

    fn persist(&self, article: &Article) -> RepoResult<Article> {
        if article.id.is_nil() {
            return Err(RepoError::InvalidData(
                "article id must not be nil".to_string(),
            ));
        }
        Validator::new().check_fields(article).into_result()?;
        let title = article.present_title().ok_or_else(|| {
            RepoError::InvalidData(format!("article {} has no title after validation", article.id))
        })?;

        let written = self.conn.execute(
            "INSERT INTO articles (id, title, title_key)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(id) DO UPDATE SET
                title = excluded.title,
                title_key = excluded.title_key,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![article.id.to_string(), title, title_key(title)],
        );

        match written {
            Ok(_) => {}
            Err(rusqlite::Error::SqliteFailure(failure, _))
                if failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
            {
                return Err(self.uniqueness_conflict(article, title)?);
            }
            Err(err) => return Err(err.into()),
        }

        self.get_article(article.id)?.ok_or_else(|| {
            RepoError::InvalidData(format!("persisted article {} missing on read-back", article.id))
        })
    }

    fn get_article(&self, id: ArticleId) -> RepoResult<Option<Article>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{ARTICLE_SELECT_SQL} WHERE id = ?1;"))?;

        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_article_row(row)?));
        }

        Ok(None)
    }

    fn list_articles(&self, query: &ArticleListQuery) -> RepoResult<Vec<Article>> {
        let mut sql = format!("{ARTICLE_SELECT_SQL} ORDER BY title_key ASC, id ASC");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(limit) = query.limit {
            sql.push_str(" LIMIT ?");
            bind_values.push(Value::Integer(i64::from(limit)));
            if query.offset > 0 {
                sql.push_str(" OFFSET ?");
                bind_values.push(Value::Integer(i64::from(query.offset)));
            }
        } else if query.offset > 0 {
            sql.push_str(" LIMIT -1 OFFSET ?");
            bind_values.push(Value::Integer(i64::from(query.offset)));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut articles = Vec::new();

        while let Some(row) = rows.next()? {
            articles.push(parse_article_row(row)?);
        }

        Ok(articles)
    }
}

fn parse_article_row(row: &Row<'_>) -> RepoResult<Article> {
    let id_text: String = row.get("id")?;
    let id = Uuid::parse_str(&id_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid uuid value `{id_text}` in articles.id"))
    })?;

    let title: String = row.get("title")?;
    if is_blank(&title) {
        return Err(RepoError::InvalidData(format!(
            "blank title in articles.title for {id}"
        )));
    }

    let stored_key: String = row.get("title_key")?;
    if stored_key != title_key(&title) {
        return Err(RepoError::InvalidData(format!(
            "articles.title_key does not match case-folded title for {id}"
        )));
    }

    Ok(Article::with_id(id, Some(title)))
}

fn ensure_article_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    if !table_exists(conn, "articles")? {
        return Err(RepoError::MissingRequiredTable("articles"));
    }

    for column in REQUIRED_ARTICLE_COLUMNS {
        if !table_has_column(conn, "articles", column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: "articles",
                column,
            });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
