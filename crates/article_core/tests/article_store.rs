use article_core::db::migrations::latest_version;
use article_core::db::open_db_in_memory;
use article_core::{
    Article, ArticleListQuery, ArticleStore, RepoError, SqliteArticleRepository, ValidationError,
};
use rusqlite::Connection;
use uuid::Uuid;

#[test]
fn persist_and_get_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteArticleRepository::try_new(&conn).unwrap();

    let article = Article::titled("First");
    let stored = repo.persist(&article).unwrap();
    assert_eq!(stored, article);

    let loaded = repo.get_article(article.id).unwrap().unwrap();
    assert_eq!(loaded.title.as_deref(), Some("First"));
}

#[test]
fn persist_updates_existing_row_by_id() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteArticleRepository::try_new(&conn).unwrap();

    let mut article = Article::titled("Draft");
    repo.persist(&article).unwrap();

    article.title = Some("Final".to_string());
    repo.persist(&article).unwrap();

    let all = repo.list_articles(&ArticleListQuery::default()).unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].title.as_deref(), Some("Final"));
}

#[test]
fn persist_keeps_title_unmodified() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteArticleRepository::try_new(&conn).unwrap();

    let stored = repo.persist(&Article::titled("  Spaced ")).unwrap();
    assert_eq!(stored.title.as_deref(), Some("  Spaced "));
}

#[test]
fn persist_rejects_field_violations_without_writing() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteArticleRepository::try_new(&conn).unwrap();

    let err = repo.persist(&Article::new(None)).unwrap_err();
    assert!(matches!(err, RepoError::Validation(ref errors) if errors.has_presence_error()));

    let err = repo.persist(&Article::titled("ABCDEFGHIJK")).unwrap_err();
    assert!(matches!(err, RepoError::Validation(ref errors) if errors.has_length_error()));

    assert!(repo
        .list_articles(&ArticleListQuery::default())
        .unwrap()
        .is_empty());
}

#[test]
fn persist_rejects_nil_id() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteArticleRepository::try_new(&conn).unwrap();

    let err = repo
        .persist(&Article::with_id(Uuid::nil(), Some("Nil".to_string())))
        .unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(_)));
}

#[test]
fn unique_index_rejects_case_insensitive_duplicate() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteArticleRepository::try_new(&conn).unwrap();

    let existing = repo.persist(&Article::titled("Hello")).unwrap();
    let err = repo.persist(&Article::titled("HELLO")).unwrap_err();

    match err {
        RepoError::Validation(errors) => {
            let reported: Vec<_> = errors.iter().map(|item| item.error.clone()).collect();
            assert_eq!(
                reported,
                vec![ValidationError::Uniqueness {
                    existing: existing.id
                }]
            );
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn unique_index_folds_non_ascii_case() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteArticleRepository::try_new(&conn).unwrap();

    repo.persist(&Article::titled("ÉCOLE")).unwrap();
    let err = repo.persist(&Article::titled("école")).unwrap_err();
    assert!(matches!(err, RepoError::Validation(ref errors) if errors.has_uniqueness_error()));
}

#[test]
fn find_by_title_honors_exclude_id() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteArticleRepository::try_new(&conn).unwrap();

    let stored = repo.persist(&Article::titled("Hello")).unwrap();

    let found = repo
        .find_by_title_case_insensitive("hELLO", None)
        .unwrap()
        .unwrap();
    assert_eq!(found.id, stored.id);

    assert!(repo
        .find_by_title_case_insensitive("hello", Some(stored.id))
        .unwrap()
        .is_none());
    assert!(repo
        .find_by_title_case_insensitive("Hellos", None)
        .unwrap()
        .is_none());
}

#[test]
fn list_orders_by_title_key_and_paginates() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteArticleRepository::try_new(&conn).unwrap();

    for title in ["cherry", "Apple", "banana"] {
        repo.persist(&Article::titled(title)).unwrap();
    }

    let titles = |query: ArticleListQuery| -> Vec<String> {
        repo.list_articles(&query)
            .unwrap()
            .into_iter()
            .filter_map(|article| article.title)
            .collect()
    };

    assert_eq!(
        titles(ArticleListQuery::default()),
        vec!["Apple", "banana", "cherry"]
    );
    assert_eq!(
        titles(ArticleListQuery {
            limit: Some(1),
            offset: 1,
        }),
        vec!["banana"]
    );
    assert_eq!(
        titles(ArticleListQuery {
            limit: None,
            offset: 2,
        }),
        vec!["cherry"]
    );
}

#[test]
fn read_path_rejects_mismatched_title_key() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteArticleRepository::try_new(&conn).unwrap();

    let stored = repo.persist(&Article::titled("Hello")).unwrap();
    conn.execute(
        "UPDATE articles SET title_key = 'other' WHERE id = ?1;",
        [stored.id.to_string()],
    )
    .unwrap();

    let err = repo.get_article(stored.id).unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(_)));
}

#[test]
fn repository_rejects_uninitialized_connection() {
    let conn = Connection::open_in_memory().unwrap();

    match SqliteArticleRepository::try_new(&conn) {
        Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert!(expected_version > 0),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}

#[test]
fn repository_rejects_connection_without_articles_table() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    assert!(matches!(
        SqliteArticleRepository::try_new(&conn),
        Err(RepoError::MissingRequiredTable("articles"))
    ));
}

#[test]
fn repository_rejects_connection_missing_title_key_column() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE articles (
            id TEXT PRIMARY KEY NOT NULL,
            title TEXT NOT NULL
        );",
    )
    .unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    assert!(matches!(
        SqliteArticleRepository::try_new(&conn),
        Err(RepoError::MissingRequiredColumn {
            table: "articles",
            column: "title_key"
        })
    ));
}
