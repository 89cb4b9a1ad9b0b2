//! SQLite article repository.
//!
//! One table keyed by slug. The connection sits behind a mutex, so every
//! statement (writes included) runs one at a time.

use std::{
    path::Path,
    sync::{Mutex, MutexGuard},
};

use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, Row, params, types::Type};
use tracing::{debug, instrument};

use quire_core::{
    application::{ApplicationError, ports::ArticleRepository},
    domain::Article,
    error::{QuireError, QuireResult},
};

use super::IN_MEMORY;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS articles (
    slug        TEXT PRIMARY KEY NOT NULL,
    id          TEXT NOT NULL,
    title       TEXT NOT NULL DEFAULT '',
    description TEXT NOT NULL DEFAULT '',
    content     TEXT NOT NULL DEFAULT '',
    date        TEXT,
    og_image    TEXT NOT NULL DEFAULT '',
    layout      TEXT NOT NULL DEFAULT 'post',
    source      TEXT NOT NULL DEFAULT '',
    url         TEXT NOT NULL,
    created_at  TEXT,
    updated_at  TEXT
);
CREATE INDEX IF NOT EXISTS articles_date ON articles (date DESC, slug);
";

const COLUMNS: &str =
    "slug, title, description, content, date, og_image, layout, source, created_at, updated_at";

const ORDER: &str = "ORDER BY date IS NULL, date DESC, slug ASC";

/// Article index stored in SQLite.
pub struct SqliteRepository {
    conn: Mutex<Connection>,
}

impl SqliteRepository {
    /// Open a database file, or an in-memory database for `:memory:`.
    ///
    /// The schema is not created here; call `init_schema` first.
    pub fn open(path: impl AsRef<Path>) -> QuireResult<Self> {
        let path = path.as_ref();
        let conn = if path.as_os_str() == IN_MEMORY {
            Connection::open_in_memory()
        } else {
            Connection::open(path)
        }
        .map_err(storage("open"))?;

        debug!(path = %path.display(), "opened article database");
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn in_memory() -> QuireResult<Self> {
        Self::open(IN_MEMORY)
    }

    fn conn(&self) -> QuireResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| ApplicationError::StoreLockError.into())
    }

    fn query(
        &self,
        operation: &'static str,
        sql: &str,
        params: impl rusqlite::Params,
    ) -> QuireResult<Vec<Article>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(sql).map_err(storage(operation))?;
        let rows = stmt
            .query_map(params, row_to_article)
            .map_err(storage(operation))?;

        let articles = rows
            .collect::<Result<Vec<_>, _>>()
            .map_err(storage(operation))?;
        Ok(articles)
    }
}

impl ArticleRepository for SqliteRepository {
    #[instrument(skip_all)]
    fn init_schema(&self) -> QuireResult<()> {
        self.conn()?
            .execute_batch(SCHEMA)
            .map_err(storage("init_schema"))
    }

    #[instrument(skip_all, fields(slug = %slug))]
    fn get_by_slug(&self, slug: &str) -> QuireResult<Article> {
        let conn = self.conn()?;
        let sql = format!("SELECT {COLUMNS} FROM articles WHERE slug = ?1");

        conn.query_row(&sql, params![slug], row_to_article)
            .optional()
            .map_err(storage("get_by_slug"))?
            .ok_or_else(|| {
                ApplicationError::ArticleNotFound {
                    slug: slug.to_string(),
                }
                .into()
            })
    }

    #[instrument(skip_all, fields(offset = offset, limit = limit))]
    fn list(&self, offset: usize, limit: usize) -> QuireResult<Vec<Article>> {
        let sql = format!("SELECT {COLUMNS} FROM articles {ORDER} LIMIT ?1 OFFSET ?2");
        self.query("list", &sql, params![to_sql_int(limit), to_sql_int(offset)])
    }

    #[instrument(skip_all, fields(term = %term))]
    fn search(&self, term: &str) -> QuireResult<Vec<Article>> {
        let sql = format!(
            "SELECT {COLUMNS} FROM articles
             WHERE title LIKE ?1 ESCAPE '\\'
                OR description LIKE ?1 ESCAPE '\\'
                OR slug LIKE ?1 ESCAPE '\\'
             {ORDER}"
        );
        let pattern = format!("%{}%", escape_like(term));
        self.query("search", &sql, params![pattern])
    }

    #[instrument(skip_all, fields(slug = article.slug()))]
    fn upsert(&self, article: &Article) -> QuireResult<()> {
        let mut article = article.clone();
        article.stamp(Utc::now());

        let conn = self.conn()?;
        conn.execute(
            "INSERT OR REPLACE INTO articles
                (slug, id, title, description, content, date, og_image, layout, source, url,
                 created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
            params![
                article.slug(),
                article.id().to_string(),
                article.title,
                article.description,
                article.content,
                article.date,
                article.og_image,
                article.layout,
                article.source,
                article.url(),
                article.created_at,
                article.updated_at,
            ],
        )
        .map_err(storage("upsert"))?;

        Ok(())
    }

    fn count(&self) -> QuireResult<usize> {
        let n: i64 = self
            .conn()?
            .query_row("SELECT COUNT(*) FROM articles", [], |row| row.get(0))
            .map_err(storage("count"))?;
        Ok(usize::try_from(n).unwrap_or_default())
    }
}

fn row_to_article(row: &Row<'_>) -> rusqlite::Result<Article> {
    let slug: String = row.get("slug")?;
    let mut article = Article::new(slug)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(0, Type::Text, Box::new(e)))?;

    article.title = row.get("title")?;
    article.description = row.get("description")?;
    article.content = row.get("content")?;
    article.date = row.get("date")?;
    article.og_image = row.get("og_image")?;
    article.layout = row.get("layout")?;
    article.source = row.get("source")?;
    article.created_at = row.get("created_at")?;
    article.updated_at = row.get("updated_at")?;
    Ok(article)
}

/// Make `term` match literally inside a `LIKE` pattern.
fn escape_like(term: &str) -> String {
    let mut out = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// SQLite integers are signed; anything past `i64::MAX` means "no limit".
fn to_sql_int(n: usize) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

fn storage(operation: &'static str) -> impl Fn(rusqlite::Error) -> QuireError {
    move |e| {
        ApplicationError::StorageFailed {
            operation,
            reason: e.to_string(),
        }
        .into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn repo() -> SqliteRepository {
        let repo = SqliteRepository::in_memory().unwrap();
        repo.init_schema().unwrap();
        repo
    }

    fn article(slug: &str, title: &str, date: Option<(i32, u32, u32)>) -> Article {
        let mut a = Article::new(slug).unwrap();
        a.title = title.to_string();
        a.date = date.and_then(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d));
        a
    }

    #[test]
    fn schema_init_is_idempotent() {
        let repo = repo();
        repo.init_schema().unwrap();
        repo.init_schema().unwrap();
        assert_eq!(repo.count().unwrap(), 0);
    }

    #[test]
    fn empty_store() {
        let repo = repo();
        assert_eq!(repo.count().unwrap(), 0);
        assert!(repo.list(0, 10).unwrap().is_empty());
        assert!(repo.get_by_slug("anything").unwrap_err().is_not_found());
    }

    #[test]
    fn upsert_replaces_by_slug() {
        let repo = repo();
        let mut first = article("same", "First", Some((2024, 1, 1)));
        first.description = "old description".into();
        repo.upsert(&first).unwrap();

        let second = article("same", "Second", None);
        repo.upsert(&second).unwrap();

        assert_eq!(repo.count().unwrap(), 1);
        let stored = repo.get_by_slug("same").unwrap();
        assert_eq!(stored.title, "Second");
        assert_eq!(stored.description, "");
        assert_eq!(stored.date, None);
    }

    #[test]
    fn lifecycle_round_trips_fields() {
        let repo = repo();
        let mut a = article("hello", "Hello", Some((2024, 3, 9)));
        a.description = "desc".into();
        a.content = "line one\n\tindented\n".into();
        a.og_image = "/img.png".into();
        a.layout = "page".into();
        a.source = "https://example.com".into();
        repo.upsert(&a).unwrap();

        let stored = repo.get_by_slug("hello").unwrap();
        assert_eq!(stored.id(), a.id());
        assert_eq!(stored.url(), "/blog/hello/");
        assert_eq!(stored.content, a.content);
        assert_eq!(stored.date, a.date);
        assert_eq!(stored.layout, "page");
        assert!(stored.created_at.is_some());
        assert!(stored.updated_at.is_some());
    }

    #[test]
    fn list_is_newest_first() {
        let repo = repo();
        repo.upsert(&article("tenth", "A", Some((2024, 1, 10)))).unwrap();
        repo.upsert(&article("twentieth", "B", Some((2024, 1, 20)))).unwrap();
        repo.upsert(&article("fifteenth", "C", Some((2024, 1, 15)))).unwrap();
        repo.upsert(&article("undated", "D", None)).unwrap();

        let slugs: Vec<String> = repo
            .list(0, 10)
            .unwrap()
            .iter()
            .map(|a| a.slug().to_string())
            .collect();
        assert_eq!(slugs, ["twentieth", "fifteenth", "tenth", "undated"]);

        let page: Vec<String> = repo
            .list(1, 2)
            .unwrap()
            .iter()
            .map(|a| a.slug().to_string())
            .collect();
        assert_eq!(page, ["fifteenth", "tenth"]);
    }

    #[test]
    fn list_accepts_unbounded_limit() {
        let repo = repo();
        repo.upsert(&article("a", "A", None)).unwrap();
        assert_eq!(repo.list(0, usize::MAX).unwrap().len(), 1);
    }

    #[test]
    fn search_is_case_insensitive() {
        let repo = repo();
        repo.upsert(&article("snakes", "Learning Python", Some((2024, 2, 1))))
            .unwrap();
        let mut b = article("other", "Other", Some((2024, 3, 1)));
        b.description = "more python tips".into();
        repo.upsert(&b).unwrap();
        repo.upsert(&article("rust", "Rust", None)).unwrap();

        let lower = repo.search("python").unwrap();
        let upper = repo.search("PYTHON").unwrap();

        assert_eq!(lower, upper);
        assert_eq!(lower.len(), 2);
        assert_eq!(lower[0].slug(), "other");
    }

    #[test]
    fn search_matches_slug_but_not_content() {
        let repo = repo();
        let mut a = article("borrow-checker", "Ownership", None);
        a.content = "secret word".into();
        repo.upsert(&a).unwrap();

        assert_eq!(repo.search("checker").unwrap().len(), 1);
        assert!(repo.search("secret").unwrap().is_empty());
    }

    #[test]
    fn search_treats_wildcards_literally() {
        let repo = repo();
        repo.upsert(&article("percent", "100% done", None)).unwrap();
        repo.upsert(&article("plain", "1000 done", None)).unwrap();

        let found = repo.search("100%").unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].slug(), "percent");
        assert_eq!(repo.search("_").unwrap().len(), 0);
    }

    #[test]
    fn file_database_persists() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("blog.db");
        {
            let repo = SqliteRepository::open(&path).unwrap();
            repo.init_schema().unwrap();
            repo.upsert(&article("kept", "Kept", None)).unwrap();
        }

        let reopened = SqliteRepository::open(&path).unwrap();
        reopened.init_schema().unwrap();
        assert_eq!(reopened.get_by_slug("kept").unwrap().title, "Kept");
    }

    #[test]
    fn missing_schema_is_storage_error() {
        let repo = SqliteRepository::in_memory().unwrap();
        let err = repo.count().unwrap_err();
        assert_eq!(err.http_status(), 500);
        assert!(err.to_string().contains("count"));
    }
}
