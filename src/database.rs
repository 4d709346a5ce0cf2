use crate::models::{
    Author, AuthorFields, Book, BookAuthor, BookFields, DeleteAuthorError, DeleteBookError,
    FindAuthorError, FindBookError, FirstName, Isbn, LastName, PublishedDate, StorageError, Title,
    UpdateAuthorError, UpdateBookError,
};
use crate::repositories::{AuthorRepository, BookRepository};
use anyhow::{Context, anyhow};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::migrate::Migrator;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqliteRow};
use sqlx::{FromRow, Row, SqlitePool};
use std::str::FromStr;

static MIGRATOR: Migrator = sqlx::migrate!();

const SELECT_AUTHOR: &str = "SELECT id, first_name, last_name, created, updated FROM author";

const SELECT_BOOK: &str = "SELECT b.id, b.title, b.author_id, b.isbn, b.published, b.created, \
     b.updated, a.first_name AS author_first_name, a.last_name AS author_last_name, \
     a.created AS author_created, a.updated AS author_updated \
     FROM book b LEFT JOIN author a ON a.id = b.author_id";

pub async fn establish_pool(path: &str) -> anyhow::Result<SqlitePool> {
    let opts = SqliteConnectOptions::from_str(path)
        .with_context(|| format!("Invalid database path {path}"))?
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal);
    let pool = SqlitePool::connect_with(opts)
        .await
        .with_context(|| format!("Failed to open database at {path}"))?;

    run_migrations(&pool).await?;

    Ok(pool)
}

pub async fn run_migrations(pool: &SqlitePool) -> anyhow::Result<()> {
    MIGRATOR
        .run(pool)
        .await
        .context("Failed to run database migrations")
}

#[derive(Debug, Clone)]
pub struct SqliteRepository {
    pool: SqlitePool,
}

impl SqliteRepository {
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl<'r> FromRow<'r, SqliteRow> for Author {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id = row.try_get("id")?;
        let first_name = row.try_get("first_name")?;
        let last_name = row.try_get("last_name")?;
        let created = row.try_get("created")?;
        let updated = row.try_get("updated")?;

        let first_name = FirstName::new_unchecked(first_name);
        let last_name = LastName::new_unchecked(last_name);
        Ok(Self::new(id, first_name, last_name, created, updated))
    }
}

impl<'r> FromRow<'r, SqliteRow> for Book {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id = row.try_get("id")?;
        let title = row.try_get("title")?;
        let author_id = row.try_get("author_id")?;
        let isbn = row.try_get("isbn")?;
        let published: NaiveDate = row.try_get("published")?;
        let created = row.try_get("created")?;
        let updated = row.try_get("updated")?;

        let author = match row.try_get::<Option<String>, _>("author_first_name")? {
            Some(first_name) => BookAuthor::Resolved(Author::new(
                author_id,
                FirstName::new_unchecked(first_name),
                LastName::new_unchecked(row.try_get("author_last_name")?),
                row.try_get("author_created")?,
                row.try_get("author_updated")?,
            )),
            None => BookAuthor::Dangling(author_id),
        };

        Ok(Self::new(
            id,
            Title::new_unchecked(title),
            author,
            Isbn::new_unchecked(isbn),
            PublishedDate::new(published),
            created,
            updated,
        ))
    }
}

#[async_trait]
impl AuthorRepository for SqliteRepository {
    async fn create_author(&self, fields: &AuthorFields) -> Result<Author, StorageError> {
        let now = Utc::now();
        let author = sqlx::query_as(
            "INSERT INTO author (first_name, last_name, created, updated) VALUES (?, ?, ?, ?) \
             RETURNING id, first_name, last_name, created, updated",
        )
        .bind(fields.first_name().as_str())
        .bind(fields.last_name().as_str())
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|err| {
            anyhow!(err).context(format!(
                r#"Failed to create author "{} {}""#,
                fields.first_name(),
                fields.last_name()
            ))
        })?;

        Ok(author)
    }

    async fn find_author(&self, id: i64) -> Result<Author, FindAuthorError> {
        let author = sqlx::query_as(&format!("{SELECT_AUTHOR} WHERE id = ?"))
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(|err| {
                if matches!(err, sqlx::Error::RowNotFound) {
                    FindAuthorError::NotFound { id }
                } else {
                    let err = anyhow!(err)
                        .context(format!(r#"Failed to retrieve author with id "{id}""#));
                    FindAuthorError::Other(err)
                }
            })?;

        Ok(author)
    }

    async fn find_all_authors(&self) -> Result<Vec<Author>, StorageError> {
        let authors = sqlx::query_as(&format!("{SELECT_AUTHOR} ORDER BY id"))
            .fetch_all(&self.pool)
            .await
            .map_err(|err| anyhow!(err).context("Failed to retrieve all authors"))?;

        Ok(authors)
    }

    async fn update_author(
        &self,
        id: i64,
        fields: &AuthorFields,
    ) -> Result<Author, UpdateAuthorError> {
        let author = sqlx::query_as(
            "UPDATE author SET first_name = ?, last_name = ?, updated = ? WHERE id = ? \
             RETURNING id, first_name, last_name, created, updated",
        )
        .bind(fields.first_name().as_str())
        .bind(fields.last_name().as_str())
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| {
            let err =
                anyhow!(err).context(format!(r#"Failed to update author with id "{id}""#));
            UpdateAuthorError::Other(err)
        })?;

        author.ok_or(UpdateAuthorError::NotFound { id })
    }

    async fn delete_author(&self, id: i64) -> Result<(), DeleteAuthorError> {
        let result = sqlx::query("DELETE FROM author WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|err| {
                anyhow!(err).context(format!(r#"Failed to delete author with id "{id}""#))
            })?;

        if result.rows_affected() == 0 {
            return Err(DeleteAuthorError::NotFound { id });
        }

        Ok(())
    }
}

#[async_trait]
impl BookRepository for SqliteRepository {
    async fn create_book(
        &self,
        author: &Author,
        fields: &BookFields,
    ) -> Result<Book, StorageError> {
        let now = Utc::now();
        let (id, created, updated): (i64, DateTime<Utc>, DateTime<Utc>) = sqlx::query_as(
            "INSERT INTO book (title, author_id, isbn, published, created, updated) \
             VALUES (?, ?, ?, ?, ?, ?) RETURNING id, created, updated",
        )
        .bind(fields.title().as_str())
        .bind(author.id())
        .bind(fields.isbn().as_str())
        .bind(fields.published().date())
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|err| {
            anyhow!(err).context(format!(r#"Failed to create book "{}""#, fields.title()))
        })?;

        Ok(Book::new(
            id,
            fields.title().clone(),
            BookAuthor::Resolved(author.clone()),
            fields.isbn().clone(),
            fields.published(),
            created,
            updated,
        ))
    }

    async fn find_book(&self, id: i64) -> Result<Book, FindBookError> {
        let book = sqlx::query_as(&format!("{SELECT_BOOK} WHERE b.id = ?"))
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(|err| {
                if matches!(err, sqlx::Error::RowNotFound) {
                    FindBookError::NotFound { id }
                } else {
                    let err =
                        anyhow!(err).context(format!(r#"Failed to retrieve book with id "{id}""#));
                    FindBookError::Other(err)
                }
            })?;

        Ok(book)
    }

    async fn find_all_books(&self) -> Result<Vec<Book>, StorageError> {
        let books = sqlx::query_as(&format!("{SELECT_BOOK} ORDER BY b.id"))
            .fetch_all(&self.pool)
            .await
            .map_err(|err| anyhow!(err).context("Failed to retrieve all books"))?;

        Ok(books)
    }

    async fn update_book(
        &self,
        id: i64,
        author: &Author,
        fields: &BookFields,
    ) -> Result<Book, UpdateBookError> {
        let row: Option<(DateTime<Utc>, DateTime<Utc>)> = sqlx::query_as(
            "UPDATE book SET title = ?, author_id = ?, isbn = ?, published = ?, updated = ? \
             WHERE id = ? RETURNING created, updated",
        )
        .bind(fields.title().as_str())
        .bind(author.id())
        .bind(fields.isbn().as_str())
        .bind(fields.published().date())
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| {
            let err = anyhow!(err).context(format!(r#"Failed to update book with id "{id}""#));
            UpdateBookError::Other(err)
        })?;

        let (created, updated) = row.ok_or(UpdateBookError::NotFound { id })?;

        Ok(Book::new(
            id,
            fields.title().clone(),
            BookAuthor::Resolved(author.clone()),
            fields.isbn().clone(),
            fields.published(),
            created,
            updated,
        ))
    }

    async fn delete_book(&self, id: i64) -> Result<(), DeleteBookError> {
        let result = sqlx::query("DELETE FROM book WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|err| {
                anyhow!(err).context(format!(r#"Failed to delete book with id "{id}""#))
            })?;

        if result.rows_affected() == 0 {
            return Err(DeleteBookError::NotFound { id });
        }

        Ok(())
    }
}
