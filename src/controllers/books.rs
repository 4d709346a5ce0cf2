use super::{ControllerError, Entity, parse_id, parse_reference};
use crate::models::{Author, Book};
use crate::repositories::{AuthorRepository, BookRepository};
use crate::validation::{validate_author, validate_book};
use serde_json::Value;

pub struct BookController<'a, R: ?Sized> {
    repo: &'a R,
}

impl<'a, R: AuthorRepository + BookRepository + ?Sized> BookController<'a, R> {
    pub const fn new(repo: &'a R) -> Self {
        Self { repo }
    }

    pub async fn list(&self) -> Result<Vec<Book>, ControllerError> {
        Ok(self.repo.find_all_books().await?)
    }

    /// Resolves the author reference before looking at any other field.
    pub async fn create(&self, payload: &Value) -> Result<Book, ControllerError> {
        let author = self.resolve_author(payload).await?;
        let fields = validate_book(payload)?;

        let book = self.repo.create_book(&author, &fields).await?;
        tracing::info!(book_id = book.id(), author_id = author.id(), "created book");
        Ok(book)
    }

    pub async fn retrieve(&self, id: &str) -> Result<Book, ControllerError> {
        let id = parse_id(id).ok_or(ControllerError::NotFound(Entity::Book))?;
        Ok(self.repo.find_book(id).await?)
    }

    /// The author reference is resolved first, then the target book, then the fields.
    pub async fn update(&self, id: &str, payload: &Value) -> Result<Book, ControllerError> {
        let author = self.resolve_author(payload).await?;

        let id = parse_id(id).ok_or(ControllerError::MalformedRequest)?;
        self.repo.find_book(id).await?;

        let fields = validate_book(payload)?;
        let book = self.repo.update_book(id, &author, &fields).await?;
        tracing::info!(book_id = id, author_id = author.id(), "updated book");
        Ok(book)
    }

    pub async fn destroy(&self, id: &str) -> Result<(), ControllerError> {
        let id = parse_id(id).ok_or(ControllerError::NotFound(Entity::Book))?;
        self.repo.delete_book(id).await?;
        tracing::info!(book_id = id, "deleted book");
        Ok(())
    }

    /// Creates a book together with a new author described by the nested
    /// `author` object.
    ///
    /// The author is persisted as soon as it validates. If the book fields are
    /// then rejected, the author stays behind without a book.
    pub async fn create_with_author(&self, payload: &Value) -> Result<Book, ControllerError> {
        let nested = payload
            .get("author")
            .ok_or(ControllerError::MalformedRequest)?;
        let author_fields = validate_author(nested)?;
        let author = self.repo.create_author(&author_fields).await?;
        tracing::info!(author_id = author.id(), "created author");

        let fields = validate_book(payload).inspect_err(|errors| {
            tracing::warn!(
                author_id = author.id(),
                %errors,
                "book rejected after its author was created"
            );
        })?;

        let book = self.repo.create_book(&author, &fields).await?;
        tracing::info!(book_id = book.id(), author_id = author.id(), "created book");
        Ok(book)
    }

    async fn resolve_author(&self, payload: &Value) -> Result<Author, ControllerError> {
        let data = payload
            .as_object()
            .ok_or(ControllerError::MalformedRequest)?;
        let reference = data
            .get("author")
            .ok_or(ControllerError::MissingReference(Entity::Author))?;
        let author_id = parse_reference(reference).ok_or(ControllerError::MalformedRequest)?;

        Ok(self.repo.find_author(author_id).await?)
    }
}
