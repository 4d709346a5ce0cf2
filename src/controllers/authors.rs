use super::{ControllerError, Entity, parse_id};
use crate::models::Author;
use crate::repositories::AuthorRepository;
use crate::validation::validate_author;
use serde_json::Value;

pub struct AuthorController<'a, R: ?Sized> {
    repo: &'a R,
}

impl<'a, R: AuthorRepository + ?Sized> AuthorController<'a, R> {
    pub const fn new(repo: &'a R) -> Self {
        Self { repo }
    }

    pub async fn list(&self) -> Result<Vec<Author>, ControllerError> {
        Ok(self.repo.find_all_authors().await?)
    }

    pub async fn create(&self, payload: &Value) -> Result<Author, ControllerError> {
        let fields = validate_author(payload)?;
        let author = self.repo.create_author(&fields).await?;
        tracing::info!(author_id = author.id(), "created author");
        Ok(author)
    }

    /// An id that is not an integer cannot match a record and is reported as not found.
    pub async fn retrieve(&self, id: &str) -> Result<Author, ControllerError> {
        let id = parse_id(id).ok_or(ControllerError::NotFound(Entity::Author))?;
        Ok(self.repo.find_author(id).await?)
    }

    /// Checks run in order: id format, existence, then the payload fields.
    pub async fn update(&self, id: &str, payload: &Value) -> Result<Author, ControllerError> {
        let id = parse_id(id).ok_or(ControllerError::MalformedRequest)?;
        self.repo.find_author(id).await?;

        let fields = validate_author(payload)?;
        let author = self.repo.update_author(id, &fields).await?;
        tracing::info!(author_id = id, "updated author");
        Ok(author)
    }

    /// Books referring to the author are left untouched.
    pub async fn destroy(&self, id: &str) -> Result<(), ControllerError> {
        let id = parse_id(id).ok_or(ControllerError::NotFound(Entity::Author))?;
        self.repo.delete_author(id).await?;
        tracing::info!(author_id = id, "deleted author");
        Ok(())
    }
}
