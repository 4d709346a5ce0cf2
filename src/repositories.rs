use crate::models::{
    Author, AuthorFields, Book, BookFields, DeleteAuthorError, DeleteBookError, FindAuthorError,
    FindBookError, StorageError, UpdateAuthorError, UpdateBookError,
};
use async_trait::async_trait;

#[async_trait]
pub trait AuthorRepository: Send + Sync + 'static {
    async fn create_author(&self, fields: &AuthorFields) -> Result<Author, StorageError>;

    async fn find_author(&self, id: i64) -> Result<Author, FindAuthorError>;

    async fn find_all_authors(&self) -> Result<Vec<Author>, StorageError>;

    /// Replaces both name fields and refreshes the `updated` timestamp.
    async fn update_author(
        &self,
        id: i64,
        fields: &AuthorFields,
    ) -> Result<Author, UpdateAuthorError>;

    async fn delete_author(&self, id: i64) -> Result<(), DeleteAuthorError>;
}

/// Books are always returned with their author expanded when it still exists.
#[async_trait]
pub trait BookRepository: Send + Sync + 'static {
    async fn create_book(&self, author: &Author, fields: &BookFields)
    -> Result<Book, StorageError>;

    async fn find_book(&self, id: i64) -> Result<Book, FindBookError>;

    async fn find_all_books(&self) -> Result<Vec<Book>, StorageError>;

    async fn update_book(
        &self,
        id: i64,
        author: &Author,
        fields: &BookFields,
    ) -> Result<Book, UpdateBookError>;

    async fn delete_book(&self, id: i64) -> Result<(), DeleteBookError>;
}

/// Everything the HTTP layer needs from persistence.
pub trait Repository: AuthorRepository + BookRepository {}

impl<T: AuthorRepository + BookRepository> Repository for T {}
