use crate::models::{
    Author, AuthorFields, Book, BookAuthor, BookFields, DeleteAuthorError, DeleteBookError,
    FindAuthorError, FindBookError, StorageError, UpdateAuthorError, UpdateBookError,
};
use crate::repositories::{AuthorRepository, BookRepository};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::Mutex;

/// Map-backed repository with sequential ids starting at 1.
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    state: Mutex<State>,
}

#[derive(Debug, Default)]
struct State {
    last_author_id: i64,
    last_book_id: i64,
    authors: BTreeMap<i64, Author>,
    books: BTreeMap<i64, Book>,
}

impl State {
    /// Re-reads the author so deletions show up as dangling references.
    fn expand(&self, book: &Book) -> Book {
        let author_id = book.author().id();
        let author = self
            .authors
            .get(&author_id)
            .cloned()
            .map_or(BookAuthor::Dangling(author_id), BookAuthor::Resolved);

        Book::new(
            book.id(),
            book.title().clone(),
            author,
            book.isbn().clone(),
            book.published(),
            book.created(),
            book.updated(),
        )
    }
}

impl InMemoryRepository {
    pub fn author_count(&self) -> usize {
        self.state.lock().unwrap().authors.len()
    }

    pub fn book_count(&self) -> usize {
        self.state.lock().unwrap().books.len()
    }
}

#[async_trait]
impl AuthorRepository for InMemoryRepository {
    async fn create_author(&self, fields: &AuthorFields) -> Result<Author, StorageError> {
        let mut state = self.state.lock().unwrap();
        state.last_author_id += 1;
        let now = Utc::now();
        let author = Author::new(
            state.last_author_id,
            fields.first_name().clone(),
            fields.last_name().clone(),
            now,
            now,
        );
        state.authors.insert(author.id(), author.clone());
        Ok(author)
    }

    async fn find_author(&self, id: i64) -> Result<Author, FindAuthorError> {
        let state = self.state.lock().unwrap();
        state
            .authors
            .get(&id)
            .cloned()
            .ok_or(FindAuthorError::NotFound { id })
    }

    async fn find_all_authors(&self) -> Result<Vec<Author>, StorageError> {
        let state = self.state.lock().unwrap();
        Ok(state.authors.values().cloned().collect())
    }

    async fn update_author(
        &self,
        id: i64,
        fields: &AuthorFields,
    ) -> Result<Author, UpdateAuthorError> {
        let mut state = self.state.lock().unwrap();
        let existing = state
            .authors
            .get(&id)
            .ok_or(UpdateAuthorError::NotFound { id })?;
        let author = Author::new(
            id,
            fields.first_name().clone(),
            fields.last_name().clone(),
            existing.created(),
            Utc::now(),
        );
        state.authors.insert(id, author.clone());
        Ok(author)
    }

    async fn delete_author(&self, id: i64) -> Result<(), DeleteAuthorError> {
        let mut state = self.state.lock().unwrap();
        state
            .authors
            .remove(&id)
            .map(|_| ())
            .ok_or(DeleteAuthorError::NotFound { id })
    }
}

#[async_trait]
impl BookRepository for InMemoryRepository {
    async fn create_book(
        &self,
        author: &Author,
        fields: &BookFields,
    ) -> Result<Book, StorageError> {
        let mut state = self.state.lock().unwrap();
        state.last_book_id += 1;
        let now = Utc::now();
        let book = Book::new(
            state.last_book_id,
            fields.title().clone(),
            BookAuthor::Resolved(author.clone()),
            fields.isbn().clone(),
            fields.published(),
            now,
            now,
        );
        state.books.insert(book.id(), book.clone());
        Ok(book)
    }

    async fn find_book(&self, id: i64) -> Result<Book, FindBookError> {
        let state = self.state.lock().unwrap();
        state
            .books
            .get(&id)
            .map(|book| state.expand(book))
            .ok_or(FindBookError::NotFound { id })
    }

    async fn find_all_books(&self) -> Result<Vec<Book>, StorageError> {
        let state = self.state.lock().unwrap();
        Ok(state.books.values().map(|book| state.expand(book)).collect())
    }

    async fn update_book(
        &self,
        id: i64,
        author: &Author,
        fields: &BookFields,
    ) -> Result<Book, UpdateBookError> {
        let mut state = self.state.lock().unwrap();
        let existing = state
            .books
            .get(&id)
            .ok_or(UpdateBookError::NotFound { id })?;
        let book = Book::new(
            id,
            fields.title().clone(),
            BookAuthor::Resolved(author.clone()),
            fields.isbn().clone(),
            fields.published(),
            existing.created(),
            Utc::now(),
        );
        state.books.insert(id, book.clone());
        Ok(book)
    }

    async fn delete_book(&self, id: i64) -> Result<(), DeleteBookError> {
        let mut state = self.state.lock().unwrap();
        state
            .books
            .remove(&id)
            .map(|_| ())
            .ok_or(DeleteBookError::NotFound { id })
    }
}
