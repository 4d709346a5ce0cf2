use super::AppState;
use super::response::{ApiError, ApiSuccess, JsonPayload, message};
use crate::controllers::{AuthorController, BookController};
use crate::models::{Author, Book, BookAuthor};
use crate::repositories::Repository;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct AuthorHttpResponse {
    id: i64,
    first_name: String,
    last_name: String,
    created: DateTime<Utc>,
    updated: DateTime<Utc>,
}

impl From<&Author> for AuthorHttpResponse {
    fn from(value: &Author) -> Self {
        Self {
            id: value.id(),
            first_name: value.first_name().to_string(),
            last_name: value.last_name().to_string(),
            created: value.created(),
            updated: value.updated(),
        }
    }
}

/// The author expanded one level deep, or its bare id once it no longer exists.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum BookAuthorHttpResponse {
    Expanded(AuthorHttpResponse),
    Reference(i64),
}

#[derive(Debug, Serialize)]
pub struct BookHttpResponse {
    id: i64,
    title: String,
    author: BookAuthorHttpResponse,
    isbn: String,
    published: NaiveDate,
    created: DateTime<Utc>,
    updated: DateTime<Utc>,
}

impl From<&Book> for BookHttpResponse {
    fn from(value: &Book) -> Self {
        let author = match value.author() {
            BookAuthor::Resolved(author) => BookAuthorHttpResponse::Expanded(author.into()),
            BookAuthor::Dangling(id) => BookAuthorHttpResponse::Reference(*id),
        };

        Self {
            id: value.id(),
            title: value.title().to_string(),
            author,
            isbn: value.isbn().to_string(),
            published: value.published().date(),
            created: value.created(),
            updated: value.updated(),
        }
    }
}

pub async fn list_authors<R: Repository>(
    State(state): State<AppState<R>>,
) -> Result<ApiSuccess<Vec<AuthorHttpResponse>>, ApiError> {
    let authors = AuthorController::new(state.repo()).list().await?;
    let body = authors.iter().map(AuthorHttpResponse::from).collect();
    Ok(ApiSuccess::new(StatusCode::OK, body))
}

pub async fn create_author<R: Repository>(
    State(state): State<AppState<R>>,
    JsonPayload(body): JsonPayload,
) -> Result<ApiSuccess<AuthorHttpResponse>, ApiError> {
    let author = AuthorController::new(state.repo()).create(&body).await?;
    Ok(ApiSuccess::new(StatusCode::CREATED, (&author).into()))
}

pub async fn retrieve_author<R: Repository>(
    State(state): State<AppState<R>>,
    Path(id): Path<String>,
) -> Result<ApiSuccess<AuthorHttpResponse>, ApiError> {
    let author = AuthorController::new(state.repo()).retrieve(&id).await?;
    Ok(ApiSuccess::new(StatusCode::OK, (&author).into()))
}

pub async fn update_author<R: Repository>(
    State(state): State<AppState<R>>,
    Path(id): Path<String>,
    JsonPayload(body): JsonPayload,
) -> Result<ApiSuccess<AuthorHttpResponse>, ApiError> {
    let author = AuthorController::new(state.repo())
        .update(&id, &body)
        .await?;
    Ok(ApiSuccess::new(StatusCode::OK, (&author).into()))
}

pub async fn destroy_author<R: Repository>(
    State(state): State<AppState<R>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    AuthorController::new(state.repo()).destroy(&id).await?;
    Ok((
        StatusCode::NO_CONTENT,
        message("author", "Succesfully deleted!"),
    ))
}

pub async fn list_books<R: Repository>(
    State(state): State<AppState<R>>,
) -> Result<ApiSuccess<Vec<BookHttpResponse>>, ApiError> {
    let books = BookController::new(state.repo()).list().await?;
    let body = books.iter().map(BookHttpResponse::from).collect();
    Ok(ApiSuccess::new(StatusCode::OK, body))
}

pub async fn create_book<R: Repository>(
    State(state): State<AppState<R>>,
    JsonPayload(body): JsonPayload,
) -> Result<ApiSuccess<BookHttpResponse>, ApiError> {
    let book = BookController::new(state.repo()).create(&body).await?;
    Ok(ApiSuccess::new(StatusCode::CREATED, (&book).into()))
}

pub async fn retrieve_book<R: Repository>(
    State(state): State<AppState<R>>,
    Path(id): Path<String>,
) -> Result<ApiSuccess<BookHttpResponse>, ApiError> {
    let book = BookController::new(state.repo()).retrieve(&id).await?;
    Ok(ApiSuccess::new(StatusCode::OK, (&book).into()))
}

pub async fn update_book<R: Repository>(
    State(state): State<AppState<R>>,
    Path(id): Path<String>,
    JsonPayload(body): JsonPayload,
) -> Result<ApiSuccess<BookHttpResponse>, ApiError> {
    let book = BookController::new(state.repo()).update(&id, &body).await?;
    Ok(ApiSuccess::new(StatusCode::OK, (&book).into()))
}

pub async fn destroy_book<R: Repository>(
    State(state): State<AppState<R>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    BookController::new(state.repo()).destroy(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn create_book_and_author<R: Repository>(
    State(state): State<AppState<R>>,
    JsonPayload(body): JsonPayload,
) -> Result<ApiSuccess<BookHttpResponse>, ApiError> {
    let book = BookController::new(state.repo())
        .create_with_author(&body)
        .await?;
    Ok(ApiSuccess::new(StatusCode::CREATED, (&book).into()))
}
