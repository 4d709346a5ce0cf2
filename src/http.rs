mod docs;
mod handler;
mod response;

pub use response::{ApiError, ApiSuccess, JsonPayload};

use crate::repositories::Repository;
use anyhow::Context;
use axum::Router;
use axum::routing::{get, post};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

#[derive(Debug)]
pub struct AppState<R: Repository> {
    repo: Arc<R>,
}

impl<R: Repository> AppState<R> {
    pub fn new(repo: R) -> Self {
        Self {
            repo: Arc::new(repo),
        }
    }

    pub fn repo(&self) -> &R {
        &self.repo
    }
}

impl<R: Repository> Clone for AppState<R> {
    fn clone(&self) -> Self {
        Self {
            repo: Arc::clone(&self.repo),
        }
    }
}

#[derive(Debug)]
pub struct HttpServerConfig {
    port: u16,
}

impl HttpServerConfig {
    pub const fn new(port: u16) -> Self {
        Self { port }
    }
}

pub struct HttpServer {
    router: Router,
    listener: TcpListener,
}

impl HttpServer {
    pub async fn new<R: Repository>(
        state: AppState<R>,
        config: HttpServerConfig,
    ) -> anyhow::Result<Self> {
        let router = router(state);

        let listener = TcpListener::bind(format!("0.0.0.0:{}", config.port))
            .await
            .with_context(|| format!("Failed to bind to port {}", config.port))?;

        Ok(Self { router, listener })
    }

    pub async fn run(self) -> anyhow::Result<()> {
        tracing::info!("listening on {}", self.listener.local_addr()?);
        axum::serve(self.listener, self.router)
            .await
            .context("Received error from running server")?;
        Ok(())
    }
}

/// The complete application, with Swagger UI and request tracing.
pub fn router<R: Repository>(state: AppState<R>) -> Router {
    Router::new()
        .nest("/api/v1", api_routes::<R>())
        .merge(docs::swagger_ui())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Every route is also reachable with a trailing slash.
fn api_routes<R: Repository>() -> Router<AppState<R>> {
    let authors = get(handler::list_authors::<R>).post(handler::create_author::<R>);
    let author = get(handler::retrieve_author::<R>)
        .put(handler::update_author::<R>)
        .delete(handler::destroy_author::<R>);
    let books = get(handler::list_books::<R>).post(handler::create_book::<R>);
    let book = get(handler::retrieve_book::<R>)
        .put(handler::update_book::<R>)
        .delete(handler::destroy_book::<R>);
    let book_and_author = post(handler::create_book_and_author::<R>);

    Router::new()
        .route("/authors", authors.clone())
        .route("/authors/", authors)
        .route("/authors/{id}", author.clone())
        .route("/authors/{id}/", author)
        .route("/books", books.clone())
        .route("/books/", books)
        .route("/books/createBookAndAuthor", book_and_author.clone())
        .route("/books/createBookAndAuthor/", book_and_author)
        .route("/books/{id}", book.clone())
        .route("/books/{id}/", book)
}
