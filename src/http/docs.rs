//! OpenAPI description of the `/api/v1` routes, served through Swagger UI.

use utoipa::openapi::content::ContentBuilder;
use utoipa::openapi::path::{
    OperationBuilder, Parameter, ParameterBuilder, ParameterIn, PathItemBuilder, PathsBuilder,
};
use utoipa::openapi::request_body::{RequestBody, RequestBodyBuilder};
use utoipa::openapi::schema::{
    Array, KnownFormat, Object, ObjectBuilder, Schema, SchemaFormat, Type,
};
use utoipa::openapi::server::Server;
use utoipa::openapi::{
    HttpMethod, InfoBuilder, OpenApi, OpenApiBuilder, Required, Response, ResponseBuilder,
};
use utoipa_swagger_ui::SwaggerUi;

pub const DOCS_PATH: &str = "/api/v1/docs";
pub const OPENAPI_PATH: &str = "/api/v1/openapi.json";

const REJECTED: &str = "Invalid fields or incorrect format";
const BOOK_REJECTED: &str = "Invalid fields, missing author or incorrect format";

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new(DOCS_PATH).url(OPENAPI_PATH, openapi())
}

pub fn openapi() -> OpenApi {
    let authors = PathItemBuilder::new()
        .operation(
            HttpMethod::Get,
            operation("listAuthors", "authors", "List all authors")
                .response("200", json_response("Every author", list_of(author())))
                .build(),
        )
        .operation(
            HttpMethod::Post,
            operation("createAuthor", "authors", "Create an author")
                .request_body(Some(json_body(author_fields())))
                .response("201", json_response("The new author", author()))
                .response("400", plain_response(REJECTED))
                .build(),
        )
        .build();

    let author = PathItemBuilder::new()
        .operation(
            HttpMethod::Get,
            with_id("retrieveAuthor", "authors", "Retrieve an author")
                .response("200", json_response("The author", author()))
                .response("404", plain_response("Author not found"))
                .build(),
        )
        .operation(
            HttpMethod::Put,
            with_id("updateAuthor", "authors", "Update an author")
                .request_body(Some(json_body(author_fields())))
                .response("200", json_response("The updated author", author()))
                .response("400", plain_response(REJECTED))
                .response("404", plain_response("Author not found"))
                .build(),
        )
        .operation(
            HttpMethod::Delete,
            with_id("destroyAuthor", "authors", "Delete an author")
                .response("204", plain_response("Author deleted"))
                .response("404", plain_response("Author not found"))
                .build(),
        )
        .build();

    let books = PathItemBuilder::new()
        .operation(
            HttpMethod::Get,
            operation("listBooks", "books", "List all books")
                .response("200", json_response("Every book", list_of(book())))
                .build(),
        )
        .operation(
            HttpMethod::Post,
            operation("createBook", "books", "Create a book for an existing author")
                .request_body(Some(json_body(book_fields(reference()))))
                .response("201", json_response("The new book", book()))
                .response("400", plain_response(BOOK_REJECTED))
                .response("404", plain_response("Author not found"))
                .build(),
        )
        .build();

    let book = PathItemBuilder::new()
        .operation(
            HttpMethod::Get,
            with_id("retrieveBook", "books", "Retrieve a book")
                .response("200", json_response("The book", book()))
                .response("404", plain_response("Book not found"))
                .build(),
        )
        .operation(
            HttpMethod::Put,
            with_id("updateBook", "books", "Update a book")
                .request_body(Some(json_body(book_fields(reference()))))
                .response("200", json_response("The updated book", book()))
                .response("400", plain_response(BOOK_REJECTED))
                .response("404", plain_response("Book or author not found"))
                .build(),
        )
        .operation(
            HttpMethod::Delete,
            with_id("destroyBook", "books", "Delete a book")
                .response("204", plain_response("Book deleted"))
                .response("404", plain_response("Book not found"))
                .build(),
        )
        .build();

    let book_and_author = PathItemBuilder::new()
        .operation(
            HttpMethod::Post,
            operation("createBookAndAuthor", "books", "Create a book and its author at once")
                .request_body(Some(json_body(book_fields(author_fields()))))
                .response("201", json_response("The new book", self::book()))
                .response("400", plain_response(REJECTED))
                .build(),
        )
        .build();

    let paths = PathsBuilder::new()
        .path("/authors", authors)
        .path("/authors/{id}", author)
        .path("/books", books)
        .path("/books/createBookAndAuthor", book_and_author)
        .path("/books/{id}", book)
        .build();

    OpenApiBuilder::new()
        .info(
            InfoBuilder::new()
                .title("Library API")
                .version(env!("CARGO_PKG_VERSION"))
                .build(),
        )
        .servers(Some(vec![Server::new("/api/v1")]))
        .paths(paths)
        .build()
}

fn operation(id: &str, tag: &str, summary: &str) -> OperationBuilder {
    OperationBuilder::new()
        .operation_id(Some(id))
        .summary(Some(summary))
        .tags(Some(vec![tag.to_owned()]))
}

fn with_id(id: &str, tag: &str, summary: &str) -> OperationBuilder {
    operation(id, tag, summary).parameter(id_parameter())
}

fn id_parameter() -> Parameter {
    ParameterBuilder::new()
        .name("id")
        .parameter_in(ParameterIn::Path)
        .required(Required::True)
        .schema(Some(Object::with_type(Type::Integer)))
        .build()
}

fn json_body(schema: Object) -> RequestBody {
    RequestBodyBuilder::new()
        .required(Some(Required::True))
        .content("application/json", ContentBuilder::new().schema(Some(schema)).build())
        .build()
}

fn json_response(description: &str, schema: impl Into<Schema>) -> Response {
    ResponseBuilder::new()
        .description(description)
        .content("application/json", ContentBuilder::new().schema(Some(schema.into())).build())
        .build()
}

fn plain_response(description: &str) -> Response {
    ResponseBuilder::new().description(description).build()
}

fn list_of(item: Object) -> Schema {
    Schema::Array(Array::new(item))
}

fn text(max_length: usize) -> Object {
    ObjectBuilder::new()
        .schema_type(Type::String)
        .max_length(Some(max_length))
        .build()
}

fn timestamp() -> Object {
    ObjectBuilder::new()
        .schema_type(Type::String)
        .format(Some(SchemaFormat::KnownFormat(KnownFormat::DateTime)))
        .build()
}

fn reference() -> Object {
    ObjectBuilder::new()
        .schema_type(Type::Integer)
        .description(Some("Id of an existing author"))
        .build()
}

fn author_fields() -> Object {
    ObjectBuilder::new()
        .property("first_name", text(70))
        .property("last_name", text(100))
        .required("first_name")
        .required("last_name")
        .build()
}

fn author() -> Object {
    ObjectBuilder::new()
        .property("id", Object::with_type(Type::Integer))
        .property("first_name", text(70))
        .property("last_name", text(100))
        .property("created", timestamp())
        .property("updated", timestamp())
        .build()
}

fn book_fields(author: Object) -> Object {
    ObjectBuilder::new()
        .property("title", text(250))
        .property("author", author)
        .property("isbn", text(13))
        .property(
            "published",
            ObjectBuilder::new()
                .schema_type(Type::String)
                .description(Some("YYYY[-MM[-DD]]"))
                .build(),
        )
        .required("title")
        .required("author")
        .required("isbn")
        .required("published")
        .build()
}

fn book() -> Object {
    ObjectBuilder::new()
        .property("id", Object::with_type(Type::Integer))
        .property("title", text(250))
        .property("author", author())
        .property("isbn", text(13))
        .property(
            "published",
            ObjectBuilder::new()
                .schema_type(Type::String)
                .format(Some(SchemaFormat::KnownFormat(KnownFormat::Date)))
                .build(),
        )
        .property("created", timestamp())
        .property("updated", timestamp())
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documents_every_route() {
        let doc = openapi();
        let paths = doc.paths.paths;

        assert_eq!(paths.len(), 5);
        assert!(paths["/authors"].get.is_some());
        assert!(paths["/authors"].post.is_some());
        assert!(paths["/authors/{id}"].put.is_some());
        assert!(paths["/books/{id}"].delete.is_some());
        assert!(paths["/books/createBookAndAuthor"].post.is_some());
        assert!(paths["/books/createBookAndAuthor"].get.is_none());
    }
}
