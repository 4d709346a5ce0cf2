//! Resource controllers for authors and books.
//!
//! Each operation takes the raw path id and JSON payload, runs its checks in a
//! fixed order and returns either the entity or the first failing outcome.

pub mod authors;
pub mod books;

#[cfg(test)]
mod fake;

use crate::models::{
    DeleteAuthorError, DeleteBookError, FindAuthorError, FindBookError, StorageError,
    UpdateAuthorError, UpdateBookError,
};
use crate::validation::FieldErrors;
use serde_json::Value;
use thiserror::Error;

pub use authors::AuthorController;
pub use books::BookController;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Author,
    Book,
}

impl Entity {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Author => "author",
            Self::Book => "book",
        }
    }
}

impl std::fmt::Display for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug)]
pub enum ControllerError {
    #[error("{0}")]
    Validation(FieldErrors),
    #[error("{0} not found")]
    NotFound(Entity),
    #[error("{0} reference is missing")]
    MissingReference(Entity),
    #[error("request could not be interpreted")]
    MalformedRequest,
    #[error(transparent)]
    Unexpected(anyhow::Error),
}

impl From<FieldErrors> for ControllerError {
    fn from(errors: FieldErrors) -> Self {
        Self::Validation(errors)
    }
}

impl From<StorageError> for ControllerError {
    fn from(err: StorageError) -> Self {
        Self::Unexpected(err.0)
    }
}

/// Generates the mapping from a persistence error with a `NotFound` variant.
macro_rules! not_found_maps_to {
    ($($error:ident => $entity:expr),+ $(,)?) => {
        $(
            impl From<$error> for ControllerError {
                fn from(err: $error) -> Self {
                    match err {
                        $error::NotFound { .. } => Self::NotFound($entity),
                        $error::Other(cause) => Self::Unexpected(cause),
                    }
                }
            }
        )+
    };
}

not_found_maps_to! {
    FindAuthorError => Entity::Author,
    UpdateAuthorError => Entity::Author,
    DeleteAuthorError => Entity::Author,
    FindBookError => Entity::Book,
    UpdateBookError => Entity::Book,
    DeleteBookError => Entity::Book,
}

/// Path ids are integers; anything else is reported by the caller as it sees fit.
fn parse_id(raw: &str) -> Option<i64> {
    raw.trim().parse().ok()
}

/// A reference may be a JSON integer, a whole float, a boolean, or a string holding an integer.
fn parse_reference(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(whole_number)),
        Value::String(s) => parse_id(s),
        Value::Bool(b) => Some(i64::from(*b)),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

fn whole_number(n: f64) -> Option<i64> {
    let in_range = (i64::MIN as f64..i64::MAX as f64).contains(&n);
    (n.fract() == 0.0 && in_range).then_some(n as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn ids_must_be_integers() {
        assert_eq!(parse_id("12"), Some(12));
        assert_eq!(parse_id(" 3 "), Some(3));
        assert_eq!(parse_id("hi"), None);
        assert_eq!(parse_id("1.5"), None);
    }

    #[test]
    fn references_accept_numbers_and_numeric_strings() {
        assert_eq!(parse_reference(&json!(1)), Some(1));
        assert_eq!(parse_reference(&json!("4")), Some(4));
        assert_eq!(parse_reference(&json!("Test")), None);
        assert_eq!(parse_reference(&json!(1.5)), None);
        assert_eq!(parse_reference(&json!(f64::MAX)), None);
        assert_eq!(parse_reference(&json!(null)), None);
        assert_eq!(parse_reference(&json!({"id": 1})), None);
    }

    #[test]
    fn references_accept_whole_floats_and_booleans() {
        assert_eq!(parse_reference(&json!(1.0)), Some(1));
        assert_eq!(parse_reference(&json!(-2.0)), Some(-2));
        assert_eq!(parse_reference(&json!(true)), Some(1));
        assert_eq!(parse_reference(&json!(false)), Some(0));
    }
}
