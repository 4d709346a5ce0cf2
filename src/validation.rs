//! Field-level validation of raw JSON payloads.
//!
//! Every field a validator owns is checked, so a failure carries the complete
//! set of violations rather than the first one found.

use crate::models::{
    AuthorFields, BookFields, FirstName, Isbn, LastName, PublishedDate, PublishedDateError,
    TextFieldError, Title,
};
use serde::Serialize;
use serde_json::{Map, Value};
use std::borrow::Cow;
use std::collections::BTreeMap;

pub const REQUIRED: &str = "This field is required.";
pub const NOT_NULL: &str = "This field may not be null.";
pub const NOT_A_STRING: &str = "Not a valid string.";
pub const NON_FIELD_ERRORS: &str = "non_field_errors";

/// Field name to the ordered list of messages describing what is wrong with it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_owned())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl std::fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let fields = self.fields().collect::<Vec<_>>();
        write!(f, "invalid fields: {}", fields.join(", "))
    }
}

pub fn validate_author(payload: &Value) -> Result<AuthorFields, FieldErrors> {
    let data = as_object(payload)?;
    let mut errors = FieldErrors::new();

    let first_name = field(data, "first_name", &mut errors, |raw| text(raw, FirstName::new));
    let last_name = field(data, "last_name", &mut errors, |raw| text(raw, LastName::new));

    match (first_name, last_name) {
        (Some(first_name), Some(last_name)) => Ok(AuthorFields::new(first_name, last_name)),
        _ => Err(errors),
    }
}

/// Validates title, isbn and published. The `author` key is left to the caller.
pub fn validate_book(payload: &Value) -> Result<BookFields, FieldErrors> {
    let data = as_object(payload)?;
    let mut errors = FieldErrors::new();

    let title = field(data, "title", &mut errors, |raw| text(raw, Title::new));
    let isbn = field(data, "isbn", &mut errors, |raw| text(raw, Isbn::new));
    let published = field(data, "published", &mut errors, date);

    match (title, isbn, published) {
        (Some(title), Some(isbn), Some(published)) => Ok(BookFields::new(title, isbn, published)),
        _ => Err(errors),
    }
}

fn as_object(payload: &Value) -> Result<&Map<String, Value>, FieldErrors> {
    payload.as_object().ok_or_else(|| {
        let message = match kind(payload) {
            Some(kind) => format!("Invalid data. Expected a dictionary, but got {kind}."),
            None => NOT_NULL.to_owned(),
        };
        let mut errors = FieldErrors::new();
        errors.push(NON_FIELD_ERRORS, message);
        errors
    })
}

fn field<T>(
    data: &Map<String, Value>,
    name: &str,
    errors: &mut FieldErrors,
    parse: impl FnOnce(&Value) -> Result<T, String>,
) -> Option<T> {
    let Some(raw) = data.get(name) else {
        errors.push(name, REQUIRED);
        return None;
    };

    match parse(raw) {
        Ok(value) => Some(value),
        Err(message) => {
            errors.push(name, message);
            None
        }
    }
}

fn text<T>(
    raw: &Value,
    build: impl FnOnce(&str) -> Result<T, TextFieldError>,
) -> Result<T, String> {
    let value: Cow<'_, str> = match raw {
        Value::String(s) => Cow::Borrowed(s.as_str()),
        Value::Number(n) => Cow::Owned(n.to_string()),
        Value::Null => return Err(NOT_NULL.to_owned()),
        Value::Bool(_) | Value::Array(_) | Value::Object(_) => {
            return Err(NOT_A_STRING.to_owned());
        }
    };

    build(&value).map_err(|err| err.to_string())
}

fn date(raw: &Value) -> Result<PublishedDate, String> {
    match raw {
        Value::String(s) => PublishedDate::parse(s).map_err(|err| err.to_string()),
        Value::Null => Err(NOT_NULL.to_owned()),
        _ => Err(PublishedDateError.to_string()),
    }
}

/// Python type name of a JSON value, as clients of the API know them. `null` has none.
fn kind(value: &Value) -> Option<&'static str> {
    let kind = match value {
        Value::Null => return None,
        Value::Bool(_) => "bool",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "int",
        Value::String(_) => "str",
        Value::Array(_) => "list",
        Value::Object(_) => "dict",
    };
    Some(kind)
}
