use crate::controllers::{ControllerError, Entity};
use crate::validation::FieldErrors;
use axum::extract::{FromRequest, Json, Request};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

#[derive(Debug)]
pub struct ApiSuccess<T: Serialize>(StatusCode, Json<T>);

impl<T: Serialize> ApiSuccess<T> {
    pub const fn new(status: StatusCode, data: T) -> Self {
        Self(status, Json(data))
    }
}

impl<T: Serialize> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

/// Every failure a client can observe. None of them is a server error.
#[derive(Debug)]
pub enum ApiError {
    /// 400 with the field error mapping as the body.
    FieldErrors(FieldErrors),
    /// 404 `{"<entity>": "Not Found"}`.
    NotFound(Entity),
    /// 400 `{"<entity>": "Field required"}`.
    MissingReference(Entity),
    /// 400 `{"body": "Incorrect format"}`.
    IncorrectFormat,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::FieldErrors(errors) => (StatusCode::BAD_REQUEST, Json(errors)).into_response(),
            Self::NotFound(entity) => {
                (StatusCode::NOT_FOUND, message(entity.as_str(), "Not Found")).into_response()
            }
            Self::MissingReference(entity) => {
                (StatusCode::BAD_REQUEST, message(entity.as_str(), "Field required"))
                    .into_response()
            }
            Self::IncorrectFormat => {
                (StatusCode::BAD_REQUEST, message("body", "Incorrect format")).into_response()
            }
        }
    }
}

impl From<ControllerError> for ApiError {
    fn from(err: ControllerError) -> Self {
        match err {
            ControllerError::Validation(errors) => Self::FieldErrors(errors),
            ControllerError::NotFound(entity) => Self::NotFound(entity),
            ControllerError::MissingReference(entity) => Self::MissingReference(entity),
            ControllerError::MalformedRequest => Self::IncorrectFormat,
            ControllerError::Unexpected(cause) => {
                tracing::error!(error = ?cause, "request failed unexpectedly");
                Self::IncorrectFormat
            }
        }
    }
}

/// A single-key JSON object, e.g. `{"author": "Not Found"}`.
pub(super) fn message(
    key: &'static str,
    text: &'static str,
) -> Json<BTreeMap<&'static str, &'static str>> {
    Json(BTreeMap::from([(key, text)]))
}

/// Any JSON document. A body that cannot be read as JSON is an incorrect format.
#[derive(Debug)]
pub struct JsonPayload(pub Value);

impl<S: Send + Sync> FromRequest<S> for JsonPayload {
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<Value>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => {
                tracing::debug!(%rejection, "rejected request body");
                Err(ApiError::IncorrectFormat)
            }
        }
    }
}
