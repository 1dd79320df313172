use crate::db::StoreError;
use axum::{
    Form, Json,
    body::{Body, Bytes},
    extract::{FromRequest, FromRequestParts, Query, Request, rejection::JsonRejection},
    http::{HeaderMap, StatusCode, header::CONTENT_TYPE, request::Parts},
    response::{IntoResponse, Response},
};
use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;
use tracing::error;

pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong!";

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("Not found")]
    NotFound,

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::Validation(message) => (StatusCode::BAD_REQUEST, message),
            Self::NotFound => (StatusCode::NOT_FOUND, Self::NotFound.to_string()),
            Self::Store(error) => {
                error!("Store operation failed: {error:?}");
                (StatusCode::INTERNAL_SERVER_ERROR, GENERIC_ERROR_MESSAGE.into())
            },
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}

/// Request body accepted as JSON or as an urlencoded form. An empty body reads as `T::default()`, so
/// missing fields are reported by the handler's own validation. Other rejections become
/// [`AppError::Validation`].
pub struct ValidatedBody<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Default,
{
    type Rejection = AppError;

    async fn from_request(request: Request, state: &S) -> Result<Self, Self::Rejection> {
        let method = request.method().clone();
        let headers = request.headers().clone();

        let bytes = Bytes::from_request(request, state).await.map_err(|rejection| AppError::Validation(rejection.body_text()))?;

        if bytes.trim_ascii().is_empty() {
            return Ok(Self(T::default()));
        }

        match body_kind(&headers) {
            BodyKind::Json => match Json::<T>::from_bytes(&bytes) {
                Ok(Json(value)) => Ok(Self(value)),
                Err(rejection) => Err(AppError::Validation(describe_rejection(&rejection))),
            },
            BodyKind::Form => {
                let mut form_request = Request::new(Body::from(bytes));
                *form_request.method_mut() = method;
                *form_request.headers_mut() = headers;

                match Form::<T>::from_request(form_request, state).await {
                    Ok(Form(value)) => Ok(Self(value)),
                    Err(rejection) => Err(AppError::Validation(format!("Invalid form payload: {}", rejection.body_text()))),
                }
            },
            BodyKind::Other => Err(AppError::Validation(UNSUPPORTED_BODY_MESSAGE.into())),
        }
    }
}

const UNSUPPORTED_BODY_MESSAGE: &str = "Expected Content-Type: application/json or application/x-www-form-urlencoded";

#[derive(Debug, PartialEq)]
enum BodyKind {
    Json,
    Form,
    Other,
}

fn body_kind(headers: &HeaderMap) -> BodyKind {
    let Some(content_type) = headers.get(CONTENT_TYPE).and_then(|value| value.to_str().ok()) else {
        return BodyKind::Other;
    };

    let essence = content_type.split(';').next().unwrap_or_default().trim().to_ascii_lowercase();

    match essence.as_str() {
        "application/json" => BodyKind::Json,
        "application/x-www-form-urlencoded" => BodyKind::Form,
        essence if essence.starts_with("application/") && essence.ends_with("+json") => BodyKind::Json,
        _ => BodyKind::Other,
    }
}

fn describe_rejection(rejection: &JsonRejection) -> String {
    match rejection {
        JsonRejection::JsonDataError(error) => format!("Invalid JSON payload: {}", error.body_text()),
        JsonRejection::JsonSyntaxError(error) => format!("Malformed JSON: {}", error.body_text()),
        other => format!("Invalid request body: {}", other.body_text()),
    }
}

/// `Query<T>` that reports unparseable query strings as [`AppError::Validation`].
pub struct ValidatedQuery<T>(pub T);

impl<S, T> FromRequestParts<S> for ValidatedQuery<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Query::<T>::from_request_parts(parts, state).await {
            Ok(Query(value)) => Ok(Self(value)),
            Err(rejection) => Err(AppError::Validation(rejection.body_text())),
        }
    }
}
