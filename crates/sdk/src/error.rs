//! Errors surfaced by the client.

use std::fmt;

use meridian_core::InvalidDataError;
use serde_json::Value;
use thiserror::Error;

use crate::options::ConfigError;
use crate::transport::{HttpResponse, TransportError};

/// Header the API echoes back to correlate a request with server logs.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Everything a client call can fail with.
#[derive(Debug, Error)]
pub enum Error {
    /// A parameter or response record holds data of the wrong shape.
    #[error(transparent)]
    InvalidData(#[from] InvalidDataError),

    /// The API answered with a non-2xx status.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The request never produced a response.
    #[error("transport failure: {source}")]
    Transport {
        /// Error returned by the [`Transport`](crate::Transport).
        #[source]
        source: TransportError,
    },

    /// Client options could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl Error {
    /// Whether the transport gave up waiting for the server.
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::Transport { source } => source
                .downcast_ref::<reqwest::Error>()
                .is_some_and(reqwest::Error::is_timeout),
            _ => false,
        }
    }

    /// The API error, if the server answered with one.
    pub fn as_api(&self) -> Option<&ApiError> {
        match self {
            Self::Api(err) => Some(err),
            _ => None,
        }
    }
}

/// Classification of a non-2xx status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiErrorKind {
    /// 400
    BadRequest,
    /// 401
    Unauthenticated,
    /// 403
    PermissionDenied,
    /// 404
    NotFound,
    /// 409
    Conflict,
    /// 422
    UnprocessableEntity,
    /// 429
    RateLimited,
    /// Any 5xx.
    InternalServer,
    /// Any other non-2xx status.
    Unexpected,
}

impl ApiErrorKind {
    /// Classify an HTTP status code.
    pub fn from_status(status: u16) -> Self {
        match status {
            400 => Self::BadRequest,
            401 => Self::Unauthenticated,
            403 => Self::PermissionDenied,
            404 => Self::NotFound,
            409 => Self::Conflict,
            422 => Self::UnprocessableEntity,
            429 => Self::RateLimited,
            500..=599 => Self::InternalServer,
            _ => Self::Unexpected,
        }
    }

    /// Short lowercase description.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::BadRequest => "bad request",
            Self::Unauthenticated => "unauthenticated",
            Self::PermissionDenied => "permission denied",
            Self::NotFound => "not found",
            Self::Conflict => "conflict",
            Self::UnprocessableEntity => "unprocessable entity",
            Self::RateLimited => "rate limited",
            Self::InternalServer => "internal server error",
            Self::Unexpected => "unexpected status",
        }
    }
}

impl fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A non-2xx response.
///
/// `body` is the parsed JSON error body, the raw text when the body is not
/// JSON, or `null` when it is empty.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} (HTTP {status}){}", message_suffix(.body))]
pub struct ApiError {
    /// HTTP status code.
    pub status: u16,
    /// Classification of `status`.
    pub kind: ApiErrorKind,
    /// Error body as received.
    pub body: Value,
    /// Value of the `x-request-id` response header.
    pub request_id: Option<String>,
}

impl ApiError {
    /// Build the error for a non-2xx response.
    pub fn from_response(response: &HttpResponse) -> Self {
        let body = if response.body.iter().all(u8::is_ascii_whitespace) {
            Value::Null
        } else {
            serde_json::from_slice(&response.body).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&response.body).into_owned())
            })
        };

        Self {
            status: response.status,
            kind: ApiErrorKind::from_status(response.status),
            body,
            request_id: response.header(REQUEST_ID_HEADER).map(str::to_string),
        }
    }

    /// Human-readable message from `error.message` or `message`.
    pub fn message(&self) -> Option<&str> {
        self.body
            .pointer("/error/message")
            .or_else(|| self.body.get("message"))
            .and_then(Value::as_str)
    }
}

fn message_suffix(body: &Value) -> String {
    body.pointer("/error/message")
        .or_else(|| body.get("message"))
        .and_then(Value::as_str)
        .map(|message| format!(": {message}"))
        .unwrap_or_default()
}
