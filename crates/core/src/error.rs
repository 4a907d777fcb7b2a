//! The "invalid data" error taxonomy shared by every record.
//!
//! Decode and encode failures are always data-shape violations (a programmer
//! or input error), never transient, so there is exactly one error type and
//! it always names the field involved when one is known.

use serde_json::Value;
use thiserror::Error;

/// A record field could not be read, written or validated.
#[derive(Debug, Error)]
pub enum InvalidDataError {
    /// A required field was not present in the raw store.
    #[error("`{field}` is required but was absent")]
    Missing {
        /// Wire name of the field.
        field: String,
    },

    /// A required field was present but explicitly null.
    #[error("`{field}` is required but was null")]
    Null {
        /// Wire name of the field.
        field: String,
    },

    /// The stored JSON value does not fit the declared type.
    #[error("`{field}` could not be decoded: {source}")]
    Decode {
        /// Wire name of the field.
        field: String,
        /// What `serde_json` rejected.
        #[source]
        source: serde_json::Error,
    },

    /// A value handed to a builder could not be turned into JSON.
    #[error("`{field}` could not be encoded: {source}")]
    Encode {
        /// Wire name of the field.
        field: String,
        /// What `serde_json` rejected.
        #[source]
        source: serde_json::Error,
    },

    /// An enum holds a wire value outside its closed set of variants.
    #[error("{}unknown {enum_name} value {value}", field_prefix(.field))]
    UnknownVariant {
        /// Field holding the value, once a record walk has attached it.
        field: Option<String>,
        /// Rust name of the enum.
        enum_name: &'static str,
        /// The wire value as received.
        value: Value,
    },

    /// The value is well-formed JSON but violates a field constraint.
    #[error("`{field}` is invalid: {message}")]
    Invalid {
        /// Wire name of the field.
        field: String,
        /// The constraint that failed.
        message: String,
    },

    /// A record was decoded from JSON that is not an object.
    #[error("expected a JSON object but found {found}")]
    NotAnObject {
        /// Kind of JSON value found instead.
        found: &'static str,
    },

    /// The payload is not JSON at all.
    #[error("payload is not valid JSON: {source}")]
    Malformed {
        /// The parser error.
        #[source]
        source: serde_json::Error,
    },
}

fn field_prefix(field: &Option<String>) -> String {
    field
        .as_deref()
        .map(|name| format!("`{name}` holds an "))
        .unwrap_or_default()
}

impl InvalidDataError {
    /// A required field is absent.
    pub fn missing(field: impl Into<String>) -> Self {
        Self::Missing {
            field: field.into(),
        }
    }

    /// A required field is explicitly null.
    pub fn null(field: impl Into<String>) -> Self {
        Self::Null {
            field: field.into(),
        }
    }

    /// `field` breaks a constraint described by `message`.
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Invalid {
            field: field.into(),
            message: message.into(),
        }
    }

    /// The value under `field` does not decode into the declared type.
    pub fn decode(field: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Decode {
            field: field.into(),
            source,
        }
    }

    /// The value for `field` could not be serialized.
    pub fn encode(field: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Encode {
            field: field.into(),
            source,
        }
    }

    pub(crate) fn not_an_object(value: &Value) -> Self {
        Self::NotAnObject {
            found: json_kind(value),
        }
    }

    /// The field this error is about, when known.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::Missing { field }
            | Self::Null { field }
            | Self::Decode { field, .. }
            | Self::Encode { field, .. }
            | Self::Invalid { field, .. } => Some(field),
            Self::UnknownVariant { field, .. } => field.as_deref(),
            Self::NotAnObject { .. } | Self::Malformed { .. } => None,
        }
    }

    /// Attach `name` to an error that does not name a field yet.
    ///
    /// Errors that already carry a field keep it, so the innermost field of a
    /// nested record is what gets reported.
    pub fn or_field(self, name: &str) -> Self {
        match self {
            Self::UnknownVariant {
                field: None,
                enum_name,
                value,
            } => Self::UnknownVariant {
                field: Some(name.to_string()),
                enum_name,
                value,
            },
            other => other,
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
