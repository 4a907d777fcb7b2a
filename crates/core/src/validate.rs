//! Eager validation of lazily decoded records.
//!
//! Reading a record never decodes more than the field being read. `validate`
//! touches every declared field instead, recursing into nested records, enums
//! and collections, and stops at the first failure.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::Value;

use crate::error::InvalidDataError;
use crate::nullable::Nullable;

/// Eagerly decode and check every field.
pub trait Validate {
    /// Decode every field, failing on the first one that is invalid.
    fn validate(&self) -> Result<(), InvalidDataError>;
}

/// Validate a nested value, attaching `field` to errors that do not name one.
pub fn validate_field<T: Validate + ?Sized>(field: &str, value: &T) -> Result<(), InvalidDataError> {
    value.validate().map_err(|err| err.or_field(field))
}

macro_rules! always_valid {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl Validate for $ty {
                fn validate(&self) -> Result<(), InvalidDataError> {
                    Ok(())
                }
            }
        )+
    };
}

always_valid!(
    String,
    bool,
    i32,
    i64,
    u32,
    u64,
    f64,
    Value,
    DateTime<Utc>,
    NaiveDate,
);

impl<T: Validate> Validate for Vec<T> {
    fn validate(&self) -> Result<(), InvalidDataError> {
        self.iter().try_for_each(Validate::validate)
    }
}

impl<T: Validate> Validate for Option<T> {
    fn validate(&self) -> Result<(), InvalidDataError> {
        self.as_ref().map_or(Ok(()), Validate::validate)
    }
}

impl<T: Validate> Validate for Nullable<T> {
    fn validate(&self) -> Result<(), InvalidDataError> {
        self.value().map_or(Ok(()), Validate::validate)
    }
}

impl<T: Validate> Validate for BTreeMap<String, T> {
    fn validate(&self) -> Result<(), InvalidDataError> {
        self.values().try_for_each(Validate::validate)
    }
}
