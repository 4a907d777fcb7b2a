//! Raw-backed records for the Meridian API client.
//!
//! Every request parameter object and every response object is a view over a
//! [`RawStore`]: an ordered map from wire names to loosely-typed JSON values.
//! Typed accessors decode on read and apply one of three field policies:
//!
//! - required: [`RawStore::get_required`], absent or null is invalid data
//! - optional-non-nullable: [`RawStore::get_optional`], null reads as absent
//!   and a `None` write is a no-op
//! - optional-nullable: [`RawStore::get_optional_nullable`], absent, null and
//!   value stay distinct through a round trip
//!
//! Unknown keys are preserved, unknown enum values are preserved through
//! [`ApiEnum`], and [`Validate`] forces a full decode when callers want one.

#![forbid(unsafe_code)]

mod api_enum;
mod error;
mod nullable;
mod raw;
mod record;
mod validate;

pub use api_enum::{ApiEnum, WireEnum};
pub use error::InvalidDataError;
pub use nullable::Nullable;
pub use raw::{RawStore, RawStoreBuilder};
pub use record::Record;
pub use validate::{Validate, validate_field};

#[doc(hidden)]
pub mod __private {
    pub use serde;
}
