//! Request parameter and response records, one module per API domain.

pub mod compute;
pub mod documents;
pub mod legal;
pub mod payments;
mod shared;
pub mod voice;

pub use shared::{Deleted, Page};
