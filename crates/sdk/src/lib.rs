//! Client for the Meridian API: payments, documents, voice, legal research
//! and compute.
//!
//! ```no_run
//! use meridian_sdk::models::payments::ChargeCreateParams;
//! use meridian_sdk::{ClientOptions, MeridianClient};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let client = MeridianClient::new(ClientOptions::from_env()?)?;
//!
//! let mut params = ChargeCreateParams::builder();
//! params
//!     .amount(2500)
//!     .destination_account_id("acct_123")
//!     .party_id("party_456");
//! let charge = client.payments().charges().create(&params.build()?).await?;
//! println!("{} is {}", charge.id()?, charge.status()?);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

mod client;
mod dotenv;
pub mod endpoint;
mod error;
mod logging;
pub mod models;
mod multipart;
mod options;
mod query;
pub mod services;
pub mod transport;

pub use client::MeridianClient;
pub use dotenv::{DotenvError, DotenvFile};
pub use endpoint::{BodyPayload, Endpoint, FilePart, HttpMethod, Params};
pub use error::{ApiError, ApiErrorKind, Error, REQUEST_ID_HEADER};
pub use logging::{LOG_ENV, init_tracing};
pub use meridian_core::{
    ApiEnum, InvalidDataError, Nullable, RawStore, RawStoreBuilder, Record, Validate, WireEnum,
};
pub use multipart::MultipartForm;
pub use options::{
    ClientOptions, ConfigError, DEFAULT_BASE_URL, DEFAULT_TIMEOUT, ENV_BASE_URL,
    ENV_RESPONSE_VALIDATION, ENV_TIMEOUT_SECS,
};
pub use transport::{HttpRequest, HttpResponse, ReqwestTransport, Transport, TransportError};
