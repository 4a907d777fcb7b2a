//! The top-level client.

use std::sync::Arc;

use meridian_core::{RawStore, Record, Validate};
use tracing::{debug, warn};
use url::Url;

use crate::endpoint::{BodyPayload, Params, header_pairs};
use crate::error::{ApiError, Error};
use crate::options::{ClientOptions, ConfigError};
use crate::services::{
    ComputeService, DocumentsService, LegalService, PaymentsService, VoiceService,
};
use crate::transport::{HttpRequest, ReqwestTransport, Transport};

const USER_AGENT: &str = concat!("meridian-rust/", env!("CARGO_PKG_VERSION"));

/// Client for the Meridian API. Cloning is cheap and clones share the
/// transport.
#[derive(Debug, Clone)]
pub struct MeridianClient {
    inner: Arc<ClientInner>,
}

#[derive(Debug)]
struct ClientInner {
    options: ClientOptions,
    base_url: Url,
    transport: Arc<dyn Transport>,
}

impl MeridianClient {
    /// A client that talks HTTP through `reqwest`.
    pub fn new(options: ClientOptions) -> Result<Self, Error> {
        let transport = ReqwestTransport::new(options.timeout())
            .map_err(|source| ConfigError::HttpClient { source })?;
        Self::with_transport(options, Arc::new(transport))
    }

    /// A client that sends every request through `transport`.
    pub fn with_transport(
        options: ClientOptions,
        transport: Arc<dyn Transport>,
    ) -> Result<Self, Error> {
        let base_url = options.parsed_base_url()?;
        Ok(Self {
            inner: Arc::new(ClientInner {
                options,
                base_url,
                transport,
            }),
        })
    }

    /// A client configured from `MERIDIAN_*` environment variables.
    pub fn from_env() -> Result<Self, Error> {
        Self::new(ClientOptions::from_env()?)
    }

    /// Options the client was built with.
    pub fn options(&self) -> &ClientOptions {
        &self.inner.options
    }

    /// A client sharing this one's transport with response validation
    /// switched on or off.
    pub fn with_response_validation(&self, enabled: bool) -> Self {
        Self {
            inner: Arc::new(ClientInner {
                options: self.inner.options.clone().with_response_validation(enabled),
                base_url: self.inner.base_url.clone(),
                transport: Arc::clone(&self.inner.transport),
            }),
        }
    }

    /// Render `params` into the request [`execute`](Self::execute) would send.
    pub fn build_request<P: Params>(&self, params: &P) -> Result<HttpRequest, Error> {
        let url = params.to_url(&self.inner.base_url)?;
        let payload = params.to_body_payload();

        let mut headers = vec![
            ("Accept".to_string(), "application/json".to_string()),
            ("User-Agent".to_string(), USER_AGENT.to_string()),
        ];
        headers.extend(self.inner.options.default_headers().iter().cloned());
        if let Some(payload) = &payload {
            headers.push(("Content-Type".to_string(), payload.content_type()));
        }
        headers.extend(header_pairs(params.raw_header_data()));

        Ok(HttpRequest {
            method: P::ENDPOINT.method,
            url,
            headers,
            body: payload.map(BodyPayload::into_bytes),
        })
    }

    /// Send `params` and decode the response record.
    pub(crate) async fn execute<P: Params>(&self, params: &P) -> Result<P::Response, Error> {
        let request = self.build_request(params)?;
        let method = request.method;
        let url = request.url.clone();
        debug!(%method, %url, "Sending request.");

        let response = self
            .inner
            .transport
            .send(request)
            .await
            .map_err(|source| Error::Transport { source })?;

        if !response.is_success() {
            let err = ApiError::from_response(&response);
            warn!(
                status = err.status,
                kind = %err.kind,
                request_id = err.request_id.as_deref(),
                %method,
                %url,
                "API returned an error."
            );
            return Err(err.into());
        }
        debug!(status = response.status, %method, %url, "Received response.");

        let raw = if response.body.iter().all(u8::is_ascii_whitespace) {
            RawStore::new()
        } else {
            RawStore::from_slice(&response.body)?
        };
        let record = P::Response::from_raw(raw);
        if self.inner.options.response_validation() {
            record.validate()?;
        }
        Ok(record)
    }

    /// Charges and refunds.
    pub fn payments(&self) -> PaymentsService<'_> {
        PaymentsService::new(self)
    }

    /// Document storage.
    pub fn documents(&self) -> DocumentsService<'_> {
        DocumentsService::new(self)
    }

    /// Outbound calls.
    pub fn voice(&self) -> VoiceService<'_> {
        VoiceService::new(self)
    }

    /// Case law search.
    pub fn legal(&self) -> LegalService<'_> {
        LegalService::new(self)
    }

    /// Batch jobs.
    pub fn compute(&self) -> ComputeService<'_> {
        ComputeService::new(self)
    }
}
