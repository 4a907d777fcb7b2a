//! Voice: outbound phone calls.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use meridian_core::{
    ApiEnum, InvalidDataError, Nullable, RawStore, RawStoreBuilder, Validate, validate_field,
};

use crate::endpoint::{Endpoint, HttpMethod, Params};

meridian_core::wire_enum! {
    /// Progress of a call.
    pub enum CallStatus {
        Queued => "queued",
        Ringing => "ringing",
        InProgress => "in-progress",
        Completed => "completed",
        Failed => "failed",
        Busy => "busy",
        NoAnswer => "no-answer",
    }
}

meridian_core::raw_record! {
    /// A phone call placed through the API.
    pub struct Call;
}

impl Call {
    /// Call id, prefixed `call_`.
    pub fn id(&self) -> Result<String, InvalidDataError> {
        self.raw.get_required("id")
    }

    /// Caller number in E.164 form.
    pub fn from(&self) -> Result<String, InvalidDataError> {
        self.raw.get_required("from")
    }

    /// Callee number in E.164 form.
    pub fn to(&self) -> Result<String, InvalidDataError> {
        self.raw.get_required("to")
    }

    /// Where the call is now.
    pub fn status(&self) -> Result<ApiEnum<CallStatus>, InvalidDataError> {
        self.raw.get_required("status")
    }

    /// Billable duration, once the call has ended.
    pub fn duration_seconds(&self) -> Result<Option<i64>, InvalidDataError> {
        self.raw.get_optional("duration_seconds")
    }

    /// Null when the call was not recorded.
    pub fn recording_url(&self) -> Result<Nullable<String>, InvalidDataError> {
        self.raw.get_optional_nullable("recording_url")
    }

    /// When the callee picked up.
    pub fn started_at(&self) -> Result<Option<DateTime<Utc>>, InvalidDataError> {
        self.raw.get_optional("started_at")
    }

    /// Null while the call is still live.
    pub fn ended_at(&self) -> Result<Nullable<DateTime<Utc>>, InvalidDataError> {
        self.raw.get_optional_nullable("ended_at")
    }

    /// When the call was queued.
    pub fn created_at(&self) -> Result<DateTime<Utc>, InvalidDataError> {
        self.raw.get_required("created_at")
    }
}

impl Validate for Call {
    fn validate(&self) -> Result<(), InvalidDataError> {
        validate_field("id", &self.id()?)?;
        validate_field("from", &self.from()?)?;
        validate_field("to", &self.to()?)?;
        validate_field("status", &self.status()?)?;
        validate_field("duration_seconds", &self.duration_seconds()?)?;
        validate_field("recording_url", &self.recording_url()?)?;
        validate_field("started_at", &self.started_at()?)?;
        validate_field("ended_at", &self.ended_at()?)?;
        validate_field("created_at", &self.created_at()?)?;
        Ok(())
    }
}

/// `POST /voice/v1/calls`
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct CallCreateParams {
    header: RawStore,
    query: RawStore,
    body: RawStore,
}

impl CallCreateParams {
    /// Start building a call.
    pub fn builder() -> CallCreateParamsBuilder {
        CallCreateParamsBuilder::default()
    }

    /// Rebuild params from their body store.
    pub fn from_raw(body: RawStore) -> Self {
        Self {
            header: RawStore::new(),
            query: RawStore::new(),
            body,
        }
    }

    /// Reopen these params for editing.
    pub fn to_builder(&self) -> CallCreateParamsBuilder {
        CallCreateParamsBuilder {
            body: self.body.to_builder(),
        }
    }

    /// Caller number.
    pub fn from(&self) -> Result<String, InvalidDataError> {
        self.body.get_required("from")
    }

    /// Callee number.
    pub fn to(&self) -> Result<String, InvalidDataError> {
        self.body.get_required("to")
    }

    /// URL notified on status changes.
    pub fn webhook_url(&self) -> Result<Option<String>, InvalidDataError> {
        self.body.get_optional("webhook_url")
    }

    /// Whether the call is recorded.
    pub fn record(&self) -> Result<Option<bool>, InvalidDataError> {
        self.body.get_optional("record")
    }

    /// Caller-defined key/value pairs.
    pub fn metadata(&self) -> Result<Option<BTreeMap<String, String>>, InvalidDataError> {
        self.body.get_optional("metadata")
    }
}

impl Params for CallCreateParams {
    const ENDPOINT: Endpoint = Endpoint::new(HttpMethod::Post, "/voice/v1/calls");
    type Response = Call;

    fn raw_header_data(&self) -> &RawStore {
        &self.header
    }

    fn raw_query_data(&self) -> &RawStore {
        &self.query
    }

    fn raw_body_data(&self) -> &RawStore {
        &self.body
    }
}

/// Builder for [`CallCreateParams`].
#[derive(Debug, Default)]
pub struct CallCreateParamsBuilder {
    body: RawStoreBuilder,
}

impl CallCreateParamsBuilder {
    /// Caller number in E.164 form. Required.
    pub fn from(&mut self, number: impl Into<String>) -> &mut Self {
        self.body.set("from", &number.into());
        self
    }

    /// Callee number in E.164 form. Required.
    pub fn to(&mut self, number: impl Into<String>) -> &mut Self {
        self.body.set("to", &number.into());
        self
    }

    /// Receives status callbacks for the call.
    pub fn webhook_url(&mut self, url: impl Into<String>) -> &mut Self {
        self.body.set_optional("webhook_url", Some(url.into()));
        self
    }

    /// Like [`webhook_url`](Self::webhook_url); `None` leaves the field unset.
    pub fn set_webhook_url(&mut self, url: Option<String>) -> &mut Self {
        self.body.set_optional("webhook_url", url);
        self
    }

    /// Record the call.
    pub fn record(&mut self, record: impl Into<Option<bool>>) -> &mut Self {
        self.body.set_optional("record", record.into());
        self
    }

    /// Caller-defined key/value pairs.
    pub fn metadata(&mut self, metadata: impl Into<Option<BTreeMap<String, String>>>) -> &mut Self {
        self.body.set_optional("metadata", metadata.into());
        self
    }

    /// Fails when `from` or `to` is missing.
    pub fn build(self) -> Result<CallCreateParams, InvalidDataError> {
        let body = self.body.freeze()?;
        body.require(&["from", "to"])?;
        Ok(CallCreateParams::from_raw(body))
    }
}

/// `GET /voice/v1/calls/{call_id}`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CallRetrieveParams {
    call_id: String,
    header: RawStore,
    query: RawStore,
    body: RawStore,
}

impl CallRetrieveParams {
    /// Params for the call with id `call_id`.
    pub fn new(call_id: impl Into<String>) -> Self {
        Self {
            call_id: call_id.into(),
            header: RawStore::new(),
            query: RawStore::new(),
            body: RawStore::new(),
        }
    }

    /// Id substituted into the path.
    pub fn call_id(&self) -> &str {
        &self.call_id
    }
}

impl Params for CallRetrieveParams {
    const ENDPOINT: Endpoint = Endpoint::new(HttpMethod::Get, "/voice/v1/calls/{call_id}");
    type Response = Call;

    fn raw_header_data(&self) -> &RawStore {
        &self.header
    }

    fn raw_query_data(&self) -> &RawStore {
        &self.query
    }

    fn raw_body_data(&self) -> &RawStore {
        &self.body
    }

    fn path_params(&self) -> Vec<(&'static str, &str)> {
        vec![("call_id", self.call_id.as_str())]
    }
}
