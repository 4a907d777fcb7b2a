//! Payments: charges and refunds.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use meridian_core::{
    ApiEnum, InvalidDataError, Nullable, RawStore, RawStoreBuilder, Validate, validate_field,
};

use crate::endpoint::{Endpoint, HttpMethod, Params};
use crate::models::Page;

const IDEMPOTENCY_KEY: &str = "Idempotency-Key";

meridian_core::wire_enum! {
    /// Lifecycle of a charge.
    pub enum ChargeStatus {
        Pending => "pending",
        Succeeded => "succeeded",
        Failed => "failed",
        Refunded => "refunded",
        PartiallyRefunded => "partially_refunded",
    }
}

meridian_core::raw_record! {
    /// Why a charge failed.
    pub struct ChargeFailure;
}

impl ChargeFailure {
    /// Machine-readable failure code, e.g. `card_declined`.
    pub fn code(&self) -> Result<String, InvalidDataError> {
        self.raw.get_required("code")
    }

    /// Human-readable explanation.
    pub fn message(&self) -> Result<Option<String>, InvalidDataError> {
        self.raw.get_optional("message")
    }

    /// Issuer decline code, null when the issuer gave none.
    pub fn decline_code(&self) -> Result<Nullable<String>, InvalidDataError> {
        self.raw.get_optional_nullable("decline_code")
    }
}

impl Validate for ChargeFailure {
    fn validate(&self) -> Result<(), InvalidDataError> {
        validate_field("code", &self.code()?)?;
        validate_field("message", &self.message()?)?;
        validate_field("decline_code", &self.decline_code()?)?;
        Ok(())
    }
}

meridian_core::raw_record! {
    /// A charge against a party, paid out to a destination account.
    pub struct Charge;
}

impl Charge {
    /// Charge id, prefixed `ch_`.
    pub fn id(&self) -> Result<String, InvalidDataError> {
        self.raw.get_required("id")
    }

    /// Amount in the currency's minor unit.
    pub fn amount(&self) -> Result<i64, InvalidDataError> {
        self.raw.get_required("amount")
    }

    /// ISO 4217 code, lowercase.
    pub fn currency(&self) -> Result<String, InvalidDataError> {
        self.raw.get_required("currency")
    }

    /// Where the charge is in its lifecycle.
    pub fn status(&self) -> Result<ApiEnum<ChargeStatus>, InvalidDataError> {
        self.raw.get_required("status")
    }

    /// Account the funds settle into.
    pub fn destination_account_id(&self) -> Result<String, InvalidDataError> {
        self.raw.get_required("destination_account_id")
    }

    /// Party being charged.
    pub fn party_id(&self) -> Result<String, InvalidDataError> {
        self.raw.get_required("party_id")
    }

    /// Caller-supplied reference.
    pub fn r#ref(&self) -> Result<Option<String>, InvalidDataError> {
        self.raw.get_optional("ref")
    }

    /// Free-text description; explicitly null when cleared.
    pub fn description(&self) -> Result<Nullable<String>, InvalidDataError> {
        self.raw.get_optional_nullable("description")
    }

    /// Caller-defined key/value pairs.
    pub fn metadata(&self) -> Result<Option<BTreeMap<String, String>>, InvalidDataError> {
        self.raw.get_optional("metadata")
    }

    /// Total refunded so far, in minor units.
    pub fn amount_refunded(&self) -> Result<Option<i64>, InvalidDataError> {
        self.raw.get_optional("amount_refunded")
    }

    /// Set once the charge has failed; explicitly null otherwise.
    pub fn failure(&self) -> Result<Nullable<ChargeFailure>, InvalidDataError> {
        self.raw.get_optional_nullable("failure")
    }

    /// When the charge was created.
    pub fn created_at(&self) -> Result<DateTime<Utc>, InvalidDataError> {
        self.raw.get_required("created_at")
    }
}

impl Validate for Charge {
    fn validate(&self) -> Result<(), InvalidDataError> {
        validate_field("id", &self.id()?)?;
        validate_field("amount", &self.amount()?)?;
        validate_field("currency", &self.currency()?)?;
        validate_field("status", &self.status()?)?;
        validate_field("destination_account_id", &self.destination_account_id()?)?;
        validate_field("party_id", &self.party_id()?)?;
        validate_field("ref", &self.r#ref()?)?;
        validate_field("description", &self.description()?)?;
        validate_field("metadata", &self.metadata()?)?;
        validate_field("amount_refunded", &self.amount_refunded()?)?;
        validate_field("failure", &self.failure()?)?;
        validate_field("created_at", &self.created_at()?)?;
        Ok(())
    }
}

/// `POST /payments/v1/charges`
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ChargeCreateParams {
    header: RawStore,
    query: RawStore,
    body: RawStore,
}

impl ChargeCreateParams {
    /// Start building a charge.
    pub fn builder() -> ChargeCreateParamsBuilder {
        ChargeCreateParamsBuilder::default()
    }

    /// Rebuild params from their header and body stores.
    pub fn from_raw(header: RawStore, body: RawStore) -> Self {
        Self {
            header,
            query: RawStore::new(),
            body,
        }
    }

    /// Reopen these params for editing.
    pub fn to_builder(&self) -> ChargeCreateParamsBuilder {
        ChargeCreateParamsBuilder {
            header: self.header.to_builder(),
            body: self.body.to_builder(),
        }
    }

    /// Amount in minor units.
    pub fn amount(&self) -> Result<i64, InvalidDataError> {
        self.body.get_required("amount")
    }

    /// Account the funds settle into.
    pub fn destination_account_id(&self) -> Result<String, InvalidDataError> {
        self.body.get_required("destination_account_id")
    }

    /// Party being charged.
    pub fn party_id(&self) -> Result<String, InvalidDataError> {
        self.body.get_required("party_id")
    }

    /// ISO 4217 code, when set.
    pub fn currency(&self) -> Result<Option<String>, InvalidDataError> {
        self.body.get_optional("currency")
    }

    /// Caller-supplied reference.
    pub fn r#ref(&self) -> Result<Option<String>, InvalidDataError> {
        self.body.get_optional("ref")
    }

    /// Description, which may be sent as explicit null.
    pub fn description(&self) -> Result<Nullable<String>, InvalidDataError> {
        self.body.get_optional_nullable("description")
    }

    /// Caller-defined key/value pairs.
    pub fn metadata(&self) -> Result<Option<BTreeMap<String, String>>, InvalidDataError> {
        self.body.get_optional("metadata")
    }

    /// Value of the `Idempotency-Key` header.
    pub fn idempotency_key(&self) -> Result<Option<String>, InvalidDataError> {
        self.header.get_optional(IDEMPOTENCY_KEY)
    }
}

impl Params for ChargeCreateParams {
    const ENDPOINT: Endpoint = Endpoint::new(HttpMethod::Post, "/payments/v1/charges");
    type Response = Charge;

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

/// Builder for [`ChargeCreateParams`].
#[derive(Debug, Default)]
pub struct ChargeCreateParamsBuilder {
    header: RawStoreBuilder,
    body: RawStoreBuilder,
}

impl ChargeCreateParamsBuilder {
    /// Amount in the currency's minor unit. Required.
    pub fn amount(&mut self, amount: i64) -> &mut Self {
        self.body.set("amount", &amount);
        self
    }

    /// Account the funds settle into. Required.
    pub fn destination_account_id(&mut self, id: impl Into<String>) -> &mut Self {
        self.body.set("destination_account_id", &id.into());
        self
    }

    /// Party being charged. Required.
    pub fn party_id(&mut self, id: impl Into<String>) -> &mut Self {
        self.body.set("party_id", &id.into());
        self
    }

    /// ISO 4217 code; the account's default currency when omitted.
    pub fn currency(&mut self, currency: impl Into<String>) -> &mut Self {
        self.body.set_optional("currency", Some(currency.into()));
        self
    }

    /// Like [`currency`](Self::currency); `None` leaves the field unset.
    pub fn set_currency(&mut self, currency: Option<String>) -> &mut Self {
        self.body.set_optional("currency", currency);
        self
    }

    /// Caller-supplied reference, echoed back on the charge.
    pub fn r#ref(&mut self, reference: impl Into<String>) -> &mut Self {
        self.body.set_optional("ref", Some(reference.into()));
        self
    }

    /// Like [`ref`](Self::r#ref); `None` leaves the field unset.
    pub fn set_ref(&mut self, reference: Option<String>) -> &mut Self {
        self.body.set_optional("ref", reference);
        self
    }

    /// Free-text description.
    pub fn description(&mut self, description: impl Into<String>) -> &mut Self {
        self.body.set_nullable("description", Some(description.into()));
        self
    }

    /// Like [`description`](Self::description); `None` sends an explicit null.
    pub fn set_description(&mut self, description: Option<String>) -> &mut Self {
        self.body.set_nullable("description", description);
        self
    }

    /// Caller-defined key/value pairs.
    pub fn metadata(&mut self, metadata: impl Into<Option<BTreeMap<String, String>>>) -> &mut Self {
        self.body.set_optional("metadata", metadata.into());
        self
    }

    /// Retries with the same key return the first charge instead of creating another.
    pub fn idempotency_key(&mut self, key: impl Into<String>) -> &mut Self {
        self.header.set_optional(IDEMPOTENCY_KEY, Some(key.into()));
        self
    }

    /// Like [`idempotency_key`](Self::idempotency_key); `None` leaves the field unset.
    pub fn set_idempotency_key(&mut self, key: Option<String>) -> &mut Self {
        self.header.set_optional(IDEMPOTENCY_KEY, key);
        self
    }

    /// Fails when `amount`, `destination_account_id` or `party_id` is missing.
    pub fn build(self) -> Result<ChargeCreateParams, InvalidDataError> {
        let params = ChargeCreateParams::from_raw(self.header.freeze()?, self.body.freeze()?);
        params
            .body
            .require(&["amount", "destination_account_id", "party_id"])?;
        Ok(params)
    }
}

/// `GET /payments/v1/charges/{charge_id}`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChargeRetrieveParams {
    charge_id: String,
    header: RawStore,
    query: RawStore,
    body: RawStore,
}

impl ChargeRetrieveParams {
    /// Params for the charge with id `charge_id`.
    pub fn new(charge_id: impl Into<String>) -> Self {
        Self {
            charge_id: charge_id.into(),
            header: RawStore::new(),
            query: RawStore::new(),
            body: RawStore::new(),
        }
    }

    /// Id substituted into the path.
    pub fn charge_id(&self) -> &str {
        &self.charge_id
    }
}

impl Params for ChargeRetrieveParams {
    const ENDPOINT: Endpoint = Endpoint::new(HttpMethod::Get, "/payments/v1/charges/{charge_id}");
    type Response = Charge;

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
        vec![("charge_id", self.charge_id.as_str())]
    }
}

/// `GET /payments/v1/charges`
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ChargeListParams {
    header: RawStore,
    query: RawStore,
    body: RawStore,
}

impl ChargeListParams {
    /// Start building a list query; every filter is optional.
    pub fn builder() -> ChargeListParamsBuilder {
        ChargeListParamsBuilder::default()
    }

    /// Rebuild params from their query store.
    pub fn from_raw(query: RawStore) -> Self {
        Self {
            header: RawStore::new(),
            query,
            body: RawStore::new(),
        }
    }

    /// Reopen these params for editing.
    pub fn to_builder(&self) -> ChargeListParamsBuilder {
        ChargeListParamsBuilder {
            query: self.query.to_builder(),
        }
    }

    /// Only charges against this party.
    pub fn party_id(&self) -> Result<Option<String>, InvalidDataError> {
        self.query.get_optional("party_id")
    }

    /// Only charges in this status.
    pub fn status(&self) -> Result<Option<ApiEnum<ChargeStatus>>, InvalidDataError> {
        self.query.get_optional("status")
    }

    /// Only charges created after this instant.
    pub fn created_after(&self) -> Result<Option<DateTime<Utc>>, InvalidDataError> {
        self.query.get_optional("created_after")
    }

    /// Page size.
    pub fn limit(&self) -> Result<Option<i64>, InvalidDataError> {
        self.query.get_optional("limit")
    }

    /// Cursor from a previous page.
    pub fn cursor(&self) -> Result<Option<String>, InvalidDataError> {
        self.query.get_optional("cursor")
    }
}

impl Params for ChargeListParams {
    const ENDPOINT: Endpoint = Endpoint::new(HttpMethod::Get, "/payments/v1/charges");
    type Response = Page<Charge>;

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

/// Builder for [`ChargeListParams`].
#[derive(Debug, Default)]
pub struct ChargeListParamsBuilder {
    query: RawStoreBuilder,
}

impl ChargeListParamsBuilder {
    /// Only charges against this party.
    pub fn party_id(&mut self, id: impl Into<String>) -> &mut Self {
        self.query.set_optional("party_id", Some(id.into()));
        self
    }

    /// Like [`party_id`](Self::party_id); `None` leaves the field unset.
    pub fn set_party_id(&mut self, id: Option<String>) -> &mut Self {
        self.query.set_optional("party_id", id);
        self
    }

    /// Only charges in this status.
    pub fn status(&mut self, status: impl Into<Option<ChargeStatus>>) -> &mut Self {
        self.query
            .set_optional("status", status.into().map(ApiEnum::Known));
        self
    }

    /// Only charges created after this instant.
    pub fn created_after(&mut self, at: impl Into<Option<DateTime<Utc>>>) -> &mut Self {
        self.query.set_optional("created_after", at.into());
        self
    }

    /// Page size, 1 to 100.
    pub fn limit(&mut self, limit: impl Into<Option<i64>>) -> &mut Self {
        self.query.set_optional("limit", limit.into());
        self
    }

    /// `next_cursor` of the previous page.
    pub fn cursor(&mut self, cursor: impl Into<String>) -> &mut Self {
        self.query.set_optional("cursor", Some(cursor.into()));
        self
    }

    /// Like [`cursor`](Self::cursor); `None` leaves the field unset.
    pub fn set_cursor(&mut self, cursor: Option<String>) -> &mut Self {
        self.query.set_optional("cursor", cursor);
        self
    }

    /// Fails when `limit` is out of range.
    pub fn build(self) -> Result<ChargeListParams, InvalidDataError> {
        let params = ChargeListParams::from_raw(self.query.freeze()?);
        if let Some(limit) = params.limit()? {
            if !(1..=100).contains(&limit) {
                return Err(InvalidDataError::invalid("limit", "must be between 1 and 100"));
            }
        }
        Ok(params)
    }
}

/// `POST /payments/v1/charges/{charge_id}/refund`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChargeRefundParams {
    charge_id: String,
    header: RawStore,
    query: RawStore,
    body: RawStore,
}

impl ChargeRefundParams {
    /// Start building a refund of `charge_id`.
    pub fn builder(charge_id: impl Into<String>) -> ChargeRefundParamsBuilder {
        ChargeRefundParamsBuilder {
            charge_id: charge_id.into(),
            header: RawStoreBuilder::new(),
            body: RawStoreBuilder::new(),
        }
    }

    /// Rebuild params from the charge id and their header and body stores.
    pub fn from_raw(charge_id: impl Into<String>, header: RawStore, body: RawStore) -> Self {
        Self {
            charge_id: charge_id.into(),
            header,
            query: RawStore::new(),
            body,
        }
    }

    /// Reopen these params for editing.
    pub fn to_builder(&self) -> ChargeRefundParamsBuilder {
        ChargeRefundParamsBuilder {
            charge_id: self.charge_id.clone(),
            header: self.header.to_builder(),
            body: self.body.to_builder(),
        }
    }

    /// Id of the charge being refunded.
    pub fn charge_id(&self) -> &str {
        &self.charge_id
    }

    /// Amount to refund; the full remaining amount when omitted.
    pub fn amount(&self) -> Result<Option<i64>, InvalidDataError> {
        self.body.get_optional("amount")
    }

    /// Why the charge is refunded.
    pub fn reason(&self) -> Result<Option<String>, InvalidDataError> {
        self.body.get_optional("reason")
    }

    /// Value of the `Idempotency-Key` header.
    pub fn idempotency_key(&self) -> Result<Option<String>, InvalidDataError> {
        self.header.get_optional(IDEMPOTENCY_KEY)
    }
}

impl Params for ChargeRefundParams {
    const ENDPOINT: Endpoint = Endpoint::new(
        HttpMethod::Post,
        "/payments/v1/charges/{charge_id}/refund",
    );
    type Response = Charge;

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
        vec![("charge_id", self.charge_id.as_str())]
    }
}

/// Builder for [`ChargeRefundParams`].
#[derive(Debug)]
pub struct ChargeRefundParamsBuilder {
    charge_id: String,
    header: RawStoreBuilder,
    body: RawStoreBuilder,
}

impl ChargeRefundParamsBuilder {
    /// Partial refund amount in minor units.
    pub fn amount(&mut self, amount: impl Into<Option<i64>>) -> &mut Self {
        self.body.set_optional("amount", amount.into());
        self
    }

    /// Why the charge is refunded.
    pub fn reason(&mut self, reason: impl Into<String>) -> &mut Self {
        self.body.set_optional("reason", Some(reason.into()));
        self
    }

    /// Like [`reason`](Self::reason); `None` leaves the field unset.
    pub fn set_reason(&mut self, reason: Option<String>) -> &mut Self {
        self.body.set_optional("reason", reason);
        self
    }

    /// Retries with the same key refund once.
    pub fn idempotency_key(&mut self, key: impl Into<String>) -> &mut Self {
        self.header.set_optional(IDEMPOTENCY_KEY, Some(key.into()));
        self
    }

    /// Like [`idempotency_key`](Self::idempotency_key); `None` leaves the field unset.
    pub fn set_idempotency_key(&mut self, key: Option<String>) -> &mut Self {
        self.header.set_optional(IDEMPOTENCY_KEY, key);
        self
    }

    /// Freeze the refund params.
    pub fn build(self) -> Result<ChargeRefundParams, InvalidDataError> {
        Ok(ChargeRefundParams::from_raw(
            self.charge_id,
            self.header.freeze()?,
            self.body.freeze()?,
        ))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use meridian_core::Record;
    use serde_json::json;

    fn charge_json() -> serde_json::Value {
        json!({
            "id": "ch_123",
            "amount": 2500,
            "currency": "usd",
            "status": "failed",
            "destination_account_id": "acct_9",
            "party_id": "party_7",
            "ref": "order-1",
            "description": null,
            "failure": {"code": "card_declined", "decline_code": null},
            "created_at": "2024-03-01T12:00:00Z"
        })
    }

    #[test]
    fn test_charge_accessors() {
        let charge = Charge::from_raw(RawStore::from_value(charge_json()).unwrap());
        assert_eq!(charge.id().unwrap(), "ch_123");
        assert_eq!(charge.amount().unwrap(), 2500);
        assert_eq!(charge.status().unwrap(), ChargeStatus::Failed);
        assert_eq!(charge.r#ref().unwrap().as_deref(), Some("order-1"));
        assert_eq!(charge.description().unwrap(), Nullable::Null);
        assert_eq!(charge.metadata().unwrap(), None);

        let failure = charge.failure().unwrap().into_option().unwrap();
        assert_eq!(failure.code().unwrap(), "card_declined");
        assert_eq!(failure.decline_code().unwrap(), Nullable::Null);
        assert_eq!(failure.message().unwrap(), None);
        assert!(charge.validate().is_ok());
    }

    #[test]
    fn test_charge_validate_reports_nested_field() {
        let mut value = charge_json();
        value["failure"] = json!({"message": "no code"});
        let charge = Charge::from_raw(RawStore::from_value(value).unwrap());
        let err = charge.validate().unwrap_err();
        assert!(matches!(err, InvalidDataError::Missing { .. }));
        assert_eq!(err.field(), Some("code"));
    }

    #[test]
    fn test_create_requires_fields() {
        let mut builder = ChargeCreateParams::builder();
        builder.amount(100).party_id("party_1");
        let err = builder.build().unwrap_err();
        assert_eq!(err.field(), Some("destination_account_id"));
    }

    #[test]
    fn test_create_optional_fields() {
        let mut builder = ChargeCreateParams::builder();
        builder
            .amount(100)
            .destination_account_id("acct_1")
            .party_id("party_1")
            .set_ref(None)
            .currency("eur")
            .set_description(None)
            .idempotency_key("idem_1");
        let params = builder.build().unwrap();

        assert!(!params.raw_body_data().contains_key("ref"));
        assert_eq!(params.raw_body_data().get("description"), Some(&json!(null)));
        assert_eq!(params.description().unwrap(), Nullable::Null);
        assert_eq!(params.currency().unwrap().as_deref(), Some("eur"));
        assert_eq!(params.idempotency_key().unwrap().as_deref(), Some("idem_1"));
        assert!(params.raw_query_data().is_empty());
    }

    #[test]
    fn test_to_builder_starts_from_snapshot() {
        let mut builder = ChargeCreateParams::builder();
        builder
            .amount(100)
            .destination_account_id("acct_1")
            .party_id("party_1");
        let original = builder.build().unwrap();

        let mut reopened = original.to_builder();
        reopened.amount(200);
        let changed = reopened.build().unwrap();

        assert_eq!(original.amount().unwrap(), 100);
        assert_eq!(changed.amount().unwrap(), 200);
        assert_ne!(original, changed);
    }

    #[test]
    fn test_list_rejects_out_of_range_limit() {
        let mut builder = ChargeListParams::builder();
        builder.limit(0);
        let err = builder.build().unwrap_err();
        assert_eq!(err.field(), Some("limit"));
    }

    #[test]
    fn test_refund_params() {
        let mut builder = ChargeRefundParams::builder("ch_1");
        builder.amount(50).set_reason(None);
        let params = builder.build().unwrap();
        assert_eq!(params.charge_id(), "ch_1");
        assert_eq!(params.amount().unwrap(), Some(50));
        assert!(!params.raw_body_data().contains_key("reason"));
        assert_eq!(params.path_params(), vec![("charge_id", "ch_1")]);
    }
}
