//! Legal research: case law search.

use chrono::NaiveDate;
use meridian_core::{
    ApiEnum, InvalidDataError, Nullable, RawStore, RawStoreBuilder, Validate, validate_field,
};

use crate::endpoint::{Endpoint, HttpMethod, Params};

meridian_core::wire_enum! {
    /// Court system a case belongs to.
    pub enum Jurisdiction {
        UsFederal => "us_federal",
        UsState => "us_state",
        UnitedKingdom => "uk",
        EuropeanUnion => "eu",
    }
}

meridian_core::raw_record! {
    /// A reported court decision.
    pub struct Case;
}

impl Case {
    /// Case id.
    pub fn id(&self) -> Result<String, InvalidDataError> {
        self.raw.get_required("id")
    }

    /// Case caption, e.g. `Acme v. Widget Co.`
    pub fn title(&self) -> Result<String, InvalidDataError> {
        self.raw.get_required("title")
    }

    /// Deciding court.
    pub fn court(&self) -> Result<String, InvalidDataError> {
        self.raw.get_required("court")
    }

    /// Court system.
    pub fn jurisdiction(&self) -> Result<ApiEnum<Jurisdiction>, InvalidDataError> {
        self.raw.get_required("jurisdiction")
    }

    /// Docket number as assigned by the court.
    pub fn docket_number(&self) -> Result<Option<String>, InvalidDataError> {
        self.raw.get_optional("docket_number")
    }

    /// Decision date.
    pub fn decided_on(&self) -> Result<Option<NaiveDate>, InvalidDataError> {
        self.raw.get_optional("decided_on")
    }

    /// Null for unreported decisions.
    pub fn citation(&self) -> Result<Nullable<String>, InvalidDataError> {
        self.raw.get_optional_nullable("citation")
    }

    /// Short summary of the holding.
    pub fn summary(&self) -> Result<Option<String>, InvalidDataError> {
        self.raw.get_optional("summary")
    }
}

impl Validate for Case {
    fn validate(&self) -> Result<(), InvalidDataError> {
        validate_field("id", &self.id()?)?;
        validate_field("title", &self.title()?)?;
        validate_field("court", &self.court()?)?;
        validate_field("jurisdiction", &self.jurisdiction()?)?;
        validate_field("docket_number", &self.docket_number()?)?;
        validate_field("decided_on", &self.decided_on()?)?;
        validate_field("citation", &self.citation()?)?;
        validate_field("summary", &self.summary()?)?;
        Ok(())
    }
}

meridian_core::raw_record! {
    /// One page of case search results.
    pub struct CaseSearchResponse;
}

impl CaseSearchResponse {
    /// Matching cases on this page.
    pub fn results(&self) -> Result<Vec<Case>, InvalidDataError> {
        self.raw.get_required("results")
    }

    /// Total matches across all pages.
    pub fn total(&self) -> Result<i64, InvalidDataError> {
        self.raw.get_required("total")
    }

    /// Cursor for the next page; null on the last page.
    pub fn next_cursor(&self) -> Result<Nullable<String>, InvalidDataError> {
        self.raw.get_optional_nullable("next_cursor")
    }
}

impl Validate for CaseSearchResponse {
    fn validate(&self) -> Result<(), InvalidDataError> {
        validate_field("results", &self.results()?)?;
        validate_field("total", &self.total()?)?;
        validate_field("next_cursor", &self.next_cursor()?)?;
        Ok(())
    }
}

/// `GET /legal/v1/cases/search`
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct CaseSearchParams {
    header: RawStore,
    query: RawStore,
    body: RawStore,
}

impl CaseSearchParams {
    /// Start building a search; `q` is required.
    pub fn builder() -> CaseSearchParamsBuilder {
        CaseSearchParamsBuilder::default()
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
    pub fn to_builder(&self) -> CaseSearchParamsBuilder {
        CaseSearchParamsBuilder {
            query: self.query.to_builder(),
        }
    }

    /// Full-text query.
    pub fn q(&self) -> Result<String, InvalidDataError> {
        self.query.get_required("q")
    }

    /// Only cases in this court system.
    pub fn jurisdiction(&self) -> Result<Option<ApiEnum<Jurisdiction>>, InvalidDataError> {
        self.query.get_optional("jurisdiction")
    }

    /// Only cases decided after this date.
    pub fn decided_after(&self) -> Result<Option<NaiveDate>, InvalidDataError> {
        self.query.get_optional("decided_after")
    }

    /// Only cases decided before this date.
    pub fn decided_before(&self) -> Result<Option<NaiveDate>, InvalidDataError> {
        self.query.get_optional("decided_before")
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

impl Params for CaseSearchParams {
    const ENDPOINT: Endpoint = Endpoint::new(HttpMethod::Get, "/legal/v1/cases/search");
    type Response = CaseSearchResponse;

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

/// Builder for [`CaseSearchParams`].
#[derive(Debug, Default)]
pub struct CaseSearchParamsBuilder {
    query: RawStoreBuilder,
}

impl CaseSearchParamsBuilder {
    /// Full-text query.
    pub fn q(&mut self, query: impl Into<String>) -> &mut Self {
        self.query.set("q", &query.into());
        self
    }

    /// Only cases in this court system.
    pub fn jurisdiction(&mut self, jurisdiction: impl Into<Option<Jurisdiction>>) -> &mut Self {
        self.query
            .set_optional("jurisdiction", jurisdiction.into().map(ApiEnum::Known));
        self
    }

    /// Only cases decided after this date.
    pub fn decided_after(&mut self, date: impl Into<Option<NaiveDate>>) -> &mut Self {
        self.query.set_optional("decided_after", date.into());
        self
    }

    /// Only cases decided before this date.
    pub fn decided_before(&mut self, date: impl Into<Option<NaiveDate>>) -> &mut Self {
        self.query.set_optional("decided_before", date.into());
        self
    }

    /// Page size.
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

    /// Fails when `q` is missing or blank.
    pub fn build(self) -> Result<CaseSearchParams, InvalidDataError> {
        let params = CaseSearchParams::from_raw(self.query.freeze()?);
        if params.q()?.trim().is_empty() {
            return Err(InvalidDataError::invalid("q", "must not be blank"));
        }
        Ok(params)
    }
}

/// `GET /legal/v1/cases/{case_id}`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CaseRetrieveParams {
    case_id: String,
    header: RawStore,
    query: RawStore,
    body: RawStore,
}

impl CaseRetrieveParams {
    /// Params for the case with id `case_id`.
    pub fn new(case_id: impl Into<String>) -> Self {
        Self {
            case_id: case_id.into(),
            header: RawStore::new(),
            query: RawStore::new(),
            body: RawStore::new(),
        }
    }

    /// Id substituted into the path.
    pub fn case_id(&self) -> &str {
        &self.case_id
    }
}

impl Params for CaseRetrieveParams {
    const ENDPOINT: Endpoint = Endpoint::new(HttpMethod::Get, "/legal/v1/cases/{case_id}");
    type Response = Case;

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
        vec![("case_id", self.case_id.as_str())]
    }
}
