//! Documents: uploaded files and their processing state.

use chrono::{DateTime, Utc};
use meridian_core::{
    ApiEnum, InvalidDataError, Nullable, RawStore, RawStoreBuilder, Validate, validate_field,
};

use crate::endpoint::{Endpoint, FilePart, HttpMethod, Params};
use crate::models::{Deleted, Page};

meridian_core::wire_enum! {
    /// Processing state of an uploaded document.
    pub enum DocumentStatus {
        Processing => "processing",
        Ready => "ready",
        Failed => "failed",
    }
}

meridian_core::raw_record! {
    /// An uploaded file and its processing state.
    pub struct Document;
}

impl Document {
    /// Document id, prefixed `doc_`.
    pub fn id(&self) -> Result<String, InvalidDataError> {
        self.raw.get_required("id")
    }

    /// Name the file was uploaded under.
    pub fn filename(&self) -> Result<String, InvalidDataError> {
        self.raw.get_required("filename")
    }

    /// MIME type given at upload.
    pub fn content_type(&self) -> Result<String, InvalidDataError> {
        self.raw.get_required("content_type")
    }

    /// Size of the stored file.
    pub fn size_bytes(&self) -> Result<i64, InvalidDataError> {
        self.raw.get_required("size_bytes")
    }

    /// Processing state.
    pub fn status(&self) -> Result<ApiEnum<DocumentStatus>, InvalidDataError> {
        self.raw.get_required("status")
    }

    /// What the document is for, e.g. `evidence`.
    pub fn purpose(&self) -> Result<Option<String>, InvalidDataError> {
        self.raw.get_optional("purpose")
    }

    /// Caller-defined labels.
    pub fn tags(&self) -> Result<Option<Vec<String>>, InvalidDataError> {
        self.raw.get_optional("tags")
    }

    /// Upload time.
    pub fn created_at(&self) -> Result<DateTime<Utc>, InvalidDataError> {
        self.raw.get_required("created_at")
    }

    /// Null for documents that never expire.
    pub fn expires_at(&self) -> Result<Nullable<DateTime<Utc>>, InvalidDataError> {
        self.raw.get_optional_nullable("expires_at")
    }
}

impl Validate for Document {
    fn validate(&self) -> Result<(), InvalidDataError> {
        validate_field("id", &self.id()?)?;
        validate_field("filename", &self.filename()?)?;
        validate_field("content_type", &self.content_type()?)?;
        validate_field("size_bytes", &self.size_bytes()?)?;
        validate_field("status", &self.status()?)?;
        validate_field("purpose", &self.purpose()?)?;
        validate_field("tags", &self.tags()?)?;
        validate_field("created_at", &self.created_at()?)?;
        validate_field("expires_at", &self.expires_at()?)?;
        Ok(())
    }
}

/// `POST /documents/v1/documents`, sent as `multipart/form-data`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocumentUploadParams {
    header: RawStore,
    query: RawStore,
    body: RawStore,
    files: Vec<FilePart>,
}

impl DocumentUploadParams {
    /// Start building an upload.
    pub fn builder() -> DocumentUploadParamsBuilder {
        DocumentUploadParamsBuilder::default()
    }

    /// Rebuild params from their body store and file part.
    pub fn from_raw(body: RawStore, file: FilePart) -> Self {
        Self {
            header: RawStore::new(),
            query: RawStore::new(),
            body,
            files: vec![file],
        }
    }

    /// Reopen these params for editing.
    pub fn to_builder(&self) -> DocumentUploadParamsBuilder {
        DocumentUploadParamsBuilder {
            body: self.body.to_builder(),
            file: self.files.first().cloned(),
        }
    }

    /// The file being uploaded.
    pub fn file(&self) -> Option<&FilePart> {
        self.files.first()
    }

    /// What the document is for.
    pub fn purpose(&self) -> Result<String, InvalidDataError> {
        self.body.get_required("purpose")
    }

    /// Labels attached on upload.
    pub fn tags(&self) -> Result<Option<Vec<String>>, InvalidDataError> {
        self.body.get_optional("tags")
    }
}

impl Params for DocumentUploadParams {
    const ENDPOINT: Endpoint = Endpoint::multipart(HttpMethod::Post, "/documents/v1/documents");
    type Response = Document;

    fn raw_header_data(&self) -> &RawStore {
        &self.header
    }

    fn raw_query_data(&self) -> &RawStore {
        &self.query
    }

    fn raw_body_data(&self) -> &RawStore {
        &self.body
    }

    fn files(&self) -> &[FilePart] {
        &self.files
    }
}

/// Builder for [`DocumentUploadParams`].
#[derive(Debug, Default)]
pub struct DocumentUploadParamsBuilder {
    body: RawStoreBuilder,
    file: Option<FilePart>,
}

impl DocumentUploadParamsBuilder {
    /// The file to upload. Its part is always named `file`.
    pub fn file(
        &mut self,
        filename: impl Into<String>,
        content_type: impl Into<String>,
        data: impl Into<Vec<u8>>,
    ) -> &mut Self {
        self.file = Some(FilePart::new("file", filename, content_type, data));
        self
    }

    /// What the document is for. Required.
    pub fn purpose(&mut self, purpose: impl Into<String>) -> &mut Self {
        self.body.set("purpose", &purpose.into());
        self
    }

    /// Labels to attach. Each tag goes out as its own form field.
    pub fn tags(&mut self, tags: impl Into<Option<Vec<String>>>) -> &mut Self {
        self.body.set_optional("tags", tags.into());
        self
    }

    /// Fails without a file or a purpose.
    pub fn build(self) -> Result<DocumentUploadParams, InvalidDataError> {
        let body = self.body.freeze()?;
        let file = self.file.ok_or_else(|| InvalidDataError::missing("file"))?;
        body.require(&["purpose"])?;
        Ok(DocumentUploadParams::from_raw(body, file))
    }
}

/// `GET /documents/v1/documents/{document_id}`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocumentRetrieveParams {
    document_id: String,
    header: RawStore,
    query: RawStore,
    body: RawStore,
}

impl DocumentRetrieveParams {
    /// Params for the document with id `document_id`.
    pub fn new(document_id: impl Into<String>) -> Self {
        Self {
            document_id: document_id.into(),
            header: RawStore::new(),
            query: RawStore::new(),
            body: RawStore::new(),
        }
    }

    /// Id substituted into the path.
    pub fn document_id(&self) -> &str {
        &self.document_id
    }
}

impl Params for DocumentRetrieveParams {
    const ENDPOINT: Endpoint = Endpoint::new(
        HttpMethod::Get,
        "/documents/v1/documents/{document_id}",
    );
    type Response = Document;

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
        vec![("document_id", self.document_id.as_str())]
    }
}

/// `GET /documents/v1/documents`
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct DocumentListParams {
    header: RawStore,
    query: RawStore,
    body: RawStore,
}

impl DocumentListParams {
    /// Start building a list query; every filter is optional.
    pub fn builder() -> DocumentListParamsBuilder {
        DocumentListParamsBuilder::default()
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
    pub fn to_builder(&self) -> DocumentListParamsBuilder {
        DocumentListParamsBuilder {
            query: self.query.to_builder(),
        }
    }

    /// Only documents with this purpose.
    pub fn purpose(&self) -> Result<Option<String>, InvalidDataError> {
        self.query.get_optional("purpose")
    }

    /// Only documents in this state.
    pub fn status(&self) -> Result<Option<ApiEnum<DocumentStatus>>, InvalidDataError> {
        self.query.get_optional("status")
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

impl Params for DocumentListParams {
    const ENDPOINT: Endpoint = Endpoint::new(HttpMethod::Get, "/documents/v1/documents");
    type Response = Page<Document>;

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

/// Builder for [`DocumentListParams`].
#[derive(Debug, Default)]
pub struct DocumentListParamsBuilder {
    query: RawStoreBuilder,
}

impl DocumentListParamsBuilder {
    /// Only documents with this purpose.
    pub fn purpose(&mut self, purpose: impl Into<String>) -> &mut Self {
        self.query.set_optional("purpose", Some(purpose.into()));
        self
    }

    /// Like [`purpose`](Self::purpose); `None` leaves the field unset.
    pub fn set_purpose(&mut self, purpose: Option<String>) -> &mut Self {
        self.query.set_optional("purpose", purpose);
        self
    }

    /// Only documents in this state.
    pub fn status(&mut self, status: impl Into<Option<DocumentStatus>>) -> &mut Self {
        self.query
            .set_optional("status", status.into().map(ApiEnum::Known));
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

    /// Freeze the list query.
    pub fn build(self) -> Result<DocumentListParams, InvalidDataError> {
        self.query.freeze().map(DocumentListParams::from_raw)
    }
}

/// `DELETE /documents/v1/documents/{document_id}`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocumentDeleteParams {
    document_id: String,
    header: RawStore,
    query: RawStore,
    body: RawStore,
}

impl DocumentDeleteParams {
    /// Params deleting the document with id `document_id`.
    pub fn new(document_id: impl Into<String>) -> Self {
        Self {
            document_id: document_id.into(),
            header: RawStore::new(),
            query: RawStore::new(),
            body: RawStore::new(),
        }
    }

    /// Id substituted into the path.
    pub fn document_id(&self) -> &str {
        &self.document_id
    }
}

impl Params for DocumentDeleteParams {
    const ENDPOINT: Endpoint = Endpoint::new(
        HttpMethod::Delete,
        "/documents/v1/documents/{document_id}",
    );
    type Response = Deleted;

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
        vec![("document_id", self.document_id.as_str())]
    }
}
