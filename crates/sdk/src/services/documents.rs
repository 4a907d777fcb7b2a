use crate::client::MeridianClient;
use crate::error::Error;
use crate::models::documents::{
    Document, DocumentDeleteParams, DocumentListParams, DocumentRetrieveParams,
    DocumentUploadParams,
};
use crate::models::{Deleted, Page};

/// Documents API, reached through [`MeridianClient::documents`].
#[derive(Debug, Clone, Copy)]
pub struct DocumentsService<'a> {
    client: &'a MeridianClient,
}

impl<'a> DocumentsService<'a> {
    pub(crate) fn new(client: &'a MeridianClient) -> Self {
        Self { client }
    }

    /// Upload a file as `multipart/form-data`.
    pub async fn upload(&self, params: &DocumentUploadParams) -> Result<Document, Error> {
        self.client.execute(params).await
    }

    /// Fetch a document's metadata.
    pub async fn retrieve(&self, params: &DocumentRetrieveParams) -> Result<Document, Error> {
        self.client.execute(params).await
    }

    /// One page of documents.
    pub async fn list(&self, params: &DocumentListParams) -> Result<Page<Document>, Error> {
        self.client.execute(params).await
    }

    /// Delete a document.
    pub async fn delete(&self, params: &DocumentDeleteParams) -> Result<Deleted, Error> {
        self.client.execute(params).await
    }
}
