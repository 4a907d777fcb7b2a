use crate::client::MeridianClient;
use crate::error::Error;
use crate::models::legal::{Case, CaseRetrieveParams, CaseSearchParams, CaseSearchResponse};

/// Legal research API, reached through [`MeridianClient::legal`].
#[derive(Debug, Clone, Copy)]
pub struct LegalService<'a> {
    client: &'a MeridianClient,
}

impl<'a> LegalService<'a> {
    pub(crate) fn new(client: &'a MeridianClient) -> Self {
        Self { client }
    }

    /// Case law operations.
    pub fn cases(&self) -> CasesService<'a> {
        CasesService {
            client: self.client,
        }
    }
}

/// `/legal/v1/cases`.
#[derive(Debug, Clone, Copy)]
pub struct CasesService<'a> {
    client: &'a MeridianClient,
}

impl CasesService<'_> {
    /// Full-text case search.
    pub async fn search(&self, params: &CaseSearchParams) -> Result<CaseSearchResponse, Error> {
        self.client.execute(params).await
    }

    /// Fetch a case by id.
    pub async fn retrieve(&self, params: &CaseRetrieveParams) -> Result<Case, Error> {
        self.client.execute(params).await
    }
}
