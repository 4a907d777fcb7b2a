use crate::client::MeridianClient;
use crate::error::Error;
use crate::models::Page;
use crate::models::payments::{
    Charge, ChargeCreateParams, ChargeListParams, ChargeRefundParams, ChargeRetrieveParams,
};

/// Payments API, reached through [`MeridianClient::payments`].
#[derive(Debug, Clone, Copy)]
pub struct PaymentsService<'a> {
    client: &'a MeridianClient,
}

impl<'a> PaymentsService<'a> {
    pub(crate) fn new(client: &'a MeridianClient) -> Self {
        Self { client }
    }

    /// Charge operations.
    pub fn charges(&self) -> ChargesService<'a> {
        ChargesService {
            client: self.client,
        }
    }
}

/// `/payments/v1/charges`.
#[derive(Debug, Clone, Copy)]
pub struct ChargesService<'a> {
    client: &'a MeridianClient,
}

impl ChargesService<'_> {
    /// Create a charge.
    pub async fn create(&self, params: &ChargeCreateParams) -> Result<Charge, Error> {
        self.client.execute(params).await
    }

    /// Fetch a charge by id.
    pub async fn retrieve(&self, params: &ChargeRetrieveParams) -> Result<Charge, Error> {
        self.client.execute(params).await
    }

    /// One page of charges, newest first.
    pub async fn list(&self, params: &ChargeListParams) -> Result<Page<Charge>, Error> {
        self.client.execute(params).await
    }

    /// Refund all or part of a charge.
    pub async fn refund(&self, params: &ChargeRefundParams) -> Result<Charge, Error> {
        self.client.execute(params).await
    }
}
