use crate::client::MeridianClient;
use crate::error::Error;
use crate::models::voice::{Call, CallCreateParams, CallRetrieveParams};

/// Voice API, reached through [`MeridianClient::voice`].
#[derive(Debug, Clone, Copy)]
pub struct VoiceService<'a> {
    client: &'a MeridianClient,
}

impl<'a> VoiceService<'a> {
    pub(crate) fn new(client: &'a MeridianClient) -> Self {
        Self { client }
    }

    /// Call operations.
    pub fn calls(&self) -> CallsService<'a> {
        CallsService {
            client: self.client,
        }
    }
}

/// `/voice/v1/calls`.
#[derive(Debug, Clone, Copy)]
pub struct CallsService<'a> {
    client: &'a MeridianClient,
}

impl CallsService<'_> {
    /// Place an outbound call.
    pub async fn create(&self, params: &CallCreateParams) -> Result<Call, Error> {
        self.client.execute(params).await
    }

    /// Fetch a call by id.
    pub async fn retrieve(&self, params: &CallRetrieveParams) -> Result<Call, Error> {
        self.client.execute(params).await
    }
}
