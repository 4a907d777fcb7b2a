use crate::client::MeridianClient;
use crate::error::Error;
use crate::models::compute::{Job, JobCancelParams, JobCreateParams, JobRetrieveParams};

/// Compute API, reached through [`MeridianClient::compute`].
#[derive(Debug, Clone, Copy)]
pub struct ComputeService<'a> {
    client: &'a MeridianClient,
}

impl<'a> ComputeService<'a> {
    pub(crate) fn new(client: &'a MeridianClient) -> Self {
        Self { client }
    }

    /// Job operations.
    pub fn jobs(&self) -> JobsService<'a> {
        JobsService {
            client: self.client,
        }
    }
}

/// `/compute/v1/jobs`.
#[derive(Debug, Clone, Copy)]
pub struct JobsService<'a> {
    client: &'a MeridianClient,
}

impl JobsService<'_> {
    /// Submit a job.
    pub async fn create(&self, params: &JobCreateParams) -> Result<Job, Error> {
        self.client.execute(params).await
    }

    /// Fetch a job by id.
    pub async fn retrieve(&self, params: &JobRetrieveParams) -> Result<Job, Error> {
        self.client.execute(params).await
    }

    /// Request cancellation. The returned job may still be running.
    pub async fn cancel(&self, params: &JobCancelParams) -> Result<Job, Error> {
        self.client.execute(params).await
    }
}
