//! Compute: batch jobs on managed machines.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use meridian_core::{
    ApiEnum, InvalidDataError, Nullable, RawStore, RawStoreBuilder, Record, Validate,
    validate_field,
};

use crate::endpoint::{Endpoint, HttpMethod, Params};

const IDEMPOTENCY_KEY: &str = "Idempotency-Key";

meridian_core::wire_enum! {
    /// Lifecycle of a job.
    pub enum JobStatus {
        Queued => "queued",
        Running => "running",
        Succeeded => "succeeded",
        Failed => "failed",
        Cancelled => "cancelled",
    }
}

meridian_core::wire_enum! {
    /// Machine class a job runs on.
    pub enum MachineType {
        CpuSmall => "cpu-small",
        CpuLarge => "cpu-large",
        GpuA100 => "gpu-a100",
        GpuH100 => "gpu-h100",
    }
}

meridian_core::raw_record! {
    /// Machines a job runs on. Used both in requests and in responses.
    pub struct JobResources;
}

impl JobResources {
    /// Start building resources on `machine_type`.
    pub fn builder(machine_type: MachineType) -> JobResourcesBuilder {
        let mut raw = RawStoreBuilder::new();
        raw.set("machine_type", &ApiEnum::Known(machine_type));
        JobResourcesBuilder { raw }
    }

    /// Reopen these resources for editing.
    pub fn to_builder(&self) -> JobResourcesBuilder {
        JobResourcesBuilder {
            raw: self.raw.to_builder(),
        }
    }

    /// Machine class.
    pub fn machine_type(&self) -> Result<ApiEnum<MachineType>, InvalidDataError> {
        self.raw.get_required("machine_type")
    }

    /// Number of machines; one when omitted.
    pub fn replicas(&self) -> Result<Option<i64>, InvalidDataError> {
        self.raw.get_optional("replicas")
    }

    /// Null means no limit.
    pub fn timeout_seconds(&self) -> Result<Nullable<i64>, InvalidDataError> {
        self.raw.get_optional_nullable("timeout_seconds")
    }
}

impl Validate for JobResources {
    fn validate(&self) -> Result<(), InvalidDataError> {
        validate_field("machine_type", &self.machine_type()?)?;
        validate_field("replicas", &self.replicas()?)?;
        validate_field("timeout_seconds", &self.timeout_seconds()?)?;
        Ok(())
    }
}

/// Builder for [`JobResources`].
#[derive(Debug)]
pub struct JobResourcesBuilder {
    raw: RawStoreBuilder,
}

impl JobResourcesBuilder {
    /// Number of machines.
    pub fn replicas(&mut self, replicas: impl Into<Option<i64>>) -> &mut Self {
        self.raw.set_optional("replicas", replicas.into());
        self
    }

    /// `None` sends an explicit null, lifting the limit.
    pub fn timeout_seconds(&mut self, seconds: impl Into<Option<i64>>) -> &mut Self {
        self.raw.set_nullable("timeout_seconds", seconds.into());
        self
    }

    /// Freeze the resources.
    pub fn build(self) -> Result<JobResources, InvalidDataError> {
        self.raw.freeze().map(JobResources::from_raw)
    }
}

meridian_core::raw_record! {
    /// A containerized batch job.
    pub struct Job;
}

impl Job {
    /// Job id, prefixed `job_`.
    pub fn id(&self) -> Result<String, InvalidDataError> {
        self.raw.get_required("id")
    }

    /// Name given at creation.
    pub fn name(&self) -> Result<String, InvalidDataError> {
        self.raw.get_required("name")
    }

    /// Container image reference.
    pub fn image(&self) -> Result<String, InvalidDataError> {
        self.raw.get_required("image")
    }

    /// Where the job is in its lifecycle.
    pub fn status(&self) -> Result<ApiEnum<JobStatus>, InvalidDataError> {
        self.raw.get_required("status")
    }

    /// Machines the job runs on.
    pub fn resources(&self) -> Result<JobResources, InvalidDataError> {
        self.raw.get_required("resources")
    }

    /// Command overriding the image entrypoint.
    pub fn command(&self) -> Result<Option<Vec<String>>, InvalidDataError> {
        self.raw.get_optional("command")
    }

    /// Environment passed to the container.
    pub fn env(&self) -> Result<Option<BTreeMap<String, String>>, InvalidDataError> {
        self.raw.get_optional("env")
    }

    /// Null until the job has exited.
    pub fn exit_code(&self) -> Result<Nullable<i64>, InvalidDataError> {
        self.raw.get_optional_nullable("exit_code")
    }

    /// Submission time.
    pub fn created_at(&self) -> Result<DateTime<Utc>, InvalidDataError> {
        self.raw.get_required("created_at")
    }

    /// Null until the job starts.
    pub fn started_at(&self) -> Result<Nullable<DateTime<Utc>>, InvalidDataError> {
        self.raw.get_optional_nullable("started_at")
    }

    /// Null until the job finishes.
    pub fn finished_at(&self) -> Result<Nullable<DateTime<Utc>>, InvalidDataError> {
        self.raw.get_optional_nullable("finished_at")
    }
}

impl Validate for Job {
    fn validate(&self) -> Result<(), InvalidDataError> {
        validate_field("id", &self.id()?)?;
        validate_field("name", &self.name()?)?;
        validate_field("image", &self.image()?)?;
        validate_field("status", &self.status()?)?;
        validate_field("resources", &self.resources()?)?;
        validate_field("command", &self.command()?)?;
        validate_field("env", &self.env()?)?;
        validate_field("exit_code", &self.exit_code()?)?;
        validate_field("created_at", &self.created_at()?)?;
        validate_field("started_at", &self.started_at()?)?;
        validate_field("finished_at", &self.finished_at()?)?;
        Ok(())
    }
}

/// `POST /compute/v1/jobs`
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct JobCreateParams {
    header: RawStore,
    query: RawStore,
    body: RawStore,
}

impl JobCreateParams {
    /// Start building a job.
    pub fn builder() -> JobCreateParamsBuilder {
        JobCreateParamsBuilder::default()
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
    pub fn to_builder(&self) -> JobCreateParamsBuilder {
        JobCreateParamsBuilder {
            header: self.header.to_builder(),
            body: self.body.to_builder(),
        }
    }

    /// Job name.
    pub fn name(&self) -> Result<String, InvalidDataError> {
        self.body.get_required("name")
    }

    /// Container image reference.
    pub fn image(&self) -> Result<String, InvalidDataError> {
        self.body.get_required("image")
    }

    /// Requested machines.
    pub fn resources(&self) -> Result<JobResources, InvalidDataError> {
        self.body.get_required("resources")
    }

    /// Command overriding the image entrypoint.
    pub fn command(&self) -> Result<Option<Vec<String>>, InvalidDataError> {
        self.body.get_optional("command")
    }

    /// Environment passed to the container.
    pub fn env(&self) -> Result<Option<BTreeMap<String, String>>, InvalidDataError> {
        self.body.get_optional("env")
    }

    /// Value of the `Idempotency-Key` header.
    pub fn idempotency_key(&self) -> Result<Option<String>, InvalidDataError> {
        self.header.get_optional(IDEMPOTENCY_KEY)
    }
}

impl Params for JobCreateParams {
    const ENDPOINT: Endpoint = Endpoint::new(HttpMethod::Post, "/compute/v1/jobs");
    type Response = Job;

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

/// Builder for [`JobCreateParams`].
#[derive(Debug, Default)]
pub struct JobCreateParamsBuilder {
    header: RawStoreBuilder,
    body: RawStoreBuilder,
}

impl JobCreateParamsBuilder {
    /// Job name. Required.
    pub fn name(&mut self, name: impl Into<String>) -> &mut Self {
        self.body.set("name", &name.into());
        self
    }

    /// Container image reference.
    pub fn image(&mut self, image: impl Into<String>) -> &mut Self {
        self.body.set("image", &image.into());
        self
    }

    /// Requested machines. Required.
    pub fn resources(&mut self, resources: &JobResources) -> &mut Self {
        self.body.set("resources", resources);
        self
    }

    /// Command overriding the image entrypoint.
    pub fn command(&mut self, command: impl Into<Option<Vec<String>>>) -> &mut Self {
        self.body.set_optional("command", command.into());
        self
    }

    /// Environment passed to the container.
    pub fn env(&mut self, env: impl Into<Option<BTreeMap<String, String>>>) -> &mut Self {
        self.body.set_optional("env", env.into());
        self
    }

    /// Retries with the same key submit the job once.
    pub fn idempotency_key(&mut self, key: impl Into<String>) -> &mut Self {
        self.header.set_optional(IDEMPOTENCY_KEY, Some(key.into()));
        self
    }

    /// Like [`idempotency_key`](Self::idempotency_key); `None` leaves the field unset.
    pub fn set_idempotency_key(&mut self, key: Option<String>) -> &mut Self {
        self.header.set_optional(IDEMPOTENCY_KEY, key);
        self
    }

    /// Fails when `name`, `image` or `resources` is missing.
    pub fn build(self) -> Result<JobCreateParams, InvalidDataError> {
        let params = JobCreateParams::from_raw(self.header.freeze()?, self.body.freeze()?);
        params.body.require(&["name", "image", "resources"])?;
        Ok(params)
    }
}

/// `GET /compute/v1/jobs/{job_id}`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JobRetrieveParams {
    job_id: String,
    header: RawStore,
    query: RawStore,
    body: RawStore,
}

impl JobRetrieveParams {
    /// Params for the job with id `job_id`.
    pub fn new(job_id: impl Into<String>) -> Self {
        Self {
            job_id: job_id.into(),
            header: RawStore::new(),
            query: RawStore::new(),
            body: RawStore::new(),
        }
    }

    /// Id substituted into the path.
    pub fn job_id(&self) -> &str {
        &self.job_id
    }
}

impl Params for JobRetrieveParams {
    const ENDPOINT: Endpoint = Endpoint::new(HttpMethod::Get, "/compute/v1/jobs/{job_id}");
    type Response = Job;

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
        vec![("job_id", self.job_id.as_str())]
    }
}

/// `POST /compute/v1/jobs/{job_id}/cancel`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JobCancelParams {
    job_id: String,
    header: RawStore,
    query: RawStore,
    body: RawStore,
}

impl JobCancelParams {
    /// Params cancelling the job with id `job_id`.
    pub fn new(job_id: impl Into<String>) -> Self {
        Self {
            job_id: job_id.into(),
            header: RawStore::new(),
            query: RawStore::new(),
            body: RawStore::new(),
        }
    }

    /// Id substituted into the path.
    pub fn job_id(&self) -> &str {
        &self.job_id
    }
}

impl Params for JobCancelParams {
    const ENDPOINT: Endpoint = Endpoint::new(HttpMethod::Post, "/compute/v1/jobs/{job_id}/cancel");
    type Response = Job;

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
        vec![("job_id", self.job_id.as_str())]
    }
}
