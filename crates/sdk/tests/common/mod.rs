#![allow(dead_code, clippy::unwrap_used, clippy::expect_used)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use meridian_sdk::{
    ClientOptions, HttpRequest, HttpResponse, MeridianClient, Transport, TransportError,
};
use serde_json::{Value, json};

/// In-memory transport: records every request and replays queued responses.
#[derive(Debug, Default)]
pub struct RecordingTransport {
    requests: Mutex<Vec<HttpRequest>>,
    responses: Mutex<VecDeque<HttpResponse>>,
}

impl RecordingTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn push_response(&self, status: u16, body: &[u8]) {
        self.responses.lock().unwrap().push_back(HttpResponse {
            status,
            headers: vec![("x-request-id".to_string(), "req_test".to_string())],
            body: body.to_vec(),
        });
    }

    pub fn push_json(&self, status: u16, body: &Value) {
        self.push_response(status, body.to_string().as_bytes());
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> HttpRequest {
        self.requests.lock().unwrap().last().cloned().unwrap()
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| "connection refused".into())
    }
}

pub fn client_with(transport: &Arc<RecordingTransport>) -> MeridianClient {
    let transport: Arc<dyn Transport> = Arc::<RecordingTransport>::clone(transport);
    MeridianClient::with_transport(ClientOptions::default(), transport)
        .unwrap()
}

pub fn charge_json() -> Value {
    json!({
        "id": "ch_123",
        "amount": 0,
        "currency": "usd",
        "status": "succeeded",
        "destination_account_id": "destination_account_id",
        "party_id": "party_id",
        "description": null,
        "failure": null,
        "created_at": "2019-12-27T18:11:19.117Z"
    })
}

pub fn document_json() -> Value {
    json!({
        "id": "doc_1",
        "filename": "brief.pdf",
        "content_type": "application/pdf",
        "size_bytes": 8,
        "status": "processing",
        "purpose": "evidence",
        "created_at": "2024-02-01T08:00:00Z",
        "expires_at": null
    })
}

pub fn call_json() -> Value {
    json!({
        "id": "call_1",
        "from": "+15550001111",
        "to": "+15550002222",
        "status": "queued",
        "created_at": "2024-05-01T09:30:00Z"
    })
}

pub fn case_json() -> Value {
    json!({
        "id": "case_1",
        "title": "Acme v. Widget Co.",
        "court": "2d Cir.",
        "jurisdiction": "us_federal",
        "decided_on": "2019-12-27",
        "citation": "123 F.4th 456"
    })
}

pub fn job_json() -> Value {
    json!({
        "id": "job_1",
        "name": "train",
        "image": "ghcr.io/acme/train:1",
        "status": "queued",
        "resources": {"machine_type": "gpu-a100", "replicas": 1},
        "exit_code": null,
        "created_at": "2024-06-01T00:00:00Z",
        "started_at": null
    })
}
