//! Integration tests: url construction.
#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use chrono::{DateTime, NaiveDate, Utc};
use meridian_sdk::models::compute::{
    JobCancelParams, JobCreateParams, JobResources, JobRetrieveParams, MachineType,
};
use meridian_sdk::models::documents::{
    DocumentDeleteParams, DocumentListParams, DocumentRetrieveParams, DocumentStatus,
    DocumentUploadParams,
};
use meridian_sdk::models::legal::{CaseRetrieveParams, CaseSearchParams, Jurisdiction};
use meridian_sdk::models::payments::{
    ChargeListParams, ChargeRefundParams, ChargeRetrieveParams, ChargeStatus,
};
use meridian_sdk::models::voice::{CallCreateParams, CallRetrieveParams};
use meridian_sdk::{
    ClientOptions, Error, HttpMethod, InvalidDataError, MeridianClient, Params,
};

fn url_of<P: Params>(params: &P) -> String {
    let transport = common::RecordingTransport::new();
    let client = common::client_with(&transport);
    client.build_request(params).unwrap().url.to_string()
}

#[test]
fn test_charge_list_query_encoding() {
    let created_after: DateTime<Utc> = "2019-12-27T18:11:19.117Z".parse().unwrap();
    let mut builder = ChargeListParams::builder();
    builder
        .party_id("party_123")
        .status(ChargeStatus::Succeeded)
        .created_after(created_after)
        .limit(10);
    let params = builder.build().unwrap();

    assert_eq!(
        url_of(&params),
        "https://api.meridian.dev/payments/v1/charges?party_id=party_123&status=succeeded&created_after=2019-12-27T18%3A11%3A19.117Z&limit=10"
    );
}

#[test]
fn test_url_is_deterministic() {
    let build = || {
        let mut builder = ChargeListParams::builder();
        builder.status(ChargeStatus::Refunded).cursor("cur_1");
        builder.build().unwrap()
    };
    assert_eq!(url_of(&build()), url_of(&build()));
    assert_eq!(
        url_of(&build()),
        "https://api.meridian.dev/payments/v1/charges?status=refunded&cursor=cur_1"
    );
}

#[test]
fn test_empty_query_store_has_no_question_mark() {
    let params = ChargeListParams::builder().build().unwrap();
    assert_eq!(url_of(&params), "https://api.meridian.dev/payments/v1/charges");
}

#[test]
fn test_payments_paths() {
    assert_eq!(
        url_of(&ChargeRetrieveParams::new("ch_123")),
        "https://api.meridian.dev/payments/v1/charges/ch_123"
    );
    let refund = ChargeRefundParams::builder("ch_123").build().unwrap();
    assert_eq!(
        url_of(&refund),
        "https://api.meridian.dev/payments/v1/charges/ch_123/refund"
    );
}

#[test]
fn test_documents_paths() {
    assert_eq!(
        url_of(&DocumentRetrieveParams::new("doc 1")),
        "https://api.meridian.dev/documents/v1/documents/doc%201"
    );
    assert_eq!(
        url_of(&DocumentDeleteParams::new("doc_1")),
        "https://api.meridian.dev/documents/v1/documents/doc_1"
    );

    let mut builder = DocumentListParams::builder();
    builder
        .purpose("evidence")
        .status(DocumentStatus::Ready)
        .limit(25);
    assert_eq!(
        url_of(&builder.build().unwrap()),
        "https://api.meridian.dev/documents/v1/documents?purpose=evidence&status=ready&limit=25"
    );

    let mut upload = DocumentUploadParams::builder();
    upload
        .file("brief.pdf", "application/pdf", b"%PDF".to_vec())
        .purpose("evidence")
        .tags(vec!["a".to_string(), "b".to_string()]);
    assert_eq!(
        url_of(&upload.build().unwrap()),
        "https://api.meridian.dev/documents/v1/documents"
    );
}

#[test]
fn test_voice_paths() {
    assert_eq!(
        url_of(&CallRetrieveParams::new("call_9")),
        "https://api.meridian.dev/voice/v1/calls/call_9"
    );
}

#[test]
fn test_legal_search_query() {
    let mut builder = CaseSearchParams::builder();
    builder
        .q("breach of contract")
        .jurisdiction(Jurisdiction::UsFederal)
        .decided_after(NaiveDate::from_ymd_opt(2019, 12, 27));
    assert_eq!(
        url_of(&builder.build().unwrap()),
        "https://api.meridian.dev/legal/v1/cases/search?q=breach+of+contract&jurisdiction=us_federal&decided_after=2019-12-27"
    );
    assert_eq!(
        url_of(&CaseRetrieveParams::new("case_1")),
        "https://api.meridian.dev/legal/v1/cases/case_1"
    );
}

#[test]
fn test_compute_paths() {
    let mut job = JobCreateParams::builder();
    job.name("train")
        .image("ghcr.io/acme/train:1")
        .resources(&JobResources::builder(MachineType::CpuSmall).build().unwrap());
    assert_eq!(
        url_of(&job.build().unwrap()),
        "https://api.meridian.dev/compute/v1/jobs"
    );
    assert_eq!(
        url_of(&JobRetrieveParams::new("job_1")),
        "https://api.meridian.dev/compute/v1/jobs/job_1"
    );
    assert_eq!(
        url_of(&JobCancelParams::new("job_1")),
        "https://api.meridian.dev/compute/v1/jobs/job_1/cancel"
    );
}

#[test]
fn test_custom_base_url_with_prefix() {
    let transport = common::RecordingTransport::new();
    let client = MeridianClient::with_transport(
        ClientOptions::new().with_base_url("http://localhost:4010/v2/"),
        transport,
    )
    .unwrap();

    let mut builder = CallCreateParams::builder();
    builder.from("+15550001111").to("+15550002222");
    let request = client.build_request(&builder.build().unwrap()).unwrap();

    assert_eq!(request.method, HttpMethod::Post);
    assert_eq!(request.url.as_str(), "http://localhost:4010/v2/voice/v1/calls");
}

#[test]
fn test_empty_path_param_is_invalid_data() {
    let transport = common::RecordingTransport::new();
    let client = common::client_with(&transport);
    let err = client
        .build_request(&ChargeRetrieveParams::new(""))
        .unwrap_err();
    assert!(matches!(
        err,
        Error::InvalidData(InvalidDataError::Invalid { ref field, .. }) if field == "charge_id"
    ));
}

#[test]
fn test_invalid_base_url_is_a_config_error() {
    let transport = common::RecordingTransport::new();
    let err = MeridianClient::with_transport(
        ClientOptions::new().with_base_url("not a url"),
        transport,
    )
    .unwrap_err();
    assert!(matches!(err, Error::Config(_)));
}
