//! Turning a parameter record into a URL, headers and a body.

use std::fmt;

use meridian_core::{InvalidDataError, RawStore, Record, Validate};
use serde_json::Value;
use url::Url;

use crate::multipart::MultipartForm;
use crate::query::{self, scalar_text};

/// HTTP verbs used by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    /// `GET`
    Get,
    /// `POST`
    Post,
    /// `PUT`
    Put,
    /// `PATCH`
    Patch,
    /// `DELETE`
    Delete,
}

impl HttpMethod {
    /// Upper-case verb as sent on the request line.
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }

    /// Whether requests with this verb carry a body.
    pub fn has_body(self) -> bool {
        matches!(self, HttpMethod::Post | HttpMethod::Put | HttpMethod::Patch)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Static description of one API operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoint {
    /// HTTP verb.
    pub method: HttpMethod,
    /// Path template, e.g. `/payments/v1/charges/{charge_id}`.
    pub path: &'static str,
    /// The body goes out as `multipart/form-data` instead of JSON.
    pub multipart: bool,
}

impl Endpoint {
    /// A JSON (or bodiless) endpoint.
    pub const fn new(method: HttpMethod, path: &'static str) -> Self {
        Self {
            method,
            path,
            multipart: false,
        }
    }

    /// An upload endpoint.
    pub const fn multipart(method: HttpMethod, path: &'static str) -> Self {
        Self {
            method,
            path,
            multipart: true,
        }
    }
}

/// A binary part of a multipart body.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct FilePart {
    /// Form field name.
    pub field: String,
    /// File name reported to the server.
    pub filename: String,
    /// MIME type of `data`.
    pub content_type: String,
    /// File contents.
    pub data: Vec<u8>,
}

impl FilePart {
    /// A part with the given field, file name, MIME type and contents.
    pub fn new(
        field: impl Into<String>,
        filename: impl Into<String>,
        content_type: impl Into<String>,
        data: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            field: field.into(),
            filename: filename.into(),
            content_type: content_type.into(),
            data: data.into(),
        }
    }
}

impl fmt::Debug for FilePart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilePart")
            .field("field", &self.field)
            .field("filename", &self.filename)
            .field("content_type", &self.content_type)
            .field("len", &self.data.len())
            .finish()
    }
}

/// An outbound request body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BodyPayload {
    /// `application/json`
    Json(Value),
    /// `multipart/form-data`
    Multipart(MultipartForm),
}

impl BodyPayload {
    /// Value for the `Content-Type` header.
    pub fn content_type(&self) -> String {
        match self {
            BodyPayload::Json(_) => "application/json".to_string(),
            BodyPayload::Multipart(form) => form.content_type(),
        }
    }

    /// Encoded body.
    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            BodyPayload::Json(value) => value.to_string().into_bytes(),
            BodyPayload::Multipart(form) => form.into_bytes(),
        }
    }
}

/// A parameter record bound to one endpoint.
///
/// Parameter records keep separate raw stores for headers, query and body;
/// path parameters are plain strings substituted into [`Endpoint::path`].
pub trait Params: Send + Sync {
    /// Operation these parameters are sent to.
    const ENDPOINT: Endpoint;

    /// Record the endpoint answers with.
    type Response: Record + Validate;

    /// Extra request headers.
    fn raw_header_data(&self) -> &RawStore;

    /// Query string parameters.
    fn raw_query_data(&self) -> &RawStore;

    /// JSON or multipart body fields.
    fn raw_body_data(&self) -> &RawStore;

    /// Values for the `{name}` placeholders in the path template.
    fn path_params(&self) -> Vec<(&'static str, &str)> {
        Vec::new()
    }

    /// File parts of a multipart body.
    fn files(&self) -> &[FilePart] {
        &[]
    }

    /// Full request URL under `base_url`.
    fn to_url(&self, base_url: &Url) -> Result<Url, InvalidDataError> {
        build_url(
            base_url,
            Self::ENDPOINT.path,
            &self.path_params(),
            self.raw_query_data(),
        )
    }

    /// JSON body for body-carrying verbs, a multipart form for upload
    /// endpoints, nothing otherwise.
    fn to_body_payload(&self) -> Option<BodyPayload> {
        let endpoint = Self::ENDPOINT;
        if endpoint.multipart {
            Some(BodyPayload::Multipart(MultipartForm::new(
                self.raw_body_data(),
                self.files(),
            )))
        } else if endpoint.method.has_body() {
            Some(BodyPayload::Json(self.raw_body_data().to_value()))
        } else {
            None
        }
    }
}

/// Resolve `template` against `base_url` and append the query store.
///
/// Path parameters are percent-encoded as single segments. A missing or empty
/// path parameter is invalid data naming the parameter.
pub fn build_url(
    base_url: &Url,
    template: &str,
    path_params: &[(&str, &str)],
    query: &RawStore,
) -> Result<Url, InvalidDataError> {
    let mut url = base_url.clone();
    url.set_query(None);
    url.set_fragment(None);

    {
        let mut segments = url
            .path_segments_mut()
            .map_err(|()| InvalidDataError::invalid("base_url", "cannot be used as a base"))?;
        segments.pop_if_empty();
        for segment in template.split('/').filter(|segment| !segment.is_empty()) {
            let Some(name) = segment
                .strip_prefix('{')
                .and_then(|inner| inner.strip_suffix('}'))
            else {
                segments.push(segment);
                continue;
            };
            let value = path_params
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| *value)
                .ok_or_else(|| InvalidDataError::missing(name))?;
            if value.is_empty() {
                return Err(InvalidDataError::invalid(name, "must not be empty"));
            }
            segments.push(value);
        }
    }

    let pairs = query::flatten(query);
    if !pairs.is_empty() {
        url.query_pairs_mut().extend_pairs(&pairs);
    }
    Ok(url)
}

/// Render the header store as header pairs. Arrays are comma-joined and
/// nulls are skipped.
pub fn header_pairs(store: &RawStore) -> Vec<(String, String)> {
    store
        .iter()
        .filter_map(|(name, value)| {
            let text = if let Value::Array(items) = value {
                Some(
                    items
                        .iter()
                        .filter_map(scalar_text)
                        .collect::<Vec<_>>()
                        .join(","),
                )
            } else {
                scalar_text(value)
            };
            text.map(|text| (name.to_string(), text))
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn base() -> Url {
        Url::parse("https://api.meridian.dev").unwrap()
    }

    fn store(value: Value) -> RawStore {
        RawStore::from_value(value).unwrap()
    }

    #[test]
    fn test_method_strings() {
        assert_eq!(HttpMethod::Get.as_str(), "GET");
        assert_eq!(HttpMethod::Delete.to_string(), "DELETE");
        assert!(HttpMethod::Patch.has_body());
        assert!(!HttpMethod::Get.has_body());
        assert!(!HttpMethod::Delete.has_body());
    }

    #[test]
    fn test_plain_path_has_no_query() {
        let url = build_url(&base(), "/payments/v1/charges", &[], &RawStore::new()).unwrap();
        assert_eq!(url.as_str(), "https://api.meridian.dev/payments/v1/charges");
    }

    #[test]
    fn test_path_params_are_encoded_segments() {
        let url = build_url(
            &base(),
            "/payments/v1/charges/{charge_id}/refund",
            &[("charge_id", "ch 1/2")],
            &RawStore::new(),
        )
        .unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.meridian.dev/payments/v1/charges/ch%201%2F2/refund"
        );
    }

    #[test]
    fn test_base_url_prefix_is_kept() {
        let with_slash = Url::parse("https://proxy.example.com/meridian/").unwrap();
        let without = Url::parse("https://proxy.example.com/meridian").unwrap();
        for base in [with_slash, without] {
            let url = build_url(&base, "/voice/v1/calls", &[], &RawStore::new()).unwrap();
            assert_eq!(
                url.as_str(),
                "https://proxy.example.com/meridian/voice/v1/calls"
            );
        }
    }

    #[test]
    fn test_missing_and_empty_path_params() {
        let err = build_url(&base(), "/compute/v1/jobs/{job_id}", &[], &RawStore::new())
            .unwrap_err();
        assert!(matches!(err, InvalidDataError::Missing { .. }));
        assert_eq!(err.field(), Some("job_id"));

        let err = build_url(
            &base(),
            "/compute/v1/jobs/{job_id}",
            &[("job_id", "")],
            &RawStore::new(),
        )
        .unwrap_err();
        assert!(matches!(err, InvalidDataError::Invalid { .. }));
    }

    #[test]
    fn test_query_is_form_encoded() {
        let url = build_url(
            &base(),
            "/legal/v1/cases/search",
            &[],
            &store(json!({"q": "breach of contract", "after": "2019-12-27T18:11:19+00:00"})),
        )
        .unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.meridian.dev/legal/v1/cases/search?q=breach+of+contract&after=2019-12-27T18%3A11%3A19%2B00%3A00"
        );
    }

    #[test]
    fn test_header_pairs() {
        let headers = header_pairs(&store(
            json!({"Idempotency-Key": "key_1", "X-Tags": ["a", "b"], "X-Skip": null, "X-Count": 2}),
        ));
        assert_eq!(
            headers,
            vec![
                ("Idempotency-Key".to_string(), "key_1".to_string()),
                ("X-Tags".to_string(), "a,b".to_string()),
                ("X-Count".to_string(), "2".to_string()),
            ]
        );
    }

    #[test]
    fn test_json_payload() {
        let payload = BodyPayload::Json(json!({"amount": 0}));
        assert_eq!(payload.content_type(), "application/json");
        assert_eq!(payload.into_bytes(), br#"{"amount":0}"#.to_vec());
    }
}
