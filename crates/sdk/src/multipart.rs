//! `multipart/form-data` bodies for endpoints that upload files.

use meridian_core::RawStore;
use rand::Rng;
use rand::distributions::Alphanumeric;
use serde_json::Value;

use crate::endpoint::FilePart;
use crate::query::scalar_text;

const BOUNDARY_LEN: usize = 24;

/// An encoded-on-demand multipart form: text fields first, then files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultipartForm {
    boundary: String,
    fields: Vec<(String, String)>,
    files: Vec<FilePart>,
}

impl MultipartForm {
    /// Build a form with a random boundary.
    pub fn new(body: &RawStore, files: &[FilePart]) -> Self {
        Self::with_boundary(random_boundary(), body, files)
    }

    /// Build a form with a fixed boundary.
    pub fn with_boundary(boundary: impl Into<String>, body: &RawStore, files: &[FilePart]) -> Self {
        let mut fields = Vec::new();
        for (key, value) in body.iter() {
            if let Value::Array(items) = value {
                fields.extend(
                    items
                        .iter()
                        .filter_map(scalar_text)
                        .map(|text| (key.to_string(), text)),
                );
            } else if let Some(text) = scalar_text(value) {
                fields.push((key.to_string(), text));
            }
        }

        Self {
            boundary: boundary.into(),
            fields,
            files: files.to_vec(),
        }
    }

    /// Part delimiter.
    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    /// Text fields in encode order. Arrays become one field per item.
    pub fn fields(&self) -> &[(String, String)] {
        &self.fields
    }

    /// File parts.
    pub fn files(&self) -> &[FilePart] {
        &self.files
    }

    /// Value for the `Content-Type` header.
    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }

    /// Encoded body.
    pub fn into_bytes(self) -> Vec<u8> {
        let mut out = Vec::new();
        for (name, value) in &self.fields {
            out.extend_from_slice(
                format!(
                    "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n",
                    self.boundary,
                    escape(name)
                )
                .as_bytes(),
            );
            out.extend_from_slice(value.as_bytes());
            out.extend_from_slice(b"\r\n");
        }
        for file in &self.files {
            out.extend_from_slice(
                format!(
                    "--{}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                    self.boundary,
                    escape(&file.field),
                    escape(&file.filename),
                    header_value(&file.content_type)
                )
                .as_bytes(),
            );
            out.extend_from_slice(&file.data);
            out.extend_from_slice(b"\r\n");
        }
        out.extend_from_slice(format!("--{}--\r\n", self.boundary).as_bytes());
        out
    }
}

fn random_boundary() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(BOUNDARY_LEN)
        .map(char::from)
        .collect()
}

fn escape(name: &str) -> String {
    name.replace('"', "%22")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

/// Control characters would end the part header early.
fn header_value(value: &str) -> String {
    value.chars().filter(|ch| !ch.is_control()).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn body(value: Value) -> RawStore {
        RawStore::from_value(value).unwrap()
    }

    #[test]
    fn test_random_boundary_shape() {
        let form = MultipartForm::new(&RawStore::new(), &[]);
        assert_eq!(form.boundary().len(), BOUNDARY_LEN);
        assert!(form.boundary().chars().all(|ch| ch.is_ascii_alphanumeric()));
        assert_eq!(
            form.content_type(),
            format!("multipart/form-data; boundary={}", form.boundary())
        );
    }

    #[test]
    fn test_fields_flatten_like_a_form() {
        let form = MultipartForm::with_boundary(
            "b",
            &body(json!({"purpose": "evidence", "tags": ["a", "b"], "pages": 3, "note": null})),
            &[],
        );
        let fields: Vec<(&str, &str)> = form
            .fields()
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
            .collect();
        assert_eq!(
            fields,
            vec![
                ("purpose", "evidence"),
                ("tags", "a"),
                ("tags", "b"),
                ("pages", "3")
            ]
        );
    }

    #[test]
    fn test_encoding_puts_files_last() {
        let file = FilePart::new("file", "brief.txt", "text/plain", b"hello".to_vec());
        let form = MultipartForm::with_boundary("XYZ", &body(json!({"purpose": "evidence"})), &[file]);
        let encoded = String::from_utf8(form.into_bytes()).unwrap();

        assert_eq!(
            encoded,
            "--XYZ\r\n\
             Content-Disposition: form-data; name=\"purpose\"\r\n\r\n\
             evidence\r\n\
             --XYZ\r\n\
             Content-Disposition: form-data; name=\"file\"; filename=\"brief.txt\"\r\n\
             Content-Type: text/plain\r\n\r\n\
             hello\r\n\
             --XYZ--\r\n"
        );
    }

    #[test]
    fn test_quotes_in_names_are_escaped() {
        let file = FilePart::new("file", "a\"b.txt", "text/plain", Vec::new());
        let encoded = String::from_utf8(
            MultipartForm::with_boundary("B", &RawStore::new(), &[file]).into_bytes(),
        )
        .unwrap();
        assert!(encoded.contains("filename=\"a%22b.txt\""));
    }

    #[test]
    fn test_content_type_cannot_inject_headers() {
        let file = FilePart::new(
            "file",
            "brief.txt",
            "text/plain\r\nX-Injected: yes",
            b"hi".to_vec(),
        );
        let encoded = String::from_utf8(
            MultipartForm::with_boundary("B", &RawStore::new(), &[file]).into_bytes(),
        )
        .unwrap();
        assert!(encoded.contains("Content-Type: text/plainX-Injected: yes\r\n\r\nhi"));
        assert!(!encoded.contains("\r\nX-Injected"));
    }
}
