//! Client configuration.

use std::path::Path;
use std::time::Duration;

use thiserror::Error;
use url::Url;

use crate::dotenv::{DotenvError, DotenvFile};

/// Production API root.
pub const DEFAULT_BASE_URL: &str = "https://api.meridian.dev";
/// Per-request timeout unless configured otherwise.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Overrides [`DEFAULT_BASE_URL`].
pub const ENV_BASE_URL: &str = "MERIDIAN_BASE_URL";
/// Timeout in whole seconds.
pub const ENV_TIMEOUT_SECS: &str = "MERIDIAN_TIMEOUT_SECS";
/// `true`/`false`, `1`/`0`, `yes`/`no` or `on`/`off`.
pub const ENV_RESPONSE_VALIDATION: &str = "MERIDIAN_RESPONSE_VALIDATION";

/// Client options could not be loaded or applied.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The base URL does not parse.
    #[error("invalid base URL `{url}`: {source}")]
    InvalidBaseUrl {
        /// The configured value.
        url: String,
        /// Why it does not parse.
        #[source]
        source: url::ParseError,
    },

    /// An environment variable holds a value of the wrong form.
    #[error("`{key}` has invalid value `{value}`: {message}")]
    InvalidValue {
        /// Variable name.
        key: &'static str,
        /// The value found.
        value: String,
        /// The form expected.
        message: &'static str,
    },

    /// The dotenv file could not be read.
    #[error(transparent)]
    Dotenv(#[from] DotenvError),

    /// `reqwest` rejected the client configuration.
    #[error("failed to build HTTP client: {source}")]
    HttpClient {
        /// The builder error.
        #[source]
        source: reqwest::Error,
    },
}

/// Settings shared by every call a client makes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientOptions {
    base_url: String,
    timeout: Duration,
    response_validation: bool,
    default_headers: Vec<(String, String)>,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            response_validation: false,
            default_headers: Vec::new(),
        }
    }
}

impl ClientOptions {
    /// Defaults: production base URL, 60 s timeout, validation off.
    pub fn new() -> Self {
        Self::default()
    }

    /// Options from the process environment, defaults for anything unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Options from a dotenv file. Variables set in the process environment
    /// take precedence over the file.
    pub fn from_dotenv(path: &Path) -> Result<Self, ConfigError> {
        let file = DotenvFile::read(path)?;
        Self::from_lookup(|key| {
            std::env::var(key)
                .ok()
                .or_else(|| file.get(key).map(str::to_string))
        })
    }

    /// Options from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut options = Self::default();

        if let Some(base_url) = lookup(ENV_BASE_URL) {
            options.base_url = base_url;
            options.parsed_base_url()?;
        }

        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => options.timeout = Duration::from_secs(secs),
                _ => {
                    return Err(ConfigError::InvalidValue {
                        key: ENV_TIMEOUT_SECS,
                        value: raw,
                        message: "expected a positive number of seconds",
                    });
                }
            }
        }

        if let Some(raw) = lookup(ENV_RESPONSE_VALIDATION) {
            let Some(enabled) = parse_flag(&raw) else {
                return Err(ConfigError::InvalidValue {
                    key: ENV_RESPONSE_VALIDATION,
                    value: raw,
                    message: "expected true or false",
                });
            };
            options.response_validation = enabled;
        }

        Ok(options)
    }

    /// Send requests to `base_url` instead of production.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Give up on a request after `timeout`.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Validate every response record before returning it.
    pub fn with_response_validation(mut self, enabled: bool) -> Self {
        self.response_validation = enabled;
        self
    }

    /// Add a header sent with every request.
    pub fn with_default_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.push((name.into(), value.into()));
        self
    }

    /// Configured base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Per-request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Whether responses are validated before they are returned.
    pub fn response_validation(&self) -> bool {
        self.response_validation
    }

    /// Headers added to every request.
    pub fn default_headers(&self) -> &[(String, String)] {
        &self.default_headers
    }

    /// The base URL, checked to be an absolute URL that paths can hang off.
    pub fn parsed_base_url(&self) -> Result<Url, ConfigError> {
        let url = Url::parse(&self.base_url).map_err(|source| ConfigError::InvalidBaseUrl {
            url: self.base_url.clone(),
            source,
        })?;
        if url.cannot_be_a_base() {
            return Err(ConfigError::InvalidValue {
                key: ENV_BASE_URL,
                value: self.base_url.clone(),
                message: "expected an http(s) URL",
            });
        }
        Ok(url)
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::fs;
    use tempfile::TempDir;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let options = ClientOptions::default();
        assert_eq!(options.base_url(), DEFAULT_BASE_URL);
        assert_eq!(options.timeout(), Duration::from_secs(60));
        assert!(!options.response_validation());
        assert!(options.default_headers().is_empty());
        assert!(options.parsed_base_url().is_ok());
    }

    #[test]
    fn test_builder_setters() {
        let options = ClientOptions::new()
            .with_base_url("http://localhost:9000")
            .with_timeout(Duration::from_secs(3))
            .with_response_validation(true)
            .with_default_header("Authorization", "Bearer sk_test");
        assert_eq!(options.base_url(), "http://localhost:9000");
        assert_eq!(options.timeout(), Duration::from_secs(3));
        assert!(options.response_validation());
        assert_eq!(
            options.default_headers(),
            &[("Authorization".to_string(), "Bearer sk_test".to_string())]
        );
    }

    #[test]
    fn test_from_lookup() {
        let options = ClientOptions::from_lookup(lookup(&[
            (ENV_BASE_URL, "http://127.0.0.1:4010"),
            (ENV_TIMEOUT_SECS, "15"),
            (ENV_RESPONSE_VALIDATION, "TRUE"),
        ]))
        .unwrap();
        assert_eq!(options.base_url(), "http://127.0.0.1:4010");
        assert_eq!(options.timeout(), Duration::from_secs(15));
        assert!(options.response_validation());
    }

    #[test]
    fn test_from_lookup_rejects_bad_values() {
        let err = ClientOptions::from_lookup(lookup(&[(ENV_TIMEOUT_SECS, "soon")])).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                key: ENV_TIMEOUT_SECS,
                ..
            }
        ));

        let err = ClientOptions::from_lookup(lookup(&[(ENV_TIMEOUT_SECS, "0")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));

        let err =
            ClientOptions::from_lookup(lookup(&[(ENV_RESPONSE_VALIDATION, "maybe")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));

        let err = ClientOptions::from_lookup(lookup(&[(ENV_BASE_URL, "not a url")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidBaseUrl { .. }));

        let err = ClientOptions::from_lookup(lookup(&[(ENV_BASE_URL, "mailto:ops@meridian.dev")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn test_from_dotenv() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".env");
        fs::write(
            &path,
            "MERIDIAN_BASE_URL=http://localhost:8080\nMERIDIAN_RESPONSE_VALIDATION=on\n",
        )
        .unwrap();

        let options = ClientOptions::from_dotenv(&path).unwrap();
        if std::env::var(ENV_BASE_URL).is_err() {
            assert_eq!(options.base_url(), "http://localhost:8080");
        }
        if std::env::var(ENV_RESPONSE_VALIDATION).is_err() {
            assert!(options.response_validation());
        }
    }

    #[test]
    fn test_from_dotenv_reports_parse_errors() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".env");
        fs::write(&path, "MERIDIAN_BASE_URL = http://localhost\n").unwrap();
        assert!(matches!(
            ClientOptions::from_dotenv(&path).unwrap_err(),
            ConfigError::Dotenv(_)
        ));
    }
}
