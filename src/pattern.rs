//! Pattern submission to the natural-language-to-regex endpoint.
//!
//! The pattern is sent verbatim as `{"nat_lang_input": "<pattern>"}` in a single `POST`. There is
//! no retry; a second submission while one is outstanding simply issues a second request.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::SubmitResult;

/// Default regex-generation endpoint.
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:8000/api/generateregex";

/// Environment variable overriding [`DEFAULT_ENDPOINT`].
pub const ENDPOINT_ENV: &str = "RHOMBUS_REGEX_ENDPOINT";

/// User-entered free text. Not validated or bounded.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PatternQuery(pub String);

impl PatternQuery {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PatternQuery {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// JSON body sent to (and echoed back by) the endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateRegexRequest {
    pub nat_lang_input: String,
}

impl From<&PatternQuery> for GenerateRegexRequest {
    fn from(q: &PatternQuery) -> Self {
        Self {
            nat_lang_input: q.0.clone(),
        }
    }
}

/// Serialize `query` to the request body.
pub fn request_body(query: &PatternQuery) -> SubmitResult<String> {
    Ok(serde_json::to_string(&GenerateRegexRequest::from(query))?)
}

/// Submitter configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitterConfig {
    pub endpoint: String,
    /// `None` waits indefinitely.
    pub timeout: Option<Duration>,
    /// Honour `HTTP_PROXY`/`HTTPS_PROXY` from the environment.
    pub use_system_proxy: bool,
}

impl Default for SubmitterConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: None,
            use_system_proxy: true,
        }
    }
}

impl SubmitterConfig {
    /// Default config, with the endpoint taken from [`ENDPOINT_ENV`] when set and non-empty.
    pub fn from_env() -> Self {
        Self::with_endpoint_override(std::env::var(ENDPOINT_ENV).ok())
    }

    fn with_endpoint_override(endpoint: Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(url) = endpoint.filter(|s| !s.trim().is_empty()) {
            config.endpoint = url.trim().to_string();
        }
        config
    }
}

/// Raw response from the endpoint.
///
/// Any HTTP status is a `Submission`; only transport failures are errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub status: u16,
    pub body: String,
}

impl Submission {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// The endpoint answers `201` with the request it accepted; returns it if the body has
    /// that shape.
    pub fn echo(&self) -> Option<GenerateRegexRequest> {
        serde_json::from_str(&self.body).ok()
    }
}

#[cfg(feature = "submit")]
pub use client::PatternSubmitter;

#[cfg(feature = "submit")]
mod client {
    use reqwest::blocking::Client;
    use reqwest::header::CONTENT_TYPE;
    use tracing::info;

    use super::{PatternQuery, Submission, SubmitterConfig, request_body};
    use crate::error::SubmitResult;

    /// Blocking client for the regex-generation endpoint.
    #[derive(Debug, Clone)]
    pub struct PatternSubmitter {
        config: SubmitterConfig,
        client: Client,
    }

    impl PatternSubmitter {
        /// Build the blocking HTTP client described by `config`.
        pub fn new(config: SubmitterConfig) -> SubmitResult<Self> {
            let mut builder = Client::builder().timeout(config.timeout);
            if !config.use_system_proxy {
                builder = builder.no_proxy();
            }
            let client = builder.build()?;
            Ok(Self { config, client })
        }

        /// URL every submission is posted to.
        pub fn endpoint(&self) -> &str {
            &self.config.endpoint
        }

        /// Issue exactly one `POST` for `query`.
        pub fn submit(&self, query: &PatternQuery) -> SubmitResult<Submission> {
            info!(pattern = query.as_str(), "pattern submitted");
            let body = request_body(query)?;

            let response = self
                .client
                .post(&self.config.endpoint)
                .header(CONTENT_TYPE, "application/json")
                .body(body)
                .send()?;

            let status = response.status().as_u16();
            let body = response.text()?;
            info!(status, body = %body, endpoint = %self.config.endpoint, "regex endpoint responded");
            Ok(Submission { status, body })
        }
    }
}
