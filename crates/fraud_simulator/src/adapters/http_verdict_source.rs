// Rust guideline compliant 2026-10-19

//! HTTP adapter for the `VerdictSource` port.
//!
//! One `GET {endpoint}/transaction/{transaction_id}` per `fetch`. A success
//! status carries a JSON verdict; any other status means "not ready yet".

use std::time::Duration;

use domain::{QueryError, Verdict, VerdictSource};

/// `VerdictSource` adapter over a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct HttpVerdictSource {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpVerdictSource {
    /// Create an adapter for the service at `endpoint` (scheme, host and port).
    ///
    /// `request_timeout` bounds each individual request.
    ///
    /// # Errors
    ///
    /// Returns `reqwest::Error` when the HTTP client cannot be built.
    pub fn new(endpoint: &str, request_timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(request_timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_owned(),
        })
    }

    /// URL queried for `transaction_id`.
    #[must_use]
    pub fn verdict_url(&self, transaction_id: &str) -> String {
        format!("{}/transaction/{transaction_id}", self.endpoint)
    }
}

impl VerdictSource for HttpVerdictSource {
    async fn fetch(&self, transaction_id: &str) -> Result<Verdict, QueryError> {
        let response = self
            .client
            .get(self.verdict_url(transaction_id))
            .send()
            .await
            .map_err(|e| QueryError::Transport { reason: e.to_string() })?;

        let status = response.status();
        if !status.is_success() {
            return Err(QueryError::NotReady { status: status.as_u16() });
        }

        response
            .json::<Verdict>()
            .await
            .map_err(|e| QueryError::Decode { reason: e.to_string() })
    }
}
