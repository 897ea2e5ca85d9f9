// # HTTP Record API
//
// This crate implements `RecordApi` over the remote record service's JSON
// API.
//
// ## Responsibility boundaries
//
// - Makes exactly one HTTP request per trait call
// - Full error propagation to the core (the core owns the failure policy:
//   session invalidation on fetch, field mapping on update, swallowing on
//   delete)
// - HTTP timeout configured (30 seconds)
// - NO retry logic (intentionally omitted)
// - NO caching (the table store is the single source of truth)
// - NO interpretation of rejection codes (owned by the row editor)
//
// ## Wire format
//
// Every success body is wrapped in a data envelope, every failure body in
// a detail envelope:
//
// ```json
// {"data": { ... }}
// {"detail": {"errors": [{"code": "unavailable_label"}]}}
// ```
//
// - List records:  GET    `{base}/ips?items_per_page=10&page_number=0`
// - Update record: PATCH  `{base}/ips/{id}` (changed fields only)
// - Delete record: DELETE `{base}/ips/{id}`
//
// ## Security
//
// The bearer token comes from the injected credential store on every
// request and never appears in logs or Debug output.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use ipboard_core::model::{RecordPage, RecordPatch};
use ipboard_core::traits::CredentialStore;
use ipboard_core::traits::RecordApi;
use ipboard_core::{Error, RejectionCode, Result};

/// HTTP timeout for API requests
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Success envelope: `{"data": ...}`
#[derive(Debug, Deserialize)]
struct DataEnvelope<T> {
    data: T,
}

/// Failure envelope: `{"detail": {"errors": [{"code": "..."}]}}`
#[derive(Debug, Deserialize)]
struct FailureEnvelope {
    detail: FailureDetail,
}

#[derive(Debug, Deserialize)]
struct FailureDetail {
    #[serde(default)]
    errors: Vec<WireError>,
}

#[derive(Debug, Deserialize)]
struct WireError {
    code: String,
}

/// Deletion acknowledgement payload
#[derive(Debug, Deserialize)]
struct DeleteAck {
    success: bool,
}

/// Record API over the remote JSON service
pub struct HttpRecordApi {
    base_url: String,
    client: reqwest::Client,
    credentials: Arc<dyn CredentialStore>,
}

// The credential store is a trait object and holds tokens; keep both out
// of Debug output.
impl std::fmt::Debug for HttpRecordApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpRecordApi")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl HttpRecordApi {
    /// Create a client for the service at `base_url`
    ///
    /// Trailing slashes are stripped so endpoint paths compose cleanly.
    pub fn new(base_url: impl Into<String>, credentials: Arc<dyn CredentialStore>) -> Result<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(Error::config("API base URL cannot be empty"));
        }

        let client = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .map_err(|e| Error::http(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            base_url,
            client,
            credentials,
        })
    }

    /// The current access token, or a session error when logged out
    async fn access_token(&self) -> Result<String> {
        let credentials = self.credentials.load().await?;
        match credentials {
            Some(c) => Ok(c.access_token),
            None => Err(Error::session("No credentials available")),
        }
    }

    fn ips_url(&self) -> String {
        format!("{}/ips", self.base_url)
    }

    fn ip_url(&self, id: i64) -> String {
        format!("{}/ips/{}", self.base_url, id)
    }

    /// Turn a non-success response into an error
    ///
    /// Reads the body and hands it to [`parse_failure`].
    async fn failure(&self, response: reqwest::Response) -> Error {
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unable to read error response".to_string());
        parse_failure(status, &body)
    }
}

/// Parse a success body's data envelope
fn parse_data<T: DeserializeOwned>(body: &str) -> Result<T> {
    let envelope: DataEnvelope<T> = serde_json::from_str(body)
        .map_err(|e| Error::api(format!("Failed to parse response: {}", e)))?;
    Ok(envelope.data)
}

/// Map a failure status and body to an error
///
/// A parseable detail envelope becomes a structured rejection carrying the
/// server's codes in order. Anything else maps on the status alone.
fn parse_failure(status: u16, body: &str) -> Error {
    if let Ok(envelope) = serde_json::from_str::<FailureEnvelope>(body)
        && !envelope.detail.errors.is_empty()
    {
        let codes = envelope
            .detail
            .errors
            .iter()
            .map(|e| RejectionCode::from_code(&e.code))
            .collect();
        return Error::rejected_all(codes);
    }

    match status {
        401 | 403 => Error::http(format!(
            "Authentication failed: invalid or expired token. Status: {}",
            status
        )),
        404 => Error::api(format!("Not found. Status: {}", status)),
        429 => Error::http(format!("Rate limit exceeded. Status: {}", status)),
        500..=599 => Error::http(format!("Server error: {} - {}", status, body)),
        _ => Error::api(format!("Request failed: {} - {}", status, body)),
    }
}

#[async_trait]
impl RecordApi for HttpRecordApi {
    async fn fetch_page(&self, items_per_page: u32, page_number: u32) -> Result<RecordPage> {
        let token = self.access_token().await?;

        tracing::debug!(items_per_page, page_number, "Fetching record page");
        let response = self
            .client
            .get(self.ips_url())
            .bearer_auth(&token)
            .query(&[("items_per_page", items_per_page), ("page_number", page_number)])
            .send()
            .await
            .map_err(|e| Error::http(format!("HTTP request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(self.failure(response).await);
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::http(format!("Failed to read response: {}", e)))?;
        let page: RecordPage = parse_data(&body)?;

        tracing::debug!(
            page_number = page.page_number,
            count = page.count,
            total = page.num_total_items,
            "Record page fetched"
        );
        Ok(page)
    }

    async fn update_record(&self, id: i64, patch: &RecordPatch) -> Result<()> {
        let token = self.access_token().await?;

        tracing::debug!(id, "Updating record");
        let response = self
            .client
            .patch(self.ip_url(id))
            .bearer_auth(&token)
            .json(patch)
            .send()
            .await
            .map_err(|e| Error::http(format!("HTTP request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(self.failure(response).await);
        }

        // The body echoes the updated record; the core's local patch is
        // authoritative, so it is not parsed.
        tracing::debug!(id, "Record updated");
        Ok(())
    }

    async fn delete_record(&self, id: i64) -> Result<()> {
        let token = self.access_token().await?;

        tracing::debug!(id, "Deleting record");
        let response = self
            .client
            .delete(self.ip_url(id))
            .bearer_auth(&token)
            .send()
            .await
            .map_err(|e| Error::http(format!("HTTP request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(self.failure(response).await);
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::http(format!("Failed to read response: {}", e)))?;
        let ack: DeleteAck = parse_data(&body)?;
        if !ack.success {
            return Err(Error::api(format!("Deletion of record {} not acknowledged", id)));
        }

        tracing::debug!(id, "Record deleted");
        Ok(())
    }
}
