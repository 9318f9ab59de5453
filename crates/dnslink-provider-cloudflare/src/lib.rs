// # Cloudflare DNS Provider
//
// This crate provides a Cloudflare implementation of `dnslink_core::DnsProvider`
// for TXT records.
//
// ## Behavior
//
// - One HTTP request per trait call; no retry, no backoff, no caching
// - Full error propagation to the caller, with HTTP status codes mapped to
//   specific error kinds (401/403, 404, 409, 429, 5xx)
// - HTTP timeout configured (30 seconds)
// - Dry-run mode: list requests are sent, writes are logged and skipped
//
// ## Security Requirements
//
// - API token NEVER appears in logs or `Debug` output
// - Construction fails fast if the token is empty
//
// ## API Reference
//
// - Cloudflare API v4: https://developers.cloudflare.com/api/
// - List DNS Records: GET `/zones/:zone_id/dns_records?type=TXT&name=...`
// - Create DNS Record: POST `/zones/:zone_id/dns_records`
// - Edit DNS Record: PATCH `/zones/:zone_id/dns_records/:record_id`

use async_trait::async_trait;
use dnslink_core::traits::{DnsProvider, DnsRecord, TXT};
use dnslink_core::{Error, Result};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Cloudflare API base URL
const CLOUDFLARE_API_BASE: &str = "https://api.cloudflare.com/client/v4";

/// Default HTTP timeout for API requests (30 seconds)
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

const PROVIDER_NAME: &str = "cloudflare";

/// Response envelope shared by every Cloudflare v4 endpoint
#[derive(Debug, Deserialize)]
struct ApiEnvelope<T> {
    success: bool,
    #[serde(default)]
    errors: Vec<ApiMessage>,
    result: Option<T>,
}

#[derive(Debug, Deserialize)]
struct ApiMessage {
    code: i64,
    message: String,
}

/// Body of create and edit requests
#[derive(Debug, Serialize)]
struct TxtRecordRequest<'a> {
    content: &'a str,
    name: &'a str,
    #[serde(rename = "type")]
    record_type: &'a str,
}

/// Cloudflare DNS provider
///
/// Stateless and single-shot. Whether a write is needed is decided by
/// `DnslinkReconciler`, not here.
///
/// # Dry-Run Mode
///
/// When `dry_run` is true, the provider will:
/// - Perform list requests
/// - Log the intended POST/PATCH payload
/// - **NOT** modify DNS records, returning the record as it would be stored
pub struct CloudflareProvider {
    /// Cloudflare API token
    /// ⚠️ NEVER log this value
    api_token: String,

    /// API root, overridable for tests
    api_base: String,

    /// HTTP client for API requests
    client: reqwest::Client,

    /// Dry-run mode: if true, perform list requests but skip writes
    dry_run: bool,
}

// Custom Debug implementation that hides the API token
impl std::fmt::Debug for CloudflareProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudflareProvider")
            .field("api_token", &"<REDACTED>")
            .field("api_base", &self.api_base)
            .field("dry_run", &self.dry_run)
            .finish()
    }
}

impl CloudflareProvider {
    /// Create a new Cloudflare provider
    ///
    /// # Parameters
    ///
    /// - `api_token`: Cloudflare API token with Zone:DNS:Edit permissions
    /// - `dry_run`: If true, perform list requests but skip writes
    pub fn new(api_token: impl Into<String>, dry_run: bool) -> Result<Self> {
        let api_token = api_token.into();
        if api_token.is_empty() {
            return Err(Error::config("Cloudflare API token cannot be empty"));
        }

        let client = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .map_err(|e| Error::http(format!("Failed to build HTTP client: {}", e)))?;

        if dry_run {
            tracing::warn!("Cloudflare provider running in DRY-RUN mode - no changes will be made");
        }

        Ok(Self {
            api_token,
            api_base: CLOUDFLARE_API_BASE.to_string(),
            client,
            dry_run,
        })
    }

    /// Point the provider at a different API root
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    /// Whether writes are skipped
    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Send one request and unwrap the Cloudflare envelope
    ///
    /// # Parameters
    ///
    /// - `method`: HTTP method
    /// - `path`: Path below the API root, starting with `/`
    /// - `query`: Query parameters
    /// - `body`: Optional JSON body
    /// - `context`: Short description used in error messages
    async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: Option<&TxtRecordRequest<'_>>,
        context: &str,
    ) -> Result<T> {
        let url = format!("{}{}", self.api_base, path);
        tracing::debug!("{} {}", method, url);

        let mut request = self
            .client
            .request(method, &url)
            .bearer_auth(&self.api_token)
            .query(query);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| Error::http(format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unable to read error response".to_string());

        if !status.is_success() {
            return Err(status_error(status, &text, context));
        }

        let envelope: ApiEnvelope<T> = serde_json::from_str(&text).map_err(|e| {
            Error::provider(PROVIDER_NAME, format!("Failed to parse response: {}", e))
        })?;

        if !envelope.success {
            return Err(Error::provider(
                PROVIDER_NAME,
                format!("{} failed: {}", context, describe_errors(&envelope.errors)),
            ));
        }

        envelope.result.ok_or_else(|| {
            Error::provider(PROVIDER_NAME, "Invalid response format: result is missing")
        })
    }

    fn dry_run_write(&self, action: &str, url: &str, payload: &TxtRecordRequest<'_>) {
        tracing::info!(
            "[DRY-RUN] Would send {} request to {} with payload: {}",
            action,
            url,
            serde_json::to_string(payload).unwrap_or_default()
        );
    }
}

#[async_trait]
impl DnsProvider for CloudflareProvider {
    /// List TXT records named `name`
    ///
    /// ```http
    /// GET /zones/:zone_id/dns_records?type=TXT&name=_dnslink.example.com
    /// Authorization: Bearer <token>
    /// ```
    async fn list_txt_records(&self, zone_id: &str, name: &str) -> Result<Vec<DnsRecord>> {
        tracing::debug!("Listing TXT records: {} (zone: {})", name, zone_id);

        let records: Vec<DnsRecord> = self
            .request(
                Method::GET,
                &format!("/zones/{}/dns_records", zone_id),
                &[("type", TXT), ("name", name)],
                None,
                "Record lookup",
            )
            .await?;

        tracing::debug!("Found {} TXT record(s) for {}", records.len(), name);
        Ok(records)
    }

    /// Create a TXT record
    ///
    /// ```http
    /// POST /zones/:zone_id/dns_records
    /// { "content": "dnslink=/ipfs/<cid>", "name": "...", "type": "TXT" }
    /// ```
    async fn create_txt_record(&self, zone_id: &str, name: &str, content: &str) -> Result<DnsRecord> {
        let path = format!("/zones/{}/dns_records", zone_id);
        let payload = TxtRecordRequest {
            content,
            name,
            record_type: TXT,
        };

        if self.dry_run {
            self.dry_run_write("POST", &path, &payload);
            return Ok(DnsRecord::txt("dry-run", name, content));
        }

        let record: DnsRecord = self
            .request(Method::POST, &path, &[], Some(&payload), "Record creation")
            .await?;

        tracing::info!("DNS record created: {} ({})", record.name, record.id);
        Ok(record)
    }

    /// Replace the content of a TXT record
    ///
    /// ```http
    /// PATCH /zones/:zone_id/dns_records/:record_id
    /// { "content": "dnslink=/ipfs/<cid>", "name": "...", "type": "TXT" }
    /// ```
    async fn edit_txt_record(
        &self,
        zone_id: &str,
        record_id: &str,
        name: &str,
        content: &str,
    ) -> Result<DnsRecord> {
        let path = format!("/zones/{}/dns_records/{}", zone_id, record_id);
        let payload = TxtRecordRequest {
            content,
            name,
            record_type: TXT,
        };

        if self.dry_run {
            self.dry_run_write("PATCH", &path, &payload);
            return Ok(DnsRecord::txt(record_id, name, content));
        }

        let record: DnsRecord = self
            .request(Method::PATCH, &path, &[], Some(&payload), "Record update")
            .await?;

        tracing::info!("DNS record updated: {} ({})", record.name, record.id);
        Ok(record)
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER_NAME
    }
}

/// Map a non-success HTTP status to an error
fn status_error(status: StatusCode, body: &str, context: &str) -> Error {
    let detail = serde_json::from_str::<ApiEnvelope<serde_json::Value>>(body)
        .ok()
        .filter(|envelope| !envelope.errors.is_empty())
        .map(|envelope| describe_errors(&envelope.errors))
        .unwrap_or_else(|| body.to_string());

    match status.as_u16() {
        401 | 403 => Error::auth(format!(
            "Invalid API token or insufficient permissions. Status: {} - {}",
            status, detail
        )),
        404 => Error::not_found(format!("{}: {} - {}", context, status, detail)),
        409 => Error::provider(
            PROVIDER_NAME,
            format!("Conflict: Record is being updated by another process. Status: {}", status),
        ),
        429 => Error::rate_limited(format!("Please retry later. Status: {}", status)),
        500..=599 => Error::provider(
            PROVIDER_NAME,
            format!("Cloudflare server error (transient): {} - {}", status, detail),
        ),
        _ => Error::provider(
            PROVIDER_NAME,
            format!("{} failed: {} - {}", context, status, detail),
        ),
    }
}

fn describe_errors(errors: &[ApiMessage]) -> String {
    if errors.is_empty() {
        return "unknown error".to_string();
    }

    errors
        .iter()
        .map(|e| format!("{} ({})", e.message, e.code))
        .collect::<Vec<_>>()
        .join("; ")
}
