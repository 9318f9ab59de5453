// # DNS Provider Trait
//
// Defines the interface for reading and writing TXT records via a DNS
// provider's management API.
//
// ## Implementations
//
// - Cloudflare: `dnslink-provider-cloudflare` crate
//
// ## Usage
//
// ```rust,ignore
// use dnslink_core::DnsProvider;
//
// let records = provider.list_txt_records("zone-id", "_dnslink.example.com").await?;
// for record in records {
//     println!("{} {}", record.id, record.content);
// }
// ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Record type handled by this system
pub const TXT: &str = "TXT";

/// A DNS record as returned by the provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsRecord {
    /// The record ID (provider-specific)
    pub id: String,
    /// The record name
    pub name: String,
    /// The record type, always `TXT` here
    #[serde(rename = "type")]
    pub record_type: String,
    /// The record content
    pub content: String,
}

impl DnsRecord {
    /// Create a TXT record value
    pub fn txt(
        id: impl Into<String>,
        name: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            record_type: TXT.to_string(),
            content: content.into(),
        }
    }
}

/// Trait for DNS provider implementations
///
/// Providers are single-shot: each method performs one API call and returns
/// its result or error. They do not retry, cache, or decide whether a write
/// is needed; that decision belongs to [`crate::DnslinkReconciler`].
#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// List TXT records in `zone_id` whose name equals `name`
    ///
    /// Records are returned in provider order.
    async fn list_txt_records(
        &self,
        zone_id: &str,
        name: &str,
    ) -> Result<Vec<DnsRecord>, crate::Error>;

    /// Create a TXT record
    ///
    /// # Returns
    ///
    /// The record as stored by the provider.
    async fn create_txt_record(
        &self,
        zone_id: &str,
        name: &str,
        content: &str,
    ) -> Result<DnsRecord, crate::Error>;

    /// Replace the content of an existing TXT record, keeping its id
    async fn edit_txt_record(
        &self,
        zone_id: &str,
        record_id: &str,
        name: &str,
        content: &str,
    ) -> Result<DnsRecord, crate::Error>;

    /// Get the provider name (for logging/debugging)
    fn provider_name(&self) -> &'static str;
}
