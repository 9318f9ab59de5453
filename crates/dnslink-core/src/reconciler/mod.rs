//! DNSLink reconciler
//!
//! Ensures a zone carries a TXT record `dnslink=/ipfs/<cid>` under a given
//! name, using a [`DnsProvider`] for all reads and writes.
//!
//! ## Decision Procedure
//!
//! ```text
//! list TXT records (zone, name)
//!   │
//!   ├─ empty ─────────────────────────────────────► create
//!   │
//!   └─ first record starting with "dnslink=/ipfs/"
//!        ├─ none ─────────────────────────────────► create (others untouched)
//!        ├─ content == target ────────────────────► no-op
//!        └─ content != target ────────────────────► edit in place (same id)
//! ```
//!
//! Only the first dnslink record in list order is considered. Stale
//! duplicates are left alone. Provider errors propagate unchanged; there is no
//! retry.

use crate::error::Result;
use crate::traits::{DnsProvider, DnsRecord};
use tracing::{debug, info};

/// Prefix identifying a dnslink TXT value
pub const DNSLINK_PREFIX: &str = "dnslink=/ipfs/";

/// Build the TXT content pointing at `cid`
pub fn dnslink_content(cid: &str) -> String {
    format!("{}{}", DNSLINK_PREFIX, cid)
}

/// Result of a reconcile call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// No dnslink record existed; one was created
    Created {
        /// The created record
        record: DnsRecord,
    },
    /// A stale dnslink record was edited in place
    Updated {
        /// The record after the edit
        record: DnsRecord,
        /// Content before the edit
        previous_content: String,
    },
    /// The dnslink record already pointed at the CID (no-op)
    Unchanged {
        /// The existing record
        record: DnsRecord,
    },
}

impl ReconcileOutcome {
    /// The record carrying the dnslink after reconciliation
    pub fn record(&self) -> &DnsRecord {
        match self {
            Self::Created { record } | Self::Updated { record, .. } | Self::Unchanged { record } => {
                record
            }
        }
    }

    /// Short verb describing what happened
    pub fn action(&self) -> &'static str {
        match self {
            Self::Created { .. } => "created",
            Self::Updated { .. } => "updated",
            Self::Unchanged { .. } => "unchanged",
        }
    }
}

/// Reconciles the dnslink TXT record for a zone
pub struct DnslinkReconciler {
    provider: Box<dyn DnsProvider>,
}

impl DnslinkReconciler {
    /// Create a reconciler backed by `provider`
    pub fn new(provider: Box<dyn DnsProvider>) -> Self {
        Self { provider }
    }

    /// Make the TXT record `name` in `zone_id` point at `cid`
    ///
    /// Idempotent: a second call with the same arguments issues no writes.
    /// New records are created under `name`.
    pub async fn reconcile(&self, name: &str, cid: &str, zone_id: &str) -> Result<ReconcileOutcome> {
        let content = dnslink_content(cid);

        let records = self.provider.list_txt_records(zone_id, name).await?;
        debug!(
            "Found {} TXT record(s) for {} via {}",
            records.len(),
            name,
            self.provider.provider_name()
        );

        let Some(found) = records
            .into_iter()
            .find(|record| record.content.starts_with(DNSLINK_PREFIX))
        else {
            info!("Creating dnslink record {} -> {}", name, content);
            let record = self.provider.create_txt_record(zone_id, name, &content).await?;
            return Ok(ReconcileOutcome::Created { record });
        };

        if found.content == content {
            info!("Dnslink record {} already points at {}", name, cid);
            return Ok(ReconcileOutcome::Unchanged { record: found });
        }

        info!(
            "Updating dnslink record {} ({}): {} -> {}",
            name, found.id, found.content, content
        );
        let record = self
            .provider
            .edit_txt_record(zone_id, &found.id, name, &content)
            .await?;

        Ok(ReconcileOutcome::Updated {
            record,
            previous_content: found.content,
        })
    }
}
