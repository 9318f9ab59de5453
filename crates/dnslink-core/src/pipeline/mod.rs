//! Publish pipeline
//!
//! Runs one publish end to end:
//!
//! ```text
//! ┌─────────────┐  cid   ┌──────────────────┐  outcome  ┌────────────────┐
//! │ W3Uploader  │──────► │ DnslinkReconciler│─────────► │ ActionsReporter│
//! │ (space add, │        │ (list, create or │           │ (outputs,      │
//! │  up --json) │        │  edit TXT)       │           │  summary)      │
//! └─────────────┘        └──────────────────┘           └────────────────┘
//! ```
//!
//! Steps run strictly in sequence. The first error aborts the rest and is
//! returned as-is; nothing is retried.

use crate::config::RunConfig;
use crate::error::Result;
use crate::reconciler::DnslinkReconciler;
use crate::report::{ActionsReporter, PublishReport};
use crate::traits::{CommandRunner, DnsProvider};
use crate::uploader::W3Uploader;
use tracing::info;

/// Upload → dnslink → report
pub struct PublishPipeline {
    config: RunConfig,
    uploader: W3Uploader,
    reconciler: DnslinkReconciler,
    reporter: ActionsReporter,
}

impl PublishPipeline {
    /// Create a pipeline
    ///
    /// # Parameters
    ///
    /// - `config`: Validated before anything else is constructed
    /// - `runner`: Runs the uploader CLI
    /// - `provider`: DNS provider holding the zone
    /// - `reporter`: Destination for outputs and the summary
    pub fn new(
        config: RunConfig,
        runner: Box<dyn CommandRunner>,
        provider: Box<dyn DnsProvider>,
        reporter: ActionsReporter,
    ) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            uploader: W3Uploader::new(runner, &config),
            reconciler: DnslinkReconciler::new(provider),
            reporter,
            config,
        })
    }

    /// Run the pipeline once
    ///
    /// # Returns
    ///
    /// - `Ok(PublishReport)`: Outputs and summary were written
    /// - `Err(Error)`: The first failure; later steps did not run
    pub async fn run(&self) -> Result<PublishReport> {
        info!(
            "Publishing {} to {} (zone {})",
            self.config.directory, self.config.zone_name, self.config.zone_id
        );

        self.uploader.add_space(&self.config.upload_proof).await?;
        let upload = self.uploader.upload(&self.config.directory).await?;

        let outcome = self
            .reconciler
            .reconcile(&self.config.zone_name, &upload.cid, &self.config.zone_id)
            .await?;

        let report = PublishReport::new(
            upload.cid,
            &self.config.zone_name,
            &self.config.gateway_base,
            outcome,
        );
        self.reporter.report(&report).await?;

        Ok(report)
    }
}
