//! CI step reporting
//!
//! Publishes the result of a run through the GitHub Actions file-command
//! protocol:
//!
//! - outputs `cid` and `url` are appended to `$GITHUB_OUTPUT` using a
//!   heredoc-style delimiter, or printed as legacy `::set-output` commands
//!   when that file is not available
//! - an HTML summary is appended to `$GITHUB_STEP_SUMMARY`, if set
//!
//! Purely presentational: nothing here influences DNS or upload behavior.

pub mod summary;

pub use summary::Summary;

use crate::error::{Error, Result};
use crate::reconciler::ReconcileOutcome;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

/// Environment variable naming the step output file
pub const OUTPUT_FILE_ENV: &str = "GITHUB_OUTPUT";

/// Environment variable naming the job summary file
pub const SUMMARY_FILE_ENV: &str = "GITHUB_STEP_SUMMARY";

/// Prefix stripped from the zone name to obtain the site host
const DNSLINK_LABEL: &str = "_dnslink.";

/// Everything a finished run reports
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishReport {
    /// Uploaded root CID
    pub cid: String,
    /// Gateway URL serving the CID
    pub gateway_url: String,
    /// Site URL resolved through the dnslink record
    pub dnslink_url: String,
    /// What the reconciler did
    pub outcome: ReconcileOutcome,
}

impl PublishReport {
    /// Derive the report for `cid` published under `zone_name`
    pub fn new(
        cid: impl Into<String>,
        zone_name: &str,
        gateway_base: &str,
        outcome: ReconcileOutcome,
    ) -> Self {
        let cid = cid.into();
        Self {
            gateway_url: gateway_url(gateway_base, &cid),
            dnslink_url: dnslink_url(zone_name),
            cid,
            outcome,
        }
    }

    /// Render the summary section for this report
    pub fn summary(&self) -> Summary {
        let record = self.outcome.record();
        let status = format!(
            "<p>TXT record <code>{}</code> {}</p>",
            summary::escape_html(&record.name),
            self.outcome.action()
        );

        Summary::new()
            .add_heading("CID", 2)
            .add_code_block(&self.cid)
            .add_heading("URL", 2)
            .add_link(&self.gateway_url, &self.gateway_url)
            .add_heading("DNSLink", 2)
            .add_link(&self.dnslink_url, &self.dnslink_url)
            .add_raw(&status)
            .add_eol()
    }
}

/// Gateway URL for `cid` under `base`
pub fn gateway_url(base: &str, cid: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), cid)
}

/// Site URL for a dnslink zone name, dropping a leading `_dnslink.` label
pub fn dnslink_url(zone_name: &str) -> String {
    let host = zone_name.strip_prefix(DNSLINK_LABEL).unwrap_or(zone_name);
    format!("https://{}", host)
}

/// Workflow command marking the step as failed with `message`
pub fn error_command(message: &str) -> String {
    format!("::error::{}", escape_data(message))
}

/// Destination of workflow commands, normally stdout
pub type CommandSink = Arc<Mutex<dyn Write + Send>>;

/// Writes step outputs and the job summary
#[derive(Clone)]
pub struct ActionsReporter {
    output_path: Option<PathBuf>,
    summary_path: Option<PathBuf>,
    commands: CommandSink,
}

impl std::fmt::Debug for ActionsReporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionsReporter")
            .field("output_path", &self.output_path)
            .field("summary_path", &self.summary_path)
            .finish_non_exhaustive()
    }
}

impl Default for ActionsReporter {
    fn default() -> Self {
        Self::new(None, None)
    }
}

impl ActionsReporter {
    /// Create a reporter writing to explicit files
    ///
    /// Workflow commands go to stdout unless replaced with
    /// [`ActionsReporter::with_command_sink`].
    pub fn new(output_path: Option<PathBuf>, summary_path: Option<PathBuf>) -> Self {
        Self {
            output_path,
            summary_path,
            commands: Arc::new(Mutex::new(std::io::stdout())),
        }
    }

    /// Send workflow commands to `sink` instead of stdout
    pub fn with_command_sink(mut self, sink: CommandSink) -> Self {
        self.commands = sink;
        self
    }

    /// Set the `cid` and `url` outputs and append the summary
    pub async fn report(&self, report: &PublishReport) -> Result<()> {
        self.set_output("cid", &report.cid).await?;
        self.set_output("url", &report.gateway_url).await?;
        self.write_summary(&report.summary()).await?;

        info!("Published {} ({})", report.cid, report.outcome.action());
        Ok(())
    }

    /// Set a single step output
    ///
    /// Without an output file the legacy `::set-output` command is emitted.
    pub async fn set_output(&self, name: &str, value: &str) -> Result<()> {
        let Some(path) = &self.output_path else {
            return self.command(&format!("::set-output name={}::{}", name, escape_data(value)));
        };

        let delimiter = format!("ghadelimiter_{}", uuid::Uuid::new_v4());
        let entry = output_entry(name, value, &delimiter)?;
        append(path, &entry).await?;
        debug!("Set output {}", name);
        Ok(())
    }

    fn command(&self, line: &str) -> Result<()> {
        let mut sink = self
            .commands
            .lock()
            .map_err(|_| Error::Io(std::io::Error::other("workflow command sink poisoned")))?;
        writeln!(sink, "{}", line)?;
        sink.flush()?;
        Ok(())
    }

    /// Append `summary` to the job summary file
    pub async fn write_summary(&self, summary: &Summary) -> Result<()> {
        let Some(path) = &self.summary_path else {
            debug!("{} not set, skipping summary", SUMMARY_FILE_ENV);
            return Ok(());
        };

        if summary.is_empty() {
            return Ok(());
        }

        append(path, summary.as_str()).await
    }
}

/// Heredoc-style entry for the output file
fn output_entry(name: &str, value: &str, delimiter: &str) -> Result<String> {
    if name.contains(delimiter) || value.contains(delimiter) {
        return Err(Error::Io(std::io::Error::new(
            ErrorKind::InvalidData,
            format!("Output {} collides with its delimiter", name),
        )));
    }

    Ok(format!("{name}<<{delimiter}\n{value}\n{delimiter}\n"))
}

async fn append(path: &Path, text: &str) -> Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await?;

    file.write_all(text.as_bytes()).await?;
    file.flush().await?;
    Ok(())
}

/// Escape a workflow command payload
fn escape_data(value: &str) -> String {
    value
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}
