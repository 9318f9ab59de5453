// # dnslink-action
//
// Thin integration layer: all upload, DNS and reporting logic lives in
// dnslink-core and the provider crates.
//
// The binary is responsible for:
// 1. Reading the action inputs from environment variables
// 2. Initializing logging and the runtime
// 3. Wiring the Cloudflare provider and process runner into the pipeline
// 4. Turning the outcome into a workflow command and exit status
//
// ## Configuration
//
// Action inputs arrive as `INPUT_<NAME>` environment variables:
//
// - `INPUT_DIR`: Directory to upload
// - `INPUT_CF-TOKEN`: Cloudflare API token
// - `INPUT_CF-ZONE-ID`: Cloudflare zone ID
// - `INPUT_CF-ZONE-NAME`: TXT record name, e.g. `_dnslink.example.com`
// - `INPUT_W3S-KEY`: w3 signing key (`W3_PRINCIPAL`)
// - `INPUT_W3S-PROOF`: w3 space delegation proof
//
// Optional:
//
// - `DNSLINK_MODE`: `dry-run` to skip DNS writes
// - `DNSLINK_LOG_LEVEL`: trace, debug, info, warn, error (default: info)
// - `RUNNER_DEBUG`: `1` forces debug logging
// - `GITHUB_OUTPUT`: step output file; legacy `::set-output` commands otherwise
// - `GITHUB_STEP_SUMMARY`: job summary file; no summary otherwise
//
// ## Example
//
// ```bash
// export INPUT_DIR=dist
// export INPUT_CF-ZONE-NAME=_dnslink.example.com
// # ... remaining inputs
// dnslink-action
// ```

use anyhow::Result;
use dnslink_core::report::{ActionsReporter, OUTPUT_FILE_ENV, SUMMARY_FILE_ENV, error_command};
use dnslink_core::{PublishPipeline, RunConfig, TokioCommandRunner};
use std::env;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

/// Exit codes for the step
///
/// The runner only distinguishes success from failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ActionExitCode {
    /// Published and outputs set
    Success = 0,
    /// Any configuration or runtime failure
    Failure = 1,
}

impl From<ActionExitCode> for ExitCode {
    fn from(code: ActionExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Application configuration
struct Config {
    run: RunConfig,
    log_level: String,
    output_file: Option<PathBuf>,
    summary_file: Option<PathBuf>,
}

impl Config {
    /// Load configuration from environment variables
    fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through `lookup`, which resolves environment
    /// variable names
    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let dry_run = lookup("DNSLINK_MODE")
            .unwrap_or_default()
            .eq_ignore_ascii_case("dry-run");

        let log_level = if lookup("RUNNER_DEBUG").as_deref() == Some("1") {
            "debug".to_string()
        } else {
            lookup("DNSLINK_LOG_LEVEL").unwrap_or_else(|| "info".to_string())
        };

        let path = |name: &str| {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from)
        };

        Self {
            run: RunConfig::from_inputs(|name| lookup(&input_env_name(name)))
                .with_dry_run(dry_run),
            log_level,
            output_file: path(OUTPUT_FILE_ENV),
            summary_file: path(SUMMARY_FILE_ENV),
        }
    }

    /// Validate the configuration
    fn validate(&self) -> Result<()> {
        self.run.validate()?;

        if parse_log_level(&self.log_level).is_none() {
            anyhow::bail!(
                "DNSLINK_LOG_LEVEL '{}' is not valid. \
                Valid levels: trace, debug, info, warn, error",
                self.log_level
            );
        }

        Ok(())
    }
}

/// Environment variable carrying an action input
fn input_env_name(input: &str) -> String {
    format!("INPUT_{}", input.replace(' ', "_").to_uppercase())
}

fn parse_log_level(level: &str) -> Option<Level> {
    match level.to_lowercase().as_str() {
        "trace" => Some(Level::TRACE),
        "debug" => Some(Level::DEBUG),
        "info" => Some(Level::INFO),
        "warn" => Some(Level::WARN),
        "error" => Some(Level::ERROR),
        _ => None,
    }
}

/// Mark the step failed
fn fail(message: &str) -> ExitCode {
    println!("{}", error_command(message));
    ActionExitCode::Failure.into()
}

fn main() -> ExitCode {
    let config = Config::from_env();

    if let Err(e) = config.validate() {
        return fail(&e.to_string());
    }

    // Workflow commands go to stdout, so logs go to stderr
    let log_level = parse_log_level(&config.log_level).unwrap_or(Level::INFO);
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        return fail(&format!("Failed to set tracing subscriber: {}", e));
    }

    info!("Starting dnslink-action");

    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => return fail(&format!("Failed to create tokio runtime: {}", e)),
    };

    match rt.block_on(run_action(config)) {
        Ok(()) => ActionExitCode::Success.into(),
        Err(e) => {
            error!("Publish failed: {}", e);
            fail(&e.to_string())
        }
    }
}

/// Build the pipeline and run it once
async fn run_action(config: Config) -> Result<()> {
    let Config {
        run,
        output_file,
        summary_file,
        ..
    } = config;

    #[cfg(feature = "cloudflare")]
    let provider = Box::new(dnslink_provider_cloudflare::CloudflareProvider::new(
        run.dns_api_token.clone(),
        run.dry_run,
    )?);

    #[cfg(not(feature = "cloudflare"))]
    let provider: Box<dyn dnslink_core::DnsProvider> =
        anyhow::bail!("No DNS provider compiled in. Enable the `cloudflare` feature");

    let pipeline = PublishPipeline::new(
        run,
        Box::new(TokioCommandRunner::new()),
        provider,
        ActionsReporter::new(output_file, summary_file),
    )?;

    let report = pipeline.run().await?;
    info!("Gateway URL: {}", report.gateway_url);
    info!("DNSLink URL: {}", report.dnslink_url);

    Ok(())
}
