//! Uploader invocation
//!
//! Drives the external w3 CLI in two steps:
//!
//! ```text
//! <uploader> space add <proof>     # register the signing space
//! <uploader> up <dir> --json       # upload, prints {"root":{"/":"<cid>"}}
//! ```
//!
//! Both steps run with `W3_PRINCIPAL` set to the configured signing key. The
//! second step only starts after the first has exited successfully.

use crate::config::RunConfig;
use crate::error::{Error, Result};
use crate::traits::{CommandOutput, CommandRunner};
use tracing::{debug, info};

/// Environment variable carrying the signing key
pub const PRINCIPAL_ENV: &str = "W3_PRINCIPAL";

/// Result of a successful upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadResult {
    /// Root content identifier of the uploaded directory
    pub cid: String,
}

/// Runs the w3 CLI through a [`CommandRunner`]
pub struct W3Uploader {
    runner: Box<dyn CommandRunner>,

    /// Program followed by its leading arguments
    command: Vec<String>,

    /// ⚠️ NEVER log this value
    principal: String,
}

impl std::fmt::Debug for W3Uploader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("W3Uploader")
            .field("command", &self.command)
            .field("principal", &"<REDACTED>")
            .finish()
    }
}

impl W3Uploader {
    /// Create an uploader using the command and signing key from `config`
    pub fn new(runner: Box<dyn CommandRunner>, config: &RunConfig) -> Self {
        Self {
            runner,
            command: config.uploader_command.clone(),
            principal: config.upload_principal.clone(),
        }
    }

    /// Register the upload space described by `proof`
    pub async fn add_space(&self, proof: &str) -> Result<()> {
        info!("Adding upload space");

        let output = self.invoke(&["space", "add", proof]).await?;
        if !output.is_success() {
            return Err(Error::upload(format!(
                "Failed to add space: {}",
                describe_failure(&output)
            )));
        }

        Ok(())
    }

    /// Upload `directory` and return its root CID
    pub async fn upload(&self, directory: &str) -> Result<UploadResult> {
        info!("Uploading {}", directory);

        let output = self.invoke(&["up", directory, "--json"]).await?;
        if !output.is_success() {
            return Err(Error::upload(format!(
                "Failed to upload: {}",
                describe_failure(&output)
            )));
        }

        let result = parse_upload_output(&output.stdout)?;
        info!("Upload complete: {}", result.cid);
        Ok(result)
    }

    async fn invoke(&self, args: &[&str]) -> Result<CommandOutput> {
        let (program, prefix) = self
            .command
            .split_first()
            .ok_or_else(|| Error::config("Uploader command cannot be empty"))?;

        let args: Vec<String> = prefix
            .iter()
            .cloned()
            .chain(args.iter().map(|a| a.to_string()))
            .collect();

        debug!("Invoking uploader: {} ({} argument(s))", program, args.len());

        self.runner
            .run(
                program,
                &args,
                &[(PRINCIPAL_ENV.to_string(), self.principal.clone())],
            )
            .await
            .map_err(|e| match e {
                Error::Io(io) => Error::upload(format!("Failed to run {}: {}", program, io)),
                other => other,
            })
    }
}

/// Extract the root CID from the uploader's JSON output
///
/// Expects `{"root": {"/": "<cid>"}}`. Output that is not JSON is an
/// [`Error::OutputParse`]; JSON without a non-empty `root["/"]` string is an
/// [`Error::Upload`] carrying the raw output.
pub fn parse_upload_output(stdout: &str) -> Result<UploadResult> {
    let json: serde_json::Value = serde_json::from_str(stdout)
        .map_err(|e| Error::output_parse("Failed to parse JSON output", e))?;

    match json["root"]["/"].as_str() {
        Some(cid) if !cid.is_empty() => Ok(UploadResult {
            cid: cid.to_string(),
        }),
        _ => Err(Error::upload(format!("Failed to upload: {}", stdout))),
    }
}

fn describe_failure(output: &CommandOutput) -> String {
    let code = output
        .exit_code
        .map(|c| format!("exit code {}", c))
        .unwrap_or_else(|| "terminated by signal".to_string());

    let detail = if output.stderr.trim().is_empty() {
        output.stdout.trim()
    } else {
        output.stderr.trim()
    };

    if detail.is_empty() {
        code
    } else {
        format!("{}: {}", code, detail)
    }
}
