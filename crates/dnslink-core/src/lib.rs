// # dnslink-core
//
// Core library for publishing an uploaded directory as a DNSLink record.
//
// ## Architecture Overview
//
// - **CommandRunner**: Trait for running the external uploader CLI
// - **W3Uploader**: Registers the upload space and uploads a directory
// - **DnsProvider**: Trait for listing, creating and editing TXT records
// - **DnslinkReconciler**: Decides create vs. update vs. skip for the record
// - **ActionsReporter**: Writes step outputs and the job summary
// - **PublishPipeline**: Runs upload → dnslink → report for one invocation
//
// ## Design Principles
//
// 1. **Linear**: One run, one pass, no background work
// 2. **Capability traits**: Processes and HTTP sit behind traits so tests use fakes
// 3. **Fail fast**: The first error aborts the run and is reported verbatim
// 4. **Idempotency**: Re-publishing the same CID issues no DNS writes

pub mod config;
pub mod error;
pub mod pipeline;
pub mod process;
pub mod reconciler;
pub mod report;
pub mod traits;
pub mod uploader;

// Re-export core types for convenience
pub use config::RunConfig;
pub use error::{Error, Result};
pub use pipeline::PublishPipeline;
pub use process::TokioCommandRunner;
pub use reconciler::{DNSLINK_PREFIX, DnslinkReconciler, ReconcileOutcome, dnslink_content};
pub use report::{ActionsReporter, PublishReport, Summary};
pub use traits::{CommandOutput, CommandRunner, DnsProvider, DnsRecord};
pub use uploader::{UploadResult, W3Uploader, parse_upload_output};
