// # Command Runner Trait
//
// Abstracts execution of external programs so the uploader can be driven by a
// fake in tests instead of the real CLI.
//
// ## Implementations
//
// - [`crate::process::TokioCommandRunner`]: spawns a real child process

use async_trait::async_trait;

/// Captured result of an external command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Captured standard output
    pub stdout: String,
    /// Captured standard error
    pub stderr: String,
    /// Exit code; `None` when the process was terminated by a signal
    pub exit_code: Option<i32>,
}

impl CommandOutput {
    /// Output of a command that exited with status 0
    pub fn success(stdout: impl Into<String>) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: String::new(),
            exit_code: Some(0),
        }
    }

    /// Output of a command that exited with `code`
    pub fn failure(code: i32, stderr: impl Into<String>) -> Self {
        Self {
            stdout: String::new(),
            stderr: stderr.into(),
            exit_code: Some(code),
        }
    }

    /// Whether the command exited with status 0
    pub fn is_success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Trait for running external commands
///
/// A non-zero exit is not an error at this level; callers inspect
/// [`CommandOutput::exit_code`]. `Err` means the command could not be run.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run `program` with `args`, adding `env` on top of the inherited
    /// environment, and wait for it to finish
    async fn run(
        &self,
        program: &str,
        args: &[String],
        env: &[(String, String)],
    ) -> Result<CommandOutput, crate::Error>;
}
