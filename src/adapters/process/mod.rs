//! External process execution
//!
//! Every tool invocation goes through [`ToolRunner`], which captures output
//! and enforces the configured timeout.

use std::ffi::OsString;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tracing::debug;

use crate::domain::errors::DomainError;

/// Captured output of a successful run
#[derive(Debug, Clone, Default)]
pub struct ToolOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Runs external tools with a shared timeout
#[derive(Debug, Clone, Copy)]
pub struct ToolRunner {
    timeout: Duration,
}

impl ToolRunner {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    pub fn from_secs(secs: u64) -> Self {
        Self::new(Duration::from_secs(secs))
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Run `program` to completion, failing on a non-zero exit status
    pub async fn run(
        &self,
        tool: &str,
        program: &Path,
        args: &[OsString],
    ) -> Result<ToolOutput, DomainError> {
        debug!("Running {}: {} {:?}", tool, program.display(), args);

        let child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => DomainError::ToolNotFound(program.display().to_string()),
                _ => DomainError::ExternalTool {
                    tool: tool.to_string(),
                    status: None,
                    stderr: format!("failed to start: {}", e),
                },
            })?;

        // Dropping the future on timeout drops the child, which kills it.
        let output = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| DomainError::ExternalTool {
                tool: tool.to_string(),
                status: None,
                stderr: format!("timed out after {}s", self.timeout.as_secs()),
            })??;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        if !output.status.success() {
            return Err(DomainError::ExternalTool {
                tool: tool.to_string(),
                status: output.status.code(),
                stderr: stderr.trim().to_string(),
            });
        }

        debug!("{} finished ({} bytes of output)", tool, stdout.len());
        Ok(ToolOutput { stdout, stderr })
    }
}

/// Build an argument vector from mixed string and path parts
#[macro_export]
macro_rules! tool_args {
    ($($arg:expr),* $(,)?) => {
        vec![$(::std::ffi::OsString::from($arg)),*]
    };
}
