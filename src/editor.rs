//! Editor process invocation.

use std::path::Path;
use std::process::{Command, Stdio};

use anyhow::Context;

/// Which VS Code build to invoke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorKind {
    Code,
    CodeInsiders,
}

impl EditorKind {
    /// Executable name on `PATH`.
    pub fn executable(self) -> &'static str {
        match self {
            EditorKind::Code => "code",
            EditorKind::CodeInsiders => "code-insiders",
        }
    }

    /// Open the editor at the given workspace descriptor, detached.
    ///
    /// Fire-and-forget: the child is spawned with null stdio and dropped
    /// without waiting. Only a failure to start is reported.
    pub fn launch(self, workspace: &Path) -> anyhow::Result<()> {
        Command::new(self.executable())
            .arg(workspace)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .with_context(|| {
                format!(
                    "failed to launch `{}` for {}",
                    self.executable(),
                    workspace.display()
                )
            })?;
        Ok(())
    }
}
