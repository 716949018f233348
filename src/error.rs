use std::path::PathBuf;

/// Errors raised by pool operations.
///
/// Every variant except `Io` is a configuration error detected before any
/// filesystem mutation; the binary maps them to a non-zero exit.
#[derive(Debug, thiserror::Error)]
pub enum PoolError {
    #[error("subagent count must be a positive integer, got {0}")]
    InvalidCount(usize),

    #[error("template path `{0}` is not a directory")]
    TemplateNotADirectory(PathBuf),

    #[error("subagent root `{0}` does not exist")]
    RootNotFound(PathBuf),

    #[error("subagent `{name}` does not exist under `{root}`")]
    SubagentNotFound { name: String, root: PathBuf },

    #[error("must specify either a subagent name or --all (not both, not neither)")]
    UnlockSelector,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
