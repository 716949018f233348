use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::editor::EditorKind;

#[derive(Parser, Debug)]
#[command(
    name = "subdesk",
    version,
    about = "Pooled VS Code workspaces for parallel coding agents"
)]
pub struct Cli {
    #[command(subcommand)]
    pub editor: EditorCommand,
}

/// Top level selects the editor build; every build carries the same actions.
#[derive(Subcommand, Debug)]
pub enum EditorCommand {
    /// Dispatch using the stable VS Code build
    Code {
        #[command(subcommand)]
        action: Action,
    },
    /// Dispatch using the VS Code Insiders build
    #[command(name = "code-insiders")]
    CodeInsiders {
        #[command(subcommand)]
        action: Action,
    },
}

impl EditorCommand {
    pub fn split(self) -> (EditorKind, Action) {
        match self {
            EditorCommand::Code { action } => (EditorKind::Code, action),
            EditorCommand::CodeInsiders { action } => (EditorKind::CodeInsiders, action),
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Action {
    /// Provision subagent workspace directories from a template
    Provision {
        /// Template directory copied into each new subagent
        #[arg(short, long)]
        template: Option<PathBuf>,

        /// Root directory holding the subagent pool
        #[arg(long)]
        target_root: Option<PathBuf>,

        /// Number of available (unlocked) subagents to end up with
        #[arg(short = 'n', long, default_value_t = 1)]
        subagents: usize,

        /// Lock marker filename
        #[arg(long)]
        lock_name: Option<String>,

        /// Reprovision slots 1..N even if they exist or are locked
        #[arg(short, long)]
        force: bool,

        /// Report decisions without touching the filesystem
        #[arg(long)]
        dry_run: bool,

        /// Launch editors against the pool after provisioning
        #[arg(long)]
        warmup: bool,
    },

    /// Pre-launch editors against the first discoverable workspaces
    Warmup {
        /// Root directory holding the subagent pool
        #[arg(long)]
        target_root: Option<PathBuf>,

        /// How many workspaces to open
        #[arg(short = 'n', long, default_value_t = 1)]
        subagents: usize,

        /// Report what would be launched without launching
        #[arg(long)]
        dry_run: bool,
    },

    /// Claim the first unlocked subagent and open it
    Chat {
        /// Root directory holding the subagent pool
        #[arg(long)]
        target_root: Option<PathBuf>,

        /// Lock marker filename
        #[arg(long)]
        lock_name: Option<String>,

        /// Report which subagent would be claimed without locking or launching
        #[arg(long)]
        dry_run: bool,
    },

    /// List subagent slots and their lock state
    List {
        /// Root directory holding the subagent pool
        #[arg(long)]
        target_root: Option<PathBuf>,

        /// Lock marker filename
        #[arg(long)]
        lock_name: Option<String>,
    },

    /// Remove lock markers from one subagent or all of them
    Unlock {
        /// Root directory holding the subagent pool
        #[arg(long)]
        target_root: Option<PathBuf>,

        /// Lock marker filename
        #[arg(long)]
        lock_name: Option<String>,

        /// Name of the subagent to unlock (e.g. subagent-2)
        #[arg(short, long)]
        subagent: Option<String>,

        /// Unlock every locked subagent
        #[arg(long)]
        all: bool,

        /// Report what would be unlocked without removing markers
        #[arg(long)]
        dry_run: bool,
    },
}
