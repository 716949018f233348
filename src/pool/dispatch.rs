//! Editor dispatch against pool slots.
//!
//! Two entry points: `warmup_subagents` pre-launches editors against the
//! first free workspaces, and `claim_subagent` picks one unlocked slot for a
//! chat session, preparing and locking it. Launches are fire-and-forget: the
//! caller-supplied launch closure spawns the editor and nothing waits on it.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::PoolError;
use crate::pool::discovery;
use crate::pool::lock;
use crate::pool::slots::{self, Slot, MESSAGES_DIR};

/// Workspace descriptor written into a slot that has none yet.
const DEFAULT_WORKSPACE_JSON: &str = "{\"folders\": []}\n";

/// Launch editors against the first `subagents` discoverable workspaces.
///
/// Returns an exit code, not a `Result`: 1 when nothing is discoverable
/// ("nothing to do", distinct from a configuration error), otherwise 0. In
/// dry-run mode no launch happens. An individual launch failure is logged and
/// never aborts the remaining attempts nor changes the overall code — once
/// every selected launch has been attempted, the run counts as a success.
pub fn warmup_subagents<F>(
    subagent_root: &Path,
    subagents: usize,
    dry_run: bool,
    mut launch: F,
) -> i32
where
    F: FnMut(&Path) -> anyhow::Result<()>,
{
    let workspaces = discovery::discover_workspaces(subagent_root);
    if workspaces.is_empty() {
        tracing::warn!(root = %subagent_root.display(), "no subagent workspaces found");
        return 1;
    }

    let selected = &workspaces[..subagents.min(workspaces.len())];
    tracing::info!(requested = subagents, selected = selected.len(), dry_run, "warmup");

    if dry_run {
        return 0;
    }

    for workspace in selected {
        match launch(workspace) {
            Ok(()) => tracing::info!(workspace = %workspace.display(), "launched workspace"),
            Err(e) => tracing::warn!(
                workspace = %workspace.display(),
                error = %e,
                "failed to launch workspace"
            ),
        }
    }
    0
}

/// First existing slot, in ascending sequence order, without a lock marker.
/// `None` when the root is missing or every slot is locked.
pub fn find_unlocked_subagent(root: &Path, lock_name: &str) -> Option<Slot> {
    slots::scan_slots(root)
        .into_iter()
        .find(|slot| !lock::is_locked(&slot.dir, lock_name))
}

/// A slot prepared and locked for a chat session.
#[derive(Debug)]
pub struct ClaimedSlot {
    pub dir: PathBuf,
    pub workspace: PathBuf,
    pub messages_dir: PathBuf,
    pub lock_file: PathBuf,
}

/// Guarantee the slot's workspace descriptor and mailbox directory.
///
/// Writes a minimal descriptor only when none exists; an existing descriptor
/// is left alone. Returns `(workspace, messages_dir)`.
pub fn ensure_slot_config(slot: &Slot) -> io::Result<(PathBuf, PathBuf)> {
    let workspace = slot.workspace_file();
    if !workspace.exists() {
        fs::write(&workspace, DEFAULT_WORKSPACE_JSON)?;
        tracing::debug!(workspace = %workspace.display(), "wrote default workspace descriptor");
    }
    let messages_dir = slot.dir.join(MESSAGES_DIR);
    fs::create_dir_all(&messages_dir)?;
    Ok((workspace, messages_dir))
}

/// Claim the first unlocked slot under `root` for exclusive use: ensure its
/// config exists, then create its lock marker.
///
/// `Ok(None)` when no unlocked slot is available — the caller decides whether
/// that is an error.
pub fn claim_subagent(root: &Path, lock_name: &str) -> Result<Option<ClaimedSlot>, PoolError> {
    let Some(slot) = find_unlocked_subagent(root, lock_name) else {
        return Ok(None);
    };

    let (workspace, messages_dir) = ensure_slot_config(&slot)?;
    let lock_file = lock::lock_slot(&slot.dir, lock_name)?;
    tracing::info!(slot = %slot.name(), "claimed subagent");

    Ok(Some(ClaimedSlot {
        dir: slot.dir,
        workspace,
        messages_dir,
        lock_file,
    }))
}
