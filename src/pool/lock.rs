//! Lock marker management.
//!
//! A slot is "locked" when a zero-byte marker file with a fixed name exists
//! inside it. The marker is advisory state checked at provisioning and unlock
//! time, not a true cross-process mutex: presence check and creation are two
//! separate filesystem operations, so two simultaneous runs can race. That
//! limitation is part of the contract, not something to paper over.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::PoolError;
use crate::pool::slots;

/// Default lock marker filename.
pub const DEFAULT_LOCK_NAME: &str = ".subagent.lock";

/// Whether the slot directory currently holds a lock marker.
pub fn is_locked(slot_dir: &Path, lock_name: &str) -> bool {
    slot_dir.join(lock_name).exists()
}

/// Claim a slot by creating its lock marker. Idempotent; returns the marker path.
pub fn lock_slot(slot_dir: &Path, lock_name: &str) -> io::Result<PathBuf> {
    let marker = slot_dir.join(lock_name);
    fs::File::create(&marker)?;
    tracing::debug!(marker = %marker.display(), "lock marker created");
    Ok(marker)
}

/// Release a slot by removing its lock marker.
///
/// Returns whether a marker existed. Removing an absent marker is not an error.
pub fn unlock_slot(slot_dir: &Path, lock_name: &str) -> io::Result<bool> {
    let marker = slot_dir.join(lock_name);
    match fs::remove_file(&marker) {
        Ok(()) => {
            tracing::debug!(marker = %marker.display(), "lock marker removed");
            Ok(true)
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}

/// Selects which slot(s) an unlock run targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnlockTarget {
    /// A single slot, by directory name (e.g. `subagent-2`).
    Named(String),
    /// Every locked slot under the root.
    All,
}

impl UnlockTarget {
    /// Build a target from the CLI's `--subagent` / `--all` flags.
    /// Exactly one must be given.
    pub fn from_flags(name: Option<String>, all: bool) -> Result<Self, PoolError> {
        match (name, all) {
            (Some(name), false) => Ok(UnlockTarget::Named(name)),
            (None, true) => Ok(UnlockTarget::All),
            _ => Err(PoolError::UnlockSelector),
        }
    }
}

/// Remove lock markers under `target_root` according to `target`.
///
/// Returns the slot directories that were (or, under `dry_run`, would be)
/// unlocked, ascending by sequence number.
///
/// Unlocking a named slot requires both the root and the slot directory to
/// exist; a named slot that exists but is not locked yields an empty result.
/// Unlock-all scans whatever exists, so a missing root simply yields nothing.
pub fn unlock_subagents(
    target_root: &Path,
    lock_name: &str,
    target: &UnlockTarget,
    dry_run: bool,
) -> Result<Vec<PathBuf>, PoolError> {
    match target {
        UnlockTarget::Named(name) => {
            if !target_root.is_dir() {
                return Err(PoolError::RootNotFound(target_root.to_path_buf()));
            }
            let slot_dir = target_root.join(name);
            if !slot_dir.is_dir() {
                return Err(PoolError::SubagentNotFound {
                    name: name.clone(),
                    root: target_root.to_path_buf(),
                });
            }
            if !is_locked(&slot_dir, lock_name) {
                return Ok(Vec::new());
            }
            if !dry_run {
                unlock_slot(&slot_dir, lock_name)?;
            }
            tracing::info!(slot = %name, dry_run, "unlocked subagent");
            Ok(vec![slot_dir])
        }
        UnlockTarget::All => {
            let mut unlocked = Vec::new();
            for slot in slots::scan_slots(target_root) {
                if !is_locked(&slot.dir, lock_name) {
                    continue;
                }
                if !dry_run {
                    unlock_slot(&slot.dir, lock_name)?;
                }
                unlocked.push(slot.dir);
            }
            tracing::info!(count = unlocked.len(), dry_run, "unlock-all complete");
            Ok(unlocked)
        }
    }
}
