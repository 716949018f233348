//! Slot provisioning from a template directory.
//!
//! Materializes the allocator's decisions on disk: creates slot directories,
//! copies the template tree into them (renaming the template's workspace
//! descriptor to the slot's own name), and guarantees the mailbox directory.
//! Copies overwrite file-by-file and never delete files the caller added to a
//! slot; the template itself is never mutated.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::PoolError;
use crate::pool::lock;
use crate::pool::slots::{self, AllocationPlan, Slot, MESSAGES_DIR, WORKSPACE_SUFFIX};

/// Outcome of one provisioning run: three disjoint path lists, each ascending
/// by slot sequence number.
#[derive(Debug)]
pub struct ProvisionOutcome {
    /// Slots materialized (or re-materialized) from the template this run.
    pub created: Vec<PathBuf>,
    /// Existing unlocked slots that already satisfied the request.
    pub skipped_existing: Vec<PathBuf>,
    /// Locked slots left untouched.
    pub skipped_locked: Vec<PathBuf>,
}

impl ProvisionOutcome {
    fn from_plan(plan: &AllocationPlan) -> Self {
        let dirs = |set: &[Slot]| set.iter().map(|slot| slot.dir.clone()).collect();
        ProvisionOutcome {
            created: dirs(&plan.create),
            skipped_existing: dirs(&plan.skipped_existing),
            skipped_locked: dirs(&plan.skipped_locked),
        }
    }
}

/// Provision subagent slots under `target_root` from `template`.
///
/// Ensures `count` available slots per the allocation rules in
/// [`slots::plan_allocation`]. With `force`, slots `1..=count` are
/// re-materialized regardless of lock state and any lock markers on them are
/// removed. With `dry_run`, the full decision set is computed and returned but
/// nothing on disk changes.
///
/// Validation (positive count, template must be an existing directory) happens
/// before any mutation. A copy failure in one slot is logged and does not
/// abort the remaining slots; there is no rollback.
pub fn provision_subagents(
    template: &Path,
    target_root: &Path,
    count: usize,
    lock_name: &str,
    force: bool,
    dry_run: bool,
) -> Result<ProvisionOutcome, PoolError> {
    if count == 0 {
        return Err(PoolError::InvalidCount(count));
    }
    if !template.is_dir() {
        return Err(PoolError::TemplateNotADirectory(template.to_path_buf()));
    }

    let plan = slots::plan_allocation(target_root, count, lock_name, force)?;
    tracing::info!(
        create = plan.create.len(),
        skipped_existing = plan.skipped_existing.len(),
        skipped_locked = plan.skipped_locked.len(),
        force,
        dry_run,
        "allocation planned"
    );

    if !dry_run {
        for slot in &plan.create {
            match materialize_slot(template, slot, lock_name, force) {
                Ok(()) => tracing::info!(slot = %slot.name(), "slot provisioned"),
                Err(e) => tracing::warn!(
                    slot = %slot.name(),
                    error = %e,
                    "slot provisioning failed; continuing with remaining slots"
                ),
            }
        }
    }

    Ok(ProvisionOutcome::from_plan(&plan))
}

/// Build one slot on disk: directory, template copy, mailbox, and (under
/// force) lock removal.
fn materialize_slot(
    template: &Path,
    slot: &Slot,
    lock_name: &str,
    force: bool,
) -> io::Result<()> {
    fs::create_dir_all(&slot.dir)?;
    copy_template_tree(template, slot)?;
    fs::create_dir_all(slot.dir.join(MESSAGES_DIR))?;
    if force {
        lock::unlock_slot(&slot.dir, lock_name)?;
    }
    Ok(())
}

/// Copy the template's contents into the slot directory.
///
/// A top-level template file ending in `.code-workspace` is the template's
/// own workspace descriptor; it lands as `<slot-name>.code-workspace` instead
/// of under its original name. Everything else keeps its relative path.
fn copy_template_tree(template: &Path, slot: &Slot) -> io::Result<()> {
    for entry in fs::read_dir(template)? {
        let entry = entry?;
        let src = entry.path();
        let file_name = entry.file_name();

        if src.is_dir() {
            copy_dir_recursive(&src, &slot.dir.join(&file_name))?;
        } else if file_name.to_string_lossy().ends_with(WORKSPACE_SUFFIX) {
            fs::copy(&src, slot.workspace_file())?;
        } else {
            fs::copy(&src, slot.dir.join(&file_name))?;
        }
    }
    Ok(())
}

fn copy_dir_recursive(src: &Path, dest: &Path) -> io::Result<()> {
    fs::create_dir_all(dest)?;
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dest_path = dest.join(entry.file_name());
        if src_path.is_dir() {
            copy_dir_recursive(&src_path, &dest_path)?;
        } else {
            fs::copy(&src_path, &dest_path)?;
        }
    }
    Ok(())
}
