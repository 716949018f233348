//! Slot naming, enumeration, and allocation planning.
//!
//! A slot is a numbered directory (`subagent-<N>`, N >= 1) directly under the
//! pool root. Sequence numbers are stable integer handles; gaps may exist
//! after selective force-provisioning, so the allocator always derives the
//! next free number from a full scan rather than assuming contiguity.

use std::path::{Path, PathBuf};

use crate::error::PoolError;
use crate::pool::lock;

/// Directory-name prefix for every slot.
pub const SLOT_PREFIX: &str = "subagent-";

/// Filename suffix of a workspace descriptor.
pub const WORKSPACE_SUFFIX: &str = ".code-workspace";

/// Mailbox subdirectory present in every provisioned slot.
pub const MESSAGES_DIR: &str = "messages";

/// A numbered subagent slot under a pool root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot {
    pub seq: u32,
    pub dir: PathBuf,
}

impl Slot {
    /// Slot handle for sequence number `seq` under `root` (existence not checked).
    pub fn new(root: &Path, seq: u32) -> Self {
        Slot {
            seq,
            dir: root.join(format!("{SLOT_PREFIX}{seq}")),
        }
    }

    pub fn name(&self) -> String {
        format!("{SLOT_PREFIX}{}", self.seq)
    }

    /// Path of this slot's workspace descriptor (`<slot-name>.code-workspace`).
    pub fn workspace_file(&self) -> PathBuf {
        self.dir
            .join(format!("{SLOT_PREFIX}{}{WORKSPACE_SUFFIX}", self.seq))
    }

    /// Path of this slot's lock marker file.
    pub fn lock_file(&self, lock_name: &str) -> PathBuf {
        self.dir.join(lock_name)
    }
}

/// Parse a directory name into a slot sequence number.
///
/// Accepts only `subagent-<digits>` with a value of at least 1; anything else
/// (including `subagent-007x` or a bare `subagent-`) is not a slot.
pub fn parse_slot_seq(name: &str) -> Option<u32> {
    let digits = name.strip_prefix(SLOT_PREFIX)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let seq: u32 = digits.parse().ok()?;
    (seq >= 1).then_some(seq)
}

/// Enumerate existing slot directories directly under `root`, ascending by
/// numeric sequence (slot 2 sorts before slot 10).
///
/// Returns an empty vec when the root does not exist. Non-matching entries
/// and files are ignored.
pub fn scan_slots(root: &Path) -> Vec<Slot> {
    let Ok(entries) = std::fs::read_dir(root) else {
        return Vec::new();
    };

    let mut slots: Vec<Slot> = entries
        .flatten()
        .filter(|entry| entry.path().is_dir())
        .filter_map(|entry| {
            let name = entry.file_name().into_string().ok()?;
            let seq = parse_slot_seq(&name)?;
            Some(Slot {
                seq,
                dir: entry.path(),
            })
        })
        .collect();

    slots.sort_by_key(|slot| slot.seq);
    slots
}

/// The allocator's decision for one provisioning run.
///
/// The three sets are disjoint and each is ordered ascending by sequence
/// number. `create` holds slots to materialize (or re-materialize) from the
/// template; the `skipped_*` sets are reported but never touched.
#[derive(Debug, Default)]
pub struct AllocationPlan {
    pub create: Vec<Slot>,
    pub skipped_existing: Vec<Slot>,
    pub skipped_locked: Vec<Slot>,
}

/// Decide which slots a provisioning run will touch.
///
/// With `force` unset, existing unlocked slots satisfy the requested count
/// first (reported as skipped-existing, up to `count` of them); every locked
/// slot is reported as skipped-locked; any remaining need is met by fresh
/// sequence numbers starting one past the highest existing slot.
///
/// With `force` set, lock state is ignored for selection: slots `1..=count`
/// are chosen outright and all reported for creation, leaving both skip sets
/// empty. Higher-numbered existing slots are never touched or renumbered.
pub fn plan_allocation(
    root: &Path,
    count: usize,
    lock_name: &str,
    force: bool,
) -> Result<AllocationPlan, PoolError> {
    if count == 0 {
        return Err(PoolError::InvalidCount(count));
    }

    let mut plan = AllocationPlan::default();

    if force {
        plan.create = (1..=count as u32).map(|seq| Slot::new(root, seq)).collect();
        return Ok(plan);
    }

    let existing = scan_slots(root);
    let mut satisfied = 0usize;
    for slot in &existing {
        if lock::is_locked(&slot.dir, lock_name) {
            plan.skipped_locked.push(slot.clone());
        } else if satisfied < count {
            plan.skipped_existing.push(slot.clone());
            satisfied += 1;
        }
    }

    let mut next_seq = existing.last().map(|slot| slot.seq).unwrap_or(0) + 1;
    while satisfied < count {
        plan.create.push(Slot::new(root, next_seq));
        next_seq += 1;
        satisfied += 1;
    }

    Ok(plan)
}
