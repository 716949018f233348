//! Workspace descriptor discovery.

use std::path::{Path, PathBuf};

use crate::pool::slots;

/// Find the workspace descriptors of all usable slots under `root`, ascending
/// by slot sequence number.
///
/// A slot qualifies only when the file `<slot-name>.code-workspace` exists
/// directly inside it; slots without that exact descriptor are silently
/// skipped. Only directories matching the slot pattern directly under `root`
/// are considered. A missing or empty root yields an empty vec.
pub fn discover_workspaces(root: &Path) -> Vec<PathBuf> {
    slots::scan_slots(root)
        .into_iter()
        .map(|slot| slot.workspace_file())
        .filter(|descriptor| descriptor.is_file())
        .collect()
}
