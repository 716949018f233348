use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use subdesk::pool::dispatch::{claim_subagent, find_unlocked_subagent, warmup_subagents};
use subdesk::pool::lock::DEFAULT_LOCK_NAME;

// ─── Helpers ─────────────────────────────────────────────────────────

fn make_slot(root: &Path, seq: u32, locked: bool, with_workspace: bool) {
    let slot = root.join(format!("subagent-{seq}"));
    fs::create_dir_all(&slot).unwrap();
    if with_workspace {
        fs::write(slot.join(format!("subagent-{seq}.code-workspace")), "{}").unwrap();
    }
    if locked {
        fs::write(slot.join(DEFAULT_LOCK_NAME), "").unwrap();
    }
}

/// Launch collaborator that records what it was asked to open.
fn recording_launcher(log: &Mutex<Vec<PathBuf>>) -> impl FnMut(&Path) -> anyhow::Result<()> + '_ {
    move |workspace| {
        log.lock().unwrap().push(workspace.to_path_buf());
        Ok(())
    }
}

// ─── Warmup ──────────────────────────────────────────────────────────

#[test]
fn warmup_with_no_workspaces_returns_one_and_launches_nothing() {
    let tmp = tempfile::tempdir().unwrap();
    let launched = Mutex::new(Vec::new());

    let code = warmup_subagents(tmp.path(), 1, false, recording_launcher(&launched));

    assert_eq!(code, 1);
    assert!(launched.lock().unwrap().is_empty());
}

#[test]
fn warmup_dry_run_launches_nothing_but_succeeds() {
    let tmp = tempfile::tempdir().unwrap();
    make_slot(tmp.path(), 1, false, true);
    let launched = Mutex::new(Vec::new());

    let code = warmup_subagents(tmp.path(), 1, true, recording_launcher(&launched));

    assert_eq!(code, 0);
    assert!(launched.lock().unwrap().is_empty());
}

#[test]
fn warmup_launches_requested_workspaces_in_order() {
    let tmp = tempfile::tempdir().unwrap();
    for seq in [1, 2, 3] {
        make_slot(tmp.path(), seq, false, true);
    }
    let launched = Mutex::new(Vec::new());

    let code = warmup_subagents(tmp.path(), 3, false, recording_launcher(&launched));

    assert_eq!(code, 0);
    let launched = launched.lock().unwrap();
    assert_eq!(launched.len(), 3);
    assert!(launched[0].ends_with("subagent-1/subagent-1.code-workspace"));
    assert!(launched[2].ends_with("subagent-3/subagent-3.code-workspace"));
}

#[test]
fn warmup_respects_the_count_limit() {
    let tmp = tempfile::tempdir().unwrap();
    for seq in 1..=5 {
        make_slot(tmp.path(), seq, false, true);
    }
    let launched = Mutex::new(Vec::new());

    let code = warmup_subagents(tmp.path(), 2, false, recording_launcher(&launched));

    assert_eq!(code, 0);
    assert_eq!(launched.lock().unwrap().len(), 2);
}

#[test]
fn warmup_caps_at_the_discoverable_count() {
    let tmp = tempfile::tempdir().unwrap();
    make_slot(tmp.path(), 1, false, true);
    let launched = Mutex::new(Vec::new());

    let code = warmup_subagents(tmp.path(), 10, false, recording_launcher(&launched));

    assert_eq!(code, 0);
    assert_eq!(launched.lock().unwrap().len(), 1);
}

#[test]
fn warmup_launch_failure_does_not_abort_or_change_the_exit_code() {
    let tmp = tempfile::tempdir().unwrap();
    for seq in [1, 2, 3] {
        make_slot(tmp.path(), seq, false, true);
    }
    let mut attempts = 0;

    let code = warmup_subagents(tmp.path(), 3, false, |_workspace| {
        attempts += 1;
        anyhow::bail!("failed to open")
    });

    assert_eq!(code, 0);
    assert_eq!(attempts, 3);
}

#[test]
fn warmup_default_count_opens_one() {
    let tmp = tempfile::tempdir().unwrap();
    for seq in [1, 2, 3] {
        make_slot(tmp.path(), seq, false, true);
    }
    let launched = Mutex::new(Vec::new());

    let code = warmup_subagents(tmp.path(), 1, false, recording_launcher(&launched));

    assert_eq!(code, 0);
    assert_eq!(launched.lock().unwrap().len(), 1);
}

// ─── Chat claim ──────────────────────────────────────────────────────

#[test]
fn finds_the_first_unlocked_subagent() {
    let tmp = tempfile::tempdir().unwrap();
    make_slot(tmp.path(), 1, true, false);
    make_slot(tmp.path(), 2, false, false);
    make_slot(tmp.path(), 3, false, false);

    let slot = find_unlocked_subagent(tmp.path(), DEFAULT_LOCK_NAME).unwrap();
    assert_eq!(slot.name(), "subagent-2");
}

#[test]
fn fully_locked_pool_has_no_unlocked_subagent() {
    let tmp = tempfile::tempdir().unwrap();
    make_slot(tmp.path(), 1, true, false);

    assert!(find_unlocked_subagent(tmp.path(), DEFAULT_LOCK_NAME).is_none());
}

#[test]
fn missing_root_has_no_unlocked_subagent() {
    let tmp = tempfile::tempdir().unwrap();
    let missing = tmp.path().join("nonexistent");

    assert!(find_unlocked_subagent(&missing, DEFAULT_LOCK_NAME).is_none());
}

#[test]
fn claim_prepares_and_locks_the_slot() {
    let tmp = tempfile::tempdir().unwrap();
    make_slot(tmp.path(), 1, false, false);

    let claimed = claim_subagent(tmp.path(), DEFAULT_LOCK_NAME)
        .unwrap()
        .expect("expected a claimable subagent");

    assert_eq!(claimed.dir, tmp.path().join("subagent-1"));
    assert!(claimed.workspace.is_file());
    assert!(claimed.workspace.ends_with("subagent-1.code-workspace"));
    assert!(claimed.messages_dir.is_dir());
    assert!(claimed.lock_file.is_file());
    assert_eq!(claimed.lock_file.file_name().unwrap(), DEFAULT_LOCK_NAME);
}

#[test]
fn claim_keeps_an_existing_descriptor() {
    let tmp = tempfile::tempdir().unwrap();
    make_slot(tmp.path(), 1, false, true);
    let descriptor = tmp.path().join("subagent-1").join("subagent-1.code-workspace");
    fs::write(&descriptor, "{\"folders\": [{\"path\": \".\"}]}").unwrap();

    let claimed = claim_subagent(tmp.path(), DEFAULT_LOCK_NAME).unwrap().unwrap();

    assert_eq!(
        fs::read_to_string(claimed.workspace).unwrap(),
        "{\"folders\": [{\"path\": \".\"}]}"
    );
}

#[test]
fn claim_returns_none_when_everything_is_locked() {
    let tmp = tempfile::tempdir().unwrap();
    make_slot(tmp.path(), 1, true, false);

    assert!(claim_subagent(tmp.path(), DEFAULT_LOCK_NAME).unwrap().is_none());
}

#[test]
fn successive_claims_take_successive_slots() {
    let tmp = tempfile::tempdir().unwrap();
    make_slot(tmp.path(), 1, false, false);
    make_slot(tmp.path(), 2, false, false);

    let first = claim_subagent(tmp.path(), DEFAULT_LOCK_NAME).unwrap().unwrap();
    let second = claim_subagent(tmp.path(), DEFAULT_LOCK_NAME).unwrap().unwrap();

    assert_eq!(first.dir, tmp.path().join("subagent-1"));
    assert_eq!(second.dir, tmp.path().join("subagent-2"));
    assert!(claim_subagent(tmp.path(), DEFAULT_LOCK_NAME).unwrap().is_none());
}
