//! Command handlers: thin glue between the parsed CLI and the pool
//! operations. Human-readable output lives here and nowhere else; handlers
//! return the process exit code.

use std::path::Path;

use anyhow::Context;

use crate::cli::Action;
use crate::config::AppConfig;
use crate::editor::EditorKind;
use crate::pool::dispatch::{claim_subagent, find_unlocked_subagent, warmup_subagents};
use crate::pool::lock::{is_locked, unlock_subagents, UnlockTarget};
use crate::pool::provision::provision_subagents;
use crate::pool::slots::scan_slots;

/// Dispatch a parsed action. Returns the process exit code.
pub fn run(action: Action, editor: EditorKind, config: &AppConfig) -> anyhow::Result<i32> {
    match action {
        Action::Provision {
            subagents,
            force,
            dry_run,
            warmup,
            ..
        } => handle_provision(config, editor, subagents, force, dry_run, warmup),
        Action::Warmup {
            subagents, dry_run, ..
        } => Ok(handle_warmup(config, editor, subagents, dry_run)),
        Action::Chat { dry_run, .. } => handle_chat(config, editor, dry_run),
        Action::List { .. } => Ok(handle_list(config)),
        Action::Unlock {
            subagent,
            all,
            dry_run,
            ..
        } => handle_unlock(config, subagent, all, dry_run),
    }
}

fn handle_provision(
    config: &AppConfig,
    editor: EditorKind,
    subagents: usize,
    force: bool,
    dry_run: bool,
    warmup: bool,
) -> anyhow::Result<i32> {
    let template = config
        .template
        .as_deref()
        .context("no template directory given (use --template or set [pool] template in subdesk.toml)")?;

    let outcome = provision_subagents(
        template,
        &config.target_root,
        subagents,
        &config.lock_name,
        force,
        dry_run,
    )?;

    let prefix = if dry_run { "[dry-run] " } else { "" };
    print_paths(&format!("{prefix}Created"), &outcome.created);
    print_paths(&format!("{prefix}Skipped (existing)"), &outcome.skipped_existing);
    print_paths(&format!("{prefix}Skipped (locked)"), &outcome.skipped_locked);

    if warmup && !dry_run {
        return Ok(handle_warmup(config, editor, subagents, false));
    }
    Ok(0)
}

fn handle_warmup(config: &AppConfig, editor: EditorKind, subagents: usize, dry_run: bool) -> i32 {
    let code = warmup_subagents(&config.target_root, subagents, dry_run, |workspace| {
        editor.launch(workspace)
    });
    if code != 0 {
        println!(
            "No subagent workspaces found under {}",
            config.target_root.display()
        );
    }
    code
}

fn handle_chat(config: &AppConfig, editor: EditorKind, dry_run: bool) -> anyhow::Result<i32> {
    if dry_run {
        return Ok(
            match find_unlocked_subagent(&config.target_root, &config.lock_name) {
                Some(slot) => {
                    println!("[dry-run] Would claim {}", slot.dir.display());
                    0
                }
                None => {
                    println!("No unlocked subagent available");
                    1
                }
            },
        );
    }

    match claim_subagent(&config.target_root, &config.lock_name)? {
        Some(claimed) => {
            println!("Claimed {}", claimed.dir.display());
            editor.launch(&claimed.workspace)?;
            Ok(0)
        }
        None => {
            println!("No unlocked subagent available");
            Ok(1)
        }
    }
}

fn handle_list(config: &AppConfig) -> i32 {
    let slots = scan_slots(&config.target_root);
    if slots.is_empty() {
        println!("No subagents under {}", config.target_root.display());
        return 0;
    }

    for slot in slots {
        let state = if is_locked(&slot.dir, &config.lock_name) {
            "locked"
        } else {
            "free"
        };
        let workspace = if slot.workspace_file().is_file() {
            "workspace ok"
        } else {
            "no workspace"
        };
        println!("{:<16} {:<8} {}", slot.name(), state, workspace);
    }
    0
}

fn handle_unlock(
    config: &AppConfig,
    subagent: Option<String>,
    all: bool,
    dry_run: bool,
) -> anyhow::Result<i32> {
    let target = UnlockTarget::from_flags(subagent, all)?;
    let unlocked = unlock_subagents(&config.target_root, &config.lock_name, &target, dry_run)?;

    let prefix = if dry_run { "[dry-run] " } else { "" };
    if unlocked.is_empty() {
        println!("{prefix}Nothing to unlock");
    } else {
        print_paths(&format!("{prefix}Unlocked"), &unlocked);
    }
    Ok(0)
}

fn print_paths(label: &str, paths: &[impl AsRef<Path>]) {
    if paths.is_empty() {
        return;
    }
    println!("{label}:");
    for path in paths {
        println!("  {}", path.as_ref().display());
    }
}
