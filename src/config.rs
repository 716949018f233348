//! Layered configuration: CLI flags > global `subdesk.toml` > hard defaults.
//!
//! Missing or unparsable config files degrade to defaults with a log line,
//! never an error.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::cli::Action;
use crate::pool::lock::DEFAULT_LOCK_NAME;

/// The TOML file structure for subdesk.toml.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    pub pool: Option<PoolSection>,
}

#[derive(Debug, Deserialize)]
pub struct PoolSection {
    pub target_root: Option<PathBuf>,
    pub template: Option<PathBuf>,
    pub lock_name: Option<String>,
}

/// Fully-resolved runtime configuration.
///
/// `template` stays optional: only `provision` needs one, and it may come
/// from either the CLI or the config file.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub target_root: PathBuf,
    pub template: Option<PathBuf>,
    pub lock_name: String,
}

/// Partial config used during merge. All fields are Option so that missing
/// fields don't override lower-priority values.
#[derive(Debug, Clone, Default)]
pub struct PartialConfig {
    pub target_root: Option<PathBuf>,
    pub template: Option<PathBuf>,
    pub lock_name: Option<String>,
}

impl PartialConfig {
    /// Fill unset fields from a lower-priority layer.
    pub fn with_fallback(self, other: PartialConfig) -> PartialConfig {
        PartialConfig {
            target_root: self.target_root.or(other.target_root),
            template: self.template.or(other.template),
            lock_name: self.lock_name.or(other.lock_name),
        }
    }

    /// Apply hard defaults to whatever is still unset.
    pub fn finalize(self) -> AppConfig {
        AppConfig {
            target_root: self.target_root.unwrap_or_else(default_subagent_root),
            template: self.template,
            lock_name: self
                .lock_name
                .unwrap_or_else(|| DEFAULT_LOCK_NAME.to_string()),
        }
    }
}

/// Resolve configuration for one invocation.
/// Precedence: CLI flags > global config file > defaults.
pub fn load_config(action: &Action) -> AppConfig {
    action_overrides(action)
        .with_fallback(load_global_config())
        .finalize()
}

/// Extract the pool-level overrides present on the parsed action.
fn action_overrides(action: &Action) -> PartialConfig {
    match action {
        Action::Provision {
            template,
            target_root,
            lock_name,
            ..
        } => PartialConfig {
            target_root: target_root.clone(),
            template: template.clone(),
            lock_name: lock_name.clone(),
        },
        Action::Warmup { target_root, .. } => PartialConfig {
            target_root: target_root.clone(),
            ..Default::default()
        },
        Action::Chat {
            target_root,
            lock_name,
            ..
        }
        | Action::List {
            target_root,
            lock_name,
        }
        | Action::Unlock {
            target_root,
            lock_name,
            ..
        } => PartialConfig {
            target_root: target_root.clone(),
            lock_name: lock_name.clone(),
            ..Default::default()
        },
    }
}

/// Load the global config from the platform-specific config directory.
/// Returns an empty PartialConfig when the file is absent or unreadable.
fn load_global_config() -> PartialConfig {
    match global_config_path() {
        Some(path) => load_toml_file(&path).unwrap_or_default(),
        None => {
            tracing::debug!("could not determine global config directory");
            PartialConfig::default()
        }
    }
}

fn load_toml_file(path: &Path) -> Option<PartialConfig> {
    match std::fs::read_to_string(path) {
        Ok(contents) => match toml::from_str::<ConfigFile>(&contents) {
            Ok(file) => {
                tracing::info!(path = %path.display(), "loaded config");
                let pool = file.pool?;
                Some(PartialConfig {
                    target_root: pool.target_root,
                    template: pool.template,
                    lock_name: pool.lock_name,
                })
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "config parse error; using defaults");
                None
            }
        },
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            None
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "failed to read config");
            None
        }
    }
}

/// Platform-specific global config path.
/// Linux: ~/.config/subdesk/subdesk.toml
fn global_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "subdesk")
        .map(|dirs| dirs.config_dir().join("subdesk.toml"))
}

/// Default pool root under the platform data directory.
/// Linux: ~/.local/share/subdesk/subagents
fn default_subagent_root() -> PathBuf {
    directories::ProjectDirs::from("", "", "subdesk")
        .map(|dirs| dirs.data_dir().join("subagents"))
        .unwrap_or_else(|| PathBuf::from("./subagents"))
}
