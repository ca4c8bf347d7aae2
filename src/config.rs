//! Application-level configuration loading: seed participants, asset storage and game policies.

use std::{env, fs, io::ErrorKind, path::PathBuf, time::Duration};

use serde::Deserialize;
use tracing::{info, warn};

use crate::state::{game::Participant, notification::DEFAULT_NOTIFICATION_WINDOW};

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "PARTY_SCOREBOARD_CONFIG_PATH";
/// Directory uploaded media is written to when not configured.
const DEFAULT_ASSETS_DIR: &str = "public/assets";

/// What to do when the operator finalizes a round that was already finalized.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinalizePolicy {
    /// Accept and re-apply the finalize.
    #[default]
    Allow,
    /// Refuse a finalize until scores change, a new round starts, or the game is reset.
    RejectRepeat,
}

#[derive(Debug, Clone)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    participants: Vec<Participant>,
    assets_dir: PathBuf,
    notification_window: Duration,
    finalize_policy: FinalizePolicy,
}

impl AppConfig {
    /// Load the application configuration from disk, falling back to baked-in defaults.
    pub fn load() -> Self {
        let path = resolve_config_path();
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<RawConfig>(&contents) {
                Ok(raw) => {
                    let app_config: Self = raw.into();
                    info!(
                        path = %path.display(),
                        participants = app_config.participants.len(),
                        assets_dir = %app_config.assets_dir.display(),
                        "loaded configuration"
                    );
                    app_config
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        }
    }

    /// Participants present when the server starts.
    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    /// Root directory of the media store.
    pub fn assets_dir(&self) -> &PathBuf {
        &self.assets_dir
    }

    /// How long a score popup stays visible.
    pub fn notification_window(&self) -> Duration {
        self.notification_window
    }

    /// Behaviour of a repeated finalize.
    pub fn finalize_policy(&self) -> FinalizePolicy {
        self.finalize_policy
    }

    /// Same configuration with another assets directory.
    pub fn with_assets_dir(self, assets_dir: impl Into<PathBuf>) -> Self {
        Self {
            assets_dir: assets_dir.into(),
            ..self
        }
    }

    /// Same configuration with another finalize policy.
    pub fn with_finalize_policy(self, finalize_policy: FinalizePolicy) -> Self {
        Self {
            finalize_policy,
            ..self
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            participants: default_participants(),
            assets_dir: PathBuf::from(DEFAULT_ASSETS_DIR),
            notification_window: DEFAULT_NOTIFICATION_WINDOW,
            finalize_policy: FinalizePolicy::default(),
        }
    }
}

#[derive(Debug, Deserialize)]
/// JSON representation of the configuration file located at [`DEFAULT_CONFIG_PATH`].
struct RawConfig {
    #[serde(default)]
    participants: Option<Vec<RawParticipant>>,
    #[serde(default)]
    assets_dir: Option<PathBuf>,
    #[serde(default)]
    notification_window_ms: Option<u64>,
    #[serde(default)]
    finalize_policy: FinalizePolicy,
}

impl From<RawConfig> for AppConfig {
    fn from(value: RawConfig) -> Self {
        let participants = match value.participants {
            Some(list) => list.into_iter().map(Into::into).collect(),
            None => default_participants(),
        };
        Self {
            participants,
            assets_dir: value
                .assets_dir
                .unwrap_or_else(|| PathBuf::from(DEFAULT_ASSETS_DIR)),
            notification_window: value
                .notification_window_ms
                .map(Duration::from_millis)
                .unwrap_or(DEFAULT_NOTIFICATION_WINDOW),
            finalize_policy: value.finalize_policy,
        }
    }
}

#[derive(Debug, Deserialize)]
/// JSON representation of a seed participant inside the configuration file.
struct RawParticipant {
    id: String,
    name: String,
}

impl From<RawParticipant> for Participant {
    fn from(value: RawParticipant) -> Self {
        Participant::new(value.id, value.name)
    }
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

/// Teams shipped with the binary.
fn default_participants() -> Vec<Participant> {
    [
        ("1", "Team Alpha"),
        ("2", "Team Beta"),
        ("3", "Team Gamma"),
        ("4", "Team Delta"),
    ]
    .into_iter()
    .map(|(id, name)| Participant::new(id, name))
    .collect()
}
