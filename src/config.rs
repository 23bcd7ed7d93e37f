//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/condtree/condtree.toml`
//! 3. Local config: `<dir>/.condtree.toml`
//! 4. Environment variables: `CONDTREE_*` prefix (`__` separates sections)

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::domain::CombinatorKind;

/// Editor behaviour.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct EditorSettings {
    /// Kind of the empty tree used when no data is given
    pub default_kind: CombinatorKind,
    /// Emit `update` once a render pass completes
    pub emit_render_update: bool,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            default_kind: CombinatorKind::All,
            emit_render_update: true,
        }
    }
}

/// JSON output formatting.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct OutputSettings {
    pub pretty: bool,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self { pretty: true }
    }
}

/// Raw editor settings for intermediate parsing (`None` → not specified, inherit).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawEditorSettings {
    pub default_kind: Option<CombinatorKind>,
    pub emit_render_update: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawOutputSettings {
    pub pretty: Option<bool>,
}

/// Raw settings for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub catalog: Option<PathBuf>,
    pub editor: RawEditorSettings,
    pub output: RawOutputSettings,
}

/// Unified configuration for condtree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct Settings {
    /// Field catalog used when none is given on the command line
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catalog: Option<PathBuf>,
    pub editor: EditorSettings,
    pub output: OutputSettings,
}

/// Get the XDG config directory for condtree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "condtree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("condtree.toml"))
}

/// Get the path to the local config file in a directory.
pub fn local_config_path(dir: &Path) -> PathBuf {
    dir.join(".condtree.toml")
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Overlay wins where it specifies a value.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            catalog: overlay.catalog.clone().or_else(|| self.catalog.clone()),
            editor: EditorSettings {
                default_kind: overlay.editor.default_kind.unwrap_or(self.editor.default_kind),
                emit_render_update: overlay
                    .editor
                    .emit_render_update
                    .unwrap_or(self.editor.emit_render_update),
            },
            output: OutputSettings {
                pretty: overlay.output.pretty.unwrap_or(self.output.pretty),
            },
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `local_dir` - Optional directory holding a `.condtree.toml`
    pub fn load(local_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Global config
        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                let raw = load_raw_settings(&global_path)?;
                current = current.merge_with(&raw);
            }
        }

        // 3. Local config
        if let Some(dir) = local_dir {
            let local_path = local_config_path(dir);
            if local_path.exists() {
                let raw = load_raw_settings(&local_path)?;
                current = current.merge_with(&raw);
            }
        }

        // 4. Environment variables (explicit override)
        Self::apply_env_overrides(current)
    }

    /// Apply CONDTREE_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("CONDTREE")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("catalog") {
            settings.catalog = Some(PathBuf::from(val));
        }
        if let Ok(val) = config.get_string("editor.default_kind") {
            settings.editor.default_kind = val.parse().map_err(|e| ApplicationError::Config {
                message: format!("CONDTREE_EDITOR__DEFAULT_KIND: {}", e),
            })?;
        }
        if let Ok(val) = config.get_bool("editor.emit_render_update") {
            settings.editor.emit_render_update = val;
        }
        if let Ok(val) = config.get_bool("output.pretty") {
            settings.output.pretty = val;
        }

        Ok(settings)
    }

    /// Render settings as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: e.to_string(),
        })
    }
}
