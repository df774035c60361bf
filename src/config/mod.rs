//! Tool configuration (.rcflags.toml)
//!
//! Optional file in the workspace root that names the root rc file, the
//! markers used to discover the workspace, and extra command inheritance
//! entries. Absent file means built-in defaults.

mod defaults;

pub use defaults::{DEFAULT_RC_FILE, DEFAULT_WORKSPACE_MARKERS, TOOL_CONFIG_FILE};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::hierarchy::CommandHierarchy;
use crate::workspace::find_workspace_root;

/// Error types for config operations
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] io::Error),

    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

/// Configuration from .rcflags.toml
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolConfig {
    /// Root rc file name, relative to the workspace root
    #[serde(default = "defaults::rc_file")]
    pub rc_file: String,

    /// Files whose presence marks a workspace root
    #[serde(default = "defaults::workspace_markers")]
    pub workspace_markers: Vec<String>,

    /// Extra `command = "parent"` inheritance entries
    #[serde(default)]
    pub commands: BTreeMap<String, String>,
}

impl ToolConfig {
    /// Load `.rcflags.toml` from `workspace_root`, or defaults if it is absent
    pub fn load(workspace_root: &Path) -> Result<Self, ConfigError> {
        let path = workspace_root.join(TOOL_CONFIG_FILE);
        if path.exists() {
            Self::from_file(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Find the workspace containing `start` and its tool config.
    ///
    /// The nearest `.rcflags.toml` above `start` decides which markers are
    /// searched for; its own directory is the root when none of them is
    /// found. Without a tool config the default markers are used.
    pub fn discover(start: &Path) -> Result<Option<(PathBuf, Self)>, ConfigError> {
        let Some(config_dir) = start
            .ancestors()
            .find(|dir| dir.join(TOOL_CONFIG_FILE).is_file())
        else {
            let config = Self::default();
            let root = find_workspace_root(start, &config.workspace_markers);
            return Ok(root.map(|root| (root, config)));
        };

        let config = Self::from_file(&config_dir.join(TOOL_CONFIG_FILE))?;
        debug!(
            path = %config_dir.display(),
            markers = ?config.workspace_markers,
            "loaded tool config"
        );
        let root = find_workspace_root(start, &config.workspace_markers)
            .unwrap_or_else(|| config_dir.to_path_buf());
        Ok(Some((root, config)))
    }

    /// Load and parse config from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_str(&contents)
    }

    /// Parse config from a TOML string
    pub fn from_str(s: &str) -> Result<Self, ConfigError> {
        let config: ToolConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        // Rule: rc file must be a bare file name
        if self.rc_file.is_empty() {
            return Err(ConfigError::ValidationError(
                "'rc_file' cannot be empty".to_string(),
            ));
        }
        if self.rc_file.contains('/') || self.rc_file.contains('\\') {
            return Err(ConfigError::ValidationError(format!(
                "'rc_file' must be a file name, got '{}'",
                self.rc_file
            )));
        }

        // Rule: at least one workspace marker
        if self.workspace_markers.is_empty() {
            return Err(ConfigError::ValidationError(
                "At least one entry must be defined in 'workspace_markers'".to_string(),
            ));
        }

        // Rule: inheritance entries must form a valid hierarchy
        self.hierarchy()?;

        Ok(())
    }

    /// Built-in hierarchy extended with the `[commands]` entries
    pub fn hierarchy(&self) -> Result<CommandHierarchy, ConfigError> {
        let mut hierarchy = CommandHierarchy::default();
        for (command, parent) in &self.commands {
            hierarchy.set_parent(command, parent)?;
        }
        Ok(hierarchy)
    }
}
