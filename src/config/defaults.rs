//! Built-in tool defaults
//!
//! Used when .rcflags.toml is absent or leaves a key unset.

use super::ToolConfig;
use std::collections::BTreeMap;

/// Name of the tool configuration file in the workspace root
pub const TOOL_CONFIG_FILE: &str = ".rcflags.toml";

/// Root rc file read from the workspace root
pub const DEFAULT_RC_FILE: &str = ".bazelrc";

/// Files that mark a workspace root
pub const DEFAULT_WORKSPACE_MARKERS: &[&str] = &["WORKSPACE", "WORKSPACE.bazel", "MODULE.bazel"];

pub(super) fn rc_file() -> String {
    DEFAULT_RC_FILE.to_string()
}

pub(super) fn workspace_markers() -> Vec<String> {
    DEFAULT_WORKSPACE_MARKERS.iter().map(|m| m.to_string()).collect()
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            rc_file: rc_file(),
            workspace_markers: workspace_markers(),
            commands: BTreeMap::new(),
        }
    }
}
