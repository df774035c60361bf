//! Rule table: every flag line reachable from the root rc file
//!
//! The table is the flattened, import-inlined view of the rc hierarchy.
//! Imported files are spliced in at the position of their directive, so
//! the table reads exactly as if every import had been pasted inline.

mod reader;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use rcflags_syntax::RcLine;

use crate::error::ExpandError;
use crate::hierarchy::CommandHierarchy;

pub use reader::{RcReader, WORKSPACE_PLACEHOLDER};

/// Where a rule was read from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RcOrigin {
    /// Canonical path of the file
    pub path: PathBuf,

    /// 1-based line number of the logical line
    pub line: usize,
}

/// A flag rule with its provenance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RcRule {
    pub command: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<String>,

    pub flags: Vec<String>,

    pub origin: RcOrigin,
}

impl RcRule {
    pub(crate) fn from_line(line: RcLine, path: &Path) -> Self {
        Self {
            command: line.command,
            config: line.config,
            flags: line.flags,
            origin: RcOrigin {
                path: path.to_path_buf(),
                line: line.line,
            },
        }
    }

    /// Whether this rule applies to `command` under `config` (`None` = unscoped)
    pub fn applies_to(&self, command: &str, config: Option<&str>) -> bool {
        self.command == command && self.config.as_deref() == config
    }
}

/// How a source file entered the table
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum SourceKind {
    Root,
    Import,
    TryImport,
}

impl SourceKind {
    /// Whether a missing file is skipped instead of failing
    pub fn skips_missing(&self) -> bool {
        matches!(self, SourceKind::Root | SourceKind::TryImport)
    }
}

/// An rc file that contributed to the table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RcSource {
    pub kind: SourceKind,

    /// Canonical path of the file
    pub path: PathBuf,

    /// SHA-256 digest of raw file bytes
    pub digest: String,
}

/// Ordered rules from the root rc file and everything it imports
#[derive(Debug, Clone, Default)]
pub struct RuleTable {
    rules: Vec<RcRule>,
    sources: Vec<RcSource>,
}

impl RuleTable {
    /// Read `rc_file_name` in `workspace_root` and all of its imports.
    ///
    /// A missing root file yields an empty table.
    pub fn load(workspace_root: &Path, rc_file_name: &str) -> Result<Self, ExpandError> {
        RcReader::new(workspace_root).read_root(&workspace_root.join(rc_file_name))
    }

    /// Build a table from rules already in memory
    pub fn from_rules(rules: Vec<RcRule>) -> Self {
        Self {
            rules,
            sources: Vec::new(),
        }
    }

    pub fn rules(&self) -> &[RcRule] {
        &self.rules
    }

    /// Files read, in read order
    pub fn sources(&self) -> &[RcSource] {
        &self.sources
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rules for exactly `command` and `config`, in file order
    pub fn matching<'a>(
        &'a self,
        command: &'a str,
        config: Option<&'a str>,
    ) -> impl Iterator<Item = &'a RcRule> + 'a {
        self.rules
            .iter()
            .filter(move |rule| rule.applies_to(command, config))
    }

    /// Whether any phase of `command` defines `config`
    pub fn defines_config(
        &self,
        hierarchy: &CommandHierarchy,
        command: &str,
        config: &str,
    ) -> bool {
        hierarchy
            .phases(command)
            .iter()
            .any(|phase| self.matching(phase, Some(config)).next().is_some())
    }

    /// Config names usable with `command`, in first-seen file order
    pub fn config_names(&self, hierarchy: &CommandHierarchy, command: &str) -> Vec<String> {
        let phases = hierarchy.phases(command);
        let mut names: Vec<String> = Vec::new();

        for rule in &self.rules {
            if let Some(config) = &rule.config {
                if phases.contains(&rule.command) && !names.contains(config) {
                    names.push(config.clone());
                }
            }
        }

        names
    }
}
