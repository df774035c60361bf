//! Command inheritance
//!
//! Every command inherits the flags of `common`. Commands that imply a build
//! additionally inherit `build`, and `coverage` inherits `test`. The table is
//! plain data: `command -> parent`, walked general-first when flags are
//! collected. `startup` is never part of it.

use std::collections::BTreeMap;

use rcflags_syntax::{COMMON_COMMAND, STARTUP_COMMAND};

use crate::config::ConfigError;

/// Built-in `command -> parent` entries
const BUILTIN_PARENTS: &[(&str, &str)] = &[
    ("aquery", "build"),
    ("clean", "build"),
    ("coverage", "test"),
    ("cquery", "build"),
    ("fetch", "build"),
    ("info", "build"),
    ("mobile-install", "build"),
    ("print_action", "build"),
    ("run", "build"),
    ("sync", "build"),
    ("test", "build"),
];

/// Static mapping from a command to its ancestor chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandHierarchy {
    parents: BTreeMap<String, String>,
}

impl Default for CommandHierarchy {
    fn default() -> Self {
        Self {
            parents: BUILTIN_PARENTS
                .iter()
                .map(|(child, parent)| (child.to_string(), parent.to_string()))
                .collect(),
        }
    }
}

impl CommandHierarchy {
    /// A hierarchy where every command inherits only `common`
    pub fn empty() -> Self {
        Self {
            parents: BTreeMap::new(),
        }
    }

    /// Add or replace the parent of `command`
    pub fn with_parent(mut self, command: &str, parent: &str) -> Result<Self, ConfigError> {
        self.set_parent(command, parent)?;
        Ok(self)
    }

    /// Add or replace the parent of `command` in place
    pub fn set_parent(&mut self, command: &str, parent: &str) -> Result<(), ConfigError> {
        if command.is_empty() || parent.is_empty() {
            return Err(ConfigError::ValidationError(
                "Command inheritance entries cannot be empty".to_string(),
            ));
        }
        if command == COMMON_COMMAND || command == STARTUP_COMMAND {
            return Err(ConfigError::ValidationError(format!(
                "'{}' cannot inherit from another command",
                command
            )));
        }
        if parent == STARTUP_COMMAND {
            return Err(ConfigError::ValidationError(format!(
                "'{}' cannot inherit from 'startup'",
                command
            )));
        }
        if parent == command || self.ancestors_of(parent).iter().any(|a| a == command) {
            return Err(ConfigError::ValidationError(format!(
                "Inheriting '{}' from '{}' would form a cycle",
                command, parent
            )));
        }

        self.parents.insert(command.to_string(), parent.to_string());
        Ok(())
    }

    /// Ancestors of `command`, general first, excluding the command itself.
    ///
    /// `common` comes first for every command except `common` and `startup`,
    /// which have no ancestors.
    pub fn ancestors_of(&self, command: &str) -> Vec<String> {
        if command == COMMON_COMMAND || command == STARTUP_COMMAND {
            return Vec::new();
        }

        let mut chain = Vec::new();
        let mut current = self.parents.get(command);
        while let Some(parent) = current {
            if parent == COMMON_COMMAND || chain.len() > self.parents.len() {
                break;
            }
            chain.push(parent.clone());
            current = self.parents.get(parent);
        }
        chain.push(COMMON_COMMAND.to_string());
        chain.reverse();
        chain
    }

    /// Every level whose flags apply to `command`: ancestors, then itself
    pub fn phases(&self, command: &str) -> Vec<String> {
        let mut phases = self.ancestors_of(command);
        phases.push(command.to_string());
        phases
    }
}
