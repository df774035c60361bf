//! `--config` expansion
//!
//! Collects flags for a command across its hierarchy and replaces every
//! `--config=NAME` with the flags of that config, recursively. The chain of
//! configs currently being expanded is passed down explicitly; meeting a
//! name already on it is a cycle, and the chain itself is the trace.

use rcflags_syntax::STARTUP_COMMAND;
use tracing::{debug, warn};

use super::ResolvedArg;
use crate::error::ExpandError;
use crate::hierarchy::CommandHierarchy;
use crate::rcfile::RuleTable;

/// Prefix of an inline config reference
pub const CONFIG_PREFIX: &str = "--config=";

/// Name referenced by a `--config=NAME` flag
pub fn config_reference(flag: &str) -> Option<&str> {
    flag.strip_prefix(CONFIG_PREFIX)
}

/// Expands rules of a [`RuleTable`] for one command hierarchy
pub struct ConfigExpander<'a> {
    table: &'a RuleTable,
    hierarchy: &'a CommandHierarchy,
}

impl<'a> ConfigExpander<'a> {
    pub fn new(table: &'a RuleTable, hierarchy: &'a CommandHierarchy) -> Self {
        Self { table, hierarchy }
    }

    /// Flags of `config` for `command`, nested configs expanded in place.
    ///
    /// `stack` holds the configs being expanded by the caller; it is left
    /// unchanged on return.
    pub fn flags_for(
        &self,
        command: &str,
        config: &str,
        stack: &mut Vec<String>,
    ) -> Result<Vec<ResolvedArg>, ExpandError> {
        if stack.iter().any(|name| name == config) {
            let mut chain = stack.clone();
            chain.push(config.to_string());
            return Err(ExpandError::CircularConfig { chain });
        }

        debug!(command, config, depth = stack.len(), "expanding config");
        stack.push(config.to_string());
        let result = self.collect(command, Some(config), stack);
        stack.pop();

        let flags = result?;
        if !self.table.defines_config(self.hierarchy, command, config) {
            warn!(command, config, "config is not defined in any rc file");
        }
        Ok(flags)
    }

    /// Unscoped flags for `command` across its hierarchy, with any
    /// `--config=NAME` among them expanded. Startup flags are not part of
    /// any command's flags.
    pub fn command_flags(&self, command: &str) -> Result<Vec<ResolvedArg>, ExpandError> {
        if command == STARTUP_COMMAND {
            return Ok(Vec::new());
        }
        self.collect(command, None, &mut Vec::new())
    }

    fn collect(
        &self,
        command: &str,
        config: Option<&str>,
        stack: &mut Vec<String>,
    ) -> Result<Vec<ResolvedArg>, ExpandError> {
        let mut out = Vec::new();

        for phase in self.hierarchy.phases(command) {
            for rule in self.table.matching(&phase, config) {
                for flag in &rule.flags {
                    match config_reference(flag) {
                        Some(name) => out.extend(self.flags_for(command, name, stack)?),
                        None => out.push(ResolvedArg::rc_via(flag, rule, stack)),
                    }
                }
            }
        }

        Ok(out)
    }
}
