//! Expansion of an invocation into its effective argument list
//!
//! Output order:
//! 1. flags from unscoped `startup` lines
//! 2. explicit startup flags (arguments before the command)
//! 3. the command
//! 4. unscoped flags of every hierarchy level, embedded `--config` expanded
//! 5. remaining arguments, each `--config=NAME` / `--config NAME` replaced
//!    by its expansion where it stands

mod expander;
mod explain;

pub use expander::{config_reference, ConfigExpander, CONFIG_PREFIX};
pub use explain::ExplainOutput;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use rcflags_syntax::STARTUP_COMMAND;

use crate::config::{ConfigError, ToolConfig, DEFAULT_RC_FILE};
use crate::error::ExpandError;
use crate::hierarchy::CommandHierarchy;
use crate::rcfile::{RcRule, RuleTable};

/// Separator after which arguments are passed through untouched
const END_OF_FLAGS: &str = "--";

/// Two-token form of a config reference
const CONFIG_FLAG: &str = "--config";

/// Where an output argument came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum ArgOrigin {
    /// A flag from an rc file
    Rc {
        path: PathBuf,
        line: usize,
        /// Hierarchy level of the rule (`common`, `build`, ...)
        command: String,
        /// Configs expanded to reach the rule, outermost first
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        configs: Vec<String>,
    },

    /// An argument given on the command line
    CommandLine,
}

/// One argument of the expanded list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedArg {
    pub value: String,
    pub origin: ArgOrigin,
}

impl ResolvedArg {
    fn cli(value: &str) -> Self {
        Self {
            value: value.to_string(),
            origin: ArgOrigin::CommandLine,
        }
    }

    /// A flag taken from `rule` while expanding `configs`
    pub(crate) fn rc(value: &str, rule: &RcRule) -> Self {
        Self::rc_via(value, rule, &[])
    }

    pub(crate) fn rc_via(value: &str, rule: &RcRule, configs: &[String]) -> Self {
        Self {
            value: value.to_string(),
            origin: ArgOrigin::Rc {
                path: rule.origin.path.clone(),
                line: rule.origin.line,
                command: rule.command.clone(),
                configs: configs.to_vec(),
            },
        }
    }
}

/// Resolves invocations against a workspace's rc files
#[derive(Debug, Clone)]
pub struct Resolver {
    rc_file: String,
    hierarchy: CommandHierarchy,
}

impl Default for Resolver {
    fn default() -> Self {
        Self {
            rc_file: DEFAULT_RC_FILE.to_string(),
            hierarchy: CommandHierarchy::default(),
        }
    }
}

impl Resolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolver using the rc file name and hierarchy of a tool config
    pub fn from_config(config: &ToolConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            rc_file: config.rc_file.clone(),
            hierarchy: config.hierarchy()?,
        })
    }

    pub fn with_hierarchy(mut self, hierarchy: CommandHierarchy) -> Self {
        self.hierarchy = hierarchy;
        self
    }

    pub fn hierarchy(&self) -> &CommandHierarchy {
        &self.hierarchy
    }

    /// Read the rule table of `workspace_root`
    pub fn load(&self, workspace_root: &Path) -> Result<RuleTable, ExpandError> {
        RuleTable::load(workspace_root, &self.rc_file)
    }

    /// Expanded arguments as plain strings
    pub fn expand(
        &self,
        workspace_root: &Path,
        args: &[String],
    ) -> Result<Vec<String>, ExpandError> {
        let table = self.load(workspace_root)?;
        let resolved = self.resolve(&table, args)?;
        Ok(resolved.into_iter().map(|arg| arg.value).collect())
    }

    /// Expanded arguments with the origin of each one
    pub fn explain(
        &self,
        workspace_root: &Path,
        args: &[String],
    ) -> Result<ExplainOutput, ExpandError> {
        let table = self.load(workspace_root)?;
        let resolved = self.resolve(&table, args)?;
        let command = command_index(args).map(|index| args[index].clone());
        Ok(ExplainOutput::new(
            args.to_vec(),
            command,
            resolved,
            table.sources().to_vec(),
        ))
    }

    /// Expand `args` against an already loaded table
    pub fn resolve(
        &self,
        table: &RuleTable,
        args: &[String],
    ) -> Result<Vec<ResolvedArg>, ExpandError> {
        let expander = ConfigExpander::new(table, &self.hierarchy);
        let mut out = Vec::new();

        // Startup flags are applied as written; configs are not supported there.
        for rule in table.rules().iter().filter(|r| r.command == STARTUP_COMMAND) {
            if rule.config.is_some() {
                debug!(
                    path = %rule.origin.path.display(),
                    line = rule.origin.line,
                    "ignoring config-scoped startup line"
                );
                continue;
            }
            out.extend(rule.flags.iter().map(|flag| ResolvedArg::rc(flag, rule)));
        }

        let Some(index) = command_index(args) else {
            debug!("no command in arguments");
            out.extend(args.iter().map(|arg| ResolvedArg::cli(arg)));
            return Ok(out);
        };

        let command = &args[index];
        out.extend(args[..index].iter().map(|arg| ResolvedArg::cli(arg)));
        out.push(ResolvedArg::cli(command));
        out.extend(expander.command_flags(command)?);

        let mut rest = args[index + 1..].iter();
        while let Some(arg) = rest.next() {
            if arg == END_OF_FLAGS {
                out.push(ResolvedArg::cli(arg));
                out.extend(rest.by_ref().map(|arg| ResolvedArg::cli(arg)));
                break;
            }

            let config = if arg == CONFIG_FLAG {
                rest.next().ok_or(ExpandError::MissingConfigValue)?.as_str()
            } else if let Some(name) = config_reference(arg) {
                name
            } else {
                out.push(ResolvedArg::cli(arg));
                continue;
            };

            out.extend(expander.flags_for(command, config, &mut Vec::new())?);
        }

        Ok(out)
    }
}

/// Position of the command: the first argument that is not a flag
fn command_index(args: &[String]) -> Option<usize> {
    args.iter().position(|arg| !arg.starts_with('-'))
}

/// Expand `args` against the rc files of `workspace_root` with default settings.
pub fn expand_configs(workspace_root: &Path, args: &[String]) -> Result<Vec<String>, ExpandError> {
    Resolver::default().expand(workspace_root, args)
}
