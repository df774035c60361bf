//! rcflags - effective flags of a build-tool invocation
//!
//! Reads a workspace's rc file hierarchy (following `import` and
//! `try-import`), then expands an invocation such as `build --config=foo`
//! into the flat argument list the tool would actually see, without running
//! the tool.

pub mod config;
pub mod error;
pub mod expand;
pub mod hierarchy;
pub mod rcfile;
pub mod workspace;

pub use config::{ConfigError, ToolConfig};
pub use error::ExpandError;
pub use expand::{expand_configs, ArgOrigin, ExplainOutput, ResolvedArg, Resolver};
pub use hierarchy::CommandHierarchy;
pub use rcfile::{RcOrigin, RcRule, RcSource, RuleTable, SourceKind};
pub use workspace::find_workspace_root;
