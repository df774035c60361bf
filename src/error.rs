//! Errors surfaced by rc resolution.
//!
//! Every error is terminal for the resolution that raised it; no partial
//! argument list is returned.

use std::io;
use std::path::{Path, PathBuf};

use rcflags_syntax::SyntaxError;

/// Error resolving the effective arguments of an invocation.
#[derive(Debug, thiserror::Error)]
pub enum ExpandError {
    /// An rc file could not be read (missing `import` target, permissions,
    /// invalid UTF-8, ...).
    #[error("failed to read rc file {}: {source}", .path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The import graph revisited a file. The chain ends with the repeated path.
    #[error("circular import detected: {}", display_paths(.chain))]
    CircularImport { chain: Vec<PathBuf> },

    /// The `--config` graph revisited a name. The chain ends with the repeated name.
    #[error("circular --config reference detected: {}", .chain.join(" -> "))]
    CircularConfig { chain: Vec<String> },

    /// An rc file contains a line that cannot be classified.
    #[error("malformed rc file {}: {source}", .path.display())]
    MalformedLine {
        path: PathBuf,
        #[source]
        source: SyntaxError,
    },

    /// `--config` given as the last command-line argument.
    #[error("--config requires a value")]
    MissingConfigValue,
}

impl ExpandError {
    pub(crate) fn read(path: &Path, source: io::Error) -> Self {
        ExpandError::FileRead {
            path: path.to_path_buf(),
            source,
        }
    }
}

fn display_paths(chain: &[PathBuf]) -> String {
    chain
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(" -> ")
}
