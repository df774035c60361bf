//! Classified rc entries.

use serde::{Deserialize, Serialize};

/// One flag-declaration line: `COMMAND[:CONFIG] FLAG...`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RcLine {
    /// Command the flags apply to (`build`, `test`, `startup`, ...).
    pub command: String,

    /// Named configuration the line is scoped to, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<String>,

    /// Flags in the order they appear on the line.
    pub flags: Vec<String>,

    /// 1-based line number where the logical line starts.
    pub line: usize,
}

/// Kind of import directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ImportKind {
    /// `import PATH`: the file must exist.
    Import,
    /// `try-import PATH`: a missing file is skipped.
    TryImport,
}

impl ImportKind {
    pub fn from_keyword(word: &str) -> Option<Self> {
        match word {
            "import" => Some(ImportKind::Import),
            "try-import" => Some(ImportKind::TryImport),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ImportKind::Import => "import",
            ImportKind::TryImport => "try-import",
        }
    }
}

/// An `import` or `try-import` directive, path unresolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportDirective {
    pub kind: ImportKind,
    /// Path expression as written, `%workspace%` not yet substituted.
    pub path: String,
    pub line: usize,
}

/// A classified logical line, in file order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RcEntry {
    Rule(RcLine),
    Import(ImportDirective),
}

/// A line that could not be classified.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SyntaxError {
    #[error("line {line}: unbalanced quotes")]
    UnbalancedQuotes { line: usize },

    #[error("line {line}: `{directive}` requires a path")]
    MissingImportPath { line: usize, directive: &'static str },

    #[error("line {line}: `{directive}` takes exactly one path")]
    ExtraImportArguments { line: usize, directive: &'static str },

    #[error("line {line}: invalid command `{token}` (expected COMMAND or COMMAND:CONFIG)")]
    InvalidCommand { line: usize, token: String },
}

impl SyntaxError {
    /// Line number the error was reported at.
    pub fn line(&self) -> usize {
        match self {
            SyntaxError::UnbalancedQuotes { line }
            | SyntaxError::MissingImportPath { line, .. }
            | SyntaxError::ExtraImportArguments { line, .. }
            | SyntaxError::InvalidCommand { line, .. } => *line,
        }
    }
}
