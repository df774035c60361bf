//! Line classifier for rc-style flag files.
//!
//! Turns the raw text of a single rc file into an ordered list of entries:
//! flag rules (`COMMAND[:CONFIG] FLAG...`) and import directives
//! (`import PATH`, `try-import PATH`). Entries keep file order so that the
//! caller can splice imported files in at the exact point of the directive.
//!
//! This crate never touches the filesystem.

mod entry;
mod lines;

pub use entry::{ImportDirective, ImportKind, RcEntry, RcLine, SyntaxError};
pub use lines::{logical_lines, strip_comment};

/// Command name applied to flags given on a line with no command token.
pub const COMMON_COMMAND: &str = "common";

/// Command name for flags that precede the command token.
pub const STARTUP_COMMAND: &str = "startup";

/// Classify the contents of one rc file.
///
/// Blank and comment-only lines produce nothing. Lines are numbered from 1;
/// a continued line reports the number of its first physical line.
pub fn parse_rc(text: &str) -> Result<Vec<RcEntry>, SyntaxError> {
    let mut entries = Vec::new();

    for (line, logical) in logical_lines(text) {
        let content = strip_comment(&logical);
        if content.trim().is_empty() {
            continue;
        }

        let tokens = shlex::split(content).ok_or(SyntaxError::UnbalancedQuotes { line })?;
        if let Some(entry) = classify(line, tokens)? {
            entries.push(entry);
        }
    }

    Ok(entries)
}

/// Classify one tokenized logical line.
fn classify(line: usize, mut tokens: Vec<String>) -> Result<Option<RcEntry>, SyntaxError> {
    if tokens.is_empty() {
        return Ok(None);
    }

    let head = tokens.remove(0);

    if let Some(kind) = ImportKind::from_keyword(&head) {
        let mut rest = tokens.into_iter();
        let path = rest.next().ok_or(SyntaxError::MissingImportPath {
            line,
            directive: kind.as_str(),
        })?;
        if rest.next().is_some() {
            return Err(SyntaxError::ExtraImportArguments {
                line,
                directive: kind.as_str(),
            });
        }
        return Ok(Some(RcEntry::Import(ImportDirective { kind, path, line })));
    }

    // A bare flag line applies to every command.
    if head.starts_with('-') {
        let mut flags = Vec::with_capacity(tokens.len() + 1);
        flags.push(head);
        flags.extend(tokens);
        return Ok(Some(RcEntry::Rule(RcLine {
            command: COMMON_COMMAND.to_string(),
            config: None,
            flags,
            line,
        })));
    }

    let (command, config) = split_command(line, &head)?;
    Ok(Some(RcEntry::Rule(RcLine {
        command,
        config,
        flags: tokens,
        line,
    })))
}

/// Split `COMMAND[:CONFIG]` into its parts.
fn split_command(line: usize, token: &str) -> Result<(String, Option<String>), SyntaxError> {
    let invalid = || SyntaxError::InvalidCommand {
        line,
        token: token.to_string(),
    };

    match token.split_once(':') {
        None => Ok((token.to_string(), None)),
        Some((command, config)) => {
            if command.is_empty() || config.is_empty() || config.contains(':') {
                return Err(invalid());
            }
            Ok((command.to_string(), Some(config.to_string())))
        }
    }
}
