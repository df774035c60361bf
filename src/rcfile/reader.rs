//! Import resolution
//!
//! Reads an rc file, classifies its lines, and follows `import` and
//! `try-import` directives depth-first. The stack of files currently being
//! read is carried explicitly; revisiting a file on that stack is a
//! circular import.

use sha2::{Digest, Sha256};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

use rcflags_syntax::{parse_rc, ImportKind, RcEntry};

use super::{RcRule, RcSource, RuleTable, SourceKind};
use crate::error::ExpandError;

/// Placeholder substituted with the workspace root in import paths
pub const WORKSPACE_PLACEHOLDER: &str = "%workspace%";

/// Depth-first reader producing a [`RuleTable`]
pub struct RcReader<'a> {
    workspace_root: &'a Path,
    rules: Vec<RcRule>,
    sources: Vec<RcSource>,
}

impl<'a> RcReader<'a> {
    pub fn new(workspace_root: &'a Path) -> Self {
        Self {
            workspace_root,
            rules: Vec::new(),
            sources: Vec::new(),
        }
    }

    /// Read the root file and everything it imports
    pub fn read_root(mut self, path: &Path) -> Result<RuleTable, ExpandError> {
        let mut stack = Vec::new();
        self.read_file(path, SourceKind::Root, &mut stack)?;

        Ok(RuleTable {
            rules: self.rules,
            sources: self.sources,
        })
    }

    /// Expand an import path expression to a filesystem path
    pub fn resolve_import_path(&self, expr: &str) -> PathBuf {
        let root = self.workspace_root.to_string_lossy();
        let path = PathBuf::from(expr.replace(WORKSPACE_PLACEHOLDER, &root));

        if path.is_relative() {
            self.workspace_root.join(path)
        } else {
            path
        }
    }

    fn read_file(
        &mut self,
        path: &Path,
        kind: SourceKind,
        stack: &mut Vec<PathBuf>,
    ) -> Result<(), ExpandError> {
        let key = match fs::canonicalize(path) {
            Ok(key) => key,
            Err(e) if e.kind() == io::ErrorKind::NotFound && kind.skips_missing() => {
                debug!(path = %path.display(), ?kind, "rc file not found, skipping");
                return Ok(());
            }
            Err(e) => return Err(ExpandError::read(path, e)),
        };

        if stack.contains(&key) {
            let mut chain = stack.clone();
            chain.push(key);
            return Err(ExpandError::CircularImport { chain });
        }

        let bytes = fs::read(&key).map_err(|e| ExpandError::read(&key, e))?;
        let digest = hex::encode(Sha256::digest(&bytes));
        let text = String::from_utf8(bytes).map_err(|e| {
            ExpandError::read(&key, io::Error::new(io::ErrorKind::InvalidData, e))
        })?;

        let entries = parse_rc(&text).map_err(|source| ExpandError::MalformedLine {
            path: key.clone(),
            source,
        })?;

        debug!(path = %key.display(), ?kind, entries = entries.len(), "read rc file");
        self.sources.push(RcSource {
            kind,
            path: key.clone(),
            digest,
        });

        stack.push(key);
        let result = self.read_entries(entries, stack);
        stack.pop();
        result
    }

    fn read_entries(
        &mut self,
        entries: Vec<RcEntry>,
        stack: &mut Vec<PathBuf>,
    ) -> Result<(), ExpandError> {
        let current = match stack.last() {
            Some(path) => path.clone(),
            None => return Ok(()),
        };

        for entry in entries {
            match entry {
                RcEntry::Rule(line) => self.rules.push(RcRule::from_line(line, &current)),
                RcEntry::Import(directive) => {
                    let target = self.resolve_import_path(&directive.path);
                    debug!(
                        from = %current.display(),
                        line = directive.line,
                        target = %target.display(),
                        "following {}",
                        directive.kind.as_str()
                    );
                    let kind = match directive.kind {
                        ImportKind::Import => SourceKind::Import,
                        ImportKind::TryImport => SourceKind::TryImport,
                    };
                    self.read_file(&target, kind, stack)?;
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn workspace(files: &[(&str, &str)]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for (name, contents) in files {
            fs::write(dir.path().join(name), contents).unwrap();
        }
        dir
    }

    fn flags(table: &RuleTable) -> Vec<String> {
        table
            .rules()
            .iter()
            .flat_map(|r| r.flags.iter().cloned())
            .collect()
    }

    #[test]
    fn test_missing_root_is_empty() {
        let ws = workspace(&[]);
        let table = RuleTable::load(ws.path(), ".bazelrc").unwrap();
        assert!(table.is_empty());
        assert!(table.sources().is_empty());
    }

    #[test]
    fn test_import_is_spliced_in_place() {
        let ws = workspace(&[
            (".bazelrc", "build --one\nimport %workspace%/mid.rc\nbuild --four\n"),
            ("mid.rc", "build --two\nbuild --three\n"),
        ]);
        let table = RuleTable::load(ws.path(), ".bazelrc").unwrap();
        assert_eq!(flags(&table), vec!["--one", "--two", "--three", "--four"]);
        assert_eq!(table.sources().len(), 2);
        assert_eq!(table.sources()[0].kind, SourceKind::Root);
        assert_eq!(table.sources()[1].kind, SourceKind::Import);
    }

    #[test]
    fn test_nested_imports_record_origin() {
        let ws = workspace(&[
            (".bazelrc", "import %workspace%/a.rc\n"),
            ("a.rc", "\n\nimport b.rc\n"),
            ("b.rc", "test --deep\n"),
        ]);
        let table = RuleTable::load(ws.path(), ".bazelrc").unwrap();
        assert_eq!(table.rules().len(), 1);

        let origin = &table.rules()[0].origin;
        assert!(origin.path.ends_with("b.rc"));
        assert_eq!(origin.line, 1);
    }

    #[test]
    fn test_missing_import_fails() {
        let ws = workspace(&[(".bazelrc", "import %workspace%/nope.rc\n")]);
        let err = RuleTable::load(ws.path(), ".bazelrc").unwrap_err();
        match err {
            ExpandError::FileRead { path, source } => {
                assert!(path.ends_with("nope.rc"));
                assert_eq!(source.kind(), io::ErrorKind::NotFound);
            }
            other => panic!("expected FileRead, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_try_import_is_skipped() {
        let ws = workspace(&[(".bazelrc", "try-import %workspace%/nope.rc\nbuild --x\n")]);
        let table = RuleTable::load(ws.path(), ".bazelrc").unwrap();
        assert_eq!(flags(&table), vec!["--x"]);
        assert_eq!(table.sources().len(), 1);
    }

    #[test]
    fn test_try_import_of_directory_still_fails() {
        let ws = workspace(&[(".bazelrc", "try-import %workspace%/sub\n")]);
        fs::create_dir(ws.path().join("sub")).unwrap();
        let err = RuleTable::load(ws.path(), ".bazelrc").unwrap_err();
        assert!(matches!(err, ExpandError::FileRead { .. }));
    }

    #[test]
    fn test_self_import_is_circular() {
        let ws = workspace(&[(".bazelrc", "import %workspace%/.bazelrc\n")]);
        let err = RuleTable::load(ws.path(), ".bazelrc").unwrap_err();
        match err {
            ExpandError::CircularImport { chain } => {
                assert_eq!(chain.len(), 2);
                assert_eq!(chain[0], chain[1]);
            }
            other => panic!("expected CircularImport, got {:?}", other),
        }
    }

    #[test]
    fn test_diamond_import_is_not_circular() {
        let ws = workspace(&[
            (".bazelrc", "import %workspace%/a.rc\nimport %workspace%/b.rc\n"),
            ("a.rc", "import %workspace%/shared.rc\n"),
            ("b.rc", "import %workspace%/shared.rc\n"),
            ("shared.rc", "build --shared\n"),
        ]);
        let table = RuleTable::load(ws.path(), ".bazelrc").unwrap();
        assert_eq!(flags(&table), vec!["--shared", "--shared"]);
    }

    #[test]
    fn test_malformed_line_reports_file() {
        let ws = workspace(&[(".bazelrc", "build \"--open\n")]);
        let err = RuleTable::load(ws.path(), ".bazelrc").unwrap_err();
        match err {
            ExpandError::MalformedLine { path, source } => {
                assert!(path.ends_with(".bazelrc"));
                assert_eq!(source.line(), 1);
            }
            other => panic!("expected MalformedLine, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_utf8_is_read_error() {
        let ws = workspace(&[]);
        fs::write(ws.path().join(".bazelrc"), [0x62, 0xff, 0xfe]).unwrap();
        let err = RuleTable::load(ws.path(), ".bazelrc").unwrap_err();
        match err {
            ExpandError::FileRead { source, .. } => {
                assert_eq!(source.kind(), io::ErrorKind::InvalidData)
            }
            other => panic!("expected FileRead, got {:?}", other),
        }
    }

    #[test]
    fn test_digest_is_sha256_of_contents() {
        let ws = workspace(&[(".bazelrc", "")]);
        let table = RuleTable::load(ws.path(), ".bazelrc").unwrap();
        assert_eq!(
            table.sources()[0].digest,
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_resolve_import_path() {
        let reader = RcReader::new(Path::new("/ws"));
        assert_eq!(
            reader.resolve_import_path("%workspace%/tools/ci.rc"),
            PathBuf::from("/ws/tools/ci.rc")
        );
        assert_eq!(reader.resolve_import_path("/etc/x.rc"), PathBuf::from("/etc/x.rc"));
        assert_eq!(reader.resolve_import_path("rel.rc"), PathBuf::from("/ws/rel.rc"));
    }
}
