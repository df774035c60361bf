//! Workspace root discovery

use std::path::{Path, PathBuf};
use tracing::debug;

/// Walk upward from `start` to the first directory containing a marker file.
pub fn find_workspace_root<S: AsRef<str>>(start: &Path, markers: &[S]) -> Option<PathBuf> {
    for dir in start.ancestors() {
        for marker in markers {
            let marker: &str = marker.as_ref();
            if dir.join(marker).is_file() {
                debug!(root = %dir.display(), marker, "found workspace root");
                return Some(dir.to_path_buf());
            }
        }
    }
    None
}
