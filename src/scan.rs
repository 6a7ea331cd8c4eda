use std::fs;
use std::path::Path;

use tracing::warn;

use crate::error::{AnalysisError, Result};

/// Lists the regular files directly inside `dir` whose name ends with
/// `extension` (case-sensitive), sorted by filename.
///
/// Names that are not valid UTF-8 cannot be written to the report and are
/// skipped with a warning.
pub fn scan_images(dir: &Path, extension: &str) -> Result<Vec<String>> {
    let read_dir_error = |source| AnalysisError::ReadDir {
        path: dir.to_path_buf(),
        source,
    };

    let mut names = Vec::new();
    for entry in fs::read_dir(dir).map_err(read_dir_error)? {
        let entry = entry.map_err(read_dir_error)?;
        let Ok(name) = entry.file_name().into_string() else {
            warn!(path = %entry.path().display(), "skipping non UTF-8 filename");
            continue;
        };
        if !name.ends_with(extension) {
            continue;
        }
        if entry.path().is_file() {
            names.push(name);
        }
    }

    names.sort_unstable();
    Ok(names)
}
