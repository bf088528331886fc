//! Input source discovery.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{IngestError, Result};

/// Resolves CLI paths into named input sources.
///
/// Files are taken as-is; directories are searched recursively for `.csv`
/// files. Every source is keyed by its file stem. When two paths share a
/// stem, the later one wins. The map iterates in name order.
pub fn resolve_sources(paths: &[PathBuf]) -> Result<BTreeMap<String, PathBuf>> {
    let mut sources = BTreeMap::new();

    for path in paths {
        let files = if path.is_file() {
            vec![path.clone()]
        } else if path.is_dir() {
            list_csv_files_recursive(path)?
        } else {
            return Err(IngestError::PathNotFound { path: path.clone() });
        };

        for file in files {
            let name = source_name(&file);
            debug!(source = %name, path = %file.display(), "Resolved input source");
            if let Some(previous) = sources.insert(name.clone(), file) {
                warn!(
                    source = %name,
                    replaced = %previous.display(),
                    "Duplicate source name, later path wins"
                );
            }
        }
    }

    if sources.is_empty() {
        return Err(IngestError::NoSources {
            paths: paths.to_vec(),
        });
    }

    Ok(sources)
}

/// Lists `.csv` files under `dir` and all its subdirectories.
///
/// Returns files sorted by path.
pub fn list_csv_files_recursive(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    collect_csv_files(dir, &mut files)?;
    files.sort();
    Ok(files)
}

fn collect_csv_files(dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
    let entries = std::fs::read_dir(dir).map_err(|e| IngestError::DirectoryRead {
        path: dir.to_path_buf(),
        source: e,
    })?;

    for entry_result in entries {
        let entry = entry_result.map_err(|e| IngestError::DirectoryRead {
            path: dir.to_path_buf(),
            source: e,
        })?;
        let path = entry.path();

        if path.is_dir() {
            collect_csv_files(&path, files)?;
        } else if path.is_file() && is_csv(&path) {
            files.push(path);
        }
    }

    Ok(())
}

fn is_csv(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
}

fn source_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(dir: &Path, relative: &str) -> PathBuf {
        let path = dir.join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, "username,externalSystemId\n").unwrap();
        path
    }

    #[test]
    fn test_single_file_keyed_by_stem() {
        let dir = TempDir::new().unwrap();
        let file = touch(dir.path(), "staff.csv");

        let sources = resolve_sources(std::slice::from_ref(&file)).unwrap();
        assert_eq!(sources.len(), 1);
        assert_eq!(sources["staff"], file);
    }

    #[test]
    fn test_directory_is_searched_recursively() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "a.csv");
        touch(dir.path(), "nested/deeper/b.CSV");
        touch(dir.path(), "notes.txt");

        let sources = resolve_sources(&[dir.path().to_path_buf()]).unwrap();
        let names: Vec<&str> = sources.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn test_later_path_wins_on_duplicate_stem() {
        let dir = TempDir::new().unwrap();
        let first = touch(dir.path(), "one/users.csv");
        let second = touch(dir.path(), "two/users.csv");

        let sources = resolve_sources(&[first, second.clone()]).unwrap();
        assert_eq!(sources.len(), 1);
        assert_eq!(sources["users"], second);
    }

    #[test]
    fn test_missing_path_is_configuration_error() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing.csv");

        let err = resolve_sources(&[missing]).unwrap_err();
        assert!(matches!(err, IngestError::PathNotFound { .. }));
        assert!(err.is_configuration());
    }

    #[test]
    fn test_empty_directory_has_no_sources() {
        let dir = TempDir::new().unwrap();
        let err = resolve_sources(&[dir.path().to_path_buf()]).unwrap_err();
        assert!(matches!(err, IngestError::NoSources { .. }));
    }
}
