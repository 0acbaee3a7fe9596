//! File-list utilities for LLM-suggested paths
//!
//! Model answers routinely contain duplicated or nonexistent files; these
//! helpers prune such lists and do the small path bookkeeping around them.

use std::path::{Component, Path, PathBuf};

use tracing::debug;

use crate::error::{DevmateError, Result};

/// Read a file given a path that may be relative to `root`
pub fn retrieve_file_content(file_path: &Path, root: &Path) -> Result<String> {
    let absolute = if file_path.is_absolute() {
        file_path.to_path_buf()
    } else {
        root.join(file_path)
    };
    if !absolute.is_file() {
        return Err(DevmateError::FileNotFound(absolute));
    }
    Ok(std::fs::read_to_string(absolute)?)
}

/// Remove duplicate items from a list while preserving order
pub fn remove_duplicates(items: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    items.into_iter().filter(|i| seen.insert(i.clone())).collect()
}

/// Check if a file exists at the given path, resolving against `root` when
/// relative
pub fn check_file_exists(file_path: &str, root: &Path) -> bool {
    let path = Path::new(file_path);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    };
    absolute.is_file()
}

/// Prune an LLM-produced file list: drop duplicates, then drop files that
/// don't exist under `root`.
pub fn verify_file_list(file_list: Vec<String>, root: &Path) -> Vec<String> {
    let deduped = remove_duplicates(file_list);
    let before = deduped.len();
    let verified: Vec<String> = deduped
        .into_iter()
        .filter(|f| check_file_exists(f, root))
        .collect();
    if verified.len() < before {
        debug!("Pruned {} nonexistent files from list", before - verified.len());
    }
    verified
}

/// Resolve a `./` or `../` path against the directory of the current file;
/// other paths pass through unchanged.
pub fn resolve_relative_path(file: &Path, path: &str) -> PathBuf {
    if !path.starts_with("./") && !path.starts_with("../") {
        return PathBuf::from(path);
    }
    let file_dir = file.parent().unwrap_or_else(|| Path::new(""));
    normalize(&file_dir.join(path))
}

// Lexical normalization only ("a/./b/../c" -> "a/c"); never touches the disk.
fn normalize(path: &Path) -> PathBuf {
    let mut parts: Vec<Component> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if matches!(parts.last(), Some(Component::Normal(_))) {
                    parts.pop();
                } else {
                    parts.push(component);
                }
            }
            other => parts.push(other),
        }
    }
    parts.iter().collect()
}

/// Whether a directory entry name is hidden (dot-prefixed)
pub fn is_not_hidden(name: &str) -> bool {
    !name.starts_with('.')
}

/// Check if a file name looks like source code based on its extension.
///
/// With `only_code` false, prose formats that commonly hold test plans
/// (markdown, yaml) count too.
pub fn is_source_code(file_name: &str, only_code: bool) -> bool {
    const CODE_EXTENSIONS: &[&str] = &[
        "py", "java", "c", "cpp", "h", "hpp", "hh", "js", "ts", "go", "rs", "rb", "cs", "m",
        "swift", "php", "kt", "scala", "r", "pl", "lua", "groovy", "dart", "sh", "bat", "ipynb",
    ];
    const PROSE_EXTENSIONS: &[&str] = &["md", "yaml", "yml"];

    let Some(extension) = Path::new(file_name).extension().and_then(|e| e.to_str()) else {
        return false;
    };

    CODE_EXTENSIONS.contains(&extension)
        || (!only_code && PROSE_EXTENSIONS.contains(&extension))
}

/// List source files under `root`, relative paths, hidden entries skipped,
/// capped at `max` entries. Sorted for stable prompts.
pub fn list_source_files(root: &Path, max: usize) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    walk(root, root, &mut files)?;
    files.sort();
    files.truncate(max);
    Ok(files)
}

fn walk(root: &Path, dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if !is_not_hidden(&name) {
            continue;
        }
        let path = entry.path();
        if path.is_dir() {
            walk(root, &path, files)?;
        } else if is_source_code(&name, false) {
            if let Ok(relative) = path.strip_prefix(root) {
                files.push(relative.to_path_buf());
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_remove_duplicates_preserves_order() {
        let items = vec![
            "b.rs".to_string(),
            "a.rs".to_string(),
            "b.rs".to_string(),
            "c.rs".to_string(),
            "a.rs".to_string(),
        ];
        assert_eq!(remove_duplicates(items), vec!["b.rs", "a.rs", "c.rs"]);
    }

    #[test]
    fn test_verify_file_list_drops_missing_and_duplicates() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("real.rs"), "fn main() {}").unwrap();

        let list = vec![
            "real.rs".to_string(),
            "ghost.rs".to_string(),
            "real.rs".to_string(),
        ];
        assert_eq!(verify_file_list(list, temp_dir.path()), vec!["real.rs"]);
    }

    #[test]
    fn test_resolve_relative_path() {
        let file = Path::new("src/core/files.rs");
        assert_eq!(
            resolve_relative_path(file, "./git.rs"),
            PathBuf::from("src/core/git.rs")
        );
        assert_eq!(
            resolve_relative_path(file, "../models/mod.rs"),
            PathBuf::from("src/models/mod.rs")
        );
        // Non-relative paths pass through untouched
        assert_eq!(
            resolve_relative_path(file, "tests/common/mod.rs"),
            PathBuf::from("tests/common/mod.rs")
        );
    }

    #[test]
    fn test_is_source_code() {
        assert!(is_source_code("main.rs", true));
        assert!(is_source_code("script.py", true));
        assert!(!is_source_code("README.md", true));
        assert!(is_source_code("README.md", false));
        assert!(!is_source_code("binary.exe", false));
        assert!(!is_source_code("Makefile", false));
    }

    #[test]
    fn test_retrieve_file_content_relative_and_missing() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("lib.rs"), "pub fn f() {}").unwrap();

        let content = retrieve_file_content(Path::new("lib.rs"), temp_dir.path()).unwrap();
        assert_eq!(content, "pub fn f() {}");

        let err = retrieve_file_content(Path::new("missing.rs"), temp_dir.path()).unwrap_err();
        assert!(matches!(err, DevmateError::FileNotFound(_)));
    }

    #[test]
    fn test_list_source_files_skips_hidden_and_non_source() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join("src")).unwrap();
        fs::create_dir_all(root.join(".git")).unwrap();
        fs::write(root.join("src/main.rs"), "").unwrap();
        fs::write(root.join("src/data.bin"), "").unwrap();
        fs::write(root.join(".git/config.py"), "").unwrap();
        fs::write(root.join(".hidden.rs"), "").unwrap();

        let files = list_source_files(root, 100).unwrap();
        assert_eq!(files, vec![PathBuf::from("src/main.rs")]);
    }

    #[test]
    fn test_list_source_files_respects_cap() {
        let temp_dir = TempDir::new().unwrap();
        for i in 0..5 {
            fs::write(temp_dir.path().join(format!("f{i}.rs")), "").unwrap();
        }
        let files = list_source_files(temp_dir.path(), 3).unwrap();
        assert_eq!(files.len(), 3);
    }
}
