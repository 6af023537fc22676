use std::collections::BTreeSet;
use std::path::Path;

use ignore::overrides::{Override, OverrideBuilder};
use tracing::debug;
use walkdir::WalkDir;

use crate::error::{FsError, FsResult};

/// Pattern used when no include pattern is given.
pub const MATCH_ALL: &str = "**/*";

const DEFAULT_INCLUDE: &[&str] = &[MATCH_ALL];

/// Enumerate regular files under `src_dir` matching `include` but not `exclude`.
///
/// Patterns use gitignore glob syntax relative to `src_dir`: a pattern without
/// a slash (`*.json`) matches at any depth, `**` crosses directories. An empty
/// `include` list matches every file. Directories are never returned.
///
/// Returns `/`-separated paths relative to `src_dir`, sorted and deduplicated.
/// Files whose relative path is not valid UTF-8 are skipped.
pub fn globs(src_dir: &Path, include: &[&str], exclude: &[&str]) -> FsResult<Vec<String>> {
    if !src_dir.is_dir() {
        return Err(FsError::InvalidInput(format!(
            "source directory '{}' does not exist",
            src_dir.display()
        )));
    }

    let include = if include.is_empty() { DEFAULT_INCLUDE } else { include };
    let include = build_matcher(src_dir, include)?;
    let exclude = build_matcher(src_dir, exclude)?;

    let mut matches = BTreeSet::new();
    for entry in WalkDir::new(src_dir).min_depth(1) {
        let entry = entry?;
        // Follows symlinks, so a link to a regular file counts as a file.
        if !entry.path().is_file() {
            continue;
        }
        let Ok(relative) = entry.path().strip_prefix(src_dir) else {
            continue;
        };
        if !include.matched(relative, false).is_whitelist() {
            continue;
        }
        if exclude.matched(relative, false).is_whitelist() {
            continue;
        }
        let Some(path) = to_slash(relative) else {
            debug!(path = %relative.display(), "skipping non-UTF-8 path");
            continue;
        };
        matches.insert(path);
    }

    debug!(dir = %src_dir.display(), count = matches.len(), "glob enumeration complete");
    Ok(matches.into_iter().collect())
}

fn build_matcher(root: &Path, patterns: &[&str]) -> FsResult<Override> {
    let mut builder = OverrideBuilder::new(root);
    for pattern in patterns {
        builder.add(pattern)?;
    }
    Ok(builder.build()?)
}

fn to_slash(path: &Path) -> Option<String> {
    let parts = path
        .components()
        .map(|c| c.as_os_str().to_str())
        .collect::<Option<Vec<_>>>()?;
    Some(parts.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn tree() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("src/nested")).unwrap();
        fs::create_dir_all(root.join("build")).unwrap();
        fs::create_dir_all(root.join("empty.json")).unwrap();
        fs::write(root.join("config.json"), "{}").unwrap();
        fs::write(root.join("notes.txt"), "n").unwrap();
        fs::write(root.join("src/main.py"), "m").unwrap();
        fs::write(root.join("src/nested/data.json"), "[]").unwrap();
        fs::write(root.join("build/out.json"), "{}").unwrap();
        dir
    }

    #[test]
    fn default_includes_every_file() {
        let dir = tree();
        let files = globs(dir.path(), &[], &[]).unwrap();
        assert_eq!(
            files,
            vec![
                "build/out.json",
                "config.json",
                "notes.txt",
                "src/main.py",
                "src/nested/data.json",
            ]
        );
    }

    #[test]
    fn include_matches_at_any_depth_and_skips_directories() {
        let dir = tree();
        let files = globs(dir.path(), &["*.json"], &[]).unwrap();
        assert_eq!(
            files,
            vec!["build/out.json", "config.json", "src/nested/data.json"]
        );
    }

    #[test]
    fn exclude_drops_matches() {
        let dir = tree();
        let files = globs(dir.path(), &["*.json"], &["build/**"]).unwrap();
        assert_eq!(files, vec!["config.json", "src/nested/data.json"]);
    }

    #[test]
    fn overlapping_includes_are_deduplicated() {
        let dir = tree();
        let files = globs(dir.path(), &["*.py", "src/**"], &[]).unwrap();
        assert_eq!(files, vec!["src/main.py", "src/nested/data.json"]);
    }

    #[test]
    fn missing_source_directory() {
        let dir = tree();
        let err = globs(&dir.path().join("absent"), &[], &[]).unwrap_err();
        assert!(matches!(err, FsError::InvalidInput(_)));
    }

    #[test]
    fn file_is_not_a_source_directory() {
        let dir = tree();
        let err = globs(&dir.path().join("notes.txt"), &[], &[]).unwrap_err();
        assert!(matches!(err, FsError::InvalidInput(_)));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn non_utf8_names_are_skipped() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = tree();
        fs::write(dir.path().join(OsStr::from_bytes(b"bad\xff.txt")), "b").unwrap();
        let files = globs(dir.path(), &["*.txt"], &[]).unwrap();
        assert_eq!(files, vec!["notes.txt"]);
    }

    #[test]
    fn bad_pattern() {
        let dir = tree();
        let err = globs(dir.path(), &["src/[unclosed"], &[]).unwrap_err();
        assert!(matches!(err, FsError::Pattern(_)));
    }
}
