//! Source discovery for an extraction pass.
//!
//! Includes are directories (literal or glob). Ignores are literal paths
//! under the root or glob patterns, matched against the root-relative path
//! and the full path. Ignored directories are pruned, not walked.

use std::{
    collections::BTreeSet,
    path::{Path, PathBuf},
};

use glob::Pattern;
use walkdir::WalkDir;

use crate::config::TEST_FILE_PATTERNS;

/// Extensions the transform understands.
pub const SOURCE_EXTENSIONS: &[&str] = &["ts", "tsx", "mts", "cts", "js", "jsx", "mjs", "cjs"];

/// Matched source files, sorted so passes are reproducible.
pub type SourceFiles = BTreeSet<PathBuf>;

/// What to scan, relative to a source root.
#[derive(Debug, Clone, Default)]
pub struct ScanOptions<'a> {
    pub includes: &'a [String],
    pub ignores: &'a [String],
    pub ignore_test_files: bool,
}

fn is_glob_pattern(pattern: &str) -> bool {
    pattern.contains('*') || pattern.contains('?') || pattern.contains('[')
}

/// Compiled ignore rules for one root.
struct IgnoreRules<'a> {
    root: &'a Path,
    paths: Vec<PathBuf>,
    patterns: Vec<Pattern>,
}

impl<'a> IgnoreRules<'a> {
    fn new(root: &'a Path, options: &ScanOptions) -> Self {
        let mut paths = Vec::new();
        let mut patterns = Vec::new();

        for ignore in options.ignores {
            if !is_glob_pattern(ignore) {
                paths.push(root.join(ignore));
                continue;
            }
            match Pattern::new(ignore) {
                Ok(pattern) => patterns.push(pattern),
                Err(e) => tracing::warn!(pattern = %ignore, error = %e, "invalid ignore pattern"),
            }
        }
        if options.ignore_test_files {
            patterns.extend(TEST_FILE_PATTERNS.iter().filter_map(|p| Pattern::new(p).ok()));
        }

        Self {
            root,
            paths,
            patterns,
        }
    }

    fn is_ignored(&self, path: &Path) -> bool {
        if self.paths.iter().any(|ignored| path.starts_with(ignored)) {
            return true;
        }
        if self.patterns.is_empty() {
            return false;
        }

        let full = path.to_string_lossy().replace('\\', "/");
        let relative = path
            .strip_prefix(self.root)
            .map(|p| p.to_string_lossy().replace('\\', "/"))
            .unwrap_or_else(|_| full.clone());
        self.patterns
            .iter()
            .any(|p| p.matches(&relative) || p.matches(&full))
    }
}

/// Directories to walk: the root itself when no includes are configured.
fn include_dirs(root: &Path, includes: &[String]) -> Vec<PathBuf> {
    if includes.is_empty() {
        return vec![root.to_path_buf()];
    }

    let mut dirs = Vec::new();
    for include in includes {
        if is_glob_pattern(include) {
            let pattern = root.join(include);
            match glob::glob(&pattern.to_string_lossy()) {
                Ok(entries) => dirs.extend(entries.flatten().filter(|p| p.is_dir())),
                Err(e) => tracing::warn!(pattern = %include, error = %e, "invalid include pattern"),
            }
        } else {
            let dir = root.join(include);
            if dir.exists() {
                dirs.push(dir);
            } else {
                tracing::warn!(path = %dir.display(), "include path does not exist");
            }
        }
    }
    dirs
}

pub fn scan_files(root: &Path, options: &ScanOptions) -> SourceFiles {
    let rules = IgnoreRules::new(root, options);
    let mut files = SourceFiles::new();

    for dir in include_dirs(root, options.includes) {
        let walker = WalkDir::new(&dir)
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || !rules.is_ignored(entry.path()));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!(error = %e, "cannot access path, skipping");
                    continue;
                }
            };
            let path = entry.path();
            if entry.file_type().is_file() && is_source_file(path) {
                files.insert(path.to_path_buf());
            }
        }
    }

    tracing::debug!(root = %root.display(), count = files.len(), "scanned source files");
    files
}

/// TS/JS sources, excluding declaration files, which carry no runtime code.
fn is_source_file(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    if name.ends_with(".d.ts") || name.ends_with(".d.mts") || name.ends_with(".d.cts") {
        return false;
    }
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| SOURCE_EXTENSIONS.contains(&ext))
}
