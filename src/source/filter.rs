//! Path filtering for repository traversal
//!
//! A static decision table prunes dependency, build, and VCS directories
//! by segment name and selects files for analysis by extension. The tables
//! are fixed at compile time.

use crate::source::types::EntryKind;
use std::collections::HashSet;
use std::path::Path;
use std::sync::LazyLock;

/// Directory segments that are never descended into or analyzed
static SKIPPED_SEGMENTS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    HashSet::from([
        "node_modules",
        "dist",
        "build",
        ".git",
        "vendor",
        "packages",
        "target",
        "bin",
        "obj",
    ])
});

/// Extensions of files submitted for analysis, lowercase
static ANALYZED_EXTENSIONS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    HashSet::from([
        // Source languages
        "js", "jsx", "ts", "tsx", "py", "java", "c", "cpp", "h", "hpp", "cs", "php", "rb", "go",
        "rs", "swift", "sh", "bash",
        // Configuration
        "json", "yml", "yaml", "xml", "toml",
        // Web and markup
        "html", "css", "scss", "less",
        // SQL
        "sql",
    ])
});

/// Outcome of filtering one listing entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterDecision {
    /// Do not analyze and do not descend
    Skip,
    /// List the directory and filter its children
    Descend,
    /// Fetch the file and submit it for analysis
    Analyze,
}

/// Classify one listing entry by its repository-relative path and kind.
pub fn decide(path: &str, kind: EntryKind) -> FilterDecision {
    if has_skipped_segment(path) {
        return FilterDecision::Skip;
    }
    match kind {
        EntryKind::Dir => FilterDecision::Descend,
        EntryKind::File => match extension(path) {
            Some(ext) if ANALYZED_EXTENSIONS.contains(ext.as_str()) => FilterDecision::Analyze,
            _ => FilterDecision::Skip,
        },
    }
}

/// True when any segment of `path` names a pruned directory.
///
/// Matching is per segment, so `distribution/` survives even though it
/// contains `dist` as a substring.
pub fn has_skipped_segment(path: &str) -> bool {
    Path::new(path)
        .components()
        .filter_map(|c| c.as_os_str().to_str())
        .any(|segment| SKIPPED_SEGMENTS.contains(segment))
}

/// Lowercased extension of `path`, when it has one. Dotfiles such as
/// `.env` report no extension.
pub fn extension(path: &str) -> Option<String> {
    Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}
