//! Repository listing and traversal data model

/// Kind of a repository listing entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    File,
    Dir,
}

/// One entry from a directory listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoEntry {
    /// Basename of the entry
    pub name: String,
    /// Repository-relative path
    pub path: String,
    pub kind: EntryKind,
}

/// A file selected for analysis together with its fetched content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisUnit {
    /// Repository-relative path of the file
    pub path: String,
    /// Decoded text content
    pub content: String,
    /// Extension-derived language label, used to steer the analyzer
    pub language_hint: String,
}

/// Counters accumulated over one traversal
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TraversalStats {
    pub directories_listed: usize,
    pub files_submitted: usize,
    pub entries_skipped: usize,
    pub subtrees_abandoned: usize,
}
