use std::{collections::BTreeSet, fmt, sync::Arc};

/// Position of a message function in a source file.
///
/// Ordered by file, then line, then column so reference lists come out
/// sorted without extra work.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SourceLocation {
    /// Path of the source file as passed to `transform`.
    pub file_path: String,
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number (1-indexed).
    pub col: usize,
}

impl SourceLocation {
    pub fn new(file_path: impl Into<String>, line: usize, col: usize) -> Self {
        Self {
            file_path: file_path.into(),
            line,
            col,
        }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file_path, self.line, self.col)
    }
}

/// One extracted message as recorded in the [`ExtractionStore`](crate::core::ExtractionStore).
///
/// Every call site that yields the same `(source_text, translation_context)`
/// pair within a build pass shares one `SourceMessage`; its locations and
/// comments are the union over those call sites.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceMessage {
    /// Stable lowercase hex identifier.
    pub id: String,
    /// Folded literal text returned by the message function (interned).
    pub source_text: Arc<str>,
    /// Optional disambiguating tag from `@context`.
    pub translation_context: Option<String>,
    /// Identifier parameter names, in declaration order.
    pub parameter_names: Vec<String>,
    pub referencing_locations: BTreeSet<SourceLocation>,
    /// Translator hints gathered from documentation comments.
    pub extracted_comments: BTreeSet<String>,
}

impl SourceMessage {
    /// Fold another record for the same id into this one.
    ///
    /// Locations and comments only grow; text, context and parameters of the
    /// first record win.
    pub fn merge(&mut self, other: SourceMessage) {
        self.referencing_locations
            .extend(other.referencing_locations);
        self.extracted_comments.extend(other.extracted_comments);
    }
}
