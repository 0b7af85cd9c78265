use std::fmt;

use serde::{Deserialize, Serialize};

/// Category of a non-fatal problem found while compiling a definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// Line has no `=`.
    MissingSeparator,
    /// Selector is neither `form-<word>` nor `<kind>[<title>]`.
    MalformedSelector,
    /// Text after a `form-<word>` selector.
    TrailingSelectorText,
    /// `#` suffix with nothing after it, or a field whose key derives to "".
    EmptyKey,
    UnknownKind,
    /// `attr=value` pair without `=` or without an attribute name.
    MalformedOption,
    /// Blank entry in a radio option list.
    EmptyOption,
    DuplicateKey,
    DuplicateMetadata,
}

impl DiagnosticKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosticKind::MissingSeparator => "missing_separator",
            DiagnosticKind::MalformedSelector => "malformed_selector",
            DiagnosticKind::TrailingSelectorText => "trailing_selector_text",
            DiagnosticKind::EmptyKey => "empty_key",
            DiagnosticKind::UnknownKind => "unknown_kind",
            DiagnosticKind::MalformedOption => "malformed_option",
            DiagnosticKind::EmptyOption => "empty_option",
            DiagnosticKind::DuplicateKey => "duplicate_key",
            DiagnosticKind::DuplicateMetadata => "duplicate_metadata",
        }
    }
}

/// Warning attached to a definition line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub line: usize,
    pub kind: DiagnosticKind,
    pub message: String,
}

impl Diagnostic {
    pub fn new(line: usize, kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            line,
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "line {}: {} [{}]",
            self.line,
            self.message,
            self.kind.as_str()
        )
    }
}
