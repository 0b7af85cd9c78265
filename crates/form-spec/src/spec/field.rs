use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Element tag parsed from the selector of a definition line.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FieldKind {
    FormTitle,
    FormDesc,
    FormImage,
    FormPassword,
    Input,
    Textarea,
    Number,
    Range,
    Radio,
    /// Anything outside the known set. Parsed, reported, never rendered.
    Other(String),
}

impl FieldKind {
    pub fn parse(tag: &str) -> Self {
        match tag {
            "form-title" => FieldKind::FormTitle,
            "form-desc" => FieldKind::FormDesc,
            "form-image" => FieldKind::FormImage,
            "form-password" => FieldKind::FormPassword,
            "input" => FieldKind::Input,
            "textarea" => FieldKind::Textarea,
            "number" => FieldKind::Number,
            "range" => FieldKind::Range,
            "radio" => FieldKind::Radio,
            other => FieldKind::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            FieldKind::FormTitle => "form-title",
            FieldKind::FormDesc => "form-desc",
            FieldKind::FormImage => "form-image",
            FieldKind::FormPassword => "form-password",
            FieldKind::Input => "input",
            FieldKind::Textarea => "textarea",
            FieldKind::Number => "number",
            FieldKind::Range => "range",
            FieldKind::Radio => "radio",
            FieldKind::Other(tag) => tag,
        }
    }

    /// Page-level `form-*` kinds that never produce an answer member.
    pub fn is_metadata(&self) -> bool {
        matches!(
            self,
            FieldKind::FormTitle
                | FieldKind::FormDesc
                | FieldKind::FormImage
                | FieldKind::FormPassword
        )
    }

    /// Kinds that render a control and contribute one answer member.
    pub fn is_interactive(&self) -> bool {
        matches!(
            self,
            FieldKind::Input
                | FieldKind::Textarea
                | FieldKind::Number
                | FieldKind::Range
                | FieldKind::Radio
        )
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for FieldKind {
    fn from(value: String) -> Self {
        FieldKind::parse(&value)
    }
}

impl From<FieldKind> for String {
    fn from(kind: FieldKind) -> Self {
        kind.as_str().to_string()
    }
}

/// One parsed definition line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FieldSpec {
    /// 1-based line number in the definition text.
    pub line: usize,
    #[schemars(with = "String")]
    pub kind: FieldKind,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explicit_key: Option<String>,
    #[serde(default)]
    pub raw_value: String,
}

impl FieldSpec {
    /// A line that could not be understood. The renderer ignores it.
    pub fn degraded(line: usize) -> Self {
        Self {
            line,
            kind: FieldKind::Other(String::new()),
            title: String::new(),
            explicit_key: None,
            raw_value: String::new(),
        }
    }
}
