use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::spec::field::{FieldKind, FieldSpec};

/// Page metadata collected from the `form-*` lines. Empty when absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PageMetadata {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub password: String,
}

/// Parsed form: every line in source order plus derived page metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FormModel {
    pub metadata: PageMetadata,
    #[serde(default)]
    pub fields: Vec<FieldSpec>,
}

impl FormModel {
    /// Builds the model, letting the last occurrence of a metadata kind win.
    pub fn from_fields(fields: Vec<FieldSpec>) -> Self {
        let mut metadata = PageMetadata::default();
        for field in &fields {
            let slot = match field.kind {
                FieldKind::FormTitle => &mut metadata.title,
                FieldKind::FormDesc => &mut metadata.description,
                FieldKind::FormImage => &mut metadata.image,
                FieldKind::FormPassword => &mut metadata.password,
                _ => continue,
            };
            *slot = field.raw_value.clone();
        }
        Self { metadata, fields }
    }

    pub fn interactive_fields(&self) -> impl Iterator<Item = &FieldSpec> {
        self.fields.iter().filter(|field| field.kind.is_interactive())
    }

    pub fn metadata_fields(&self) -> impl Iterator<Item = &FieldSpec> {
        self.fields.iter().filter(|field| field.kind.is_metadata())
    }
}

/// Member of the generated answer record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SchemaField {
    /// Display title, used to name the generated member.
    pub identifier_name: String,
    /// External name: the HTML control name and the JSON key.
    pub json_key: String,
}

/// Member of the generated page-content record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ContentMember {
    Title,
    Description,
    Image,
    Password,
}

impl ContentMember {
    pub fn for_kind(kind: &FieldKind) -> Option<Self> {
        match kind {
            FieldKind::FormTitle => Some(ContentMember::Title),
            FieldKind::FormDesc => Some(ContentMember::Description),
            FieldKind::FormImage => Some(ContentMember::Image),
            FieldKind::FormPassword => Some(ContentMember::Password),
            _ => None,
        }
    }

    pub fn identifier(&self) -> &'static str {
        match self {
            ContentMember::Title => "title",
            ContentMember::Description => "description",
            ContentMember::Image => "image",
            ContentMember::Password => "password",
        }
    }
}
