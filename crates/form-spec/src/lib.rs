#![allow(missing_docs)]

pub mod answers_schema;
pub mod assemble;
pub mod diagnostics;
pub mod error;
pub mod naming;
pub mod output;
pub mod parser;
pub mod render;
pub mod spec;

pub use assemble::{Assembly, Compilation, assemble, compile, render_document, schema_source};
pub use diagnostics::{Diagnostic, DiagnosticKind};
pub use error::{CompileError, OutputError};
pub use naming::{derive_key_and_title, field_identifier, title_case};
pub use output::{Artifact, OutputPaths, WriteReport, write_artifacts};
pub use parser::{ParseOutput, parse_form};
pub use render::{Placement, RenderedField, render_field};
pub use spec::{ContentMember, FieldKind, FieldSpec, FormModel, PageMetadata, SchemaField};

/// Sample definition covering every element kind.
pub const SAMPLE_DEFINITION: &str = include_str!("templates/sample.form");
