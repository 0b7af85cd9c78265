use std::collections::{HashMap, HashSet};
use std::fmt::Write;

use handlebars::Handlebars;
use serde_json::{Value, json};
use tracing::{debug, warn};

use crate::answers_schema;
use crate::diagnostics::{Diagnostic, DiagnosticKind};
use crate::error::CompileError;
use crate::naming::{IdentifierSet, field_identifier};
use crate::parser::parse_form;
use crate::render::{Placement, RenderedField, render_field};
use crate::spec::{ContentMember, FieldSpec, FormModel, SchemaField};

const DOCUMENT_TEMPLATE: &str = include_str!("templates/document.hbs");
const BODY_SEPARATOR: &str = "\n\t\t";
const FORM_OPEN: &str = r#"<form method="post" action="/">"#;
const SUBMIT: &str = r#"<div><button type="submit">Submit</button></div>"#;
const FORM_CLOSE: &str = "</form>";

/// Everything produced from one form definition.
#[derive(Debug, Clone)]
pub struct Compilation {
    pub model: FormModel,
    pub html: String,
    pub schema_source: String,
    pub answers_schema: Value,
    pub content_members: Vec<ContentMember>,
    pub schema_fields: Vec<SchemaField>,
    pub warnings: Vec<Diagnostic>,
}

impl Compilation {
    /// Password for the authentication collaborator. Empty means no auth.
    pub fn password(&self) -> &str {
        &self.model.metadata.password
    }
}

/// Parse, render and assemble a definition. Only template or formatting
/// failures are errors; malformed lines end up in `warnings`.
pub fn compile(source: &str) -> Result<Compilation, CompileError> {
    let parsed = parse_form(source);
    let mut assembly = assemble(&parsed.model);

    let mut warnings = parsed.warnings;
    warnings.append(&mut assembly.warnings);
    warnings.sort_by_key(|warning| warning.line);
    for warning in &warnings {
        warn!(line = warning.line, kind = warning.kind.as_str(), "{}", warning.message);
    }

    let html = render_document(&parsed.model.metadata.title, &assembly)?;
    let schema_source = schema_source(
        &assembly.content_members,
        &assembly.schema_fields,
        &parsed.model.metadata.password,
    )?;
    let answers_schema =
        answers_schema::generate(&parsed.model.metadata.title, &assembly.schema_fields);
    debug!(
        fields = assembly.schema_fields.len(),
        warnings = warnings.len(),
        "compiled form definition"
    );

    Ok(Compilation {
        model: parsed.model,
        html,
        schema_source,
        answers_schema,
        content_members: assembly.content_members,
        schema_fields: assembly.schema_fields,
        warnings,
    })
}

/// Rendered fragments and schema members, in definition order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Assembly {
    pub header_lines: Vec<String>,
    pub form_lines: Vec<String>,
    pub content_members: Vec<ContentMember>,
    pub schema_fields: Vec<SchemaField>,
    pub warnings: Vec<Diagnostic>,
    keys: HashMap<String, usize>,
}

impl Assembly {
    fn push(mut self, field: &FieldSpec, rendered: RenderedField) -> Self {
        if let Some(member) = ContentMember::for_kind(&field.kind)
            && !self.content_members.contains(&member)
        {
            self.content_members.push(member);
        }

        match rendered.placement {
            Placement::Header => self.header_lines.extend(rendered.lines),
            Placement::Form => self.form_lines.extend(rendered.lines),
        }
        self.warnings.extend(rendered.warnings);

        if let Some(schema_field) = rendered.schema_field {
            if let Some(first_line) = self.keys.get(&schema_field.json_key) {
                self.warnings.push(Diagnostic::new(
                    field.line,
                    DiagnosticKind::DuplicateKey,
                    format!(
                        "key '{}' is already used on line {}; the answer keeps the first field",
                        schema_field.json_key, first_line
                    ),
                ));
            } else {
                self.keys.insert(schema_field.json_key.clone(), field.line);
            }
            self.schema_fields.push(schema_field);
        }
        self
    }
}

/// Fold every field of the model through the renderer.
pub fn assemble(model: &FormModel) -> Assembly {
    model
        .fields
        .iter()
        .filter_map(|field| render_field(field).map(|rendered| (field, rendered)))
        .fold(Assembly::default(), |assembly, (field, rendered)| {
            assembly.push(field, rendered)
        })
}

/// Full HTML page: header fragments, then the form with every control and
/// a submit button.
pub fn render_document(page_title: &str, assembly: &Assembly) -> Result<String, CompileError> {
    let body = assembly
        .header_lines
        .iter()
        .map(String::as_str)
        .chain([FORM_OPEN])
        .chain(assembly.form_lines.iter().map(String::as_str))
        .chain([SUBMIT, FORM_CLOSE])
        .collect::<Vec<_>>()
        .join(BODY_SEPARATOR);

    let handlebars = Handlebars::new();
    let html = handlebars.render_template(
        DOCUMENT_TEMPLATE,
        &json!({
            "page_title": page_title,
            "body": body,
        }),
    )?;
    Ok(html)
}

/// Rust source for the page-content record, the answer record and the
/// password constant.
pub fn schema_source(
    content: &[ContentMember],
    fields: &[SchemaField],
    password: &str,
) -> Result<String, std::fmt::Error> {
    let mut out = String::new();
    writeln!(out, "//! Form model generated by formc. Do not edit.")?;
    writeln!(out)?;
    writeln!(out, "use serde::{{Deserialize, Serialize}};")?;
    writeln!(out)?;
    writeln!(
        out,
        "/// Basic auth password for the form. Empty disables authentication."
    )?;
    writeln!(out, "pub const BASIC_PASSWORD: &str = {:?};", password)?;
    writeln!(out)?;

    writeln!(out, "/// Page metadata configured for the form.")?;
    write_struct_open(&mut out, "FormContent", content.is_empty())?;
    for member in content {
        writeln!(out, "    pub {}: String,", member.identifier())?;
    }
    if !content.is_empty() {
        writeln!(out, "}}")?;
    }
    writeln!(out)?;

    writeln!(out, "/// One submission of the form.")?;
    write_struct_open(&mut out, "FormAnswer", fields.is_empty())?;
    let mut identifiers = IdentifierSet::new();
    let mut emitted = HashSet::new();
    for field in fields {
        // One member per control name; the first field with a key owns it.
        if !emitted.insert(field.json_key.as_str()) {
            continue;
        }
        let ident = identifiers.claim(field_identifier(&field.identifier_name));
        writeln!(out, "    #[serde(rename = {:?})]", field.json_key)?;
        writeln!(out, "    pub {}: String,", ident)?;
    }
    if !fields.is_empty() {
        writeln!(out, "}}")?;
    }
    Ok(out)
}

fn write_struct_open(out: &mut String, name: &str, empty: bool) -> std::fmt::Result {
    writeln!(
        out,
        "#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]"
    )?;
    if empty {
        writeln!(out, "pub struct {} {{}}", name)
    } else {
        writeln!(out, "pub struct {} {{", name)
    }
}
