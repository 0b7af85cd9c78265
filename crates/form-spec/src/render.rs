use handlebars::html_escape;
use tracing::debug;

use crate::diagnostics::{Diagnostic, DiagnosticKind};
use crate::naming::derive_key_and_title;
use crate::spec::{FieldKind, FieldSpec, SchemaField};

/// Where a rendered fragment lands in the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Page header, before the `<form>` tag.
    Header,
    /// Inside the `<form>`, in definition order.
    Form,
}

/// Output of rendering one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedField {
    pub placement: Placement,
    /// HTML lines, joined by the assembler.
    pub lines: Vec<String>,
    /// Answer member; `None` for metadata kinds.
    pub schema_field: Option<SchemaField>,
    pub warnings: Vec<Diagnostic>,
}

/// Render one field. Returns `None` for kinds outside the known set.
pub fn render_field(field: &FieldSpec) -> Option<RenderedField> {
    let rendered = match &field.kind {
        FieldKind::FormTitle => header(vec![format!("<h1>{}</h1>", html_escape(&field.raw_value))]),
        FieldKind::FormDesc => header(vec![format!("<p>{}</p>", html_escape(&field.raw_value))]),
        FieldKind::FormImage => header(vec![format!(
            r#"<img src="{}">"#,
            html_escape(&field.raw_value)
        )]),
        // Consumed by the authentication collaborator, never shown.
        FieldKind::FormPassword => header(Vec::new()),
        FieldKind::Input
        | FieldKind::Textarea
        | FieldKind::Number
        | FieldKind::Range
        | FieldKind::Radio => render_control(field),
        FieldKind::Other(_) => return None,
    };
    debug!(
        line = field.line,
        kind = %field.kind,
        html_lines = rendered.lines.len(),
        "rendered field"
    );
    Some(rendered)
}

fn header(lines: Vec<String>) -> RenderedField {
    RenderedField {
        placement: Placement::Header,
        lines,
        schema_field: None,
        warnings: Vec::new(),
    }
}

fn render_control(field: &FieldSpec) -> RenderedField {
    let (key, title) = derive_key_and_title(field);
    let mut warnings = Vec::new();
    if key.is_empty() {
        warnings.push(Diagnostic::new(
            field.line,
            DiagnosticKind::EmptyKey,
            format!("{} field has an empty key", field.kind),
        ));
    }

    let name = html_escape(&key);
    let mut lines = vec!["<div>".to_string()];
    match field.kind {
        FieldKind::Input => {
            lines.push(label(&name, &field.title));
            lines.push(format!(
                r#"<input type="text" placeholder="{}" id="{}" name="{}"/>"#,
                html_escape(&field.raw_value),
                name,
                name
            ));
        }
        FieldKind::Textarea => {
            lines.push(label(&name, &title));
            lines.push(format!(
                r#"<textarea placeholder="{}" id="{}" name="{}"></textarea>"#,
                html_escape(&field.raw_value),
                name,
                name
            ));
        }
        FieldKind::Number | FieldKind::Range => {
            let attributes = numeric_attributes(field, &mut warnings);
            lines.push(label(&name, &title));
            lines.push(format!(
                r#"<input type="{}"{} id="{}" name="{}"/>"#,
                field.kind, attributes, name, name
            ));
        }
        FieldKind::Radio => {
            lines.push(format!("<span>{}</span>", html_escape(&title)));
            for option in radio_options(field, &mut warnings) {
                let value = option.to_lowercase();
                let id = html_escape(&format!("{}-option-{}", key, value));
                lines.push("<span>".to_string());
                lines.push(label(&id, option));
                lines.push(format!(
                    r#"<input type="radio" id="{}" value="{}" name="{}"/>"#,
                    id,
                    html_escape(&value),
                    name
                ));
                lines.push("</span>".to_string());
            }
        }
        _ => {}
    }
    lines.push("</div>".to_string());

    RenderedField {
        placement: Placement::Form,
        lines,
        schema_field: Some(SchemaField {
            identifier_name: title,
            json_key: key,
        }),
        warnings,
    }
}

fn label(target: &str, text: &str) -> String {
    format!(r#"<label for="{}">{}</label>"#, target, html_escape(text))
}

/// `min=1, max=5` -> ` min="1" max="5"`. Pairs without `=` or without an
/// attribute name are skipped and reported.
fn numeric_attributes(field: &FieldSpec, warnings: &mut Vec<Diagnostic>) -> String {
    let mut attributes = String::new();
    for pair in field.raw_value.split(',').map(str::trim) {
        if pair.is_empty() {
            continue;
        }
        match pair.split_once('=') {
            Some((name, value)) if is_attribute_name(name.trim()) => {
                attributes.push_str(&format!(
                    r#" {}="{}""#,
                    name.trim(),
                    html_escape(value.trim())
                ));
            }
            _ => warnings.push(Diagnostic::new(
                field.line,
                DiagnosticKind::MalformedOption,
                format!("skipping option '{}'; expected attr=value", pair),
            )),
        }
    }
    attributes
}

fn is_attribute_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '_' | ':' | '-'))
}

fn radio_options<'a>(field: &'a FieldSpec, warnings: &mut Vec<Diagnostic>) -> Vec<&'a str> {
    let mut options = Vec::new();
    for option in field.raw_value.split(',').map(str::trim) {
        if option.is_empty() {
            warnings.push(Diagnostic::new(
                field.line,
                DiagnosticKind::EmptyOption,
                "skipping empty radio option",
            ));
        } else {
            options.push(option);
        }
    }
    options
}
