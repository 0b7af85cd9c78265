use std::collections::HashSet;

use tracing::debug;

use crate::diagnostics::{Diagnostic, DiagnosticKind};
use crate::spec::{FieldKind, FieldSpec, FormModel};

const METADATA_PREFIX: &str = "form-";

/// Parsed definition together with everything the parser had to skip or guess.
#[derive(Debug, Clone, Default)]
pub struct ParseOutput {
    pub model: FormModel,
    pub warnings: Vec<Diagnostic>,
}

/// Parse a whole form definition. Never fails: lines that cannot be
/// understood become degraded fields and a warning.
pub fn parse_form(source: &str) -> ParseOutput {
    let mut fields = Vec::new();
    let mut warnings = Vec::new();

    for (index, raw) in source.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with(';') {
            continue;
        }
        let field = parse_line(index + 1, line, &mut warnings);
        debug!(
            line = field.line,
            kind = %field.kind,
            title = %field.title,
            "parsed definition line"
        );
        fields.push(field);
    }

    let mut seen = HashSet::new();
    for field in fields.iter().filter(|field| field.kind.is_metadata()) {
        if !seen.insert(field.kind.clone()) {
            warnings.push(Diagnostic::new(
                field.line,
                DiagnosticKind::DuplicateMetadata,
                format!("'{}' is defined more than once; the last value wins", field.kind),
            ));
        }
    }
    warnings.sort_by_key(|warning| warning.line);

    ParseOutput {
        model: FormModel::from_fields(fields),
        warnings,
    }
}

/// Parse one trimmed, non-blank line.
pub fn parse_line(line_no: usize, line: &str, warnings: &mut Vec<Diagnostic>) -> FieldSpec {
    let Some((selector, value)) = line.split_once('=') else {
        warnings.push(Diagnostic::new(
            line_no,
            DiagnosticKind::MissingSeparator,
            format!("no '=' in '{}'; line ignored", line),
        ));
        return FieldSpec::degraded(line_no);
    };

    let Some(selector) = parse_selector(line_no, selector.trim(), warnings) else {
        return FieldSpec::degraded(line_no);
    };

    let kind = FieldKind::parse(selector.kind);
    if let FieldKind::Other(tag) = &kind {
        warnings.push(Diagnostic::new(
            line_no,
            DiagnosticKind::UnknownKind,
            format!("unknown element kind '{}'; field ignored", tag),
        ));
    }

    FieldSpec {
        line: line_no,
        kind,
        title: selector.title.to_string(),
        explicit_key: selector.key.map(str::to_string),
        raw_value: value.trim().to_string(),
    }
}

#[derive(Debug, PartialEq, Eq)]
struct Selector<'a> {
    kind: &'a str,
    title: &'a str,
    key: Option<&'a str>,
}

fn parse_selector<'a>(
    line_no: usize,
    selector: &'a str,
    warnings: &mut Vec<Diagnostic>,
) -> Option<Selector<'a>> {
    if let Some(kind_len) = metadata_keyword_len(selector) {
        let (kind, rest) = selector.split_at(kind_len);
        let rest = rest.trim();
        if !rest.is_empty() {
            warnings.push(Diagnostic::new(
                line_no,
                DiagnosticKind::TrailingSelectorText,
                format!("ignoring '{}' after '{}'", rest, kind),
            ));
        }
        return Some(Selector {
            kind,
            title: "",
            key: None,
        });
    }

    let malformed = |warnings: &mut Vec<Diagnostic>, reason: &str| {
        warnings.push(Diagnostic::new(
            line_no,
            DiagnosticKind::MalformedSelector,
            format!("selector '{}' {}; line ignored", selector, reason),
        ));
    };

    let Some(open) = selector.find('[') else {
        malformed(warnings, "has no bracketed title");
        return None;
    };
    let kind = selector[..open].trim();
    if kind.is_empty() || kind.contains(char::is_whitespace) {
        malformed(warnings, "has no single-word kind before '['");
        return None;
    }
    let close = match selector.rfind(']') {
        Some(close) if close > open => close,
        _ => {
            malformed(warnings, "has an unclosed '['");
            return None;
        }
    };
    let title = selector[open + 1..close].trim();

    let rest = selector[close + 1..].trim();
    let key = if rest.is_empty() {
        None
    } else if let Some(key) = rest.strip_prefix('#') {
        let key = key.trim();
        if key.is_empty() {
            warnings.push(Diagnostic::new(
                line_no,
                DiagnosticKind::EmptyKey,
                "empty '#' key suffix; key derived from the title",
            ));
            None
        } else {
            Some(key)
        }
    } else {
        warnings.push(Diagnostic::new(
            line_no,
            DiagnosticKind::TrailingSelectorText,
            format!("ignoring '{}' after the title", rest),
        ));
        None
    };

    Some(Selector { kind, title, key })
}

/// Length of a leading `form-<word>` token, if there is one.
fn metadata_keyword_len(selector: &str) -> Option<usize> {
    let word = selector.strip_prefix(METADATA_PREFIX)?;
    let word_len = word
        .find(|ch: char| !(ch.is_ascii_alphanumeric() || ch == '_'))
        .unwrap_or(word.len());
    (word_len > 0).then_some(METADATA_PREFIX.len() + word_len)
}
