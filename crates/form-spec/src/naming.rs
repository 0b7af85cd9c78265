use std::collections::HashSet;

use crate::spec::FieldSpec;

/// Machine key and display title for a field.
///
/// Without an explicit key the key is the lowercased title and the display
/// title is the title-cased title with spaces removed. With an explicit key
/// the key is used verbatim and the display title comes from the key, with
/// hyphens read as word breaks (`access-token` -> `AccessToken`).
pub fn derive_key_and_title(field: &FieldSpec) -> (String, String) {
    match field.explicit_key.as_deref() {
        Some(key) => (key.to_string(), squash(&title_case(&key.replace('-', " ")))),
        None => (field.title.to_lowercase(), squash(&title_case(&field.title))),
    }
}

/// Upper-case the first character of every word. Other characters are left alone.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut at_word_start = true;
    for ch in text.chars() {
        if at_word_start {
            out.extend(ch.to_uppercase());
        } else {
            out.push(ch);
        }
        at_word_start = is_word_separator(ch);
    }
    out
}

fn is_word_separator(ch: char) -> bool {
    if ch.is_ascii() {
        !(ch.is_ascii_alphanumeric() || ch == '_')
    } else if ch.is_alphanumeric() {
        false
    } else {
        ch.is_whitespace()
    }
}

fn squash(text: &str) -> String {
    text.replace(' ', "")
}

const RUST_KEYWORDS: &[&str] = &[
    "as", "async", "await", "break", "const", "continue", "crate", "dyn", "else", "enum",
    "extern", "false", "fn", "for", "gen", "if", "impl", "in", "let", "loop", "match", "mod",
    "move", "mut", "pub", "ref", "return", "self", "static", "struct", "super", "trait", "true",
    "type", "unsafe", "use", "where", "while", "abstract", "become", "box", "do", "final",
    "macro", "override", "priv", "try", "typeof", "unsized", "virtual", "yield",
];

/// snake_case Rust field name for a display title (`StickerSheetAmount` ->
/// `sticker_sheet_amount`). Letters outside ASCII are kept, lowercased.
/// Always a valid, non-keyword identifier.
pub fn field_identifier(display_title: &str) -> String {
    let mut ident = String::with_capacity(display_title.len() + 4);
    let mut prev: Option<char> = None;
    for ch in display_title.chars() {
        if ch.is_alphabetic() || ch.is_ascii_digit() {
            if ch.is_uppercase() {
                if prev.is_some_and(|p| p.is_lowercase() || p.is_ascii_digit()) {
                    ident.push('_');
                }
                ident.extend(ch.to_lowercase());
            } else {
                ident.push(ch);
            }
        } else if !ident.ends_with('_') {
            ident.push('_');
        }
        prev = Some(ch);
    }

    let ident = ident.trim_matches('_');
    let mut ident = if ident.is_empty() {
        "field".to_string()
    } else {
        ident.to_string()
    };
    if ident.starts_with(|ch: char| ch.is_ascii_digit()) {
        ident.insert(0, '_');
    }
    if RUST_KEYWORDS.contains(&ident.as_str()) {
        ident.push('_');
    }
    ident
}

/// Hands out identifiers that are unique within one generated struct.
#[derive(Debug, Default)]
pub struct IdentifierSet {
    taken: HashSet<String>,
}

impl IdentifierSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn claim(&mut self, base: String) -> String {
        if self.taken.insert(base.clone()) {
            return base;
        }
        let mut suffix = 2;
        loop {
            let candidate = format!("{}_{}", base, suffix);
            if self.taken.insert(candidate.clone()) {
                return candidate;
            }
            suffix += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::FieldKind;

    fn field(title: &str, key: Option<&str>) -> FieldSpec {
        FieldSpec {
            line: 1,
            kind: FieldKind::Input,
            title: title.into(),
            explicit_key: key.map(str::to_string),
            raw_value: String::new(),
        }
    }

    #[test]
    fn title_derives_lowercase_key_and_squashed_title() {
        let (key, title) = derive_key_and_title(&field("Sticker sheet amount", None));
        assert_eq!(key, "sticker sheet amount");
        assert_eq!(title, "StickerSheetAmount");
    }

    #[test]
    fn explicit_key_takes_precedence() {
        let spec = field("The rabbit boat but backwards", Some("access-token"));
        let (key, title) = derive_key_and_title(&spec);
        assert_eq!(key, "access-token");
        assert_eq!(title, "AccessToken");
    }

    #[test]
    fn derivation_is_deterministic() {
        let spec = field("First and last name", None);
        assert_eq!(derive_key_and_title(&spec), derive_key_and_title(&spec));
    }

    #[test]
    fn title_case_leaves_inner_capitals() {
        assert_eq!(title_case("the rabbit BOAT"), "The Rabbit BOAT");
        assert_eq!(title_case("e-mail address"), "E-Mail Address");
        assert_eq!(title_case("snake_case word"), "Snake_case Word");
        assert_eq!(title_case("über straße"), "Über Straße");
    }

    #[test]
    fn identifiers_are_snake_case_and_valid() {
        assert_eq!(field_identifier("StickerSheetAmount"), "sticker_sheet_amount");
        assert_eq!(field_identifier("AccessToken"), "access_token");
        assert_eq!(field_identifier("E-Mail"), "e_mail");
        assert_eq!(field_identifier("2ndChoice"), "_2nd_choice");
        assert_eq!(field_identifier("Type"), "type_");
        assert_eq!(field_identifier(""), "field");
        assert_eq!(field_identifier("Größe"), "größe");
        assert_eq!(field_identifier("ÜberGröße"), "über_größe");
        assert_eq!(field_identifier("Città²"), "città");
    }

    #[test]
    fn identifier_set_suffixes_collisions() {
        let mut set = IdentifierSet::new();
        assert_eq!(set.claim("name".into()), "name");
        assert_eq!(set.claim("name".into()), "name_2");
        assert_eq!(set.claim("name".into()), "name_3");
    }
}
