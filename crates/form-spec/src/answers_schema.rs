use serde_json::{Map, Value, json};

use crate::spec::SchemaField;

const DRAFT: &str = "https://json-schema.org/draft/2020-12/schema";

/// JSON Schema of one submission: a string property per answer member,
/// keyed by its external name, in definition order.
pub fn generate(page_title: &str, fields: &[SchemaField]) -> Value {
    let mut properties = Map::new();
    for field in fields {
        properties.entry(field.json_key.clone()).or_insert_with(|| {
            json!({
                "type": "string",
                "title": field.identifier_name,
            })
        });
    }

    let mut schema = Map::new();
    schema.insert("$schema".into(), Value::String(DRAFT.into()));
    if !page_title.is_empty() {
        schema.insert("title".into(), Value::String(page_title.into()));
    }
    schema.insert("type".into(), Value::String("object".into()));
    schema.insert("properties".into(), Value::Object(properties));
    schema.insert("additionalProperties".into(), Value::Bool(false));
    Value::Object(schema)
}
