pub mod field;
pub mod form;

pub use field::{FieldKind, FieldSpec};
pub use form::{ContentMember, FormModel, PageMetadata, SchemaField};
