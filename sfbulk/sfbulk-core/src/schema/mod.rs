//! Object schemas as reported by the remote describe calls.

mod format;
mod types;

pub use format::{format_field_lines, format_object_lines};
pub use types::{FieldDescriptor, FieldKind, ObjectSchema, ObjectSummary};
