use super::{ObjectSchema, ObjectSummary};

/// Brief per-field description: `N. name, type, length`, N starting at 1.
pub fn format_field_lines(schema: &ObjectSchema) -> Vec<String> {
    schema
        .iter()
        .map(|field| {
            format!(
                "{}. {}, {}, {}",
                field.position, field.name, field.kind, field.length
            )
        })
        .collect()
}

/// Object listing: `N. Label`, N starting at 0.
pub fn format_object_lines(objects: &[ObjectSummary]) -> Vec<String> {
    objects
        .iter()
        .enumerate()
        .map(|(i, object)| format!("{i}. {}", object.label))
        .collect()
}
