use std::collections::{HashMap, hash_map::Entry};

use sfbulk_core::{ClientError, CrmClient, ObjectSchema};

/// Object schemas fetched during one session, keyed by lower-cased type name.
///
/// Each object type is described at most once; there is no invalidation.
#[derive(Debug, Default)]
pub struct SchemaCache {
    schemas: HashMap<String, ObjectSchema>,
}

impl SchemaCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fields_for<C: CrmClient + ?Sized>(
        &mut self,
        client: &C,
        object_type: &str,
    ) -> Result<&ObjectSchema, ClientError> {
        match self.schemas.entry(object_type.to_lowercase()) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                let schema = client.describe(object_type)?;
                tracing::debug!(
                    object_type = schema.object_type(),
                    fields = schema.len(),
                    "cached object schema"
                );
                Ok(entry.insert(schema))
            }
        }
    }

    pub fn contains(&self, object_type: &str) -> bool {
        self.schemas.contains_key(&object_type.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}
