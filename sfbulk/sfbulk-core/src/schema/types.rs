use std::{
    collections::{BTreeMap, HashMap},
    fmt,
    ops::Deref,
};

use serde::{Serialize, Serializer};

/// Remote field type, as named by the describe call.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldKind {
    String,
    Date,
    DateTime,
    Double,
    Boolean,
    Reference,
    Id,
    /// Any other remote type (`picklist`, `textarea`, `currency`, ...).
    Other(String),
}

impl FieldKind {
    pub fn as_str(&self) -> &str {
        match self {
            Self::String => "string",
            Self::Date => "date",
            Self::DateTime => "datetime",
            Self::Double => "double",
            Self::Boolean => "boolean",
            Self::Reference => "reference",
            Self::Id => "id",
            Self::Other(s) => s,
        }
    }

    /// Kinds for which an empty cell is not a valid payload value.
    pub fn skips_empty(&self) -> bool {
        matches!(self, Self::Date | Self::Double)
    }
}

impl From<&str> for FieldKind {
    fn from(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "string" => Self::String,
            "date" => Self::Date,
            "datetime" => Self::DateTime,
            "double" => Self::Double,
            "boolean" => Self::Boolean,
            "reference" => Self::Reference,
            "id" => Self::Id,
            _ => Self::Other(s.to_string()),
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for FieldKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// One field of an object type. Immutable once fetched.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldDescriptor {
    #[serde(rename = "type")]
    pub kind: FieldKind,
    pub length: u32,
    pub name: String,
    /// 1-based order of appearance in the remote schema.
    pub position: usize,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, kind: FieldKind, length: u32, position: usize) -> Self {
        Self {
            kind,
            length,
            name: name.into(),
            position,
        }
    }
}

/// Ordered field definitions of one object type, searchable by
/// case-insensitive field name.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectSchema {
    object_type: String,
    fields: Vec<FieldDescriptor>,
    by_name: HashMap<String, usize>,
}

impl ObjectSchema {
    pub fn new(object_type: impl Into<String>, fields: Vec<FieldDescriptor>) -> Self {
        let by_name = fields
            .iter()
            .enumerate()
            .map(|(i, field)| (field.name.to_lowercase(), i))
            .collect();
        Self {
            object_type: object_type.into(),
            fields,
            by_name,
        }
    }

    /// Build a schema from `(name, kind, length)` triples in remote order,
    /// assigning 1-based positions.
    pub fn from_describe<I, N>(object_type: impl Into<String>, fields: I) -> Self
    where
        I: IntoIterator<Item = (N, FieldKind, u32)>,
        N: Into<String>,
    {
        let fields = fields
            .into_iter()
            .enumerate()
            .map(|(i, (name, kind, length))| FieldDescriptor::new(name, kind, length, i + 1))
            .collect();
        Self::new(object_type, fields)
    }

    pub fn object_type(&self) -> &str {
        &self.object_type
    }

    pub fn as_slice(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Case-insensitive field lookup.
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.by_name
            .get(&name.to_lowercase())
            .map(|&i| &self.fields[i])
    }

    /// Fields keyed by lower-cased name.
    pub fn field_map(&self) -> BTreeMap<String, &FieldDescriptor> {
        self.fields
            .iter()
            .map(|field| (field.name.to_lowercase(), field))
            .collect()
    }
}

impl Deref for ObjectSchema {
    type Target = [FieldDescriptor];

    fn deref(&self) -> &Self::Target {
        self.as_slice()
    }
}

/// Entry of the global object listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectSummary {
    pub name: String,
    pub label: String,
}
