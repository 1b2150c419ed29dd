//! Mutation payloads and the receipts clients return for them.

/// Ordered field-name → value payload of a single create/update call.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FieldValues(Vec<(String, String)>);

impl FieldValues {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.0.push((field.into(), value.into()));
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, value)| value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FieldValues {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Response of the remote side to one mutation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationReceipt {
    /// Bare HTTP status signal (e.g. `204 No Content`).
    Status(u16),
    /// Structured save/delete result.
    Outcome {
        id: Option<String>,
        success: bool,
        errors: Vec<String>,
    },
}

/// Receipt reduced to what the batch engine needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiptOutcome {
    pub success: bool,
    pub error_message: Option<String>,
}

impl MutationReceipt {
    pub fn succeeded(id: impl Into<String>) -> Self {
        Self::Outcome {
            id: Some(id.into()),
            success: true,
            errors: Vec::new(),
        }
    }

    pub fn failed(errors: Vec<String>) -> Self {
        Self::Outcome {
            id: None,
            success: false,
            errors,
        }
    }

    pub fn outcome(&self) -> ReceiptOutcome {
        match self {
            Self::Status(status) if (200..300).contains(status) => ReceiptOutcome {
                success: true,
                error_message: None,
            },
            Self::Status(status) => ReceiptOutcome {
                success: false,
                error_message: Some(format!("HTTP status {status}")),
            },
            Self::Outcome { success: true, .. } => ReceiptOutcome {
                success: true,
                error_message: None,
            },
            Self::Outcome { errors, .. } => ReceiptOutcome {
                success: false,
                error_message: Some(errors.join(". ")),
            },
        }
    }
}
