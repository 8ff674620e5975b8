//! Template types and error definitions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::formatter::placeholders;

/// Template-specific error type
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Template not found: {0}")]
    NotFound(String),

    #[error("Template already exists: {0}")]
    AlreadyExists(String),

    #[error("Invalid template ID: {0}")]
    InvalidId(String),

    #[error("Invalid template: {0}")]
    InvalidTemplate(String),

    #[error("No binding for placeholder: {0}")]
    MissingBinding(String),

    #[error("Malformed template at byte {position}: {reason}")]
    Malformed { position: usize, reason: String },

    #[error("Invalid bindings: {0}")]
    InvalidBindings(String),

    #[error("Template file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Template parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Result type for template operations
pub type TemplateResult<T> = Result<T, TemplateError>;

/// Ordered placeholder bindings.
///
/// Insertion order is preserved. Inserting a name that is already bound
/// replaces its value, so each name resolves to exactly one value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bindings {
    entries: Vec<(String, String)>,
}

impl Bindings {
    /// Create an empty set of bindings
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Bind a placeholder name to its replacement text
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Look up the replacement text for a name (verbatim, case-sensitive)
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Number of bound names
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no names are bound
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over (name, value) pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// Build bindings from a JSON object.
    ///
    /// Scalar values are rendered as replacement text: strings verbatim,
    /// numbers and booleans via their display form, null as empty text.
    /// Arrays and objects use their JSON representation.
    pub fn from_json(value: &serde_json::Value) -> TemplateResult<Self> {
        let map = match value {
            serde_json::Value::Object(map) => map,
            _ => {
                return Err(TemplateError::InvalidBindings(
                    "bindings must be a JSON object".to_string(),
                ))
            }
        };

        let mut bindings = Self::new();
        for (name, value) in map {
            let text = match value {
                serde_json::Value::String(s) => s.clone(),
                serde_json::Value::Number(n) => n.to_string(),
                serde_json::Value::Bool(b) => b.to_string(),
                serde_json::Value::Null => String::new(),
                other => other.to_string(),
            };
            bindings.insert(name.clone(), text);
        }

        Ok(bindings)
    }
}

impl<N: Into<String>, V: Into<String>> FromIterator<(N, V)> for Bindings {
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        let mut bindings = Self::new();
        for (name, value) in iter {
            bindings.insert(name, value);
        }
        bindings
    }
}

impl<const N: usize> From<[(&str, &str); N]> for Bindings {
    fn from(pairs: [(&str, &str); N]) -> Self {
        pairs.into_iter().collect()
    }
}

/// A stored template definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Template {
    /// Unique template identifier (alphanumeric, dash, underscore)
    pub id: String,

    /// Human-readable template name
    pub name: String,

    /// Template text with {placeholder} markers
    pub body: String,

    /// Template description (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Creation timestamp
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl Template {
    /// Validate the template
    pub fn validate(&self) -> TemplateResult<()> {
        // Validate ID
        if self.id.is_empty() || self.id.len() > 64 {
            return Err(TemplateError::InvalidId(
                "ID must be 1-64 characters".to_string(),
            ));
        }

        if !self
            .id
            .chars()
            .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
        {
            return Err(TemplateError::InvalidId(
                "ID must contain only alphanumeric, dash, or underscore".to_string(),
            ));
        }

        // Validate name
        if self.name.is_empty() || self.name.len() > 256 {
            return Err(TemplateError::InvalidTemplate(
                "Name must be 1-256 characters".to_string(),
            ));
        }

        // Validate body well-formedness (delimiter matching only)
        placeholders(&self.body)?;

        Ok(())
    }
}

/// Partial update for an existing template
#[derive(Debug, Default, Deserialize)]
pub struct TemplateUpdate {
    /// Human-readable template name (optional)
    pub name: Option<String>,

    /// Template text (optional)
    pub body: Option<String>,

    /// Template description (optional, use null to clear)
    pub description: Option<Option<String>>,
}
