//! Template storage with CRUD operations

use std::path::Path;
use std::sync::Arc;

use chrono::Utc;
use dashmap::DashMap;

use super::formatter::{format_with, FormatOptions};
use super::types::{Bindings, Template, TemplateError, TemplateResult, TemplateUpdate};

/// In-memory template storage
pub struct TemplateStore {
    templates: DashMap<String, Template>,
}

impl Default for TemplateStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateStore {
    /// Create a new template store
    pub fn new() -> Self {
        Self {
            templates: DashMap::new(),
        }
    }

    /// Create a new template
    pub fn create(&self, template: Template) -> TemplateResult<Template> {
        template.validate()?;

        if self.templates.contains_key(&template.id) {
            return Err(TemplateError::AlreadyExists(template.id));
        }

        let id = template.id.clone();
        self.templates.insert(id.clone(), template.clone());
        tracing::debug!(template_id = %id, "template created");

        Ok(template)
    }

    /// Get a template by ID
    pub fn get(&self, id: &str) -> TemplateResult<Template> {
        self.templates
            .get(id)
            .map(|t| t.clone())
            .ok_or_else(|| TemplateError::NotFound(id.to_string()))
    }

    /// List all templates
    pub fn list(&self) -> Vec<Template> {
        self.templates
            .iter()
            .map(|entry| entry.value().clone())
            .collect()
    }

    /// Update an existing template
    pub fn update(&self, id: &str, updates: TemplateUpdate) -> TemplateResult<Template> {
        let mut template = self.get(id)?;

        if let Some(name) = updates.name {
            template.name = name;
        }

        if let Some(body) = updates.body {
            template.body = body;
        }

        if let Some(description) = updates.description {
            template.description = description;
        }

        template.updated_at = Utc::now();
        template.validate()?;

        self.templates.insert(id.to_string(), template.clone());
        tracing::debug!(template_id = %id, "template updated");

        Ok(template)
    }

    /// Delete a template by ID
    pub fn delete(&self, id: &str) -> TemplateResult<()> {
        match self.templates.remove(id) {
            Some(_) => {
                tracing::debug!(template_id = %id, "template deleted");
                Ok(())
            }
            None => Err(TemplateError::NotFound(id.to_string())),
        }
    }

    /// Check if a template exists
    pub fn exists(&self, id: &str) -> bool {
        self.templates.contains_key(id)
    }

    /// Get the number of templates
    pub fn count(&self) -> usize {
        self.templates.len()
    }

    /// Render a template's body with the given bindings, failing fast on
    /// placeholders with no binding
    pub fn render(&self, id: &str, bindings: &Bindings) -> TemplateResult<String> {
        self.render_with(id, bindings, &FormatOptions::default())
    }

    /// Render a template's body with explicit formatting options
    pub fn render_with(
        &self,
        id: &str,
        bindings: &Bindings,
        options: &FormatOptions,
    ) -> TemplateResult<String> {
        let template = self.get(id)?;
        format_with(&template.body, bindings, options)
    }

    /// Load every `*.json` file in a directory as a template definition.
    /// Returns the number of templates loaded.
    pub fn load_dir(&self, dir: &Path) -> TemplateResult<usize> {
        let mut loaded = 0;

        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }

            let raw = std::fs::read_to_string(&path)?;
            let template: Template = serde_json::from_str(&raw)?;
            tracing::debug!(
                template_id = %template.id,
                file = %path.display(),
                "template file loaded"
            );
            self.create(template)?;
            loaded += 1;
        }

        tracing::info!(count = loaded, dir = %dir.display(), "templates loaded");
        Ok(loaded)
    }
}

/// Create an Arc-wrapped template store
pub fn create_template_store() -> Arc<TemplateStore> {
    Arc::new(TemplateStore::new())
}
