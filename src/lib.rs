// Infrastructure layer (shared components)
pub mod config;

// Domain layer (business logic)
pub mod template;

// Re-export the formatting surface at the crate root
pub use template::{
    format, format_value, format_with, placeholders, Bindings, FormatOptions, MissingPolicy,
    Template, TemplateError, TemplateResult, TemplateStore, TemplateUpdate,
};
