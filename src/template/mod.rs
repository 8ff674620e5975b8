//! Named-placeholder template system.
//!
//! This module provides:
//! - Single-pass {name} placeholder substitution over template text
//! - Recursive substitution over JSON payloads
//! - In-memory template storage with CRUD operations
//!
//! # Example
//!
//! ```ignore
//! let store = TemplateStore::new();
//!
//! // Create a template
//! let template = Template {
//!     id: "order-shipped".to_string(),
//!     name: "Order Shipped".to_string(),
//!     body: "Order {order_id} is on its way via {carrier}".to_string(),
//!     ..
//! };
//!
//! store.create(template)?;
//!
//! // Render with bindings
//! let bindings = Bindings::from([
//!     ("order_id", "ORD-123"),
//!     ("carrier", "FedEx"),
//! ]);
//!
//! let rendered = store.render("order-shipped", &bindings)?;
//! ```

mod formatter;
mod store;
mod types;

pub use formatter::{format, format_value, format_with, placeholders, FormatOptions, MissingPolicy};
pub use store::{create_template_store, TemplateStore};
pub use types::{Bindings, Template, TemplateError, TemplateResult, TemplateUpdate};
