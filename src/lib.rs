//! Model Chain
//!
//! A registry of model definitions and their typed field descriptors, and a
//! resolver that expands pointer fields into the fields of the models they
//! link to.
//!
//! Consumers such as table UIs use the resolved tree to know which columns
//! exist across a model and every model reachable from it, without walking
//! the pointer graph themselves.
//!
//! # Example
//!
//! ```
//! use model_chain::{FieldOptions, FieldType, ModelClass, ModelOptions, Registry};
//!
//! struct Order;
//! struct Customer;
//!
//! let order = ModelClass::of::<Order>();
//! let customer = ModelClass::of::<Customer>();
//!
//! let mut registry = Registry::new();
//! registry
//!     .define(&customer, ModelOptions::new().label("Client"))
//!     .field("name", FieldOptions::new(FieldType::String));
//! registry
//!     .define(&order, ModelOptions::default())
//!     .field("total", FieldOptions::new(FieldType::Number))
//!     .field("customer", FieldOptions::pointer(customer.clone()));
//!
//! let resolved = registry.resolve(&order);
//! assert_eq!(resolved.len(), 2);
//!
//! let expansion = resolved[1].expansion.as_ref().unwrap();
//! assert_eq!(expansion.model.label, "Client");
//! assert_eq!(expansion.fields[0].field.name, "name");
//! ```
//!
//! # Pointer Rules
//!
//! | Pointer field | Result |
//! |---------------|--------|
//! | no link | Emitted as a plain field |
//! | link to an unregistered model | Dropped |
//! | link to a model already on the current path | Dropped |
//! | link to a model with no fields | Dropped |
//! | otherwise | Emitted with an `expansion` |
//!
//! Only the ancestors of a field count as "the current path": the same model
//! may be expanded under several sibling fields.

mod accessor;
mod error;
mod linter;
mod loader;
mod registry;
mod resolver;
mod types;

pub use accessor::{FieldAccessor, PropertyStore};
pub use error::{CatalogError, ResolveError};
pub use linter::{
    lint, lint_catalog, lint_file, Diagnostic, FileResult, FileStatus, LintResult, Severity,
};
pub use loader::{load_catalog, load_catalog_str, Catalog, CatalogFormat, FieldEntry, ModelEntry};
pub use registry::{FieldDescriptor, ModelDefinition, ModelDescriptor, Registry};
pub use resolver::{
    flatten_columns, resolve_chained_fields, resolve_chained_fields_from, Column, Expansion,
    ResolvedField,
};
pub use types::{
    FieldOptions, FieldType, GridOptions, GridOverrides, ModelClass, ModelOptions,
    FIELD_TYPE_TAGS,
};
