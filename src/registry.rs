//! Model metadata registry.
//!
//! Holds, per model class, the model-level descriptor and the ordered list
//! of field descriptors registered against it.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::resolver::{resolve_chained_fields, ResolvedField};
use crate::types::{FieldOptions, FieldType, GridOptions, ModelClass, ModelOptions};

/// A registered model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelDescriptor {
    pub identifier: String,
    pub label: String,
    pub i18n_key: String,
    /// The class this descriptor was registered for.
    pub class: ModelClass,
}

/// A declared field on a model class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDescriptor {
    /// Property key the field was registered under.
    pub name: String,
    pub field_type: FieldType,
    pub label: String,
    pub i18n_key: String,
    pub grid_options: GridOptions,
    pub generate_accessor: bool,
    /// Target model of a pointer field. Not owned by the field.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linked_class: Option<ModelClass>,
}

impl FieldDescriptor {
    /// Returns the linked class if this field is a pointer with a link.
    pub fn pointer_target(&self) -> Option<&ModelClass> {
        if self.field_type.is_pointer() {
            self.linked_class.as_ref()
        } else {
            None
        }
    }
}

/// Catalog of models and their fields.
///
/// Registration is expected to complete before resolution starts; the
/// `&mut self` receivers make that a single-writer phase.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    by_identifier: BTreeMap<String, ModelDescriptor>,
    by_class: HashMap<ModelClass, ModelDescriptor>,
    fields: HashMap<ModelClass, Vec<FieldDescriptor>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a model class.
    ///
    /// Identifier, label and i18n key default to the class name. A previous
    /// registration under the same identifier is overwritten.
    pub fn register_model(&mut self, class: &ModelClass, options: ModelOptions) {
        let name = class.name();
        let descriptor = ModelDescriptor {
            identifier: options.identifier.unwrap_or_else(|| name.to_string()),
            label: options.label.unwrap_or_else(|| name.to_string()),
            i18n_key: options.i18n.unwrap_or_else(|| name.to_string()),
            class: class.clone(),
        };

        if let Some(previous) = self.by_identifier.get(&descriptor.identifier) {
            tracing::debug!(
                identifier = %descriptor.identifier,
                previous = %previous.class,
                class = %class,
                "overwriting model registration"
            );
        }

        self.by_identifier
            .insert(descriptor.identifier.clone(), descriptor.clone());
        self.by_class.insert(class.clone(), descriptor);
    }

    /// Append a field descriptor to `class`.
    ///
    /// Registering the same property twice keeps both entries.
    pub fn register_field(
        &mut self,
        class: &ModelClass,
        property_key: &str,
        options: FieldOptions,
    ) {
        let descriptor = FieldDescriptor {
            name: property_key.to_string(),
            field_type: options.field_type.unwrap_or_default(),
            label: options.label.unwrap_or_else(|| property_key.to_string()),
            i18n_key: options.i18n.unwrap_or_else(|| property_key.to_string()),
            grid_options: GridOptions::default().merged(&options.grid_config),
            generate_accessor: options.add_getter_setter.unwrap_or(true),
            linked_class: options.link,
        };

        let fields = self.fields.entry(class.clone()).or_default();
        if fields.iter().any(|f| f.name == property_key) {
            tracing::trace!(
                class = %class,
                field = property_key,
                "duplicate field registration"
            );
        }
        fields.push(descriptor);
    }

    /// Start registering a model together with its fields.
    pub fn define(&mut self, class: &ModelClass, options: ModelOptions) -> ModelDefinition<'_> {
        self.register_model(class, options);
        ModelDefinition {
            registry: self,
            class: class.clone(),
        }
    }

    /// Descriptor attached to `class`, if it was registered as a model.
    pub fn model_descriptor(&self, class: &ModelClass) -> Option<&ModelDescriptor> {
        self.by_class.get(class)
    }

    /// Descriptor stored under `identifier`.
    pub fn model_by_identifier(&self, identifier: &str) -> Option<&ModelDescriptor> {
        self.by_identifier.get(identifier)
    }

    /// Field descriptors of `class` in registration order.
    pub fn field_descriptors(&self, class: &ModelClass) -> &[FieldDescriptor] {
        self.fields.get(class).map(Vec::as_slice).unwrap_or(&[])
    }

    /// All models by identifier, sorted.
    pub fn models(&self) -> impl Iterator<Item = &ModelDescriptor> {
        self.by_identifier.values()
    }

    /// Returns true if no model and no field has been registered.
    pub fn is_empty(&self) -> bool {
        self.by_identifier.is_empty() && self.fields.is_empty()
    }

    /// Resolve the chained fields of `class`.
    pub fn resolve(&self, class: &ModelClass) -> Vec<ResolvedField> {
        resolve_chained_fields(self, class)
    }
}

/// Builder returned by [`Registry::define`].
pub struct ModelDefinition<'a> {
    registry: &'a mut Registry,
    class: ModelClass,
}

impl ModelDefinition<'_> {
    pub fn field(mut self, property_key: &str, options: FieldOptions) -> Self {
        self.registry
            .register_field(&self.class, property_key, options);
        self
    }
}
