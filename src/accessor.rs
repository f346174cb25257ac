//! Explicit property accessors built from field descriptors.

use serde_json::{Map, Value};

use crate::registry::Registry;
use crate::types::{FieldType, ModelClass};

/// Key-value storage backing a model instance.
pub trait PropertyStore {
    fn get_property(&self, key: &str) -> Option<&Value>;
    fn set_property(&mut self, key: &str, value: Value);
}

impl PropertyStore for Map<String, Value> {
    fn get_property(&self, key: &str) -> Option<&Value> {
        self.get(key)
    }

    fn set_property(&mut self, key: &str, value: Value) {
        self.insert(key.to_string(), value);
    }
}

/// Get/set pair for one registered property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldAccessor {
    key: String,
    field_type: FieldType,
}

impl FieldAccessor {
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn field_type(&self) -> &FieldType {
        &self.field_type
    }

    pub fn get<'s, S: PropertyStore + ?Sized>(&self, store: &'s S) -> Option<&'s Value> {
        store.get_property(&self.key)
    }

    pub fn set<S: PropertyStore + ?Sized>(&self, store: &mut S, value: impl Into<Value>) {
        store.set_property(&self.key, value.into());
    }
}

impl Registry {
    /// Accessors for every property of `class` that asked for one.
    ///
    /// A property registered more than once gets a single accessor, typed
    /// after its first registration.
    pub fn accessors(&self, class: &ModelClass) -> Vec<FieldAccessor> {
        let mut accessors: Vec<FieldAccessor> = Vec::new();
        for field in self.field_descriptors(class) {
            if !field.generate_accessor || accessors.iter().any(|a| a.key == field.name) {
                continue;
            }
            accessors.push(FieldAccessor {
                key: field.name.clone(),
                field_type: field.field_type.clone(),
            });
        }
        accessors
    }
}
