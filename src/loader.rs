//! Catalog loading.
//!
//! A catalog is a JSON or YAML document declaring models and their fields.
//! Loading it performs the same registration calls code would make.

use std::collections::BTreeSet;
use std::path::Path;

use serde::Deserialize;

use crate::error::{CatalogError, ResolveError};
use crate::registry::Registry;
use crate::types::{FieldOptions, FieldType, GridOverrides, ModelClass, ModelOptions};

/// Serialization format of a catalog document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogFormat {
    Json,
    Yaml,
}

impl CatalogFormat {
    /// Pick the format from a file extension; anything but `.yaml`/`.yml` is JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => CatalogFormat::Yaml,
            _ => CatalogFormat::Json,
        }
    }
}

/// A parsed catalog document.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Catalog {
    #[serde(default)]
    pub models: Vec<ModelEntry>,
}

/// One model declaration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModelEntry {
    /// Class name; also the class identity within the catalog.
    pub name: String,
    #[serde(default)]
    pub identifier: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub i18n: Option<String>,
    #[serde(default)]
    pub fields: Vec<FieldEntry>,
}

/// One field declaration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldEntry {
    pub name: String,
    #[serde(rename = "type", default)]
    pub field_type: Option<FieldType>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub i18n: Option<String>,
    #[serde(default)]
    pub grid: GridOverrides,
    #[serde(default)]
    pub accessor: Option<bool>,
    /// Class name of the linked model.
    #[serde(default)]
    pub link: Option<String>,
}

impl ModelEntry {
    pub fn class(&self) -> ModelClass {
        ModelClass::named(&self.name)
    }

    /// Identifier the model registers under; defaults to its name.
    pub fn identifier(&self) -> &str {
        self.identifier.as_deref().unwrap_or(&self.name)
    }

    fn options(&self) -> ModelOptions {
        ModelOptions {
            identifier: self.identifier.clone(),
            label: self.label.clone(),
            i18n: self.i18n.clone(),
        }
    }
}

impl FieldEntry {
    fn options(&self) -> FieldOptions {
        FieldOptions {
            field_type: self.field_type.clone(),
            label: self.label.clone(),
            i18n: self.i18n.clone(),
            grid_config: self.grid,
            add_getter_setter: self.accessor,
            link: self.link.as_deref().map(ModelClass::named),
        }
    }
}

impl Catalog {
    /// Register every model and field into `registry`, in document order.
    pub fn register_into(&self, registry: &mut Registry) {
        for model in &self.models {
            let class = model.class();
            registry.register_model(&class, model.options());
            for field in &model.fields {
                registry.register_field(&class, &field.name, field.options());
            }
        }
        tracing::debug!(models = self.models.len(), "catalog registered");
    }

    /// Build a fresh registry from this catalog.
    pub fn to_registry(&self) -> Registry {
        let mut registry = Registry::new();
        self.register_into(&mut registry);
        registry
    }

    /// Find a declared model by class name, falling back to its identifier.
    ///
    /// Identifiers follow registration order: when several models share one,
    /// the last declaration wins, as it does in the registry.
    ///
    /// # Errors
    ///
    /// Returns `ResolveError::UnknownModel` if no model matches.
    pub fn find_model(&self, name: &str) -> Result<ModelClass, ResolveError> {
        self.models
            .iter()
            .find(|m| m.name == name)
            .or_else(|| self.models.iter().rev().find(|m| m.identifier() == name))
            .map(ModelEntry::class)
            .ok_or_else(|| ResolveError::UnknownModel {
                name: name.to_string(),
                known: self.known_names(),
            })
    }

    /// Class names and identifiers, sorted and deduplicated.
    fn known_names(&self) -> Vec<String> {
        let names: BTreeSet<&str> = self
            .models
            .iter()
            .flat_map(|m| [m.name.as_str(), m.identifier()])
            .collect();
        names.into_iter().map(String::from).collect()
    }
}

/// Load a catalog from a file path. The format follows the file extension.
///
/// # Errors
///
/// Returns `CatalogError::FileNotFound` if the file doesn't exist,
/// or a parse error if the content isn't a valid catalog.
pub fn load_catalog(path: &Path) -> Result<Catalog, CatalogError> {
    if !path.exists() {
        return Err(CatalogError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let content = std::fs::read_to_string(path).map_err(|source| CatalogError::ReadError {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::debug!(path = %path.display(), "loading catalog");
    load_catalog_str(&content, CatalogFormat::from_path(path))
}

/// Load a catalog from a string.
///
/// # Errors
///
/// Returns `CatalogError::InvalidJson` or `CatalogError::InvalidYaml`
/// if the string isn't a valid catalog.
pub fn load_catalog_str(content: &str, format: CatalogFormat) -> Result<Catalog, CatalogError> {
    match format {
        CatalogFormat::Json => {
            serde_json::from_str(content).map_err(|source| CatalogError::InvalidJson { source })
        }
        CatalogFormat::Yaml => {
            serde_yaml::from_str(content).map_err(|source| CatalogError::InvalidYaml { source })
        }
    }
}
