//! Core types for model metadata.

use std::any::TypeId;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Known field type tags, in the order they are documented.
pub const FIELD_TYPE_TAGS: &[&str] = &[
    "string", "number", "boolean", "array", "object", "date", "pointer",
];

/// Legacy capitalized spelling of the pointer tag.
const LEGACY_POINTER_TAG: &str = "Pointer";

/// Identity of a model class.
///
/// Equality and hashing use the identity only, never the display name.
#[derive(Clone)]
pub struct ModelClass {
    key: ClassKey,
    name: Arc<str>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum ClassKey {
    Type(TypeId),
    Named(Arc<str>),
}

impl ModelClass {
    /// Class handle for a Rust type. The name is the type's last path segment.
    pub fn of<T: 'static>() -> Self {
        let full = std::any::type_name::<T>();
        let name = full.rsplit("::").next().unwrap_or(full);
        Self {
            key: ClassKey::Type(TypeId::of::<T>()),
            name: Arc::from(name),
        }
    }

    /// Class handle identified by name alone (used by catalogs).
    pub fn named(name: impl AsRef<str>) -> Self {
        let name: Arc<str> = Arc::from(name.as_ref());
        Self {
            key: ClassKey::Named(name.clone()),
            name,
        }
    }

    /// The class's own name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl PartialEq for ModelClass {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for ModelClass {}

impl Hash for ModelClass {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl fmt::Debug for ModelClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ModelClass({})", self.name)
    }
}

impl fmt::Display for ModelClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl Serialize for ModelClass {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.name)
    }
}

/// Type tag of a field.
///
/// The known kinds are closed variants; anything else is kept verbatim
/// as an extension tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FieldType {
    #[default]
    String,
    Number,
    Boolean,
    Array,
    Object,
    Date,
    Pointer,
    Extension(String),
}

impl FieldType {
    /// Parse a type tag. Matching is case-sensitive, except that the legacy
    /// `"Pointer"` spelling is accepted for pointers.
    pub fn parse(s: &str) -> Self {
        match s {
            "string" => FieldType::String,
            "number" => FieldType::Number,
            "boolean" => FieldType::Boolean,
            "array" => FieldType::Array,
            "object" => FieldType::Object,
            "date" => FieldType::Date,
            "pointer" | LEGACY_POINTER_TAG => FieldType::Pointer,
            other => FieldType::Extension(other.to_string()),
        }
    }

    /// Returns the tag for this type.
    pub fn as_str(&self) -> &str {
        match self {
            FieldType::String => "string",
            FieldType::Number => "number",
            FieldType::Boolean => "boolean",
            FieldType::Array => "array",
            FieldType::Object => "object",
            FieldType::Date => "date",
            FieldType::Pointer => "pointer",
            FieldType::Extension(tag) => tag,
        }
    }

    pub fn is_pointer(&self) -> bool {
        matches!(self, FieldType::Pointer)
    }
}

impl From<String> for FieldType {
    fn from(s: String) -> Self {
        FieldType::parse(&s)
    }
}

impl From<&str> for FieldType {
    fn from(s: &str) -> Self {
        FieldType::parse(s)
    }
}

impl From<FieldType> for String {
    fn from(t: FieldType) -> Self {
        match t {
            FieldType::Extension(tag) => tag,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Display flags for grid consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridOptions {
    pub can_view: bool,
    pub can_read: bool,
    pub can_edit: bool,
    pub can_filter: bool,
    pub can_sort: bool,
}

impl Default for GridOptions {
    fn default() -> Self {
        Self {
            can_view: true,
            can_read: true,
            can_edit: false,
            can_filter: true,
            can_sort: false,
        }
    }
}

impl GridOptions {
    /// Shallow merge: each flag set in `overrides` wins, the rest keep `self`.
    pub fn merged(self, overrides: &GridOverrides) -> Self {
        Self {
            can_view: overrides.can_view.unwrap_or(self.can_view),
            can_read: overrides.can_read.unwrap_or(self.can_read),
            can_edit: overrides.can_edit.unwrap_or(self.can_edit),
            can_filter: overrides.can_filter.unwrap_or(self.can_filter),
            can_sort: overrides.can_sort.unwrap_or(self.can_sort),
        }
    }
}

/// Per-field overrides of [`GridOptions`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct GridOverrides {
    #[serde(default)]
    pub can_view: Option<bool>,
    #[serde(default)]
    pub can_read: Option<bool>,
    #[serde(default)]
    pub can_edit: Option<bool>,
    #[serde(default)]
    pub can_filter: Option<bool>,
    #[serde(default)]
    pub can_sort: Option<bool>,
}

/// Options for model registration. Absent values default to the class name.
#[derive(Debug, Clone, Default)]
pub struct ModelOptions {
    pub identifier: Option<String>,
    pub label: Option<String>,
    pub i18n: Option<String>,
}

impl ModelOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = Some(identifier.into());
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn i18n(mut self, key: impl Into<String>) -> Self {
        self.i18n = Some(key.into());
        self
    }
}

/// Options for field registration.
///
/// Label and i18n key default to the property name, the type to
/// [`FieldType::String`], and accessor generation to `true`.
#[derive(Debug, Clone, Default)]
pub struct FieldOptions {
    pub field_type: Option<FieldType>,
    pub label: Option<String>,
    pub i18n: Option<String>,
    pub grid_config: GridOverrides,
    pub add_getter_setter: Option<bool>,
    pub link: Option<ModelClass>,
}

impl FieldOptions {
    /// Options with the given type tag and everything else defaulted.
    pub fn new(field_type: impl Into<FieldType>) -> Self {
        Self {
            field_type: Some(field_type.into()),
            ..Self::default()
        }
    }

    /// Pointer field linking to `class`.
    pub fn pointer(class: ModelClass) -> Self {
        Self {
            field_type: Some(FieldType::Pointer),
            link: Some(class),
            ..Self::default()
        }
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn i18n(mut self, key: impl Into<String>) -> Self {
        self.i18n = Some(key.into());
        self
    }

    pub fn grid(mut self, overrides: GridOverrides) -> Self {
        self.grid_config = overrides;
        self
    }

    pub fn accessor(mut self, enabled: bool) -> Self {
        self.add_getter_setter = Some(enabled);
        self
    }

    pub fn link(mut self, class: ModelClass) -> Self {
        self.link = Some(class);
        self
    }
}
