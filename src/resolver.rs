//! Chained field resolution - expands pointer fields into the fields of the
//! models they link to.

use serde::Serialize;

use crate::registry::{FieldDescriptor, ModelDescriptor, Registry};
use crate::types::{FieldType, GridOptions, ModelClass};

/// A field in the resolved tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedField {
    #[serde(flatten)]
    pub field: FieldDescriptor,
    /// Present only for pointer fields whose target was expanded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expansion: Option<Expansion>,
}

/// The linked model of an expanded pointer field and its resolved fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Expansion {
    pub model: ModelDescriptor,
    pub fields: Vec<ResolvedField>,
}

/// Resolve the fields of `class`, expanding pointer fields recursively.
///
/// Pointer fields are dropped when their target is not a registered model,
/// or when the target resolves to nothing (no fields, or the target is
/// already on the current path).
pub fn resolve_chained_fields(registry: &Registry, class: &ModelClass) -> Vec<ResolvedField> {
    resolve_chained_fields_from(registry, class, &[])
}

/// Resolve `class` as if reached through the ancestor chain `visited`.
///
/// Only classes on `visited` are suppressed; the same class may appear in
/// sibling branches.
pub fn resolve_chained_fields_from(
    registry: &Registry,
    class: &ModelClass,
    visited: &[ModelClass],
) -> Vec<ResolvedField> {
    if visited.contains(class) {
        tracing::trace!(class = %class, "class already on path");
        return Vec::new();
    }

    let fields = registry.field_descriptors(class);
    if fields.is_empty() {
        return Vec::new();
    }

    let mut path = visited.to_vec();
    path.push(class.clone());

    let mut result = Vec::with_capacity(fields.len());
    for field in fields {
        match field.pointer_target() {
            Some(target) => {
                if let Some(node) = expand_pointer(registry, class, field, target, &path) {
                    result.push(node);
                }
            }
            None => result.push(ResolvedField {
                field: field.clone(),
                expansion: None,
            }),
        }
    }

    result
}

fn expand_pointer(
    registry: &Registry,
    owner: &ModelClass,
    field: &FieldDescriptor,
    target: &ModelClass,
    path: &[ModelClass],
) -> Option<ResolvedField> {
    let Some(model) = registry.model_descriptor(target) else {
        tracing::debug!(
            model = %owner,
            field = %field.name,
            target = %target,
            "dropping pointer field: target is not a registered model"
        );
        return None;
    };

    let nested = resolve_chained_fields_from(registry, target, path);
    if nested.is_empty() {
        tracing::debug!(
            model = %owner,
            field = %field.name,
            target = %target,
            "dropping pointer field: target resolved to no fields"
        );
        return None;
    }

    Some(ResolvedField {
        field: field.clone(),
        expansion: Some(Expansion {
            model: model.clone(),
            fields: nested,
        }),
    })
}

/// A leaf of the resolved tree, addressed by its dotted path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    /// Property names from the root, joined with `.` (e.g. `customer.address.city`).
    pub path: String,
    /// Labels of every field along the path.
    pub labels: Vec<String>,
    pub field_type: FieldType,
    pub grid_options: GridOptions,
}

/// Flatten a resolved tree into its leaf columns, depth first.
///
/// Expanded pointer fields contribute their sub-columns instead of a column
/// of their own.
pub fn flatten_columns(fields: &[ResolvedField]) -> Vec<Column> {
    let mut columns = Vec::new();
    collect_columns(fields, "", &[], &mut columns);
    columns
}

fn collect_columns(
    fields: &[ResolvedField],
    prefix: &str,
    labels: &[String],
    columns: &mut Vec<Column>,
) {
    for node in fields {
        let path = if prefix.is_empty() {
            node.field.name.clone()
        } else {
            format!("{}.{}", prefix, node.field.name)
        };
        let mut node_labels = labels.to_vec();
        node_labels.push(node.field.label.clone());

        match &node.expansion {
            Some(expansion) => collect_columns(&expansion.fields, &path, &node_labels, columns),
            None => columns.push(Column {
                path,
                labels: node_labels,
                field_type: node.field.field_type.clone(),
                grid_options: node.field.grid_options,
            }),
        }
    }
}
