//! Integration tests for chained field resolution.

use model_chain::{
    resolve_chained_fields, FieldOptions, FieldType, GridOptions, GridOverrides, ModelClass,
    ModelOptions, Registry, ResolvedField,
};

fn names(fields: &[ResolvedField]) -> Vec<&str> {
    fields.iter().map(|f| f.field.name.as_str()).collect()
}

fn expansion_of<'a>(fields: &'a [ResolvedField], name: &str) -> &'a [ResolvedField] {
    let node = fields
        .iter()
        .find(|f| f.field.name == name)
        .unwrap_or_else(|| panic!("field {name} missing"));
    &node.expansion.as_ref().expect("field not expanded").fields
}

// === Registration Defaults ===

mod defaults {
    use super::*;

    struct Product;

    #[test]
    fn model_and_field_labels_default_to_names() {
        let mut registry = Registry::new();
        let product = ModelClass::of::<Product>();
        registry.register_model(&product, ModelOptions::default());
        registry.register_field(&product, "sku", FieldOptions::default());

        let model = registry.model_descriptor(&product).unwrap();
        assert_eq!(model.label, "Product");
        assert_eq!(model.i18n_key, "Product");

        let sku = &registry.field_descriptors(&product)[0];
        assert_eq!(sku.label, "sku");
        assert_eq!(sku.i18n_key, "sku");
    }

    #[test]
    fn grid_override_flips_one_flag() {
        let mut registry = Registry::new();
        let product = ModelClass::of::<Product>();
        registry.register_field(
            &product,
            "price",
            FieldOptions::new(FieldType::Number).grid(GridOverrides {
                can_edit: Some(true),
                ..GridOverrides::default()
            }),
        );

        let expected = GridOptions {
            can_edit: true,
            ..GridOptions::default()
        };
        assert_eq!(registry.field_descriptors(&product)[0].grid_options, expected);
    }

    #[test]
    fn accessor_flag_is_preserved() {
        let mut registry = Registry::new();
        let product = ModelClass::of::<Product>();
        registry.register_field(&product, "a", FieldOptions::default());
        registry.register_field(&product, "b", FieldOptions::default().accessor(false));

        let fields = registry.field_descriptors(&product);
        assert!(fields[0].generate_accessor);
        assert!(!fields[1].generate_accessor);
    }
}

// === Ordering ===

mod ordering {
    use super::*;

    #[test]
    fn declaration_order_is_preserved() {
        let mut registry = Registry::new();
        let item = ModelClass::named("Item");
        registry
            .define(&item, ModelOptions::default())
            .field("c", FieldOptions::default())
            .field("a", FieldOptions::default())
            .field("b", FieldOptions::default());

        assert_eq!(names(&resolve_chained_fields(&registry, &item)), ["c", "a", "b"]);
    }

    #[test]
    fn duplicate_registrations_are_both_resolved() {
        let mut registry = Registry::new();
        let item = ModelClass::named("Item");
        registry
            .define(&item, ModelOptions::default())
            .field("a", FieldOptions::default())
            .field("a", FieldOptions::new(FieldType::Number));

        let resolved = resolve_chained_fields(&registry, &item);
        assert_eq!(names(&resolved), ["a", "a"]);
        assert_eq!(resolved[1].field.field_type, FieldType::Number);
    }
}

// === Cycles ===

mod cycles {
    use super::*;

    #[test]
    fn self_pointer_is_dropped() {
        let mut registry = Registry::new();
        let node = ModelClass::named("Node");
        registry
            .define(&node, ModelOptions::default())
            .field("value", FieldOptions::new(FieldType::Number))
            .field("parent", FieldOptions::pointer(node.clone()))
            .field("label", FieldOptions::default());

        let resolved = resolve_chained_fields(&registry, &node);
        assert_eq!(names(&resolved), ["value", "label"]);
    }

    #[test]
    fn mutual_cycle_expands_once() {
        let mut registry = Registry::new();
        let a = ModelClass::named("A");
        let b = ModelClass::named("B");
        registry
            .define(&a, ModelOptions::default())
            .field("a_name", FieldOptions::default())
            .field("b", FieldOptions::pointer(b.clone()));
        registry
            .define(&b, ModelOptions::default())
            .field("b_name", FieldOptions::default())
            .field("a", FieldOptions::pointer(a.clone()));

        let resolved = resolve_chained_fields(&registry, &a);
        assert_eq!(names(&resolved), ["a_name", "b"]);

        let nested = expansion_of(&resolved, "b");
        assert_eq!(names(nested), ["b_name"]);
        assert!(nested.iter().all(|f| f.expansion.is_none()));
    }

    #[test]
    fn long_cycle_terminates() {
        let mut registry = Registry::new();
        let classes: Vec<_> = (0..5).map(|i| ModelClass::named(format!("M{i}"))).collect();
        for (i, class) in classes.iter().enumerate() {
            let next = classes[(i + 1) % classes.len()].clone();
            registry
                .define(class, ModelOptions::default())
                .field("id", FieldOptions::default())
                .field("next", FieldOptions::pointer(next));
        }

        let mut depth = 0;
        let mut level = resolve_chained_fields(&registry, &classes[0]);
        while let Some(node) = level.iter().find(|f| f.field.name == "next") {
            depth += 1;
            level = node.expansion.as_ref().unwrap().fields.clone();
        }
        // M0 -> M1 -> M2 -> M3 -> M4, whose pointer back to M0 is dropped.
        assert_eq!(depth, 4);
        assert_eq!(names(&level), ["id"]);
    }
}

// === Sharing ===

mod sharing {
    use super::*;

    #[test]
    fn diamond_expands_under_both_fields() {
        let mut registry = Registry::new();
        let root = ModelClass::named("Root");
        let shared = ModelClass::named("Shared");
        registry
            .define(&shared, ModelOptions::default())
            .field("x", FieldOptions::default())
            .field("y", FieldOptions::default());
        registry
            .define(&root, ModelOptions::default())
            .field("left", FieldOptions::pointer(shared.clone()))
            .field("right", FieldOptions::pointer(shared.clone()));

        let resolved = resolve_chained_fields(&registry, &root);
        assert_eq!(names(&resolved), ["left", "right"]);
        assert_eq!(names(expansion_of(&resolved, "left")), ["x", "y"]);
        assert_eq!(names(expansion_of(&resolved, "right")), ["x", "y"]);
    }
}

// === Dropped Pointers ===

mod dropped_pointers {
    use super::*;

    #[test]
    fn unregistered_link_is_dropped() {
        let mut registry = Registry::new();
        let order = ModelClass::named("Order");
        let ghost = ModelClass::named("Ghost");
        // Fields without a model registration still do not make Ghost expandable.
        registry.register_field(&ghost, "boo", FieldOptions::default());
        registry
            .define(&order, ModelOptions::default())
            .field("id", FieldOptions::default())
            .field("ghost", FieldOptions::pointer(ghost))
            .field("total", FieldOptions::new(FieldType::Number));

        let resolved = resolve_chained_fields(&registry, &order);
        assert_eq!(names(&resolved), ["id", "total"]);
    }

    #[test]
    fn link_to_model_without_fields_is_dropped() {
        let mut registry = Registry::new();
        let order = ModelClass::named("Order");
        let empty = ModelClass::named("Empty");
        registry.register_model(&empty, ModelOptions::default());
        registry
            .define(&order, ModelOptions::default())
            .field("empty", FieldOptions::pointer(empty))
            .field("id", FieldOptions::default());

        assert_eq!(names(&resolve_chained_fields(&registry, &order)), ["id"]);
    }

    #[test]
    fn pointer_whose_target_is_all_dropped_is_dropped() {
        let mut registry = Registry::new();
        let a = ModelClass::named("A");
        let b = ModelClass::named("B");
        registry
            .define(&b, ModelOptions::default())
            .field("back", FieldOptions::pointer(a.clone()));
        registry
            .define(&a, ModelOptions::default())
            .field("id", FieldOptions::default())
            .field("b", FieldOptions::pointer(b));

        assert_eq!(names(&resolve_chained_fields(&registry, &a)), ["id"]);
    }

    #[test]
    fn link_on_non_pointer_is_not_followed() {
        let mut registry = Registry::new();
        let order = ModelClass::named("Order");
        let customer = ModelClass::named("Customer");
        registry
            .define(&customer, ModelOptions::default())
            .field("name", FieldOptions::default());
        registry
            .define(&order, ModelOptions::default())
            .field("customer", FieldOptions::new(FieldType::String).link(customer));

        let resolved = resolve_chained_fields(&registry, &order);
        assert_eq!(names(&resolved), ["customer"]);
        assert!(resolved[0].expansion.is_none());
    }
}

// === Determinism ===

mod determinism {
    use super::*;

    #[test]
    fn repeated_resolution_is_equal() {
        let mut registry = Registry::new();
        let a = ModelClass::named("A");
        let b = ModelClass::named("B");
        registry
            .define(&a, ModelOptions::default())
            .field("id", FieldOptions::default())
            .field("b", FieldOptions::pointer(b.clone()));
        registry
            .define(&b, ModelOptions::default())
            .field("a", FieldOptions::pointer(a.clone()))
            .field("name", FieldOptions::default());

        let first = resolve_chained_fields(&registry, &a);
        let second = resolve_chained_fields(&registry, &a);
        assert_eq!(first, second);
        assert_eq!(registry.resolve(&a), first);
    }

    #[test]
    fn registries_are_isolated() {
        let item = ModelClass::named("Item");
        let mut one = Registry::new();
        one.define(&item, ModelOptions::default())
            .field("x", FieldOptions::default());
        let two = Registry::new();

        assert_eq!(resolve_chained_fields(&one, &item).len(), 1);
        assert!(resolve_chained_fields(&two, &item).is_empty());
    }

    #[test]
    fn resolution_from_many_threads() {
        let mut registry = Registry::new();
        let a = ModelClass::named("A");
        registry
            .define(&a, ModelOptions::default())
            .field("id", FieldOptions::default())
            .field("self", FieldOptions::pointer(a.clone()));

        let expected = resolve_chained_fields(&registry, &a);
        std::thread::scope(|scope| {
            for _ in 0..4 {
                scope.spawn(|| assert_eq!(resolve_chained_fields(&registry, &a), expected));
            }
        });
    }
}
