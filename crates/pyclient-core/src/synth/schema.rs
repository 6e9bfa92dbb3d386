use log::debug;

use crate::descriptor::{
    DefinitionKind, FieldDefault, FieldDescriptor, FieldMetadata, ImportSet, TypeDefinition,
    TypeRef,
};
use crate::error::SynthesisError;
use crate::naming::{NameScope, escape_reserved, normalize_identifier, resolve_alias, type_name};
use crate::resolve::resolve_type;
use crate::stage::{SchemaShape, SchemaSpec};

/// Synthesize the Type Definition for component schema `wire`.
pub fn synthesize_definition(
    wire: &str,
    spec: &SchemaSpec,
) -> Result<TypeDefinition, SynthesisError> {
    let name = type_name(wire);

    let kind = match &spec.shape {
        SchemaShape::Object {
            properties,
            required,
        } => {
            let mut scope = NameScope::new(format!("fields of {wire}"));
            let mut fields = Vec::with_capacity(properties.len());
            for (prop_name, prop) in properties {
                let target_name = escape_reserved(&normalize_identifier(prop_name));
                scope.claim(prop_name, &target_name)?;

                let resolved = resolve_type(prop);
                if resolved == TypeRef::Any {
                    debug!("{wire}.{prop_name} has no usable type, falling back to Any");
                }
                let is_required = required.iter().any(|r| r == prop_name);
                let (type_ref, default) = if is_required {
                    (resolved, FieldDefault::Required)
                } else {
                    let default = prop
                        .meta
                        .default
                        .clone()
                        .map_or(FieldDefault::Null, FieldDefault::Value);
                    (resolved.optional(), default)
                };

                fields.push(FieldDescriptor {
                    alias: resolve_alias(prop_name, &target_name),
                    wire_name: prop_name.clone(),
                    target_name,
                    type_ref,
                    required: is_required,
                    default,
                    metadata: FieldMetadata {
                        description: prop.meta.description.clone(),
                        title: prop.meta.title.clone(),
                        min_length: prop.meta.min_length,
                        max_length: prop.meta.max_length,
                    },
                });
            }
            DefinitionKind::Object { fields }
        }
        SchemaShape::Enum { literals } => DefinitionKind::LiteralSet {
            literals: literals.clone(),
        },
        _ => DefinitionKind::Alias {
            target: resolve_type(spec),
        },
    };

    Ok(TypeDefinition {
        imports: collect_imports(wire, spec),
        name,
        description: spec.meta.description.clone(),
        kind,
    })
}

/// Every definition referenced below `spec`, combinators and array items included,
/// other than `wire` itself.
pub fn collect_imports(wire: &str, spec: &SchemaSpec) -> ImportSet {
    let mut referenced = Vec::new();
    spec.referenced_names(&mut referenced);
    referenced
        .into_iter()
        .filter(|name| *name != wire)
        .map(type_name)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::Primitive;
    use crate::parse::document::Components;
    use crate::parse::schema::SchemaNode;
    use crate::stage::{ComponentLookup, stage_schema};

    /// Stage `json` as component `wire`, with the given sibling component names.
    fn staged(wire: &str, json: &str, siblings: &[&str]) -> SchemaSpec {
        let mut components = Components::default();
        for name in siblings.iter().chain([&wire]) {
            components
                .schemas
                .insert(name.to_string(), SchemaNode::Bool(true));
        }
        let raw: SchemaNode = serde_json::from_str(json).unwrap();
        stage_schema(&raw, &ComponentLookup::new(Some(&components)), wire).unwrap()
    }

    fn fields(def: &TypeDefinition) -> &[FieldDescriptor] {
        match &def.kind {
            DefinitionKind::Object { fields } => fields,
            other => panic!("expected object, got {other:?}"),
        }
    }

    #[test]
    fn test_object_fields() {
        let spec = staged(
            "Pet",
            r#"{
                "type": "object",
                "required": ["petName"],
                "properties": {
                    "petName": {"type": "string", "maxLength": 40, "description": "Display name"},
                    "from": {"type": "string"},
                    "age": {"type": "integer", "default": 1}
                }
            }"#,
            &[],
        );
        let def = synthesize_definition("Pet", &spec).unwrap();
        assert_eq!(def.name.class_name, "PetSchema");
        let fields = fields(&def);

        let pet_name = &fields[0];
        assert_eq!(pet_name.target_name, "pet_name");
        assert_eq!(pet_name.alias.as_deref(), Some("petName"));
        assert!(pet_name.required);
        assert_eq!(pet_name.default, FieldDefault::Required);
        assert_eq!(pet_name.type_ref, TypeRef::Primitive(Primitive::String));
        assert_eq!(pet_name.metadata.max_length, Some(40));
        assert_eq!(pet_name.metadata.description.as_deref(), Some("Display name"));

        let from = &fields[1];
        assert_eq!(from.target_name, "from_");
        assert_eq!(from.alias.as_deref(), Some("from"));
        assert_eq!(from.default, FieldDefault::Null);
        assert_eq!(from.type_ref, TypeRef::Primitive(Primitive::String).optional());

        let age = &fields[2];
        assert_eq!(age.alias, None);
        assert_eq!(age.default, FieldDefault::Value(1.into()));
    }

    #[test]
    fn test_self_reference_terminates() {
        let spec = staged(
            "Node",
            r##"{"type": "object", "properties": {"next": {"$ref": "#/components/schemas/Node"}}}"##,
            &[],
        );
        let def = synthesize_definition("Node", &spec).unwrap();
        let fields = fields(&def);
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].type_ref, TypeRef::Named(type_name("Node")).optional());
        assert!(def.imports.is_empty(), "a definition never imports itself");
    }

    #[test]
    fn test_colliding_properties_are_rejected() {
        let spec = staged(
            "User",
            r#"{"type": "object", "properties": {"user-id": {"type": "string"}, "user_id": {"type": "string"}}}"#,
            &[],
        );
        let err = synthesize_definition("User", &spec).unwrap_err();
        assert!(matches!(
            err,
            SynthesisError::NamingCollision { ref target, .. } if target == "user_id"
        ));
    }

    #[test]
    fn test_imports_walk_combinators_and_arrays() {
        let spec = staged(
            "Order",
            r##"{
                "type": "object",
                "properties": {
                    "lines": {"type": "array", "items": {"$ref": "#/components/schemas/Line"}},
                    "payment": {"oneOf": [
                        {"$ref": "#/components/schemas/Card"},
                        {"$ref": "#/components/schemas/Voucher"}
                    ]},
                    "parent": {"$ref": "#/components/schemas/Order"},
                    "card": {"$ref": "#/components/schemas/Card"}
                }
            }"##,
            &["Line", "Card", "Voucher"],
        );
        let def = synthesize_definition("Order", &spec).unwrap();
        let imports: Vec<_> = def.imports.iter().map(|n| n.wire.as_str()).collect();
        assert_eq!(imports, vec!["Card", "Line", "Voucher"]);

        let payment = &fields(&def)[1];
        assert_eq!(payment.type_ref, TypeRef::Any.optional());
    }

    #[test]
    fn test_enum_and_alias_definitions() {
        let status = staged("Status", r#"{"type": "string", "enum": ["open", "closed"]}"#, &[]);
        let def = synthesize_definition("Status", &status).unwrap();
        assert!(matches!(def.kind, DefinitionKind::LiteralSet { ref literals } if literals.len() == 2));

        let tags = staged("Tags", r#"{"type": "array", "items": {"type": "string"}}"#, &[]);
        let def = synthesize_definition("Tags", &tags).unwrap();
        match def.kind {
            DefinitionKind::Alias { target } => {
                assert_eq!(target, TypeRef::list(TypeRef::Primitive(Primitive::String)));
            }
            other => panic!("expected alias, got {other:?}"),
        }
    }
}
