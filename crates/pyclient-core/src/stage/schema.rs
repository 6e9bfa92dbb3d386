use indexmap::IndexMap;
use serde::Serialize;

use crate::descriptor::Primitive;
use crate::error::ResolveError;
use crate::parse::schema::{JsonType, Schema, SchemaNode};

use super::refs::ComponentLookup;

/// One validated schema node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchemaSpec {
    pub shape: SchemaShape,
    pub meta: SchemaMeta,
}

/// The closed set of shapes synthesis matches over.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemaShape {
    /// A `$ref` into `components.schemas`, already checked to exist.
    Reference(String),
    Object {
        properties: IndexMap<String, SchemaSpec>,
        required: Vec<String>,
    },
    Array {
        items: Option<Box<SchemaSpec>>,
    },
    Enum {
        literals: Vec<serde_json::Value>,
    },
    Primitive(Primitive),
    Composite {
        combinator: Combinator,
        variants: Vec<SchemaSpec>,
    },
    /// No usable type information.
    Untyped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Combinator {
    AllOf,
    OneOf,
    AnyOf,
}

/// Documentation and constraints carried through to fields untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SchemaMeta {
    pub description: Option<String>,
    pub title: Option<String>,
    pub min_length: Option<u64>,
    pub max_length: Option<u64>,
    pub default: Option<serde_json::Value>,
}

impl SchemaSpec {
    pub fn untyped() -> Self {
        Self {
            shape: SchemaShape::Untyped,
            meta: SchemaMeta::default(),
        }
    }

    pub fn reference(name: impl Into<String>) -> Self {
        Self {
            shape: SchemaShape::Reference(name.into()),
            meta: SchemaMeta::default(),
        }
    }

    /// The referenced component name, if this node is a plain reference.
    pub fn as_reference(&self) -> Option<&str> {
        match &self.shape {
            SchemaShape::Reference(name) => Some(name),
            _ => None,
        }
    }

    /// Every component name referenced anywhere below this node, in visit order.
    pub fn referenced_names<'a>(&'a self, out: &mut Vec<&'a str>) {
        match &self.shape {
            SchemaShape::Reference(name) => out.push(name),
            SchemaShape::Object { properties, .. } => {
                for prop in properties.values() {
                    prop.referenced_names(out);
                }
            }
            SchemaShape::Array { items } => {
                if let Some(items) = items {
                    items.referenced_names(out);
                }
            }
            SchemaShape::Composite { variants, .. } => {
                for variant in variants {
                    variant.referenced_names(out);
                }
            }
            SchemaShape::Enum { .. } | SchemaShape::Primitive(_) | SchemaShape::Untyped => {}
        }
    }
}

/// Convert a raw schema into its staged form, validating every `$ref` on the way.
pub fn stage_schema(
    raw: &SchemaNode,
    lookup: &ComponentLookup<'_>,
    location: &str,
) -> Result<SchemaSpec, ResolveError> {
    match raw {
        SchemaNode::Ref { reference } => {
            let name = lookup.schema_name(reference, location)?;
            Ok(SchemaSpec::reference(name))
        }
        // `true` accepts anything, `false` nothing; neither carries a type.
        SchemaNode::Bool(_) => Ok(SchemaSpec::untyped()),
        SchemaNode::Inline(schema) => stage_inline(schema, lookup, location),
    }
}

fn stage_inline(
    schema: &Schema,
    lookup: &ComponentLookup<'_>,
    location: &str,
) -> Result<SchemaSpec, ResolveError> {
    let meta = SchemaMeta {
        description: schema.description.clone(),
        title: schema.title.clone(),
        min_length: schema.min_length,
        max_length: schema.max_length,
        default: schema.default.clone(),
    };
    let primary = schema.kind.as_ref().and_then(|t| t.narrowed());

    // A lone allOf member is how documented references are usually written.
    if schema.all_of.len() == 1 && schema.properties.is_empty() {
        let inner = stage_schema(&schema.all_of[0], lookup, &format!("{location}.allOf.0"))?;
        return Ok(inner.with_outer_meta(meta));
    }
    for (combinator, variants) in [
        (Combinator::AnyOf, &schema.any_of),
        (Combinator::OneOf, &schema.one_of),
        (Combinator::AllOf, &schema.all_of),
    ] {
        if variants.is_empty() {
            continue;
        }
        let key = combinator.keyword();
        let mut staged = Vec::with_capacity(variants.len());
        let mut meaningful = Vec::new();
        for (index, variant) in variants.iter().enumerate() {
            let spec = stage_schema(variant, lookup, &format!("{location}.{key}.{index}"))?;
            if !variant.is_null() {
                meaningful.push(index);
            }
            staged.push(spec);
        }
        // `anyOf: [X, {type: null}]` is a nullable X.
        if combinator != Combinator::AllOf && meaningful.len() == 1 {
            let inner = staged.swap_remove(meaningful[0]);
            return Ok(inner.with_outer_meta(meta));
        }
        return Ok(SchemaSpec {
            shape: SchemaShape::Composite {
                combinator,
                variants: staged,
            },
            meta,
        });
    }

    let shape = if primary == Some(JsonType::Array)
        || (primary.is_none() && schema.items.is_some())
    {
        let items = match &schema.items {
            Some(items) => Some(Box::new(stage_schema(
                items,
                lookup,
                &format!("{location}.items"),
            )?)),
            None => None,
        };
        SchemaShape::Array { items }
    } else if !schema.enum_values.is_empty() {
        SchemaShape::Enum {
            literals: schema.enum_values.clone(),
        }
    } else if primary == Some(JsonType::Object)
        || (primary.is_none() && !schema.properties.is_empty())
    {
        let mut properties = IndexMap::with_capacity(schema.properties.len());
        for (name, prop) in &schema.properties {
            let staged = stage_schema(prop, lookup, &format!("{location}.properties.{name}"))?;
            properties.insert(name.clone(), staged);
        }
        SchemaShape::Object {
            properties,
            required: schema.required.clone(),
        }
    } else {
        match primary {
            Some(JsonType::String) => SchemaShape::Primitive(Primitive::String),
            Some(JsonType::Integer) => SchemaShape::Primitive(Primitive::Integer),
            Some(JsonType::Number) => SchemaShape::Primitive(Primitive::Number),
            Some(JsonType::Boolean) => SchemaShape::Primitive(Primitive::Boolean),
            _ => SchemaShape::Untyped,
        }
    };
    Ok(SchemaSpec { shape, meta })
}

impl Combinator {
    pub fn keyword(&self) -> &'static str {
        match self {
            Combinator::AllOf => "allOf",
            Combinator::OneOf => "oneOf",
            Combinator::AnyOf => "anyOf",
        }
    }
}

impl SchemaSpec {
    /// Documentation written next to a collapsed combinator wins over the inner node's.
    fn with_outer_meta(mut self, outer: SchemaMeta) -> Self {
        let SchemaMeta {
            description,
            title,
            min_length,
            max_length,
            default,
        } = outer;
        self.meta.description = description.or(self.meta.description);
        self.meta.title = title.or(self.meta.title);
        self.meta.min_length = min_length.or(self.meta.min_length);
        self.meta.max_length = max_length.or(self.meta.max_length);
        self.meta.default = default.or(self.meta.default);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::document::Components;

    fn stage_json(components: &Components, json: &str) -> Result<SchemaSpec, ResolveError> {
        let raw: SchemaNode = serde_json::from_str(json).unwrap();
        stage_schema(&raw, &ComponentLookup::new(Some(components)), "test")
    }

    fn with_widget() -> Components {
        let mut components = Components::default();
        components
            .schemas
            .insert("Widget".to_string(), SchemaNode::Bool(true));
        components
    }

    #[test]
    fn test_reference_stays_a_reference() {
        let spec = stage_json(&with_widget(), r##"{"$ref": "#/components/schemas/Widget"}"##).unwrap();
        assert_eq!(spec.as_reference(), Some("Widget"));
    }

    #[test]
    fn test_unknown_reference_reports_location() {
        let err = stage_json(
            &with_widget(),
            r##"{"type": "object", "properties": {"item": {"$ref": "#/components/schemas/Gadget"}}}"##,
        )
        .unwrap_err();
        match err {
            ResolveError::UnresolvableReference { location, .. } => {
                assert_eq!(location, "test.properties.item");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_nullable_any_of_collapses() {
        let spec = stage_json(
            &with_widget(),
            r##"{"anyOf": [{"$ref": "#/components/schemas/Widget"}, {"type": "null"}], "description": "maybe"}"##,
        )
        .unwrap();
        assert_eq!(spec.as_reference(), Some("Widget"));
        assert_eq!(spec.meta.description.as_deref(), Some("maybe"));
    }

    #[test]
    fn test_real_union_stays_composite() {
        let spec = stage_json(
            &with_widget(),
            r##"{"oneOf": [{"$ref": "#/components/schemas/Widget"}, {"type": "string"}]}"##,
        )
        .unwrap();
        match spec.shape {
            SchemaShape::Composite {
                combinator,
                variants,
            } => {
                assert_eq!(combinator, Combinator::OneOf);
                assert_eq!(variants.len(), 2);
            }
            other => panic!("expected composite, got {other:?}"),
        }
    }

    #[test]
    fn test_shapes() {
        let components = Components::default();
        let array = stage_json(&components, r#"{"type": "array", "items": {"type": "integer"}}"#).unwrap();
        assert!(matches!(array.shape, SchemaShape::Array { items: Some(_) }));

        let literal = stage_json(&components, r#"{"type": "string", "enum": ["a", "b"]}"#).unwrap();
        assert!(matches!(literal.shape, SchemaShape::Enum { ref literals } if literals.len() == 2));

        let nullable = stage_json(&components, r#"{"type": ["string", "null"]}"#).unwrap();
        assert_eq!(nullable.shape, SchemaShape::Primitive(Primitive::String));

        let implicit = stage_json(&components, r#"{"properties": {"a": {}}}"#).unwrap();
        assert!(matches!(implicit.shape, SchemaShape::Object { .. }));

        let empty = stage_json(&components, "{}").unwrap();
        assert_eq!(empty.shape, SchemaShape::Untyped);
    }
}
