use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;

/// A value of the JSON Schema `type` keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JsonType {
    String,
    Number,
    Integer,
    Boolean,
    Array,
    Object,
    Null,
}

/// `type` holds either one name or, in OpenAPI 3.1, a list of them.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum TypeKeyword {
    One(JsonType),
    Union(Vec<JsonType>),
}

impl TypeKeyword {
    /// The type left after dropping `null`, when exactly one remains.
    pub fn narrowed(&self) -> Option<JsonType> {
        match self {
            TypeKeyword::One(ty) => Some(*ty),
            TypeKeyword::Union(types) => {
                let mut rest = types.iter().filter(|ty| **ty != JsonType::Null);
                match (rest.next(), rest.next()) {
                    (Some(ty), None) => Some(*ty),
                    _ => None,
                }
            }
        }
    }

    pub fn is_null(&self) -> bool {
        match self {
            TypeKeyword::One(ty) => *ty == JsonType::Null,
            TypeKeyword::Union(types) => types.iter().all(|ty| *ty == JsonType::Null),
        }
    }
}

/// Anything that may stand where a schema is expected.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum SchemaNode {
    Ref {
        #[serde(rename = "$ref")]
        reference: String,
    },
    Inline(Box<Schema>),
    /// JSON Schema `true` / `false`.
    Bool(bool),
}

impl SchemaNode {
    pub fn is_null(&self) -> bool {
        match self {
            SchemaNode::Inline(schema) => schema.kind.as_ref().is_some_and(TypeKeyword::is_null),
            SchemaNode::Ref { .. } | SchemaNode::Bool(_) => false,
        }
    }
}

/// The keywords of a JSON Schema object the generator reads. Others are ignored.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Schema {
    #[serde(rename = "type")]
    pub kind: Option<TypeKeyword>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub default: Option<Value>,
    pub properties: IndexMap<String, SchemaNode>,
    pub required: Vec<String>,
    pub items: Option<Box<SchemaNode>>,
    pub all_of: Vec<SchemaNode>,
    pub one_of: Vec<SchemaNode>,
    pub any_of: Vec<SchemaNode>,
    #[serde(rename = "enum")]
    pub enum_values: Vec<Value>,
    pub min_length: Option<u64>,
    pub max_length: Option<u64>,
}
