use serde::Serialize;

use super::types::{ImportSet, TypeName, TypeRef};

/// A synthesized named type, one per component schema.
#[derive(Debug, Clone, Serialize)]
pub struct TypeDefinition {
    pub name: TypeName,
    pub description: Option<String>,
    pub kind: DefinitionKind,
    /// Referenced definitions, never including this definition itself.
    pub imports: ImportSet,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum DefinitionKind {
    /// A structural type with fields in declaration order.
    Object { fields: Vec<FieldDescriptor> },
    /// A closed literal-set type without fields.
    LiteralSet { literals: Vec<serde_json::Value> },
    /// A plain alias for a primitive, list or reference.
    Alias { target: TypeRef },
}

/// One field of an object definition.
#[derive(Debug, Clone, Serialize)]
pub struct FieldDescriptor {
    pub wire_name: String,
    pub target_name: String,
    /// Wire name to (de)serialize under when it differs from `target_name`.
    pub alias: Option<String>,
    /// Already wrapped in [`TypeRef::Optional`] unless the field is required.
    pub type_ref: TypeRef,
    pub required: bool,
    pub default: FieldDefault,
    pub metadata: FieldMetadata,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldDefault {
    /// No default; the value must be supplied.
    Required,
    Null,
    Value(serde_json::Value),
}

/// Opaque passthrough of the property's documentation and length constraints.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FieldMetadata {
    pub description: Option<String>,
    pub title: Option<String>,
    pub min_length: Option<u64>,
    pub max_length: Option<u64>,
}
