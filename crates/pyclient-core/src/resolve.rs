//! Schema node → [`TypeRef`].
//!
//! A reference resolves to the referenced definition's name and is never expanded,
//! so self- and mutually-referencing schemas terminate. The only recursion is
//! through array items.

use crate::descriptor::TypeRef;
use crate::naming::type_name;
use crate::stage::{SchemaShape, SchemaSpec};

/// Resolve one schema node. Shapes without a direct target type degrade to [`TypeRef::Any`].
pub fn resolve_type(spec: &SchemaSpec) -> TypeRef {
    match &spec.shape {
        SchemaShape::Reference(name) => TypeRef::Named(type_name(name)),
        SchemaShape::Array { items } => {
            TypeRef::list(items.as_deref().map_or(TypeRef::Any, resolve_type))
        }
        SchemaShape::Enum { literals } => TypeRef::Literal(literals.clone()),
        SchemaShape::Primitive(primitive) => TypeRef::Primitive(*primitive),
        SchemaShape::Object { .. } | SchemaShape::Composite { .. } | SchemaShape::Untyped => {
            TypeRef::Any
        }
    }
}

/// Like [`resolve_type`], for a node that may be missing altogether.
pub fn resolve_optional(spec: Option<&SchemaSpec>) -> TypeRef {
    spec.map_or(TypeRef::Any, resolve_type)
}
