use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

/// Identifiers of one generated Type Definition, precomputed from its wire name.
///
/// Ordering follows the wire name, which keeps every [`ImportSet`] stable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct TypeName {
    pub wire: String,
    pub class_name: String,
    pub module_name: String,
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.wire)
    }
}

/// Other Type Definitions a definition or operation depends on, de-duplicated and ordered.
pub type ImportSet = BTreeSet<TypeName>;

/// A target primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Primitive {
    String,
    Integer,
    Number,
    Boolean,
}

/// A resolved type expression.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeRef {
    Primitive(Primitive),
    List(Box<TypeRef>),
    /// Reference to a generated Type Definition. Never carries the definition's body.
    Named(TypeName),
    /// Closed set of literal values (`enum`).
    Literal(Vec<serde_json::Value>),
    Optional(Box<TypeRef>),
    /// Weak fallback for missing or unrecognized type information.
    Any,
}

impl TypeRef {
    pub fn list(item: TypeRef) -> Self {
        TypeRef::List(Box::new(item))
    }

    /// Wrap as optional. Already optional types are returned unchanged.
    pub fn optional(self) -> Self {
        match self {
            TypeRef::Optional(_) => self,
            other => TypeRef::Optional(Box::new(other)),
        }
    }

    /// The directly referenced definition, if this is a plain named reference.
    pub fn as_named(&self) -> Option<&TypeName> {
        match self {
            TypeRef::Named(name) => Some(name),
            _ => None,
        }
    }

    /// Add every definition referenced anywhere in this type to `out`.
    pub fn collect_names(&self, out: &mut ImportSet) {
        match self {
            TypeRef::Named(name) => {
                out.insert(name.clone());
            }
            TypeRef::List(inner) | TypeRef::Optional(inner) => inner.collect_names(out),
            TypeRef::Primitive(_) | TypeRef::Literal(_) | TypeRef::Any => {}
        }
    }
}

/// HTTP method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HttpMethod {
    Get,
    Put,
    Post,
    Delete,
    Options,
    Head,
    Patch,
    Trace,
}

impl HttpMethod {
    pub const ALL: [HttpMethod; 8] = [
        HttpMethod::Get,
        HttpMethod::Put,
        HttpMethod::Post,
        HttpMethod::Delete,
        HttpMethod::Options,
        HttpMethod::Head,
        HttpMethod::Patch,
        HttpMethod::Trace,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Put => "PUT",
            HttpMethod::Post => "POST",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Head => "HEAD",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Trace => "TRACE",
        }
    }

    /// Lower-case form, used as the generated method name.
    pub fn as_lower(&self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Put => "put",
            HttpMethod::Post => "post",
            HttpMethod::Delete => "delete",
            HttpMethod::Options => "options",
            HttpMethod::Head => "head",
            HttpMethod::Patch => "patch",
            HttpMethod::Trace => "trace",
        }
    }
}
