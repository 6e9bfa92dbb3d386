use serde::{Deserialize, Serialize};

use super::types::{HttpMethod, ImportSet, TypeName, TypeRef};

/// A synthesized callable unit for one path + method pair.
#[derive(Debug, Clone, Serialize)]
pub struct OperationDescriptor {
    /// The path template as declared, e.g. `/items/{itemId}`.
    pub path: String,
    pub method: HttpMethod,
    /// Carried through for `inspect`; method names come from the HTTP method alone.
    pub operation_id: Option<String>,
    /// The path template with every path parameter renamed to its target name.
    pub request_path: String,
    /// Parameters in call-signature order: required first, then optional.
    pub parameters: Vec<ParameterDescriptor>,
    pub query: Vec<AssemblyEntry>,
    pub header: Vec<AssemblyEntry>,
    pub cookie: Vec<AssemblyEntry>,
    pub request_body: Option<RequestBodyDescriptor>,
    pub response: ResponseDescriptor,
    /// The complete call signature, ending with the fixed `headers` argument.
    pub signature: Vec<Argument>,
    pub docstring: Docstring,
    pub deprecated: bool,
    pub imports: ImportSet,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
    Path,
    Query,
    Header,
    Cookie,
}

#[derive(Debug, Clone, Serialize)]
pub struct ParameterDescriptor {
    pub wire_name: String,
    pub target_name: String,
    pub location: ParameterLocation,
    pub type_ref: TypeRef,
    pub required: bool,
    pub description: Option<String>,
}

/// One contribution to a query, header or cookie key/value assembly.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum AssemblyEntry {
    /// A reference-typed argument contributes its full field set.
    Spread { argument: String, required: bool },
    /// A single `wire_name: argument` pair.
    Pair {
        wire_name: String,
        argument: String,
        required: bool,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct RequestBodyDescriptor {
    /// Declared content types in declaration order.
    pub content_types: Vec<String>,
    /// The first declared content type.
    pub default_content_type: String,
    pub payload: Payload,
    pub required: bool,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Payload {
    /// Serialized through the definition's field mapping before transmission.
    Typed(TypeName),
    Untyped,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResponseDescriptor {
    /// The 2xx status the shape was taken from, if any.
    pub status: Option<String>,
    pub content_type: Option<String>,
    pub shape: ResponseShape,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseShape {
    /// Decode one instance of a definition.
    Single(TypeName),
    /// Decode a list, element-wise.
    List(TypeName),
    /// Return the decoded body unchanged.
    Untyped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DecodeStrategy {
    Instance,
    ElementWise,
    Raw,
}

impl ResponseShape {
    pub fn decode_strategy(&self) -> DecodeStrategy {
        match self {
            ResponseShape::Single(_) => DecodeStrategy::Instance,
            ResponseShape::List(_) => DecodeStrategy::ElementWise,
            ResponseShape::Untyped => DecodeStrategy::Raw,
        }
    }

    pub fn type_name(&self) -> Option<&TypeName> {
        match self {
            ResponseShape::Single(name) | ResponseShape::List(name) => Some(name),
            ResponseShape::Untyped => None,
        }
    }
}

/// One argument of a generated method signature.
#[derive(Debug, Clone, Serialize)]
pub struct Argument {
    pub name: String,
    pub kind: ArgumentKind,
    pub type_ref: TypeRef,
    pub default: ArgumentDefault,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ArgumentKind {
    Parameter(ParameterLocation),
    RequestBody,
    ContentType,
    Headers,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ArgumentDefault {
    /// Positional, no default.
    Required,
    Null,
    Literal(String),
    EmptyMap,
}

#[derive(Debug, Clone, Serialize)]
pub struct Docstring {
    pub summary: String,
    pub description: Option<String>,
}
