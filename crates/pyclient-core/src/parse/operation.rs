use indexmap::IndexMap;
use serde::Deserialize;

use super::MaybeRef;
use super::schema::SchemaNode;
use crate::descriptor::ParameterLocation;

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Operation {
    pub operation_id: Option<String>,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub deprecated: bool,
    pub parameters: Vec<MaybeRef<Parameter>>,
    pub request_body: Option<MaybeRef<RequestBody>>,
    /// Status code (or range such as `2XX`) → response, in declaration order.
    pub responses: IndexMap<String, MaybeRef<Response>>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "in")]
    pub location: ParameterLocation,
    #[serde(default)]
    pub required: bool,
    pub description: Option<String>,
    pub schema: Option<SchemaNode>,
}

/// `content` keeps declaration order: its first entry is the default content type.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct RequestBody {
    pub description: Option<String>,
    pub required: bool,
    pub content: IndexMap<String, MediaType>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct Response {
    pub description: String,
    pub content: IndexMap<String, MediaType>,
}

/// One entry of a `content` map.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct MediaType {
    pub schema: Option<SchemaNode>,
}
