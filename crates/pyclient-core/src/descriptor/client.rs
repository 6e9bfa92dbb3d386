use serde::Serialize;

use super::definitions::TypeDefinition;
use super::operations::OperationDescriptor;
use super::types::{HttpMethod, ImportSet, Primitive};

/// All operations sharing one path template.
#[derive(Debug, Clone, Serialize)]
pub struct EndpointGroup {
    pub path: String,
    /// Attribute on the client facade, e.g. `items_item_id`.
    pub attribute_name: String,
    pub class_name: String,
    pub module_name: String,
    pub operations: Vec<OperationDescriptor>,
    pub imports: ImportSet,
}

/// The generation root: every endpoint group plus the merged import set.
#[derive(Debug, Clone, Serialize)]
pub struct ClientDescriptor {
    pub title: String,
    pub version: String,
    pub description: Option<String>,
    pub base_url: Option<String>,
    pub groups: Vec<EndpointGroup>,
    /// Union of every definition's and every operation's imports.
    pub imports: ImportSet,
}

/// Types every generated endpoint shares.
#[derive(Debug, Clone, Serialize)]
pub struct SupportTypes {
    pub error_envelope: ErrorEnvelope,
    pub request_base: RequestBaseDescriptor,
    pub base_schema: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorEnvelope {
    pub class_name: String,
    pub fields: Vec<(String, Primitive)>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RequestBaseDescriptor {
    pub class_name: String,
    pub module_name: String,
    pub methods: Vec<HttpMethod>,
    pub timeout_seconds: u64,
}

/// The complete result of one pipeline run.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationResult {
    pub definitions: Vec<TypeDefinition>,
    pub support: SupportTypes,
    pub client: ClientDescriptor,
}
