//! Staging: the one-time conversion of the raw serde model into the typed,
//! validated [`SpecificationDocument`] every later stage reads.
//!
//! After staging, no schema `$ref` can dangle and parameter, request body and
//! response references are already inlined.

pub mod refs;
pub mod schema;

use indexmap::IndexMap;
use log::debug;
use serde::Serialize;

use crate::descriptor::{HttpMethod, ParameterLocation};
use crate::error::ResolveError;
use crate::parse::operation::{MediaType, Operation, Parameter};
use crate::parse::{MaybeRef, OpenApiSpec};

pub use refs::{ComponentLookup, parse_ref_name};
pub use schema::{Combinator, SchemaMeta, SchemaShape, SchemaSpec, stage_schema};

/// The immutable input of one synthesis run.
#[derive(Debug, Clone, Serialize)]
pub struct SpecificationDocument {
    pub title: String,
    pub version: String,
    pub description: Option<String>,
    pub base_url: Option<String>,
    /// `components.schemas`, in declaration order.
    pub schemas: IndexMap<String, SchemaSpec>,
    /// Path template → operations in canonical method order.
    pub paths: IndexMap<String, Vec<OperationSpec>>,
}

impl SpecificationDocument {
    /// Every HTTP method used by at least one operation, in canonical order.
    pub fn methods_in_use(&self) -> Vec<HttpMethod> {
        HttpMethod::ALL
            .into_iter()
            .filter(|method| {
                self.paths
                    .values()
                    .flatten()
                    .any(|op| op.method == *method)
            })
            .collect()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct OperationSpec {
    pub method: HttpMethod,
    pub operation_id: Option<String>,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub deprecated: bool,
    /// Path-level parameters merged with operation-level ones.
    pub parameters: Vec<ParameterSpec>,
    pub request_body: Option<RequestBodySpec>,
    /// Responses in declaration order.
    pub responses: Vec<ResponseSpec>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ParameterSpec {
    pub name: String,
    pub location: ParameterLocation,
    pub required: bool,
    pub description: Option<String>,
    pub schema: Option<SchemaSpec>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RequestBodySpec {
    pub description: Option<String>,
    pub required: bool,
    /// Declared content types in declaration order.
    pub content: Vec<MediaSpec>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResponseSpec {
    pub status: String,
    pub description: Option<String>,
    pub content: Vec<MediaSpec>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MediaSpec {
    pub content_type: String,
    pub schema: Option<SchemaSpec>,
}

/// Whether component `name` is an object schema, following plain reference aliases.
pub fn is_structural(schemas: &IndexMap<String, SchemaSpec>, name: &str) -> bool {
    let mut current = name;
    // Each hop visits a distinct schema, so a cycle gives up after `len` steps.
    for _ in 0..=schemas.len() {
        match schemas.get(current).map(|s| &s.shape) {
            Some(SchemaShape::Object { .. }) => return true,
            Some(SchemaShape::Reference(next)) => current = next,
            _ => return false,
        }
    }
    false
}

/// Stage a parsed document. Fails on the first reference that cannot be resolved.
pub fn stage(spec: &OpenApiSpec) -> Result<SpecificationDocument, ResolveError> {
    let lookup = ComponentLookup::new(spec.components.as_ref());

    let mut schemas = IndexMap::new();
    if let Some(components) = &spec.components {
        for (name, raw) in &components.schemas {
            let location = format!("components.schemas.{name}");
            schemas.insert(name.clone(), stage_schema(raw, &lookup, &location)?);
        }
    }

    let mut paths = IndexMap::with_capacity(spec.paths.len());
    for (path, item) in &spec.paths {
        let mut operations = Vec::new();
        for (method, op) in item.operations() {
            let location = format!("paths.{path}.{}", method.as_lower());
            let merged = merge_parameters(&item.parameters, &op.parameters, &lookup, &location)?;
            operations.push(stage_operation(method, op, merged, &lookup, &location)?);
        }
        debug!("staged {} operation(s) under {}", operations.len(), path);
        paths.insert(path.clone(), operations);
    }

    Ok(SpecificationDocument {
        title: spec.info.title.clone(),
        version: spec.info.version.clone(),
        description: spec.info.description.clone(),
        base_url: spec.servers.first().map(|s| s.url.clone()),
        schemas,
        paths,
    })
}

/// Path-level parameters first; an operation-level parameter with the same name and
/// location replaces its path-level counterpart in place.
fn merge_parameters<'a>(
    path_level: &'a [MaybeRef<Parameter>],
    op_level: &'a [MaybeRef<Parameter>],
    lookup: &ComponentLookup<'a>,
    location: &str,
) -> Result<Vec<&'a Parameter>, ResolveError> {
    let mut merged: Vec<&Parameter> = Vec::new();
    for param in path_level.iter().chain(op_level) {
        let param = lookup.parameter(param, location)?;
        match merged
            .iter_mut()
            .find(|p| p.name == param.name && p.location == param.location)
        {
            Some(slot) => *slot = param,
            None => merged.push(param),
        }
    }
    Ok(merged)
}

fn stage_operation(
    method: HttpMethod,
    op: &Operation,
    parameters: Vec<&Parameter>,
    lookup: &ComponentLookup<'_>,
    location: &str,
) -> Result<OperationSpec, ResolveError> {
    let parameters = parameters
        .into_iter()
        .map(|p| -> Result<ParameterSpec, ResolveError> {
            let schema = p
                .schema
                .as_ref()
                .map(|s| {
                    stage_schema(s, lookup, &format!("{location}.parameters.{}", p.name))
                })
                .transpose()?;
            Ok(ParameterSpec {
                name: p.name.clone(),
                location: p.location,
                // Path parameters are always required, whatever the document says.
                required: p.required || p.location == ParameterLocation::Path,
                description: p.description.clone(),
                schema,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let request_body = match &op.request_body {
        Some(body) => {
            let body = lookup.request_body(body, location)?;
            Some(RequestBodySpec {
                description: body.description.clone(),
                required: body.required,
                content: stage_content(&body.content, lookup, &format!("{location}.requestBody"))?,
            })
        }
        None => None,
    };

    let mut responses = Vec::with_capacity(op.responses.len());
    for (status, response) in &op.responses {
        let response_location = format!("{location}.responses.{status}");
        let response = lookup.response(response, &response_location)?;
        responses.push(ResponseSpec {
            status: status.clone(),
            description: Some(response.description.clone()).filter(|d| !d.is_empty()),
            content: stage_content(&response.content, lookup, &response_location)?,
        });
    }

    Ok(OperationSpec {
        method,
        operation_id: op.operation_id.clone(),
        summary: op.summary.clone(),
        description: op.description.clone(),
        deprecated: op.deprecated,
        parameters,
        request_body,
        responses,
    })
}

fn stage_content(
    content: &IndexMap<String, MediaType>,
    lookup: &ComponentLookup<'_>,
    location: &str,
) -> Result<Vec<MediaSpec>, ResolveError> {
    content
        .iter()
        .map(|(content_type, media)| -> Result<MediaSpec, ResolveError> {
            let schema = media
                .schema
                .as_ref()
                .map(|s| stage_schema(s, lookup, &format!("{location}.content.{content_type}.schema")))
                .transpose()?;
            Ok(MediaSpec {
                content_type: content_type.clone(),
                schema,
            })
        })
        .collect()
}
