//! Serde model of the raw OpenAPI document.
//!
//! Only the keywords client generation needs are modelled; everything else in the
//! document is ignored. The structs are read by [`crate::stage`] alone, which turns
//! them into the typed [`crate::stage::SpecificationDocument`].

pub mod document;
pub mod operation;
pub mod schema;

use serde::Deserialize;

use crate::error::ParseError;
pub use document::OpenApiSpec;

/// A `$ref` pointer or the object itself.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum MaybeRef<T> {
    Ref {
        #[serde(rename = "$ref")]
        reference: String,
    },
    Item(T),
}

/// Parse an OpenAPI spec from YAML.
pub fn from_yaml(input: &str) -> Result<OpenApiSpec, ParseError> {
    let spec: OpenApiSpec = serde_yaml_ng::from_str(input)?;
    validate_version(&spec)?;
    Ok(spec)
}

/// Parse an OpenAPI spec from JSON.
pub fn from_json(input: &str) -> Result<OpenApiSpec, ParseError> {
    let spec: OpenApiSpec = serde_json::from_str(input)?;
    validate_version(&spec)?;
    Ok(spec)
}

/// Parse a document whose format is not known up front (e.g. a downloaded spec).
/// JSON documents always open with `{`; everything else is handed to the YAML parser.
pub fn from_str_auto(input: &str) -> Result<OpenApiSpec, ParseError> {
    if input.trim_start().starts_with('{') {
        from_json(input)
    } else {
        from_yaml(input)
    }
}

fn validate_version(spec: &OpenApiSpec) -> Result<(), ParseError> {
    if !spec.openapi.starts_with("3.") {
        return Err(ParseError::UnsupportedVersion(spec.openapi.clone()));
    }
    Ok(())
}
