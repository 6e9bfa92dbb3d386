use crate::descriptor::{ErrorEnvelope, HttpMethod, Primitive, RequestBaseDescriptor, SupportTypes};
use crate::error::SynthesisError;
use crate::naming::NameScope;

pub const ERROR_ENVELOPE_CLASS: &str = "HttpExceptionError";
pub const REQUEST_BASE_CLASS: &str = "RequestBase";
pub const REQUEST_BASE_MODULE: &str = "request_base";
pub const BASE_SCHEMA_CLASS: &str = "BaseSchema";
pub const BASE_SCHEMA_MODULE: &str = "base_schema";

/// Synthesize the types every endpoint shares, claiming their names in `types`.
pub fn synthesize_support(
    methods: Vec<HttpMethod>,
    timeout_seconds: u64,
    types: &mut NameScope,
) -> Result<SupportTypes, SynthesisError> {
    for name in [
        ERROR_ENVELOPE_CLASS,
        REQUEST_BASE_CLASS,
        BASE_SCHEMA_CLASS,
        BASE_SCHEMA_MODULE,
    ] {
        types.claim(&format!("support type {name}"), name)?;
    }

    Ok(SupportTypes {
        error_envelope: ErrorEnvelope {
            class_name: ERROR_ENVELOPE_CLASS.to_string(),
            fields: vec![
                ("status_code".to_string(), Primitive::Integer),
                ("detail".to_string(), Primitive::String),
            ],
        },
        request_base: RequestBaseDescriptor {
            class_name: REQUEST_BASE_CLASS.to_string(),
            module_name: REQUEST_BASE_MODULE.to_string(),
            methods,
            timeout_seconds,
        },
        base_schema: BASE_SCHEMA_CLASS.to_string(),
    })
}
