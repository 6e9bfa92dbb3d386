use crate::descriptor::{Payload, RequestBodyDescriptor};
use crate::naming::type_name;
use crate::stage::RequestBodySpec;

/// Content type assumed for a body that declares no content at all.
pub const FALLBACK_CONTENT_TYPE: &str = "application/json";

/// Resolve an operation's request body. The first declared content type is the default,
/// and only a referenced schema under it yields a typed payload.
pub fn resolve_request_body(spec: Option<&RequestBodySpec>) -> Option<RequestBodyDescriptor> {
    let spec = spec?;
    let mut content_types: Vec<String> = spec.content.iter().map(|m| m.content_type.clone()).collect();
    if content_types.is_empty() {
        content_types.push(FALLBACK_CONTENT_TYPE.to_string());
    }
    let payload = spec
        .content
        .first()
        .and_then(|media| media.schema.as_ref())
        .and_then(|schema| schema.as_reference())
        .map_or(Payload::Untyped, |name| Payload::Typed(type_name(name)));

    Some(RequestBodyDescriptor {
        default_content_type: content_types[0].clone(),
        content_types,
        payload,
        required: spec.required,
        description: spec.description.clone(),
    })
}
