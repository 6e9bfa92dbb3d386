//! OperationSynthesizer: one path + method pair → [`OperationDescriptor`].

pub mod docstring;
pub mod parameters;
pub mod request_body;
pub mod response;

use crate::descriptor::{
    Argument, ArgumentDefault, ArgumentKind, ImportSet, OperationDescriptor, ParameterDescriptor,
    Payload, RequestBodyDescriptor, TypeRef,
};
use crate::error::SynthesisError;
use crate::naming::NameScope;
use crate::stage::{OperationSpec, SchemaSpec};
use indexmap::IndexMap;

pub use docstring::resolve_docstring;
pub use parameters::{ResolvedParameters, resolve_parameters};
pub use request_body::resolve_request_body;
pub use response::resolve_response;

pub fn synthesize_operation(
    path: &str,
    op: &OperationSpec,
    schemas: &IndexMap<String, SchemaSpec>,
) -> Result<OperationDescriptor, SynthesisError> {
    let mut scope = NameScope::new(format!("arguments of {} {}", op.method.as_str(), path));
    let ResolvedParameters {
        parameters,
        request_path,
        query,
        header,
        cookie,
    } = resolve_parameters(path, &op.parameters, schemas, &mut scope)?;
    let request_body = resolve_request_body(op.request_body.as_ref());
    let response = resolve_response(&op.responses);

    let mut imports = ImportSet::new();
    for param in &parameters {
        param.type_ref.collect_names(&mut imports);
    }
    if let Some(RequestBodyDescriptor {
        payload: Payload::Typed(name),
        ..
    }) = &request_body
    {
        imports.insert(name.clone());
    }
    if let Some(name) = response.shape.type_name() {
        imports.insert(name.clone());
    }

    Ok(OperationDescriptor {
        signature: build_signature(&parameters, request_body.as_ref()),
        docstring: resolve_docstring(
            path,
            op.method,
            op.summary.as_deref(),
            op.description.as_deref(),
        ),
        path: path.to_string(),
        method: op.method,
        operation_id: op.operation_id.clone(),
        request_path,
        parameters,
        query,
        header,
        cookie,
        request_body,
        response,
        deprecated: op.deprecated,
        imports,
    })
}

/// Required arguments, then optional ones, then `content_type`, then `headers`.
fn build_signature(
    parameters: &[ParameterDescriptor],
    body: Option<&RequestBodyDescriptor>,
) -> Vec<Argument> {
    let param_arg = |p: &ParameterDescriptor| Argument {
        name: p.target_name.clone(),
        kind: ArgumentKind::Parameter(p.location),
        type_ref: p.type_ref.clone(),
        default: if p.required {
            ArgumentDefault::Required
        } else {
            ArgumentDefault::Null
        },
        description: p.description.clone(),
    };
    let body_arg = |b: &RequestBodyDescriptor| {
        let payload = match &b.payload {
            Payload::Typed(name) => TypeRef::Named(name.clone()),
            Payload::Untyped => TypeRef::Any,
        };
        Argument {
            name: "request_body".to_string(),
            kind: ArgumentKind::RequestBody,
            type_ref: if b.required { payload } else { payload.optional() },
            default: if b.required {
                ArgumentDefault::Required
            } else {
                ArgumentDefault::Null
            },
            description: b.description.clone(),
        }
    };

    let mut signature: Vec<Argument> = parameters.iter().filter(|p| p.required).map(param_arg).collect();
    if let Some(b) = body.filter(|b| b.required) {
        signature.push(body_arg(b));
    }
    signature.extend(parameters.iter().filter(|p| !p.required).map(param_arg));
    if let Some(b) = body {
        if !b.required {
            signature.push(body_arg(b));
        }
        signature.push(Argument {
            name: "content_type".to_string(),
            kind: ArgumentKind::ContentType,
            type_ref: TypeRef::Literal(
                b.content_types
                    .iter()
                    .map(|ct| serde_json::Value::String(ct.clone()))
                    .collect(),
            ),
            default: ArgumentDefault::Literal(b.default_content_type.clone()),
            description: None,
        });
    }
    signature.push(Argument {
        name: "headers".to_string(),
        kind: ArgumentKind::Headers,
        type_ref: TypeRef::Any,
        default: ArgumentDefault::EmptyMap,
        description: None,
    });
    signature
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{HttpMethod, ParameterLocation, Primitive};
    use crate::naming::type_name;
    use crate::stage::{MediaSpec, ParameterSpec, RequestBodySpec, ResponseSpec, SchemaShape, SchemaSpec};

    fn op(method: HttpMethod) -> OperationSpec {
        OperationSpec {
            method,
            operation_id: None,
            summary: None,
            description: None,
            deprecated: false,
            parameters: vec![],
            request_body: None,
            responses: vec![],
        }
    }

    fn names(signature: &[Argument]) -> Vec<&str> {
        signature.iter().map(|a| a.name.as_str()).collect()
    }

    #[test]
    fn test_headers_always_last() {
        let descriptor = synthesize_operation("/health", &op(HttpMethod::Get), &IndexMap::new()).unwrap();
        assert_eq!(names(&descriptor.signature), vec!["headers"]);
        assert_eq!(descriptor.signature[0].default, ArgumentDefault::EmptyMap);
        assert_eq!(descriptor.docstring.summary, "Calls endpoint `/health` as method `get`.");
    }

    #[test]
    fn test_signature_order() {
        let mut spec = op(HttpMethod::Put);
        spec.parameters = vec![
            ParameterSpec {
                name: "dryRun".to_string(),
                location: ParameterLocation::Query,
                required: false,
                description: None,
                schema: None,
            },
            ParameterSpec {
                name: "itemId".to_string(),
                location: ParameterLocation::Path,
                required: true,
                description: None,
                schema: Some(SchemaSpec {
                    shape: SchemaShape::Primitive(Primitive::Integer),
                    meta: Default::default(),
                }),
            },
        ];
        spec.request_body = Some(RequestBodySpec {
            description: None,
            required: true,
            content: vec![
                MediaSpec {
                    content_type: "application/json".to_string(),
                    schema: Some(SchemaSpec::reference("Widget")),
                },
                MediaSpec {
                    content_type: "application/xml".to_string(),
                    schema: Some(SchemaSpec::reference("Widget")),
                },
            ],
        });
        spec.responses = vec![ResponseSpec {
            status: "200".to_string(),
            description: None,
            content: vec![MediaSpec {
                content_type: "application/json".to_string(),
                schema: Some(SchemaSpec::reference("Receipt")),
            }],
        }];

        let descriptor = synthesize_operation("/items/{itemId}", &spec, &IndexMap::new()).unwrap();
        assert_eq!(
            names(&descriptor.signature),
            vec!["item_id", "request_body", "dry_run", "content_type", "headers"]
        );
        assert_eq!(descriptor.request_path, "/items/{item_id}");
        assert_eq!(
            descriptor.signature[1].type_ref,
            TypeRef::Named(type_name("Widget"))
        );
        assert_eq!(
            descriptor.signature[3].default,
            ArgumentDefault::Literal("application/json".to_string())
        );
        let imports: Vec<_> = descriptor.imports.iter().map(|n| n.wire.as_str()).collect();
        assert_eq!(imports, vec!["Receipt", "Widget"]);
    }

    #[test]
    fn test_optional_body_follows_optional_parameters() {
        let mut spec = op(HttpMethod::Post);
        spec.parameters = vec![ParameterSpec {
            name: "tag".to_string(),
            location: ParameterLocation::Query,
            required: false,
            description: None,
            schema: None,
        }];
        spec.request_body = Some(RequestBodySpec {
            description: None,
            required: false,
            content: vec![],
        });
        let descriptor = synthesize_operation("/tags", &spec, &IndexMap::new()).unwrap();
        assert_eq!(
            names(&descriptor.signature),
            vec!["tag", "request_body", "content_type", "headers"]
        );
        assert_eq!(descriptor.signature[1].type_ref, TypeRef::Any.optional());
    }
}
