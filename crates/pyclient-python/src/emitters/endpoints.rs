//! One module per Endpoint Group under `endpoints/`.

use std::collections::{BTreeSet, HashSet};

use minijinja::{Environment, context};
use pyclient_core::GeneratedFile;
use pyclient_core::descriptor::{
    Argument, ArgumentDefault, ArgumentKind, AssemblyEntry, EndpointGroup, OperationDescriptor,
    ParameterLocation, Payload, RequestBodyDescriptor, ResponseShape, SupportTypes, TypeName,
};
use serde::Serialize;

use super::render;
use super::schemas::import_ctx;
use crate::error::GeneratorError;
use crate::type_mapper::{python_string, python_type, typing_imports};

const DUMP_OPTIONS: &str = r#"mode="json", by_alias=True, exclude_none=True"#;

/// Definitions emitted as pydantic models, keyed by wire name.
///
/// Everything else (literal sets and aliases) is validated and dumped through a `TypeAdapter`.
pub type ModelNames<'a> = HashSet<&'a str>;

#[derive(Serialize)]
struct OperationCtx {
    name: &'static str,
    arguments: Vec<String>,
    argument_docs: Vec<String>,
    return_type: String,
    returns: String,
    summary: String,
    description: Option<String>,
    deprecated: bool,
    uri: String,
    headers: String,
    params: Option<String>,
    cookies: Option<String>,
    request_body: Option<String>,
    decode: String,
}

pub fn emit_group(
    env: &Environment<'_>,
    group: &EndpointGroup,
    support: &SupportTypes,
    models: &ModelNames<'_>,
) -> Result<GeneratedFile, GeneratorError> {
    let mut typing = BTreeSet::from(["Dict"]);
    let mut type_adapter = false;
    let operations: Vec<OperationCtx> = group
        .operations
        .iter()
        .map(|op| {
            for argument in &op.signature {
                if argument.kind != ArgumentKind::Headers {
                    typing_imports(&argument.type_ref, &mut typing);
                }
            }
            match &op.response.shape {
                ResponseShape::List(_) => {
                    typing.insert("List");
                }
                ResponseShape::Untyped => {
                    typing.insert("Any");
                }
                ResponseShape::Single(_) => {}
            }
            let ctx = operation_ctx(op, models);
            type_adapter |= uses_type_adapter(op, models);
            ctx
        })
        .collect();

    let content = render(
        env,
        "endpoint.py.j2",
        context! {
            class_name => &group.class_name,
            path => &group.path,
            typing => typing,
            type_adapter => type_adapter,
            imports => import_ctx(&group.imports),
            request_base_module => &support.request_base.module_name,
            request_base_class => &support.request_base.class_name,
            operations => operations,
        },
    )?;
    Ok(GeneratedFile::new(
        format!("endpoints/{}.py", group.module_name),
        content,
    ))
}

fn uses_type_adapter(op: &OperationDescriptor, models: &ModelNames<'_>) -> bool {
    let body = match op.request_body.as_ref().map(|b| &b.payload) {
        Some(Payload::Typed(name)) => !models.contains(name.wire.as_str()),
        _ => false,
    };
    let response = op
        .response
        .shape
        .type_name()
        .is_some_and(|name| !models.contains(name.wire.as_str()));
    body || response
}

fn operation_ctx(op: &OperationDescriptor, models: &ModelNames<'_>) -> OperationCtx {
    let (return_type, decode) = decode(&op.response.shape, models);
    OperationCtx {
        name: op.method.as_lower(),
        arguments: op.signature.iter().map(argument_declaration).collect(),
        argument_docs: op.signature.iter().map(argument_doc).collect(),
        return_type,
        returns: op
            .response
            .description
            .clone()
            .unwrap_or_else(|| "Decoded response body.".to_string()),
        summary: op.docstring.summary.clone(),
        description: op.docstring.description.clone(),
        deprecated: op.deprecated,
        uri: uri_expression(op),
        headers: headers_expression(op),
        params: assembly_expression(&op.query),
        cookies: assembly_expression(&op.cookie),
        request_body: op
            .request_body
            .as_ref()
            .map(|body| body_expression(body, models)),
        decode,
    }
}

fn argument_declaration(argument: &Argument) -> String {
    if argument.kind == ArgumentKind::Headers {
        return format!("{}: Dict[str, str] = {{}}", argument.name);
    }
    let annotation = python_type(&argument.type_ref);
    match &argument.default {
        ArgumentDefault::Required => format!("{}: {annotation}", argument.name),
        ArgumentDefault::Null => format!("{}: {annotation} = None", argument.name),
        ArgumentDefault::Literal(value) => {
            format!("{}: {annotation} = {}", argument.name, python_string(value))
        }
        ArgumentDefault::EmptyMap => format!("{}: {annotation} = {{}}", argument.name),
    }
}

fn argument_doc(argument: &Argument) -> String {
    let description = match (&argument.description, argument.kind) {
        (Some(description), _) => description.trim().replace('\n', " "),
        (None, ArgumentKind::Parameter(location)) => format!("{} parameter.", location_word(location)),
        (None, ArgumentKind::RequestBody) => "Request body.".to_string(),
        (None, ArgumentKind::ContentType) => "Content type of the request body.".to_string(),
        (None, ArgumentKind::Headers) => "Additional request headers.".to_string(),
    };
    format!("{}: {description}", argument.name)
}

fn location_word(location: ParameterLocation) -> &'static str {
    match location {
        ParameterLocation::Path => "Path",
        ParameterLocation::Query => "Query",
        ParameterLocation::Header => "Header",
        ParameterLocation::Cookie => "Cookie",
    }
}

/// The request path as a Python expression; an f-string when path arguments are substituted.
fn uri_expression(op: &OperationDescriptor) -> String {
    let literal = python_string(&op.request_path);
    let substituted = op
        .parameters
        .iter()
        .any(|p| p.location == ParameterLocation::Path);
    if substituted {
        format!("f{literal}")
    } else {
        literal
    }
}

fn headers_expression(op: &OperationDescriptor) -> String {
    let mut parts = Vec::new();
    if op.request_body.is_some() {
        parts.push(r#""Content-Type": content_type"#.to_string());
    }
    if !op.header.is_empty() {
        let entries = assembly_entries(&op.header);
        parts.push(format!(
            "**{{key: str(value) for key, value in {{{}}}.items() if value is not None}}",
            entries.join(", ")
        ));
    }
    parts.push("**headers".to_string());
    format!("{{{}}}", parts.join(", "))
}

/// A dict literal for query or cookie values. Optional pairs left unset are dropped.
fn assembly_expression(entries: &[AssemblyEntry]) -> Option<String> {
    if entries.is_empty() {
        return None;
    }
    let dict = format!("{{{}}}", assembly_entries(entries).join(", "));
    let has_optional_pair = entries
        .iter()
        .any(|e| matches!(e, AssemblyEntry::Pair { required: false, .. }));
    Some(if has_optional_pair {
        format!("{{key: value for key, value in {dict}.items() if value is not None}}")
    } else {
        dict
    })
}

fn assembly_entries(entries: &[AssemblyEntry]) -> Vec<String> {
    entries
        .iter()
        .map(|entry| match entry {
            AssemblyEntry::Pair {
                wire_name, argument, ..
            } => format!("{}: {argument}", python_string(wire_name)),
            AssemblyEntry::Spread {
                argument,
                required: true,
            } => format!("**{argument}.model_dump({DUMP_OPTIONS})"),
            AssemblyEntry::Spread {
                argument,
                required: false,
            } => format!(
                "**({argument}.model_dump({DUMP_OPTIONS}) if {argument} is not None else {{}})"
            ),
        })
        .collect()
}

fn body_expression(body: &RequestBodyDescriptor, models: &ModelNames<'_>) -> String {
    let dump = match &body.payload {
        Payload::Untyped => return "request_body".to_string(),
        Payload::Typed(name) if models.contains(name.wire.as_str()) => {
            format!("request_body.model_dump({DUMP_OPTIONS})")
        }
        Payload::Typed(name) => format!(
            r#"TypeAdapter({}).dump_python(request_body, mode="json", by_alias=True)"#,
            name.class_name
        ),
    };
    if body.required {
        dump
    } else {
        format!("{dump} if request_body is not None else None")
    }
}

/// Return annotation and decoding expression for a response shape.
fn decode(shape: &ResponseShape, models: &ModelNames<'_>) -> (String, String) {
    let is_model = |name: &TypeName| models.contains(name.wire.as_str());
    match shape {
        ResponseShape::Single(name) if is_model(name) => (
            name.class_name.clone(),
            format!("{}.model_validate(response.json())", name.class_name),
        ),
        ResponseShape::Single(name) => (
            name.class_name.clone(),
            format!("TypeAdapter({}).validate_python(response.json())", name.class_name),
        ),
        ResponseShape::List(name) if is_model(name) => (
            format!("List[{}]", name.class_name),
            format!(
                "[{}.model_validate(item) for item in response.json()]",
                name.class_name
            ),
        ),
        ResponseShape::List(name) => (
            format!("List[{}]", name.class_name),
            format!(
                "TypeAdapter(List[{}]).validate_python(response.json())",
                name.class_name
            ),
        ),
        ResponseShape::Untyped => (
            "Any".to_string(),
            "response.json() if response.content else None".to_string(),
        ),
    }
}
