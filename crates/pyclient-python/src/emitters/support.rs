use minijinja::{Environment, context};
use pyclient_core::GeneratedFile;
use pyclient_core::descriptor::SupportTypes;
use serde::Serialize;

use super::render;
use crate::error::GeneratorError;
use crate::type_mapper::primitive_type;

#[derive(Serialize)]
struct ErrorFieldCtx<'a> {
    name: &'a str,
    annotation: &'static str,
}

#[derive(Serialize)]
struct MethodCtx {
    name: &'static str,
    verb: &'static str,
}

/// Emit `utils/`: the request base with its error envelope, and the package init.
pub fn emit_utils(
    env: &Environment<'_>,
    support: &SupportTypes,
) -> Result<Vec<GeneratedFile>, GeneratorError> {
    let request_base = &support.request_base;
    let error_class = &support.error_envelope.class_name;
    let error_fields: Vec<ErrorFieldCtx<'_>> = support
        .error_envelope
        .fields
        .iter()
        .map(|(name, primitive)| ErrorFieldCtx {
            name,
            annotation: primitive_type(*primitive),
        })
        .collect();
    let methods: Vec<MethodCtx> = request_base
        .methods
        .iter()
        .map(|m| MethodCtx {
            name: m.as_lower(),
            verb: m.as_str(),
        })
        .collect();

    let module = render(
        env,
        "request_base.py.j2",
        context! {
            class_name => &request_base.class_name,
            timeout => request_base.timeout_seconds,
            error_class => error_class,
            error_fields => error_fields,
            methods => methods,
        },
    )?;
    let init = render(
        env,
        "utils_init.py.j2",
        context! {
            module_name => &request_base.module_name,
            class_name => &request_base.class_name,
            error_class => error_class,
        },
    )?;
    Ok(vec![
        GeneratedFile::new(format!("utils/{}.py", request_base.module_name), module),
        GeneratedFile::new("utils/__init__.py", init),
    ])
}
