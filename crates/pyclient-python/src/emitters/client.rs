use minijinja::{Environment, context};
use pyclient_core::GeneratedFile;
use pyclient_core::descriptor::{ClientDescriptor, SupportTypes};
use serde::Serialize;

use super::render;
use crate::error::GeneratorError;
use crate::type_mapper::python_string;

#[derive(Serialize)]
struct GroupCtx<'a> {
    module_name: &'a str,
    class_name: &'a str,
    attribute_name: &'a str,
}

/// Emit `client.py`, the facade exposing every endpoint group as an attribute.
pub fn emit_client(
    env: &Environment<'_>,
    client: &ClientDescriptor,
    support: &SupportTypes,
) -> Result<GeneratedFile, GeneratorError> {
    let groups: Vec<GroupCtx<'_>> = client
        .groups
        .iter()
        .map(|g| GroupCtx {
            module_name: &g.module_name,
            class_name: &g.class_name,
            attribute_name: &g.attribute_name,
        })
        .collect();
    let content = render(
        env,
        "client.py.j2",
        context! {
            title => &client.title,
            version => &client.version,
            description => &client.description,
            base_url => client.base_url.as_deref().map(python_string),
            timeout => support.request_base.timeout_seconds,
            request_base_module => &support.request_base.module_name,
            request_base_class => &support.request_base.class_name,
            groups => groups,
        },
    )?;
    Ok(GeneratedFile::new("client.py", content))
}

pub fn emit_package_init(
    env: &Environment<'_>,
    client: &ClientDescriptor,
    package_name: &str,
) -> Result<GeneratedFile, GeneratorError> {
    let content = render(
        env,
        "package_init.py.j2",
        context! {
            package_name => package_name,
            title => &client.title,
            version => &client.version,
        },
    )?;
    Ok(GeneratedFile::new("__init__.py", content))
}
