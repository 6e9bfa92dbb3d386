use std::collections::BTreeSet;

use minijinja::{Environment, context};
use pyclient_core::GeneratedFile;
use pyclient_core::descriptor::{
    DefinitionKind, FieldDefault, FieldDescriptor, GenerationResult, ImportSet, TypeDefinition,
    TypeRef,
};
use pyclient_core::synth::support::BASE_SCHEMA_MODULE;
use serde::Serialize;

use super::render;
use crate::error::GeneratorError;
use crate::type_mapper::{python_literal, python_string, python_type, typing_imports};

#[derive(Serialize)]
pub(crate) struct ImportCtx<'a> {
    pub module_name: &'a str,
    pub class_name: &'a str,
}

pub(crate) fn import_ctx(imports: &ImportSet) -> Vec<ImportCtx<'_>> {
    imports
        .iter()
        .map(|name| ImportCtx {
            module_name: &name.module_name,
            class_name: &name.class_name,
        })
        .collect()
}

#[derive(Serialize)]
struct FieldCtx {
    name: String,
    annotation: String,
    arguments: Vec<String>,
}

/// Emit `schemas/<name>_schema.py` for one Type Definition.
pub fn emit_definition(
    env: &Environment<'_>,
    def: &TypeDefinition,
    base_schema: &str,
) -> Result<GeneratedFile, GeneratorError> {
    let content = match &def.kind {
        DefinitionKind::Object { fields } => {
            let mut typing = BTreeSet::new();
            for field in fields {
                typing_imports(&field.type_ref, &mut typing);
            }
            let mut typing: Vec<&str> = typing.into_iter().collect();
            if !def.imports.is_empty() {
                typing.insert(0, "TYPE_CHECKING");
            }
            render(
                env,
                "schema_object.py.j2",
                context! {
                    class_name => &def.name.class_name,
                    description => &def.description,
                    base_schema => base_schema,
                    typing => typing,
                    imports => import_ctx(&def.imports),
                    fields => fields.iter().map(field_ctx).collect::<Vec<_>>(),
                },
            )?
        }
        DefinitionKind::LiteralSet { literals } => render(
            env,
            "schema_literal.py.j2",
            context! {
                class_name => &def.name.class_name,
                description => &def.description,
                target => python_type(&TypeRef::Literal(literals.clone())),
            },
        )?,
        DefinitionKind::Alias { target } => {
            let mut typing = BTreeSet::new();
            typing_imports(target, &mut typing);
            render(
                env,
                "schema_alias.py.j2",
                context! {
                    class_name => &def.name.class_name,
                    description => &def.description,
                    typing => typing,
                    imports => import_ctx(&def.imports),
                    target => python_type(target),
                },
            )?
        }
    };
    Ok(GeneratedFile::new(
        format!("schemas/{}.py", def.name.module_name),
        content,
    ))
}

fn field_ctx(field: &FieldDescriptor) -> FieldCtx {
    let mut arguments = vec![match &field.default {
        FieldDefault::Required => "default=...".to_string(),
        FieldDefault::Null => "default=None".to_string(),
        FieldDefault::Value(value) => format!("default={}", python_literal(value)),
    }];
    if let Some(alias) = &field.alias {
        arguments.push(format!("alias={}", python_string(alias)));
    }
    let meta = &field.metadata;
    if let Some(description) = &meta.description {
        arguments.push(format!("description={}", python_string(description)));
    }
    if let Some(max_length) = meta.max_length {
        arguments.push(format!("max_length={max_length}"));
    }
    if let Some(min_length) = meta.min_length {
        arguments.push(format!("min_length={min_length}"));
    }
    if let Some(title) = &meta.title {
        arguments.push(format!("title={}", python_string(title)));
    }
    FieldCtx {
        name: field.target_name.clone(),
        annotation: python_type(&field.type_ref),
        arguments,
    }
}

/// Emit `schemas/__init__.py`, which also resolves the lazy references between models.
pub fn emit_schemas_init(
    env: &Environment<'_>,
    result: &GenerationResult,
) -> Result<GeneratedFile, GeneratorError> {
    let definitions: Vec<ImportCtx<'_>> = result
        .definitions
        .iter()
        .map(|d| ImportCtx {
            module_name: &d.name.module_name,
            class_name: &d.name.class_name,
        })
        .collect();
    let models: Vec<&str> = result
        .definitions
        .iter()
        .filter(|d| matches!(d.kind, DefinitionKind::Object { .. }))
        .map(|d| d.name.class_name.as_str())
        .collect();
    let content = render(
        env,
        "schemas_init.py.j2",
        context! {
            base_schema => &result.support.base_schema,
            base_schema_module => BASE_SCHEMA_MODULE,
            definitions => definitions,
            models => models,
        },
    )?;
    Ok(GeneratedFile::new("schemas/__init__.py", content))
}

/// Emit `schemas/base_schema.py`. The user owns it after the first run.
pub fn emit_base_schema(
    env: &Environment<'_>,
    base_schema: &str,
) -> Result<GeneratedFile, GeneratorError> {
    let content = render(
        env,
        "base_schema.py.j2",
        context! { base_schema => base_schema },
    )?;
    Ok(GeneratedFile::scaffold(
        format!("schemas/{BASE_SCHEMA_MODULE}.py"),
        content,
    ))
}
