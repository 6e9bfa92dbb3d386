//! Pipeline Orchestrator.
//!
//! Stages run strictly in order, each to completion: stage the document, synthesize
//! type definitions, synthesize support types, synthesize endpoint groups and the
//! client facade, then verify that no type reference dangles. Any error aborts the
//! run before a [`GenerationResult`] exists.

use std::collections::BTreeSet;

use log::{debug, info};

use crate::descriptor::{
    ArgumentKind, DefinitionKind, EndpointGroup, GenerationResult, ImportSet, Payload,
    TypeDefinition, TypeRef,
};
use crate::error::SynthesisError;
use crate::naming::NameScope;
use crate::parse::OpenApiSpec;
use crate::stage::{self, SpecificationDocument};
use crate::synth::{synthesize_client, synthesize_definition, synthesize_group, synthesize_support};

/// Default per-request timeout of the generated transport, in seconds.
pub const DEFAULT_REQUEST_TIMEOUT: u64 = 15;

#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Overrides the document's first server URL.
    pub base_url: Option<String>,
    pub request_timeout: u64,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            base_url: None,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

/// Everything the orchestrator accumulates during one run. Owned by [`run_staged`]
/// alone and consumed into the result.
struct Accumulator {
    type_names: NameScope,
    group_names: NameScope,
    definitions: Vec<TypeDefinition>,
    groups: Vec<EndpointGroup>,
}

/// Stage `spec` and synthesize the complete result.
pub fn run(spec: &OpenApiSpec, options: &PipelineOptions) -> Result<GenerationResult, SynthesisError> {
    info!("staging specification document");
    let doc = stage::stage(spec)?;
    run_staged(&doc, options)
}

pub fn run_staged(
    doc: &SpecificationDocument,
    options: &PipelineOptions,
) -> Result<GenerationResult, SynthesisError> {
    let mut acc = Accumulator {
        type_names: NameScope::new("type names"),
        group_names: NameScope::new("endpoint groups"),
        definitions: Vec::with_capacity(doc.schemas.len()),
        groups: Vec::with_capacity(doc.paths.len()),
    };

    info!("synthesizing {} type definition(s)", doc.schemas.len());
    for (wire, schema) in &doc.schemas {
        let definition = synthesize_definition(wire, schema)?;
        acc.type_names.claim(wire, &definition.name.class_name)?;
        acc.type_names.claim(wire, &definition.name.module_name)?;
        debug!(
            "{} -> {} ({} import(s))",
            wire,
            definition.name.class_name,
            definition.imports.len()
        );
        acc.definitions.push(definition);
    }

    info!("synthesizing support types");
    let support = synthesize_support(
        doc.methods_in_use(),
        options.request_timeout,
        &mut acc.type_names,
    )?;

    info!("synthesizing {} endpoint group(s)", doc.paths.len());
    for (path, operations) in &doc.paths {
        if operations.is_empty() {
            debug!("skipping {path}: no operations");
            continue;
        }
        acc.groups.push(synthesize_group(
            path,
            operations,
            &doc.schemas,
            &mut acc.group_names,
        )?);
    }

    let client = synthesize_client(
        &doc.title,
        &doc.version,
        doc.description.as_deref(),
        options.base_url.clone().or_else(|| doc.base_url.clone()),
        acc.groups,
        &acc.definitions,
    );
    let result = GenerationResult {
        definitions: acc.definitions,
        support,
        client,
    };

    info!("verifying type references");
    verify_closed_world(&result)?;
    Ok(result)
}

/// Fail if any type reference in `result` names a definition that is not part of it.
pub fn verify_closed_world(result: &GenerationResult) -> Result<(), SynthesisError> {
    let known: BTreeSet<&str> = result
        .definitions
        .iter()
        .map(|d| d.name.wire.as_str())
        .collect();
    let check = |names: &ImportSet, location: String| -> Result<(), SynthesisError> {
        match names.iter().find(|n| !known.contains(n.wire.as_str())) {
            Some(missing) => Err(SynthesisError::DanglingReference {
                name: missing.wire.clone(),
                location,
            }),
            None => Ok(()),
        }
    };
    let names_in = |ty: &TypeRef| {
        let mut names = ImportSet::new();
        ty.collect_names(&mut names);
        names
    };

    for def in &result.definitions {
        let wire = &def.name.wire;
        check(&def.imports, format!("imports of {wire}"))?;
        match &def.kind {
            DefinitionKind::Object { fields } => {
                for field in fields {
                    check(&names_in(&field.type_ref), format!("{wire}.{}", field.wire_name))?;
                }
            }
            DefinitionKind::Alias { target } => check(&names_in(target), wire.clone())?,
            DefinitionKind::LiteralSet { .. } => {}
        }
    }

    for group in &result.client.groups {
        check(&group.imports, format!("imports of {}", group.path))?;
        for op in &group.operations {
            let location = format!("{} {}", op.method.as_str(), op.path);
            check(&op.imports, format!("imports of {location}"))?;
            for arg in &op.signature {
                if arg.kind != ArgumentKind::Headers {
                    check(&names_in(&arg.type_ref), format!("{location} argument {}", arg.name))?;
                }
            }
            if let Some(Payload::Typed(name)) = op.request_body.as_ref().map(|b| &b.payload) {
                check(&ImportSet::from([name.clone()]), format!("{location} request body"))?;
            }
            if let Some(name) = op.response.shape.type_name() {
                check(&ImportSet::from([name.clone()]), format!("{location} response"))?;
            }
        }
    }

    check(&result.client.imports, "client imports".to_string())
}
