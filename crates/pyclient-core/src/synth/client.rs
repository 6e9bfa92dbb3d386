use log::debug;

use crate::descriptor::{ClientDescriptor, EndpointGroup, ImportSet, TypeDefinition};
use crate::error::SynthesisError;
use crate::naming::{NameScope, capitalized_form, escape_reserved_with, path_identifier};
use crate::stage::{OperationSpec, SchemaSpec};
use indexmap::IndexMap;

use super::operation::synthesize_operation;

/// Attributes the client facade sets on itself besides its endpoint groups.
const FACADE_RESERVED: &[&str] = &["base_url", "headers", "timeout"];

/// Build the Endpoint Group for every operation under `path`.
pub fn synthesize_group(
    path: &str,
    operations: &[OperationSpec],
    schemas: &IndexMap<String, SchemaSpec>,
    groups: &mut NameScope,
) -> Result<EndpointGroup, SynthesisError> {
    let identifier = path_identifier(path);
    let attribute_name = escape_reserved_with(&identifier, FACADE_RESERVED);
    let class_name = format!("{}Endpoint", capitalized_form(&identifier));
    groups.claim(path, &attribute_name)?;
    groups.claim(path, &class_name)?;

    let operations = operations
        .iter()
        .map(|op| synthesize_operation(path, op, schemas))
        .collect::<Result<Vec<_>, _>>()?;
    let imports: ImportSet = operations
        .iter()
        .flat_map(|op| op.imports.iter().cloned())
        .collect();
    debug!(
        "group {attribute_name}: {} operation(s), {} import(s)",
        operations.len(),
        imports.len()
    );

    Ok(EndpointGroup {
        path: path.to_string(),
        module_name: format!("{identifier}_endpoint"),
        attribute_name,
        class_name,
        operations,
        imports,
    })
}

/// Root aggregate. The merged import set is ordered, so identical input always yields
/// the same import list.
pub fn synthesize_client(
    title: &str,
    version: &str,
    description: Option<&str>,
    base_url: Option<String>,
    groups: Vec<EndpointGroup>,
    definitions: &[TypeDefinition],
) -> ClientDescriptor {
    let imports = definitions
        .iter()
        .flat_map(|d| d.imports.iter())
        .chain(groups.iter().flat_map(|g| g.imports.iter()))
        .cloned()
        .collect();
    ClientDescriptor {
        title: title.to_string(),
        version: version.to_string(),
        description: description.map(str::to_string),
        base_url,
        groups,
        imports,
    }
}
