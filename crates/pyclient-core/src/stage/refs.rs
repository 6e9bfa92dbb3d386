use std::collections::HashSet;

use indexmap::IndexMap;

use crate::error::ResolveError;
use crate::parse::MaybeRef;
use crate::parse::document::Components;
use crate::parse::operation::{Parameter, RequestBody, Response};

/// Looks up `$ref` targets in `components`.
///
/// Parameter, request body and response references are inlined: they never
/// recurse. Schema references are only checked for existence.
pub struct ComponentLookup<'a> {
    components: Option<&'a Components>,
}

impl<'a> ComponentLookup<'a> {
    pub fn new(components: Option<&'a Components>) -> Self {
        Self { components }
    }

    /// Resolve a schema `$ref` to the component schema name it points at.
    pub fn schema_name(&self, reference: &str, location: &str) -> Result<String, ResolveError> {
        let name = parse_ref_name(reference, "schemas")?;
        let exists = self
            .components
            .is_some_and(|c| c.schemas.contains_key(name.as_str()));
        if !exists {
            return Err(unresolvable(reference, location));
        }
        Ok(name)
    }

    pub fn parameter(
        &self,
        node: &'a MaybeRef<Parameter>,
        location: &str,
    ) -> Result<&'a Parameter, ResolveError> {
        follow(node, "parameters", self.components.map(|c| &c.parameters), location)
    }

    pub fn request_body(
        &self,
        node: &'a MaybeRef<RequestBody>,
        location: &str,
    ) -> Result<&'a RequestBody, ResolveError> {
        follow(node, "requestBodies", self.components.map(|c| &c.request_bodies), location)
    }

    pub fn response(
        &self,
        node: &'a MaybeRef<Response>,
        location: &str,
    ) -> Result<&'a Response, ResolveError> {
        follow(node, "responses", self.components.map(|c| &c.responses), location)
    }
}

/// Chase a chain of `$ref`s through one components section. A chain that loops
/// back on itself never reaches an object and is unresolvable.
fn follow<'a, T>(
    node: &'a MaybeRef<T>,
    section: &str,
    table: Option<&'a IndexMap<String, MaybeRef<T>>>,
    location: &str,
) -> Result<&'a T, ResolveError> {
    let mut seen = HashSet::new();
    let mut current = node;
    loop {
        match current {
            MaybeRef::Item(item) => return Ok(item),
            MaybeRef::Ref { reference } => {
                if !seen.insert(reference.as_str()) {
                    return Err(unresolvable(reference, location));
                }
                let name = parse_ref_name(reference, section)?;
                current = table
                    .and_then(|t| t.get(name.as_str()))
                    .ok_or_else(|| unresolvable(reference, location))?;
            }
        }
    }
}

fn unresolvable(reference: &str, location: &str) -> ResolveError {
    ResolveError::UnresolvableReference {
        reference: reference.to_string(),
        location: location.to_string(),
    }
}

/// Extract the component name from a local pointer such as `#/components/schemas/Foo`,
/// undoing JSON pointer escapes.
pub fn parse_ref_name(reference: &str, expected_section: &str) -> Result<String, ResolveError> {
    let invalid = || ResolveError::InvalidRefFormat(reference.to_string());
    let (section, name) = reference
        .strip_prefix("#/components/")
        .and_then(|rest| rest.split_once('/'))
        .ok_or_else(invalid)?;
    if section != expected_section {
        return Err(ResolveError::InvalidRefFormat(format!(
            "{reference} (expected a pointer into components.{expected_section})"
        )));
    }
    if name.is_empty() || name.contains('/') {
        return Err(invalid());
    }
    Ok(name.replace("~1", "/").replace("~0", "~"))
}
