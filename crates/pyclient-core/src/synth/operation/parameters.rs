use crate::descriptor::{AssemblyEntry, ParameterDescriptor, ParameterLocation, Primitive, TypeRef};
use crate::error::SynthesisError;
use crate::naming::{NameScope, SIGNATURE_RESERVED, escape_reserved_with, normalize_identifier};
use crate::resolve::resolve_optional;
use crate::stage::{ParameterSpec, SchemaSpec, is_structural};
use indexmap::IndexMap;

/// The parameter part of an operation, partitioned by location.
#[derive(Debug, Default)]
pub struct ResolvedParameters {
    /// Required parameters first, then optional ones; declaration order otherwise.
    pub parameters: Vec<ParameterDescriptor>,
    pub request_path: String,
    pub query: Vec<AssemblyEntry>,
    pub header: Vec<AssemblyEntry>,
    pub cookie: Vec<AssemblyEntry>,
}

/// `schemas` decides whether a reference-typed parameter is spread: only object
/// schemas have a field set to spread.
pub fn resolve_parameters(
    path: &str,
    specs: &[ParameterSpec],
    schemas: &IndexMap<String, SchemaSpec>,
    scope: &mut NameScope,
) -> Result<ResolvedParameters, SynthesisError> {
    let mut resolved = ResolvedParameters {
        request_path: path.to_string(),
        ..Default::default()
    };
    let mut descriptors = Vec::with_capacity(specs.len());

    for spec in specs {
        let target_name = escape_reserved_with(&normalize_identifier(&spec.name), SIGNATURE_RESERVED);
        scope.claim(&format!("{} parameter {}", location_label(spec.location), spec.name), &target_name)?;

        let base = resolve_optional(spec.schema.as_ref());
        let type_ref = if spec.required { base } else { base.optional() };
        let spread = spec
            .schema
            .as_ref()
            .and_then(|s| s.as_reference())
            .is_some_and(|name| is_structural(schemas, name));

        let entry = if spread {
            AssemblyEntry::Spread {
                argument: target_name.clone(),
                required: spec.required,
            }
        } else {
            AssemblyEntry::Pair {
                wire_name: spec.name.clone(),
                argument: target_name.clone(),
                required: spec.required,
            }
        };
        match spec.location {
            ParameterLocation::Path => {
                resolved.request_path = resolved
                    .request_path
                    .replace(&format!("{{{}}}", spec.name), &format!("{{{target_name}}}"));
            }
            ParameterLocation::Query => resolved.query.push(entry),
            ParameterLocation::Header => resolved.header.push(entry),
            ParameterLocation::Cookie => resolved.cookie.push(entry),
        }

        descriptors.push(ParameterDescriptor {
            wire_name: spec.name.clone(),
            target_name,
            location: spec.location,
            type_ref,
            required: spec.required,
            description: spec.description.clone(),
        });
    }

    // A template variable nobody declared still has to be filled in by the caller.
    for variable in undeclared_path_variables(path, specs) {
        let target_name = escape_reserved_with(&normalize_identifier(&variable), SIGNATURE_RESERVED);
        scope.claim(&format!("path parameter {variable}"), &target_name)?;
        resolved.request_path = resolved
            .request_path
            .replace(&format!("{{{variable}}}"), &format!("{{{target_name}}}"));
        descriptors.push(ParameterDescriptor {
            wire_name: variable,
            target_name,
            location: ParameterLocation::Path,
            type_ref: TypeRef::Primitive(Primitive::String),
            required: true,
            description: None,
        });
    }

    let (required, optional): (Vec<_>, Vec<_>) = descriptors.into_iter().partition(|p| p.required);
    resolved.parameters = required.into_iter().chain(optional).collect();
    Ok(resolved)
}

fn undeclared_path_variables(path: &str, specs: &[ParameterSpec]) -> Vec<String> {
    path.split('{')
        .skip(1)
        .filter_map(|rest| rest.split_once('}').map(|(name, _)| name))
        .filter(|name| {
            !specs
                .iter()
                .any(|s| s.location == ParameterLocation::Path && s.name == *name)
        })
        .map(str::to_string)
        .collect()
}

fn location_label(location: ParameterLocation) -> &'static str {
    match location {
        ParameterLocation::Path => "path",
        ParameterLocation::Query => "query",
        ParameterLocation::Header => "header",
        ParameterLocation::Cookie => "cookie",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stage::SchemaShape;

    fn param(name: &str, location: ParameterLocation, required: bool, schema: Option<SchemaSpec>) -> ParameterSpec {
        ParameterSpec {
            name: name.to_string(),
            location,
            required,
            description: None,
            schema,
        }
    }

    fn string() -> Option<SchemaSpec> {
        Some(SchemaSpec {
            shape: SchemaShape::Primitive(Primitive::String),
            meta: Default::default(),
        })
    }

    #[test]
    fn test_path_parameter_substitution() {
        let specs = [param("itemId", ParameterLocation::Path, true, string())];
        let mut scope = NameScope::new("arguments");
        let resolved = resolve_parameters("/items/{itemId}", &specs, &IndexMap::new(), &mut scope).unwrap();
        assert_eq!(resolved.request_path, "/items/{item_id}");
        assert_eq!(resolved.parameters[0].target_name, "item_id");
        assert!(resolved.parameters[0].required);
        assert!(resolved.query.is_empty());
    }

    #[test]
    fn test_required_parameters_come_first() {
        let specs = [
            param("q", ParameterLocation::Query, false, string()),
            param("X-Trace", ParameterLocation::Header, true, string()),
            param("page", ParameterLocation::Query, true, None),
        ];
        let mut scope = NameScope::new("arguments");
        let resolved = resolve_parameters("/search", &specs, &IndexMap::new(), &mut scope).unwrap();
        let names: Vec<_> = resolved.parameters.iter().map(|p| p.target_name.as_str()).collect();
        assert_eq!(names, vec!["x_trace", "page", "q"]);
        assert_eq!(resolved.parameters[1].type_ref, TypeRef::Any);
        assert_eq!(resolved.parameters[2].type_ref, TypeRef::Primitive(Primitive::String).optional());
        assert_eq!(
            resolved.header,
            vec![AssemblyEntry::Pair {
                wire_name: "X-Trace".to_string(),
                argument: "x_trace".to_string(),
                required: true,
            }]
        );
    }

    #[test]
    fn test_reference_parameter_is_spread() {
        let mut schemas = IndexMap::new();
        schemas.insert(
            "Filter".to_string(),
            SchemaSpec {
                shape: SchemaShape::Object {
                    properties: IndexMap::new(),
                    required: vec![],
                },
                meta: Default::default(),
            },
        );
        schemas.insert(
            "Status".to_string(),
            SchemaSpec {
                shape: SchemaShape::Enum {
                    literals: vec!["open".into()],
                },
                meta: Default::default(),
            },
        );
        let specs = [
            param("filter", ParameterLocation::Query, false, Some(SchemaSpec::reference("Filter"))),
            param("status", ParameterLocation::Query, true, Some(SchemaSpec::reference("Status"))),
        ];
        let mut scope = NameScope::new("arguments");
        let resolved = resolve_parameters("/search", &specs, &schemas, &mut scope).unwrap();
        assert_eq!(
            resolved.query,
            vec![
                AssemblyEntry::Spread {
                    argument: "filter".to_string(),
                    required: false,
                },
                AssemblyEntry::Pair {
                    wire_name: "status".to_string(),
                    argument: "status".to_string(),
                    required: true,
                },
            ]
        );
    }

    #[test]
    fn test_signature_names_are_escaped() {
        let specs = [
            param("headers", ParameterLocation::Query, false, string()),
            param("from", ParameterLocation::Query, false, string()),
        ];
        let mut scope = NameScope::new("arguments");
        let resolved = resolve_parameters("/", &specs, &IndexMap::new(), &mut scope).unwrap();
        let names: Vec<_> = resolved.parameters.iter().map(|p| p.target_name.as_str()).collect();
        assert_eq!(names, vec!["headers_", "from_"]);
    }

    #[test]
    fn test_undeclared_path_variable_becomes_required_string() {
        let mut scope = NameScope::new("arguments");
        let resolved = resolve_parameters("/users/{userId}/posts", &[], &IndexMap::new(), &mut scope).unwrap();
        assert_eq!(resolved.request_path, "/users/{user_id}/posts");
        assert_eq!(resolved.parameters.len(), 1);
        assert_eq!(resolved.parameters[0].type_ref, TypeRef::Primitive(Primitive::String));
    }

    #[test]
    fn test_colliding_parameters() {
        let specs = [
            param("page-size", ParameterLocation::Query, false, string()),
            param("page_size", ParameterLocation::Query, false, string()),
        ];
        let mut scope = NameScope::new("arguments");
        assert!(matches!(
            resolve_parameters("/", &specs, &IndexMap::new(), &mut scope),
            Err(SynthesisError::NamingCollision { .. })
        ));
    }
}
