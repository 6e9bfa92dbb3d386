use crate::descriptor::{ResponseDescriptor, ResponseShape};
use crate::naming::type_name;
use crate::stage::{MediaSpec, ResponseSpec, SchemaShape, SchemaSpec};

/// Pick the response shape: the first 2xx response, in declaration order, that has a
/// content entry with a schema. Without one the body is returned undecoded.
pub fn resolve_response(responses: &[ResponseSpec]) -> ResponseDescriptor {
    let successes = || responses.iter().filter(|r| is_success(&r.status));

    for response in successes() {
        if let Some(MediaSpec {
            content_type,
            schema: Some(schema),
        }) = response.content.iter().find(|m| m.schema.is_some())
        {
            return ResponseDescriptor {
                status: Some(response.status.clone()),
                content_type: Some(content_type.clone()),
                shape: shape_of(schema),
                description: response.description.clone(),
            };
        }
    }

    let first = successes().next();
    ResponseDescriptor {
        status: first.map(|r| r.status.clone()),
        content_type: None,
        shape: ResponseShape::Untyped,
        description: first.and_then(|r| r.description.clone()),
    }
}

fn shape_of(schema: &SchemaSpec) -> ResponseShape {
    match &schema.shape {
        SchemaShape::Reference(name) => ResponseShape::Single(type_name(name)),
        SchemaShape::Array { items: Some(items) } => match items.as_reference() {
            Some(name) => ResponseShape::List(type_name(name)),
            None => ResponseShape::Untyped,
        },
        _ => ResponseShape::Untyped,
    }
}

/// `200`–`299`, or the `2XX` range key.
fn is_success(status: &str) -> bool {
    status.eq_ignore_ascii_case("2xx")
        || status
            .parse::<u16>()
            .is_ok_and(|code| (200..=299).contains(&code))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::DecodeStrategy;

    fn response(status: &str, schema: Option<SchemaSpec>) -> ResponseSpec {
        ResponseSpec {
            status: status.to_string(),
            description: None,
            content: vec![MediaSpec {
                content_type: "application/json".to_string(),
                schema,
            }],
        }
    }

    #[test]
    fn test_skips_non_success_statuses() {
        let responses = [
            response("404", Some(SchemaSpec::reference("NotFound"))),
            response("201", Some(SchemaSpec::reference("Widget"))),
        ];
        let resolved = resolve_response(&responses);
        assert_eq!(resolved.status.as_deref(), Some("201"));
        assert_eq!(resolved.shape, ResponseShape::Single(type_name("Widget")));
        assert_eq!(resolved.shape.decode_strategy(), DecodeStrategy::Instance);
    }

    #[test]
    fn test_array_of_reference_decodes_element_wise() {
        let list = SchemaSpec {
            shape: SchemaShape::Array {
                items: Some(Box::new(SchemaSpec::reference("Widget"))),
            },
            meta: Default::default(),
        };
        let resolved = resolve_response(&[response("200", Some(list))]);
        assert_eq!(resolved.shape, ResponseShape::List(type_name("Widget")));
        assert_eq!(resolved.shape.decode_strategy(), DecodeStrategy::ElementWise);
    }

    #[test]
    fn test_first_success_with_schema_wins() {
        let responses = [
            response("204", None),
            response("200", Some(SchemaSpec::untyped())),
            response("201", Some(SchemaSpec::reference("Widget"))),
        ];
        let resolved = resolve_response(&responses);
        assert_eq!(resolved.status.as_deref(), Some("200"));
        assert_eq!(resolved.shape.decode_strategy(), DecodeStrategy::Raw);
    }

    #[test]
    fn test_no_success_response() {
        let resolved = resolve_response(&[response("default", Some(SchemaSpec::reference("Error")))]);
        assert_eq!(resolved.status, None);
        assert_eq!(resolved.shape, ResponseShape::Untyped);
    }

    #[test]
    fn test_range_key_counts_as_success() {
        let resolved = resolve_response(&[response("2XX", Some(SchemaSpec::reference("Widget")))]);
        assert_eq!(resolved.shape, ResponseShape::Single(type_name("Widget")));
    }
}
