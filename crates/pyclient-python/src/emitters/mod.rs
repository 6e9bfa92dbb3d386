pub mod client;
pub mod endpoints;
pub mod schemas;
pub mod support;

use minijinja::Environment;

use crate::error::GeneratorError;

const TEMPLATES: &[(&str, &str)] = &[
    ("base_schema.py.j2", include_str!("../../templates/base_schema.py.j2")),
    ("client.py.j2", include_str!("../../templates/client.py.j2")),
    ("endpoint.py.j2", include_str!("../../templates/endpoint.py.j2")),
    ("package_init.py.j2", include_str!("../../templates/package_init.py.j2")),
    ("request_base.py.j2", include_str!("../../templates/request_base.py.j2")),
    ("schema_alias.py.j2", include_str!("../../templates/schema_alias.py.j2")),
    ("schema_literal.py.j2", include_str!("../../templates/schema_literal.py.j2")),
    ("schema_object.py.j2", include_str!("../../templates/schema_object.py.j2")),
    ("schemas_init.py.j2", include_str!("../../templates/schemas_init.py.j2")),
    ("utils_init.py.j2", include_str!("../../templates/utils_init.py.j2")),
];

/// Escape sequences that would end a Python docstring early or start an escape.
///
/// A trailing `"` is escaped as well, since it would merge with the closing quotes.
fn escape_docstring(value: String) -> String {
    let (body, trailing_quote) = match value.strip_suffix('"') {
        Some(body) => (body, true),
        None => (value.as_str(), false),
    };
    let mut escaped = body.replace('\\', "\\\\").replace("\"\"\"", "\\\"\\\"\\\"");
    if trailing_quote {
        escaped.push_str("\\\"");
    }
    escaped
}

/// Continue a `#` comment over every line of `value`.
fn comment(value: String) -> String {
    value.trim_end().replace('\n', "\n# ")
}

/// Shared template environment with every template and filter registered.
pub fn environment() -> Result<Environment<'static>, GeneratorError> {
    let mut env = Environment::new();
    env.set_trim_blocks(true);
    env.set_lstrip_blocks(true);
    env.set_keep_trailing_newline(true);
    env.add_filter("escape_docstring", escape_docstring);
    env.add_filter("comment", comment);
    for &(name, source) in TEMPLATES {
        env.add_template(name, source)
            .map_err(|err| GeneratorError::Render {
                template: name,
                source: err,
            })?;
    }
    Ok(env)
}

/// Render template `name` with `ctx`.
pub fn render(
    env: &Environment<'_>,
    name: &'static str,
    ctx: minijinja::Value,
) -> Result<String, GeneratorError> {
    env.get_template(name)
        .and_then(|tmpl| tmpl.render(ctx))
        .map_err(|source| GeneratorError::Render {
            template: name,
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_template_compiles() {
        let env = environment().unwrap();
        for (name, _) in TEMPLATES {
            assert!(env.get_template(name).is_ok(), "{name}");
        }
    }

    #[test]
    fn test_escape_docstring() {
        assert_eq!(escape_docstring(r#"a """ b"#.to_string()), r#"a \"\"\" b"#);
        assert_eq!(escape_docstring(r"C:\path".to_string()), r"C:\\path");
    }

    #[test]
    fn test_escape_docstring_trailing_quote() {
        assert_eq!(
            escape_docstring(r#"A widget called "thing""#.to_string()),
            r#"A widget called "thing\""#
        );
        assert_eq!(escape_docstring(r#"ends in """#.to_string()), r#"ends in ""\""#);
        assert_eq!(escape_docstring(r#"x\""#.to_string()), r#"x\\\""#);
    }

    #[test]
    fn test_comment() {
        assert_eq!(comment("one\ntwo\n".to_string()), "one\n# two");
    }
}
