//! Canonicalization of wire identifiers into Python identifiers.
//!
//! Every target name in the generated tree is derived here: field and argument
//! names (`snake_case`), class names (`PascalCase`), module names and endpoint
//! attributes. [`NameScope`] turns the lossy part of that mapping into a hard
//! error instead of a silent overwrite.

use std::collections::HashMap;

use heck::{ToPascalCase, ToSnakeCase};

use crate::descriptor::TypeName;
use crate::error::SynthesisError;

/// Python hard keywords. Soft keywords (`match`, `case`, `type`) are valid identifiers.
const PYTHON_KEYWORDS: &[&str] = &[
    "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class",
    "continue", "def", "del", "elif", "else", "except", "finally", "for", "from", "global",
    "if", "import", "in", "is", "lambda", "nonlocal", "not", "or", "pass", "raise", "return",
    "try", "while", "with", "yield",
];

/// Builtins the generated modules annotate with; a field of the same name would shadow them.
const SHADOWED_BUILTINS: &[&str] = &["bool", "float", "int", "str"];

/// Word put in front of identifiers that would otherwise start with a digit.
const DIGIT_PREFIX: &str = "field";

/// Arguments every generated endpoint method declares on its own.
pub const SIGNATURE_RESERVED: &[&str] = &["self", "headers", "content_type", "request_body"];

/// Normalize a wire identifier into `snake_case`.
///
/// Separators are inserted at lower→upper and upper-run→lower transitions, everything
/// is lower-cased and runs of punctuation or whitespace collapse into a single `_`.
/// Total and idempotent: input without alphanumerics becomes `unnamed`, and a leading
/// digit gets a `field_` prefix. Pydantic treats `_`-prefixed attributes as private,
/// so the result never starts with an underscore.
pub fn normalize_identifier(raw: &str) -> String {
    let snake = raw.to_snake_case();
    if snake.is_empty() {
        "unnamed".to_string()
    } else if snake.starts_with(|c: char| c.is_ascii_digit()) {
        format!("{DIGIT_PREFIX}_{snake}")
    } else {
        snake
    }
}

/// Normalize, then join the capitalized words without separator (class names).
pub fn capitalized_form(raw: &str) -> String {
    normalize_identifier(raw).to_pascal_case()
}

/// Identifiers of the Type Definition generated for component schema `wire`.
pub fn type_name(wire: &str) -> TypeName {
    TypeName {
        wire: wire.to_string(),
        class_name: format!("{}Schema", capitalized_form(wire)),
        module_name: format!("{}_schema", normalize_identifier(wire)),
    }
}

/// Identifier for a path template. `/` and other separator-only paths map to `root`.
pub fn path_identifier(path: &str) -> String {
    if path.chars().any(char::is_alphanumeric) {
        normalize_identifier(path)
    } else {
        "root".to_string()
    }
}

/// Append `_` to a Python reserved word until it no longer is one.
pub fn escape_reserved(identifier: &str) -> String {
    escape_reserved_with(identifier, &[])
}

/// Like [`escape_reserved`], with additional names reserved by the caller's context.
pub fn escape_reserved_with(identifier: &str, extra: &[&str]) -> String {
    let is_reserved = |candidate: &str| {
        PYTHON_KEYWORDS.contains(&candidate)
            || SHADOWED_BUILTINS.contains(&candidate)
            || extra.contains(&candidate)
    };
    let mut escaped = identifier.to_string();
    while is_reserved(&escaped) {
        escaped.push('_');
    }
    escaped
}

/// The wire name to keep as an explicit alias when normalization changed it.
pub fn resolve_alias(original: &str, normalized: &str) -> Option<String> {
    (original != normalized).then(|| original.to_string())
}

/// Default docstring summary for an operation without one.
pub fn route_summary(path: &str, method: &str) -> String {
    format!("Calls endpoint `{path}` as method `{method}`.")
}

/// Registry of target identifiers claimed within one namespace.
#[derive(Debug)]
pub struct NameScope {
    label: String,
    claimed: HashMap<String, String>,
}

impl NameScope {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            claimed: HashMap::new(),
        }
    }

    /// Claim `target` for the wire identifier `wire`.
    ///
    /// Claiming the same pair twice is a no-op; a different wire identifier on an
    /// already claimed target is a [`SynthesisError::NamingCollision`].
    pub fn claim(&mut self, wire: &str, target: &str) -> Result<(), SynthesisError> {
        match self.claimed.get(target) {
            Some(existing) if existing != wire => Err(SynthesisError::NamingCollision {
                scope: self.label.clone(),
                first: existing.clone(),
                second: wire.to_string(),
                target: target.to_string(),
            }),
            Some(_) => Ok(()),
            None => {
                self.claimed.insert(target.to_string(), wire.to_string());
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLES: &[&str] = &[
        "itemId",
        "PascalCase",
        "HTTPValidationError",
        "user--id__x",
        "/items/{itemId}",
        "already_canonical",
        "X-Request-ID",
        "3dModel",
        "2fa",
        "",
        "---",
        "v2Items",
        "from",
    ];

    #[test]
    fn test_normalize_identifier_cases() {
        assert_eq!(normalize_identifier("itemId"), "item_id");
        assert_eq!(normalize_identifier("PascalCase"), "pascal_case");
        assert_eq!(normalize_identifier("HTTPValidationError"), "http_validation_error");
        assert_eq!(normalize_identifier("user--id__x"), "user_id_x");
        assert_eq!(normalize_identifier("/items/{itemId}"), "items_item_id");
        assert_eq!(normalize_identifier("already_canonical"), "already_canonical");
        assert_eq!(normalize_identifier("X-Request-ID"), "x_request_id");
    }

    #[test]
    fn test_normalize_identifier_is_total() {
        assert_eq!(normalize_identifier(""), "unnamed");
        assert_eq!(normalize_identifier("---"), "unnamed");
        assert_eq!(normalize_identifier("3dModel"), "field_3d_model");
        assert_eq!(normalize_identifier("2fa"), "field_2fa");
        assert_eq!(capitalized_form("3dModel"), "Field3dModel");
    }

    #[test]
    fn test_normalize_identifier_never_leads_with_underscore() {
        for sample in SAMPLES.iter().chain(&["_private", "__dunder__", "42", "-1"]) {
            let normalized = normalize_identifier(sample);
            assert!(!normalized.starts_with('_'), "{sample:?} -> {normalized:?}");
            assert!(!normalized.starts_with(|c: char| c.is_ascii_digit()));
        }
    }

    #[test]
    fn test_normalize_identifier_is_idempotent() {
        for sample in SAMPLES {
            let once = normalize_identifier(sample);
            assert_eq!(normalize_identifier(&once), once, "not idempotent for {sample:?}");
        }
    }

    #[test]
    fn test_capitalized_form() {
        assert_eq!(capitalized_form("item_create"), "ItemCreate");
        assert_eq!(capitalized_form("HTTPValidationError"), "HttpValidationError");
        assert_eq!(capitalized_form("/items/{itemId}"), "ItemsItemId");
    }

    #[test]
    fn test_type_name() {
        let name = type_name("HTTPValidationError");
        assert_eq!(name.class_name, "HttpValidationErrorSchema");
        assert_eq!(name.module_name, "http_validation_error_schema");
        assert_eq!(name.wire, "HTTPValidationError");
    }

    #[test]
    fn test_path_identifier_root() {
        assert_eq!(path_identifier("/"), "root");
        assert_eq!(path_identifier("/cart/items"), "cart_items");
    }

    #[test]
    fn test_escape_reserved() {
        assert_eq!(escape_reserved("from"), "from_");
        assert_eq!(escape_reserved("class"), "class_");
        assert_eq!(escape_reserved("type"), "type");
        assert_eq!(escape_reserved("item"), "item");
        assert_eq!(escape_reserved_with("headers", SIGNATURE_RESERVED), "headers_");
        assert_eq!(escape_reserved_with("self", SIGNATURE_RESERVED), "self_");
    }

    #[test]
    fn test_escape_reserved_never_yields_a_reserved_word() {
        for keyword in PYTHON_KEYWORDS.iter().chain(SHADOWED_BUILTINS) {
            let escaped = escape_reserved(keyword);
            assert!(!PYTHON_KEYWORDS.contains(&escaped.as_str()));
            assert!(!SHADOWED_BUILTINS.contains(&escaped.as_str()));
        }
    }

    #[test]
    fn test_resolve_alias() {
        assert_eq!(resolve_alias("PascalCase", "pascal_case"), Some("PascalCase".to_string()));
        assert_eq!(resolve_alias("from", "from_"), Some("from".to_string()));
        assert_eq!(resolve_alias("name", "name"), None);
    }

    #[test]
    fn test_scope_detects_collision() {
        let mut scope = NameScope::new("fields of User");
        scope.claim("user-id", "user_id").unwrap();
        scope.claim("user-id", "user_id").unwrap();
        let err = scope.claim("user_id", "user_id").unwrap_err();
        match err {
            SynthesisError::NamingCollision {
                first,
                second,
                target,
                ..
            } => {
                assert_eq!(first, "user-id");
                assert_eq!(second, "user_id");
                assert_eq!(target, "user_id");
            }
            other => panic!("expected NamingCollision, got {other:?}"),
        }
    }

    #[test]
    fn test_route_summary() {
        assert_eq!(
            route_summary("/items", "get"),
            "Calls endpoint `/items` as method `get`."
        );
    }
}
