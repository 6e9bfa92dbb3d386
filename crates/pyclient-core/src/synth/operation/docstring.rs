use crate::descriptor::{Docstring, HttpMethod};
use crate::naming::route_summary;

pub fn resolve_docstring(
    path: &str,
    method: HttpMethod,
    summary: Option<&str>,
    description: Option<&str>,
) -> Docstring {
    let non_blank = |text: Option<&str>| text.map(str::trim).filter(|t| !t.is_empty()).map(str::to_string);
    Docstring {
        summary: non_blank(summary).unwrap_or_else(|| route_summary(path, method.as_lower())),
        description: non_blank(description),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_summary() {
        let doc = resolve_docstring("/items", HttpMethod::Post, None, Some("  "));
        assert_eq!(doc.summary, "Calls endpoint `/items` as method `post`.");
        assert_eq!(doc.description, None);
    }

    #[test]
    fn test_declared_summary() {
        let doc = resolve_docstring("/items", HttpMethod::Get, Some("List items"), Some("Paged."));
        assert_eq!(doc.summary, "List items");
        assert_eq!(doc.description.as_deref(), Some("Paged."));
    }
}
