use std::collections::BTreeSet;

use pyclient_core::descriptor::{Primitive, TypeRef};
use serde_json::Value;

/// Map a [`TypeRef`] to its Python annotation.
pub fn python_type(ty: &TypeRef) -> String {
    match ty {
        TypeRef::Primitive(primitive) => primitive_type(*primitive).to_string(),
        TypeRef::List(inner) => format!("List[{}]", python_type(inner)),
        TypeRef::Named(name) => name.class_name.clone(),
        TypeRef::Literal(values) => {
            let values: Vec<String> = values.iter().map(python_literal).collect();
            format!("Literal[{}]", values.join(", "))
        }
        TypeRef::Optional(inner) => format!("Optional[{}]", python_type(inner)),
        TypeRef::Any => "Any".to_string(),
    }
}

pub fn primitive_type(primitive: Primitive) -> &'static str {
    match primitive {
        Primitive::String => "str",
        Primitive::Integer => "int",
        Primitive::Number => "float",
        Primitive::Boolean => "bool",
    }
}

/// Names `python_type(ty)` needs from `typing`.
pub fn typing_imports(ty: &TypeRef, out: &mut BTreeSet<&'static str>) {
    match ty {
        TypeRef::Primitive(_) | TypeRef::Named(_) => {}
        TypeRef::List(inner) => {
            out.insert("List");
            typing_imports(inner, out);
        }
        TypeRef::Literal(_) => {
            out.insert("Literal");
        }
        TypeRef::Optional(inner) => {
            out.insert("Optional");
            typing_imports(inner, out);
        }
        TypeRef::Any => {
            out.insert("Any");
        }
    }
}

/// Render a JSON value as a Python literal expression.
pub fn python_literal(value: &Value) -> String {
    match value {
        Value::Null => "None".to_string(),
        Value::Bool(true) => "True".to_string(),
        Value::Bool(false) => "False".to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => python_string(s),
        Value::Array(items) => {
            let items: Vec<String> = items.iter().map(python_literal).collect();
            format!("[{}]", items.join(", "))
        }
        Value::Object(map) => {
            let entries: Vec<String> = map
                .iter()
                .map(|(k, v)| format!("{}: {}", python_string(k), python_literal(v)))
                .collect();
            format!("{{{}}}", entries.join(", "))
        }
    }
}

/// A double-quoted Python string literal. JSON string escapes are valid Python escapes.
pub fn python_string(s: &str) -> String {
    Value::String(s.to_string()).to_string()
}
