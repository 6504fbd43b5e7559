//! Turning fetched parameters into environment entries
//!
//! Every parameter value is a JSON object; each member is one variable.
//! String members are used verbatim, numbers and booleans by their JSON
//! text. Anything else is rejected, naming the offending parameter.

use std::fmt;

use serde_json::Value;

use crate::errors::{Result, SsmEnvError};
use crate::store::Parameter;

/// One `KEY=VALUE` variable
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvEntry {
    pub key: String,
    pub value: String,
}

impl EnvEntry {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for EnvEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.key, self.value)
    }
}

/// Non-empty, no `=` and no NUL, the limits the OS imposes
fn is_valid_key(key: &str) -> bool {
    !key.is_empty() && !key.contains('=') && !key.contains('\0')
}

fn decode_error(parameter: &Parameter, message: impl Into<String>) -> SsmEnvError {
    SsmEnvError::Decode {
        name: parameter.name.clone(),
        message: message.into(),
    }
}

fn render_value(parameter: &Parameter, key: &str, value: &Value) -> Result<String> {
    let rendered = match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => {
            return Err(decode_error(
                parameter,
                format!("key `{}` must be a string, number or boolean", key),
            ));
        }
    };

    if rendered.contains('\0') {
        return Err(decode_error(parameter, format!("key `{}` contains a NUL byte", key)));
    }
    Ok(rendered)
}

/// Decode the JSON object held by one parameter
pub fn entries_from_parameter(parameter: &Parameter) -> Result<Vec<EnvEntry>> {
    let object = match serde_json::from_str::<Value>(&parameter.value) {
        Ok(Value::Object(object)) => object,
        Ok(_) => return Err(decode_error(parameter, "expected a JSON object")),
        Err(e) => return Err(decode_error(parameter, format!("invalid JSON: {}", e))),
    };

    object
        .iter()
        .map(|(key, value)| {
            if !is_valid_key(key) {
                return Err(decode_error(parameter, format!("`{}` is not a valid variable name", key)));
            }
            Ok(EnvEntry::new(key.clone(), render_value(parameter, key, value)?))
        })
        .collect()
}

/// Decode every parameter, in order. Later keys override earlier ones.
pub fn entries_from_parameters(parameters: &[Parameter]) -> Result<Vec<EnvEntry>> {
    let mut entries = Vec::new();
    for parameter in parameters {
        let decoded = entries_from_parameter(parameter)?;
        entries = merge(entries, decoded);
    }
    Ok(entries)
}

/// Apply `overrides` on top of `base`.
///
/// An overridden key keeps its original position; new keys are appended.
pub fn merge(mut base: Vec<EnvEntry>, overrides: Vec<EnvEntry>) -> Vec<EnvEntry> {
    for entry in overrides {
        match base.iter_mut().find(|e| e.key == entry.key) {
            Some(existing) => existing.value = entry.value,
            None => base.push(entry),
        }
    }
    base
}

/// The current process environment. Non-UTF-8 variables are skipped.
pub fn inherited() -> Vec<EnvEntry> {
    std::env::vars_os()
        .filter_map(|(key, value)| Some(EnvEntry::new(key.into_string().ok()?, value.into_string().ok()?)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn param(name: &str, value: &str) -> Parameter {
        Parameter::new(name, value)
    }

    fn rendered(entries: &[EnvEntry]) -> Vec<String> {
        entries.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_entry_display_keeps_value_verbatim() {
        let entry = EnvEntry::new("DATABASE_URL", "postgres://u:p@h/db?sslmode=require");
        assert_eq!(entry.to_string(), "DATABASE_URL=postgres://u:p@h/db?sslmode=require");
        assert_eq!(EnvEntry::new("EMPTY", "").to_string(), "EMPTY=");
    }

    #[test]
    fn test_object_members_in_document_order() {
        let entries =
            entries_from_parameter(&param("/app", r#"{"B":"2","A":"1","PORT":8080,"DEBUG":true}"#))
                .unwrap();
        assert_eq!(rendered(&entries), vec!["B=2", "A=1", "PORT=8080", "DEBUG=true"]);
    }

    #[test]
    fn test_non_object_value_is_rejected() {
        let err = entries_from_parameter(&param("/plain", "hunter2")).unwrap_err();
        match err {
            SsmEnvError::Decode { name, message } => {
                assert_eq!(name, "/plain");
                assert!(message.starts_with("invalid JSON"));
            }
            other => panic!("unexpected error: {:?}", other),
        }

        let err = entries_from_parameter(&param("/list", r#"["a","b"]"#)).unwrap_err();
        assert!(err.to_string().contains("expected a JSON object"));
    }

    #[test]
    fn test_nested_value_is_rejected() {
        let err = entries_from_parameter(&param("/nested", r#"{"A":{"B":"c"}}"#)).unwrap_err();
        assert!(err.to_string().contains("`/nested`"));
        assert!(err.to_string().contains("key `A`"));

        assert!(entries_from_parameter(&param("/null", r#"{"A":null}"#)).is_err());
    }

    #[test]
    fn test_invalid_key_is_rejected() {
        assert!(entries_from_parameter(&param("/k", r#"{"A=B":"c"}"#)).is_err());
        assert!(entries_from_parameter(&param("/k", r#"{"":"c"}"#)).is_err());
    }

    #[test]
    fn test_later_parameters_override() {
        let entries = entries_from_parameters(&[
            param("/base", r#"{"A":"1","B":"1"}"#),
            param("/prod", r#"{"B":"2","C":"2"}"#),
        ])
        .unwrap();
        assert_eq!(rendered(&entries), vec!["A=1", "B=2", "C=2"]);
    }

    #[test]
    fn test_no_parameters() {
        assert!(entries_from_parameters(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_merge_keeps_position() {
        let merged = merge(
            vec![EnvEntry::new("PATH", "/bin"), EnvEntry::new("HOME", "/root")],
            vec![EnvEntry::new("PATH", "/usr/bin"), EnvEntry::new("TOKEN", "t")],
        );
        assert_eq!(rendered(&merged), vec!["PATH=/usr/bin", "HOME=/root", "TOKEN=t"]);
    }

    #[test]
    fn test_inherited_sees_process_environment() {
        let inherited = inherited();
        let expected = std::env::vars_os().filter(|(k, v)| k.to_str().is_some() && v.to_str().is_some()).count();
        assert_eq!(inherited.len(), expected);
    }
}
