// src/validation.rs
//! Declarative shapes for request/response payloads.
//!
//! A [`Schema`] is checked against a `serde_json::Value` and every violation is
//! collected, so callers see the whole list of broken fields at once instead of
//! the first one serde trips over. The same declaration is rendered into the
//! provider's response schema for structured model calls.

use std::fmt;

use regex::Regex;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Map, Value, json};
use thiserror::Error;

use crate::models::DataUri;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IssueKind {
    Missing,
    WrongType {
        expected: &'static str,
        found: &'static str,
    },
    Blank,
    PatternMismatch {
        pattern: String,
    },
    NotAllowed {
        allowed: Vec<String>,
    },
    TooFewItems {
        min: usize,
        actual: usize,
    },
    MustBeEmpty {
        actual: usize,
    },
    ExpectedValue {
        expected: String,
    },
    InvalidDataUri,
    Malformed {
        detail: String,
    },
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IssueKind::Missing => write!(f, "required field is missing"),
            IssueKind::WrongType { expected, found } => {
                write!(f, "expected {expected}, found {found}")
            }
            IssueKind::Blank => write!(f, "must not be empty"),
            IssueKind::PatternMismatch { pattern } => write!(f, "does not match {pattern}"),
            IssueKind::NotAllowed { allowed } => {
                write!(f, "must be one of [{}]", allowed.join(", "))
            }
            IssueKind::TooFewItems { min, actual } => {
                write!(f, "needs at least {min} items, got {actual}")
            }
            IssueKind::MustBeEmpty { actual } => write!(f, "must be empty, got {actual} items"),
            IssueKind::ExpectedValue { expected } => write!(f, "must equal \"{expected}\""),
            IssueKind::InvalidDataUri => write!(f, "not a data:<mime>;base64,<payload> URI"),
            IssueKind::Malformed { detail } => write!(f, "malformed: {detail}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldIssue {
    pub path: String,
    #[serde(flatten)]
    pub kind: IssueKind,
}

impl FieldIssue {
    pub fn new(path: impl Into<String>, kind: IssueKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{}", summarize(.issues))]
pub struct ValidationError {
    issues: Vec<FieldIssue>,
}

fn summarize(issues: &[FieldIssue]) -> String {
    issues
        .iter()
        .map(|issue| format!("{}: {}", issue.path, issue.kind))
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationError {
    pub fn new(issues: Vec<FieldIssue>) -> Self {
        Self { issues }
    }

    pub fn issues(&self) -> &[FieldIssue] {
        &self.issues
    }

    pub fn has_issue_at(&self, path: &str) -> bool {
        self.issues.iter().any(|issue| issue.path == path)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringFormat {
    DataUri,
}

#[derive(Debug, Clone, Default)]
pub struct StringRule {
    pub non_blank: bool,
    pub pattern: Option<Regex>,
    pub one_of: &'static [&'static str],
    pub format: Option<StringFormat>,
}

impl StringRule {
    fn check(&self, text: &str, path: &str, issues: &mut Vec<FieldIssue>) {
        if self.non_blank && text.trim().is_empty() {
            issues.push(FieldIssue::new(path, IssueKind::Blank));
            return;
        }
        if !self.one_of.is_empty() && !self.one_of.contains(&text) {
            issues.push(FieldIssue::new(
                path,
                IssueKind::NotAllowed {
                    allowed: self.one_of.iter().map(|v| v.to_string()).collect(),
                },
            ));
        }
        if let Some(pattern) = &self.pattern {
            if !pattern.is_match(text) {
                issues.push(FieldIssue::new(
                    path,
                    IssueKind::PatternMismatch {
                        pattern: pattern.as_str().to_string(),
                    },
                ));
            }
        }
        if self.format == Some(StringFormat::DataUri) && DataUri::parse(text).is_none() {
            issues.push(FieldIssue::new(path, IssueKind::InvalidDataUri));
        }
    }
}

#[derive(Debug, Clone)]
pub struct Field {
    pub name: &'static str,
    pub schema: Schema,
    pub required: bool,
}

impl Field {
    pub fn required(name: &'static str, schema: Schema) -> Self {
        Self {
            name,
            schema,
            required: true,
        }
    }

    pub fn optional(name: &'static str, schema: Schema) -> Self {
        Self {
            name,
            schema,
            required: false,
        }
    }
}

#[derive(Debug, Clone)]
pub enum Schema {
    Str(StringRule),
    Array { items: Box<Schema>, min_items: usize },
    Object(Vec<Field>),
}

impl Schema {
    /// Any string, including an empty one.
    pub fn string() -> Self {
        Schema::Str(StringRule::default())
    }

    pub fn text() -> Self {
        Schema::Str(StringRule {
            non_blank: true,
            ..StringRule::default()
        })
    }

    pub fn matching(pattern: Regex) -> Self {
        Schema::Str(StringRule {
            non_blank: true,
            pattern: Some(pattern),
            ..StringRule::default()
        })
    }

    pub fn one_of(values: &'static [&'static str]) -> Self {
        Schema::Str(StringRule {
            non_blank: true,
            one_of: values,
            ..StringRule::default()
        })
    }

    pub fn data_uri() -> Self {
        Schema::Str(StringRule {
            non_blank: true,
            format: Some(StringFormat::DataUri),
            ..StringRule::default()
        })
    }

    pub fn array(items: Schema, min_items: usize) -> Self {
        Schema::Array {
            items: Box::new(items),
            min_items,
        }
    }

    pub fn object(fields: Vec<Field>) -> Self {
        Schema::Object(fields)
    }

    /// Renders the shape in the OpenAPI subset accepted as a model response schema.
    /// Regex and data URI constraints have no equivalent there and are enforced locally.
    pub fn to_response_schema(&self) -> Value {
        match self {
            Schema::Str(rule) => {
                let mut out = json!({ "type": "STRING" });
                if !rule.one_of.is_empty() {
                    out["enum"] = json!(rule.one_of);
                }
                out
            }
            Schema::Array { items, min_items } => {
                let mut out = json!({ "type": "ARRAY", "items": items.to_response_schema() });
                if *min_items > 0 {
                    out["minItems"] = json!(min_items);
                }
                out
            }
            Schema::Object(fields) => {
                let properties: Map<String, Value> = fields
                    .iter()
                    .map(|f| (f.name.to_string(), f.schema.to_response_schema()))
                    .collect();
                let required: Vec<&str> = fields
                    .iter()
                    .filter(|f| f.required)
                    .map(|f| f.name)
                    .collect();
                json!({
                    "type": "OBJECT",
                    "properties": properties,
                    "required": required,
                })
            }
        }
    }
}

/// Checks `value` against `schema`, reporting every violation. Never mutates the value.
pub fn validate(value: &Value, schema: &Schema) -> Result<(), ValidationError> {
    let mut issues = Vec::new();
    check_node(value, schema, "", &mut issues);
    if issues.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::new(issues))
    }
}

fn check_node(value: &Value, schema: &Schema, path: &str, issues: &mut Vec<FieldIssue>) {
    let here = if path.is_empty() { "$" } else { path };
    match schema {
        Schema::Str(rule) => match value.as_str() {
            Some(text) => rule.check(text, here, issues),
            None => issues.push(wrong_type(here, "string", value)),
        },
        Schema::Array { items, min_items } => {
            let Some(elements) = value.as_array() else {
                issues.push(wrong_type(here, "array", value));
                return;
            };
            if elements.len() < *min_items {
                issues.push(FieldIssue::new(
                    here,
                    IssueKind::TooFewItems {
                        min: *min_items,
                        actual: elements.len(),
                    },
                ));
            }
            for (index, element) in elements.iter().enumerate() {
                check_node(element, items, &format!("{here}[{index}]"), issues);
            }
        }
        Schema::Object(fields) => {
            let Some(map) = value.as_object() else {
                issues.push(wrong_type(here, "object", value));
                return;
            };
            for field in fields {
                let child = if path.is_empty() {
                    field.name.to_string()
                } else {
                    format!("{path}.{}", field.name)
                };
                match map.get(field.name) {
                    None | Some(Value::Null) => {
                        if field.required {
                            issues.push(FieldIssue::new(child, IssueKind::Missing));
                        }
                    }
                    Some(inner) => check_node(inner, &field.schema, &child, issues),
                }
            }
        }
    }
}

fn wrong_type(path: &str, expected: &'static str, value: &Value) -> FieldIssue {
    let found = match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    };
    FieldIssue::new(path, IssueKind::WrongType { expected, found })
}

/// A payload type bound to a declared shape.
pub trait Contract: Serialize + DeserializeOwned {
    fn schema() -> &'static Schema;

    /// Rules spanning several fields that a per-field shape cannot express.
    fn cross_field_issues(&self) -> Vec<FieldIssue> {
        Vec::new()
    }

    /// Validates a raw value and only then deserializes it.
    fn parse(value: Value) -> Result<Self, ValidationError> {
        validate(&value, Self::schema())?;
        let parsed: Self = serde_json::from_value(value).map_err(|e| {
            ValidationError::new(vec![FieldIssue::new(
                "$",
                IssueKind::Malformed {
                    detail: e.to_string(),
                },
            )])
        })?;
        let issues = parsed.cross_field_issues();
        if issues.is_empty() {
            Ok(parsed)
        } else {
            Err(ValidationError::new(issues))
        }
    }

    /// Validates an already-typed value in place.
    fn check(&self) -> Result<(), ValidationError> {
        let value = serde_json::to_value(self).map_err(|e| {
            ValidationError::new(vec![FieldIssue::new(
                "$",
                IssueKind::Malformed {
                    detail: e.to_string(),
                },
            )])
        })?;
        let mut issues = match validate(&value, Self::schema()) {
            Ok(()) => Vec::new(),
            Err(err) => err.issues,
        };
        issues.extend(self.cross_field_issues());
        if issues.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::new(issues))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn swatch_list_schema() -> Schema {
        Schema::object(vec![
            Field::required("title", Schema::text()),
            Field::optional("note", Schema::string()),
            Field::required(
                "colors",
                Schema::array(
                    Schema::object(vec![
                        Field::required("name", Schema::text()),
                        Field::required(
                            "hex",
                            Schema::matching(Regex::new("^#[0-9A-Fa-f]{6}$").unwrap()),
                        ),
                    ]),
                    2,
                ),
            ),
            Field::required("mode", Schema::one_of(&["light", "dark"])),
        ])
    }

    #[test]
    fn accepts_a_conforming_value_without_touching_it() {
        let value = json!({
            "title": "Palette",
            "colors": [
                { "name": "Coral", "hex": "#FF7F50" },
                { "name": "Navy", "hex": "#000080" }
            ],
            "mode": "light",
            "extra": 1
        });
        let before = value.clone();
        validate(&value, &swatch_list_schema()).expect("valid");
        validate(&value, &swatch_list_schema()).expect("still valid");
        assert_eq!(value, before);
    }

    #[test]
    fn aggregates_every_violation_with_paths() {
        let value = json!({
            "title": "   ",
            "note": null,
            "colors": [{ "name": "Coral", "hex": "FF7F50" }],
            "mode": "neon"
        });
        let err = validate(&value, &swatch_list_schema()).unwrap_err();
        let paths: Vec<&str> = err.issues().iter().map(|i| i.path.as_str()).collect();
        assert_eq!(paths, vec!["title", "colors", "colors[0].hex", "mode"]);
        assert_eq!(err.issues()[0].kind, IssueKind::Blank);
        assert_eq!(
            err.issues()[1].kind,
            IssueKind::TooFewItems { min: 2, actual: 1 }
        );
        assert!(matches!(
            err.issues()[2].kind,
            IssueKind::PatternMismatch { .. }
        ));
        assert!(matches!(err.issues()[3].kind, IssueKind::NotAllowed { .. }));
    }

    #[test]
    fn reports_missing_and_wrong_types() {
        let value = json!({ "colors": "red", "mode": 3 });
        let err = validate(&value, &swatch_list_schema()).unwrap_err();
        assert!(err.has_issue_at("title"));
        assert_eq!(
            err.issues()
                .iter()
                .find(|i| i.path == "colors")
                .map(|i| i.kind.clone()),
            Some(IssueKind::WrongType {
                expected: "array",
                found: "string"
            })
        );
        assert!(err.has_issue_at("mode"));
    }

    #[test]
    fn root_type_mismatch_uses_dollar_path() {
        let err = validate(&json!([1, 2]), &swatch_list_schema()).unwrap_err();
        assert_eq!(err.issues().len(), 1);
        assert_eq!(err.issues()[0].path, "$");
    }

    #[test]
    fn data_uri_format_is_checked() {
        let schema = Schema::object(vec![Field::required("photo", Schema::data_uri())]);
        validate(&json!({ "photo": "data:image/png;base64,iVBORw0KGgo=" }), &schema)
            .expect("valid data uri");
        let err = validate(&json!({ "photo": "https://example.com/a.png" }), &schema).unwrap_err();
        assert_eq!(err.issues()[0].kind, IssueKind::InvalidDataUri);
    }

    #[test]
    fn response_schema_lists_required_fields_and_enums() {
        let rendered = swatch_list_schema().to_response_schema();
        assert_eq!(rendered["type"], "OBJECT");
        assert_eq!(rendered["required"], json!(["title", "colors", "mode"]));
        assert_eq!(rendered["properties"]["colors"]["minItems"], 2);
        assert_eq!(rendered["properties"]["mode"]["enum"], json!(["light", "dark"]));
        assert!(rendered["properties"]["colors"]["items"]["properties"]["hex"]
            .get("pattern")
            .is_none());
    }
}
