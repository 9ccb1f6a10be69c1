//! Shorthand schema documents
//!
//! A schema document may declare attributes and children either keyed by
//! name with an explicit spec, or as a bare list of names. Both surface forms
//! are parsed here into tagged entries so that nothing past this boundary has
//! to care which one was used.
//!
//! Copyright (c) 2025 Specado Team
//! Licensed under the Apache-2.0 license

use crate::dict::ConstDict;
use crate::schema::error::{SchemaError, SchemaResult};
use crate::schema::model::{AttributePatch, AttributeType, ChildPatch};
use serde_json::{Map, Value};

/// Deepest child nesting the parser follows
pub const MAX_SCHEMA_DEPTH: usize = 64;

/// Reserved attribute entry overriding the attribute default of one node
pub const DEFAULT_ATTRIBUTE_KEY: &str = "_default_";

pub(crate) const NAME: &str = "name";
pub(crate) const ATTRIBUTES: &str = "attributes";
pub(crate) const CHILDREN: &str = "children";
pub(crate) const MAY_BE_CHILDLESS: &str = "mayBeChildless";
pub(crate) const REQUIRED: &str = "required";

/// One entry of an `attributes` declaration
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeEntry {
    /// Bare name, takes the node's attribute default unchanged
    Bare(String),
    /// Name with explicit constraints merged over the default
    Keyed(String, AttributePatch),
}

/// One entry of a `children` declaration
#[derive(Debug, Clone, PartialEq)]
pub enum ChildEntry {
    /// Bare name, a leaf child that only has to exist
    Bare(String),
    /// Name with a nested sub-schema
    Keyed(String, Box<RawSchema>),
}

/// A parsed but not yet normalized schema node
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawSchema {
    pub name: Option<String>,
    pub attributes: Option<Vec<AttributeEntry>>,
    /// Fields of the reserved `_default_` attribute entry
    pub attribute_default: Option<AttributePatch>,
    pub children: Option<Vec<ChildEntry>>,
    pub may_be_childless: Option<bool>,
    pub required: Option<bool>,
}

impl RawSchema {
    /// Parse a schema document
    pub fn from_value(value: &Value) -> SchemaResult<Self> {
        Self::parse(value, "$", 0)
    }

    fn parse(value: &Value, path: &str, depth: usize) -> SchemaResult<Self> {
        if depth > MAX_SCHEMA_DEPTH {
            return Err(SchemaError::TooDeep {
                path: path.to_string(),
                max_depth: MAX_SCHEMA_DEPTH,
            });
        }

        let fields = value.as_object().ok_or_else(|| SchemaError::NotAnObject {
            path: path.to_string(),
        })?;

        let mut raw = Self::default();
        for (key, field) in fields {
            match key.as_str() {
                NAME => {
                    let name = field
                        .as_str()
                        .ok_or_else(|| SchemaError::invalid_field(path, key, "has to be a string"))?;
                    raw.name = Some(name.to_string());
                }
                MAY_BE_CHILDLESS => raw.may_be_childless = Some(expect_bool(field, path, key)?),
                REQUIRED => raw.required = Some(expect_bool(field, path, key)?),
                ATTRIBUTES => {
                    let (entries, default) = parse_attributes(field, path)?;
                    raw.attributes = Some(entries);
                    raw.attribute_default = default;
                }
                CHILDREN => raw.children = Some(parse_children(field, path, depth)?),
                other => return Err(SchemaError::unsupported_key(path, other)),
            }
        }

        Ok(raw)
    }
}

fn expect_bool(field: &Value, path: &str, key: &str) -> SchemaResult<bool> {
    field
        .as_bool()
        .ok_or_else(|| SchemaError::invalid_field(path, key, "has to be a boolean"))
}

/// Yields `(name, spec)` for keyed entries and `(name, None)` for bare ones.
/// Lists may mix bare names with single-key mappings.
fn shorthand_entries<'a>(
    field: &'a Value,
    path: &str,
    key: &str,
) -> SchemaResult<Vec<(&'a str, Option<&'a Value>)>> {
    match field {
        Value::Object(map) => Ok(map.iter().map(|(name, spec)| (name.as_str(), Some(spec))).collect()),
        Value::Array(list) => list
            .iter()
            .map(|entry| match entry {
                Value::String(name) => Ok((name.as_str(), None)),
                Value::Object(map) if map.len() == 1 => Ok(map
                    .iter()
                    .next()
                    .map(|(name, spec)| (name.as_str(), Some(spec)))
                    .unwrap_or(("", None))),
                other => Err(if key == ATTRIBUTES {
                    SchemaError::InvalidAttributeSpec {
                        path: format!("{}.{}", path, key),
                        attribute: other.to_string(),
                    }
                } else {
                    SchemaError::InvalidChildSpec {
                        path: format!("{}.{}", path, key),
                        child: other.to_string(),
                    }
                }),
            })
            .collect(),
        _ => Err(SchemaError::invalid_field(
            path,
            key,
            "has to be an object or an array",
        )),
    }
}

fn parse_attributes(
    field: &Value,
    path: &str,
) -> SchemaResult<(Vec<AttributeEntry>, Option<AttributePatch>)> {
    let attributes_path = format!("{}.{}", path, ATTRIBUTES);
    let mut entries = Vec::new();
    let mut default = None;

    for (name, spec) in shorthand_entries(field, path, ATTRIBUTES)? {
        match spec {
            None => entries.push(AttributeEntry::Bare(name.to_string())),
            Some(spec) => {
                let patch = AttributePatch::from_value(name, spec, &attributes_path)?;
                if name == DEFAULT_ATTRIBUTE_KEY {
                    default = Some(patch);
                } else {
                    entries.push(AttributeEntry::Keyed(name.to_string(), patch));
                }
            }
        }
    }

    Ok((entries, default))
}

fn parse_children(field: &Value, path: &str, depth: usize) -> SchemaResult<Vec<ChildEntry>> {
    let children_path = format!("{}.{}", path, CHILDREN);

    shorthand_entries(field, path, CHILDREN)?
        .into_iter()
        .map(|(name, spec)| match spec {
            None => Ok(ChildEntry::Bare(name.to_string())),
            Some(spec) if spec.is_object() => {
                let child_path = format!("{}.{}", children_path, name);
                let child = RawSchema::parse(spec, &child_path, depth + 1)?;
                Ok(ChildEntry::Keyed(name.to_string(), Box::new(child)))
            }
            Some(_) => Err(SchemaError::InvalidChildSpec {
                path: children_path.clone(),
                child: name.to_string(),
            }),
        })
        .collect()
}

impl AttributePatch {
    /// Parse one attribute constraint mapping
    ///
    /// `maxLength` and `enum` are checked eagerly; `null` for either clears
    /// the inherited constraint. `format` is accepted as an alias of
    /// `dateFormat`, and both have to hold at least one strftime directive.
    pub fn from_value(attribute: &str, value: &Value, path: &str) -> SchemaResult<Self> {
        let fields = value
            .as_object()
            .ok_or_else(|| SchemaError::InvalidAttributeSpec {
                path: path.to_string(),
                attribute: attribute.to_string(),
            })?;
        let spec_path = format!("{}.{}", path, attribute);

        let mut patch = Self::default();
        for (key, field) in fields {
            match key.as_str() {
                REQUIRED => patch.required = Some(expect_bool(field, &spec_path, key)?),
                "type" => patch.kind = Some(parse_type(attribute, field)?),
                "maxLength" => patch.max_length = Some(parse_max_length(attribute, field)?),
                "enum" => patch.enum_values = Some(parse_enum(attribute, field)?),
                "dateFormat" | "format" => {
                    let format = field.as_str().ok_or_else(|| {
                        SchemaError::invalid_field(&spec_path, key, "has to be a string")
                    })?;
                    if !format.contains('%') {
                        return Err(SchemaError::invalid_field(
                            &spec_path,
                            key,
                            "has to be a strftime format such as %Y-%m-%d",
                        ));
                    }
                    patch.date_format = Some(format.to_string());
                }
                other => return Err(SchemaError::unsupported_key(&spec_path, other)),
            }
        }

        Ok(patch)
    }

    /// Parse a free-standing default mapping, e.g. from configuration
    pub fn from_object(fields: &Map<String, Value>) -> SchemaResult<Self> {
        Self::from_value(DEFAULT_ATTRIBUTE_KEY, &Value::Object(fields.clone()), "$")
    }
}

impl ChildPatch {
    /// Parse a `{required?, mayBeChildless?}` mapping
    pub fn from_value(value: &Value, path: &str) -> SchemaResult<Self> {
        let fields = value.as_object().ok_or_else(|| SchemaError::NotAnObject {
            path: path.to_string(),
        })?;

        let mut patch = Self::default();
        for (key, field) in fields {
            match key.as_str() {
                REQUIRED => patch.required = Some(expect_bool(field, path, key)?),
                MAY_BE_CHILDLESS => patch.may_be_childless = Some(expect_bool(field, path, key)?),
                other => return Err(SchemaError::unsupported_key(path, other)),
            }
        }

        Ok(patch)
    }
}

fn parse_type(attribute: &str, field: &Value) -> SchemaResult<AttributeType> {
    let found = field.as_str().unwrap_or_default();
    AttributeType::entries()
        .iter()
        .map(|(_, kind)| *kind)
        .find(|kind| kind.value() == found)
        .ok_or_else(|| SchemaError::InvalidType {
            attribute: attribute.to_string(),
            found: field.to_string(),
        })
}

fn parse_max_length(attribute: &str, field: &Value) -> SchemaResult<Option<usize>> {
    if field.is_null() {
        return Ok(None);
    }

    match field.as_u64() {
        Some(max_length) if max_length >= 1 => Ok(Some(max_length as usize)),
        _ => Err(SchemaError::InvalidMaxLength {
            attribute: attribute.to_string(),
        }),
    }
}

fn parse_enum(attribute: &str, field: &Value) -> SchemaResult<Option<Vec<Value>>> {
    match field {
        Value::Null => Ok(None),
        Value::Array(values) if !values.is_empty() => Ok(Some(values.clone())),
        _ => Err(SchemaError::InvalidEnum {
            attribute: attribute.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_bare_and_keyed_attributes() {
        let raw = RawSchema::from_value(&json!({
            "attributes": {
                "_default_": {"maxLength": 10},
                "a": {"required": false}
            }
        }))
        .unwrap();

        assert_eq!(raw.attribute_default, Some(AttributePatch::new().max_length(10)));
        assert_eq!(
            raw.attributes,
            Some(vec![AttributeEntry::Keyed(
                "a".to_string(),
                AttributePatch::new().required(false)
            )])
        );

        let raw = RawSchema::from_value(&json!({"attributes": ["a", {"b": {"type": "integer"}}]})).unwrap();
        assert_eq!(
            raw.attributes,
            Some(vec![
                AttributeEntry::Bare("a".to_string()),
                AttributeEntry::Keyed("b".to_string(), AttributePatch::new().kind(AttributeType::Integer)),
            ])
        );
    }

    #[test]
    fn test_children_forms() {
        let raw = RawSchema::from_value(&json!({
            "children": {"bar": {"required": false}}
        }))
        .unwrap();
        let children = raw.children.unwrap();
        assert!(matches!(&children[0], ChildEntry::Keyed(name, child) if name == "bar" && child.required == Some(false)));

        let raw = RawSchema::from_value(&json!({"children": ["bar"]})).unwrap();
        assert_eq!(raw.children, Some(vec![ChildEntry::Bare("bar".to_string())]));
    }

    #[test]
    fn test_format_alias() {
        let patch = AttributePatch::from_value("d", &json!({"type": "date", "format": "%Y"}), "$").unwrap();
        assert_eq!(patch.date_format.as_deref(), Some("%Y"));

        assert!(matches!(
            AttributePatch::from_value("d", &json!({"type": "date", "format": "Y-m-d"}), "$"),
            Err(SchemaError::InvalidField { key, .. }) if key == "format"
        ));
    }

    #[test]
    fn test_null_constraints_clear() {
        let patch = AttributePatch::from_value("a", &json!({"maxLength": null, "enum": null}), "$").unwrap();
        assert_eq!(patch, AttributePatch::new().clear_max_length().clear_enum_values());
        assert_eq!(AttributePatch::from_value("a", &json!({}), "$").unwrap(), AttributePatch::new());
    }

    #[test]
    fn test_rejected_documents() {
        assert!(matches!(
            RawSchema::from_value(&json!({"attributes": {"a": {"maxLength": 0}}})),
            Err(SchemaError::InvalidMaxLength { .. })
        ));
        assert!(matches!(
            RawSchema::from_value(&json!({"attributes": {"a": {"maxLength": "10"}}})),
            Err(SchemaError::InvalidMaxLength { .. })
        ));
        assert!(matches!(
            RawSchema::from_value(&json!({"attributes": {"a": {"enum": []}}})),
            Err(SchemaError::InvalidEnum { .. })
        ));
        assert!(matches!(
            RawSchema::from_value(&json!({"attributes": {"a": {"enum": "x"}}})),
            Err(SchemaError::InvalidEnum { .. })
        ));
        assert!(matches!(
            RawSchema::from_value(&json!({"attributes": {"a": "string"}})),
            Err(SchemaError::InvalidAttributeSpec { .. })
        ));
        assert!(matches!(
            RawSchema::from_value(&json!({"children": {"bar": true}})),
            Err(SchemaError::InvalidChildSpec { .. })
        ));
        assert!(matches!(
            RawSchema::from_value(&json!({"attributes": {"a": {"type": "float"}}})),
            Err(SchemaError::InvalidType { .. })
        ));
        assert!(matches!(
            RawSchema::from_value(&json!({"nmae": "foo"})),
            Err(SchemaError::UnsupportedKey { .. })
        ));
        assert!(matches!(
            RawSchema::from_value(&json!(["foo"])),
            Err(SchemaError::NotAnObject { .. })
        ));
    }

    #[test]
    fn test_depth_limit() {
        let mut schema = json!({"name": "leaf"});
        for _ in 0..=MAX_SCHEMA_DEPTH {
            schema = json!({"children": {"c": schema}});
        }
        assert!(matches!(
            RawSchema::from_value(&schema),
            Err(SchemaError::TooDeep { .. })
        ));
    }

    #[test]
    fn test_child_patch() {
        let patch = ChildPatch::from_value(&json!({"mayBeChildless": true}), "$").unwrap();
        assert_eq!(patch, ChildPatch::new().may_be_childless(true));
        assert!(ChildPatch::from_value(&json!({"other": 1}), "$").is_err());
    }
}
