//! Fail-fast validation of item trees against a canonical schema
//!
//! An item is a mapping `{name, value?, attributes?, children?}`. The walk is
//! depth-first and pre-order over children; within one node the checks run
//! as unknown fields, name, attributes, children, emptiness, each in schema
//! declaration order. The first failure anywhere ends the walk.
//!
//! Copyright (c) 2025 Specado Team
//! Licensed under the Apache-2.0 license

use crate::schema::model::{AttributeSpec, AttributeType, ChildNode, Defaults, SchemaNode};
use crate::schema::raw::{ATTRIBUTES, CHILDREN, NAME};
use crate::schema::{AttributePatch, ChildPatch, SchemaNormalizer, SchemaResult};
use crate::validation::base::{SchemaValidator, ValidationContext};
use crate::validation::date;
use crate::validation::error::{SpecificationError, ValidationFailure, ValidationResult};
use indexmap::IndexMap;
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

const VALUE: &str = "value";

/// Validates item trees against one normalized schema
///
/// The schema is normalized once at construction and shared between clones,
/// so one clone per thread is cheap. [`is_valid`](Self::is_valid) records the
/// last failure on the instance; [`SchemaValidator::validate`] returns it
/// instead and only needs `&self`.
#[derive(Debug, Clone)]
pub struct SpecificationValidator {
    schema: Arc<SchemaNode>,
    last_failure: Option<ValidationFailure>,
}

impl SpecificationValidator {
    /// Build a validator with the built-in defaults
    pub fn new(schema: &Value) -> SchemaResult<Self> {
        Self::with_defaults(schema, None, None)
    }

    /// Build a validator with caller overrides of the attribute and child templates
    pub fn with_defaults(
        schema: &Value,
        attribute: Option<&AttributePatch>,
        child: Option<&ChildPatch>,
    ) -> SchemaResult<Self> {
        let normalizer = SchemaNormalizer::new(Defaults::with_overrides(attribute, child));
        Ok(Self::from_normalized(normalizer.normalize(schema)?))
    }

    /// Wrap an already canonical schema
    pub fn from_normalized(schema: SchemaNode) -> Self {
        Self {
            schema: Arc::new(schema),
            last_failure: None,
        }
    }

    /// The canonical schema
    pub fn schema(&self) -> &SchemaNode {
        &self.schema
    }

    /// Validate `item`, remembering the failure for [`last_error`](Self::last_error)
    pub fn is_valid(&mut self, item: &Value) -> bool {
        self.last_failure = None;
        match self.validate(item) {
            Ok(()) => true,
            Err(failure) => {
                self.last_failure = Some(failure);
                false
            }
        }
    }

    /// Description of the failure from the most recent [`is_valid`](Self::is_valid) call
    pub fn last_error(&self) -> Option<&str> {
        self.last_failure.as_ref().map(|failure| failure.message.as_str())
    }

    pub fn last_failure(&self) -> Option<&ValidationFailure> {
        self.last_failure.as_ref()
    }
}

impl SchemaValidator for SpecificationValidator {
    type Input = Value;

    fn validate_with_context(&self, item: &Value, context: &ValidationContext) -> ValidationResult<()> {
        let result = check_node(item, &self.schema, context);
        if let Err(failure) = &result {
            debug!(
                kind = %failure.kind,
                path = %failure.path,
                "Item rejected: {}",
                failure.message
            );
        }
        result
    }
}

fn fail(kind: SpecificationError, context: &ValidationContext, message: String) -> ValidationFailure {
    ValidationFailure::new(kind, context.path.clone(), message)
}

/// Scalar rendering used in messages; strings are shown without quotes
fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn item_name(fields: &Map<String, Value>) -> String {
    fields.get(NAME).map(render).unwrap_or_default()
}

fn has_children(fields: &Map<String, Value>) -> bool {
    fields
        .get(CHILDREN)
        .and_then(Value::as_array)
        .is_some_and(|children| !children.is_empty())
}

fn check_node(item: &Value, schema: &SchemaNode, context: &ValidationContext) -> ValidationResult<()> {
    let fields = item.as_object().ok_or_else(|| {
        fail(
            SpecificationError::MalformedItemData,
            context,
            format!("Item has to be an object but is {}", render(item)),
        )
    })?;

    check_fields(fields, schema, context)?;
    check_name(fields, schema, context)?;
    if let Some(attributes) = &schema.attributes {
        check_attributes(fields, attributes, context)?;
    }
    if let Some(children) = &schema.children {
        check_children(fields, schema, children, context)?;
    }
    if !schema.may_be_childless {
        check_not_empty(fields, schema, context)?;
    }

    Ok(())
}

fn check_fields(
    fields: &Map<String, Value>,
    schema: &SchemaNode,
    context: &ValidationContext,
) -> ValidationResult<()> {
    let unspecified: Vec<&str> = fields
        .keys()
        .map(String::as_str)
        .filter(|key| match *key {
            NAME | VALUE => false,
            ATTRIBUTES => schema.attributes.is_none(),
            CHILDREN => schema.children.is_none(),
            _ => true,
        })
        .collect();

    if unspecified.is_empty() {
        Ok(())
    } else {
        Err(fail(
            SpecificationError::UnspecifiedFields,
            context,
            format!("Item has unspecified fields: {}", unspecified.join(",")),
        ))
    }
}

fn check_name(
    fields: &Map<String, Value>,
    schema: &SchemaNode,
    context: &ValidationContext,
) -> ValidationResult<()> {
    let Some(expected) = &schema.name else {
        return Ok(());
    };

    match fields.get(NAME) {
        Some(Value::String(name)) if name == expected => Ok(()),
        found => Err(fail(
            SpecificationError::WrongName,
            context,
            format!("Item does not have name equal {}", expected),
        )
        .with_violation(
            "name",
            expected.clone(),
            found.map(render).unwrap_or_else(|| "no name".to_string()),
        )),
    }
}

fn check_attributes(
    fields: &Map<String, Value>,
    declared: &IndexMap<String, AttributeSpec>,
    context: &ValidationContext,
) -> ValidationResult<()> {
    let Some(values) = fields.get(ATTRIBUTES).and_then(Value::as_object) else {
        return Err(fail(
            SpecificationError::NoAttributes,
            context,
            "Item does not have attributes".to_string(),
        ));
    };

    let unspecified: Vec<&str> = values
        .keys()
        .map(String::as_str)
        .filter(|key| !declared.contains_key(*key))
        .collect();
    if !unspecified.is_empty() {
        return Err(fail(
            SpecificationError::UnspecifiedAttributes,
            context,
            format!("Item has unspecified attributes: {}", unspecified.join(",")),
        ));
    }

    let attributes_context = context.child(ATTRIBUTES);
    for (name, spec) in declared {
        match values.get(name).filter(|value| !value.is_null()) {
            Some(value) => check_attribute(name, spec, value, &attributes_context)?,
            None if spec.required => {
                return Err(fail(
                    SpecificationError::MissingAttribute,
                    context,
                    format!("Item does not have required attribute {}", name),
                ));
            }
            None => {}
        }
    }

    Ok(())
}

fn is_integer(value: &Value) -> bool {
    match value {
        Value::Number(n) => n.is_i64() || n.is_u64(),
        Value::String(s) => !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()),
        _ => false,
    }
}

fn check_attribute(
    name: &str,
    spec: &AttributeSpec,
    value: &Value,
    context: &ValidationContext,
) -> ValidationResult<()> {
    let context = context.child(name);

    // A declared enum replaces every other check for the attribute
    if let Some(allowed) = &spec.enum_values {
        if allowed.iter().any(|candidate| candidate == value) {
            return Ok(());
        }
        return Err(fail(
            SpecificationError::InvalidEnum,
            &context,
            format!(
                "Attribute {} value ({}) does not satisfy enum constraint",
                name,
                render(value)
            ),
        )
        .with_violation(
            "enum",
            format!("one of: {}", Value::Array(allowed.clone())),
            value.to_string(),
        ));
    }

    match spec.kind {
        AttributeType::String => {
            if let Some(max_length) = spec.max_length {
                let length = render(value).chars().count();
                if length > max_length {
                    return Err(fail(
                        SpecificationError::TooLongAttribute,
                        &context,
                        format!(
                            "Attribute {} length exceeded max {} and is {}",
                            name, max_length, length
                        ),
                    )
                    .with_violation(
                        "maxLength",
                        format!("at most {} characters", max_length),
                        format!("{} characters", length),
                    ));
                }
            }
        }
        AttributeType::Date => {
            if let Some(format) = &spec.date_format {
                let parses = value
                    .as_str()
                    .is_some_and(|text| date::matches_format(text, format));
                if !parses {
                    return Err(fail(
                        SpecificationError::InvalidDateFormat,
                        &context,
                        format!(
                            "Attribute {} value ({}) is not valid date in format {}",
                            name,
                            render(value),
                            format
                        ),
                    ));
                }
            }
        }
        AttributeType::Integer => {
            if !is_integer(value) {
                return Err(fail(
                    SpecificationError::NotInteger,
                    &context,
                    format!("Attribute {} value ({}) is not an integer", name, render(value)),
                ));
            }
        }
    }

    Ok(())
}

fn check_children(
    fields: &Map<String, Value>,
    schema: &SchemaNode,
    declared: &IndexMap<String, ChildNode>,
    context: &ValidationContext,
) -> ValidationResult<()> {
    let children = match fields.get(CHILDREN) {
        None | Some(Value::Null) => {
            if schema.may_be_childless {
                return Ok(());
            }
            return Err(fail(
                SpecificationError::MissingChildren,
                context,
                format!("Item {} cannot be empty but has no children", item_name(fields)),
            ));
        }
        Some(Value::Array(children)) => children,
        Some(_) => {
            return Err(fail(
                SpecificationError::MalformedItemData,
                context,
                "Item has children but it is not an array".to_string(),
            ));
        }
    };

    let children_context = context.child(CHILDREN);
    let mut found: HashSet<&str> = HashSet::new();

    for (index, child) in children.iter().enumerate() {
        let child_context = children_context.child_index(index);
        let Some(child_name) = child.get(NAME).and_then(Value::as_str) else {
            return Err(fail(
                SpecificationError::MalformedItemData,
                &child_context,
                format!("Child item at position {} has no name", index),
            ));
        };

        let Some(child_schema) = declared.get(child_name) else {
            return Err(fail(
                SpecificationError::UnspecifiedChild,
                &child_context,
                format!("Item has unspecified child named {}", child_name),
            ));
        };

        // A childless instance that may not be is rejected here, at its own path
        check_node(child, &child_schema.node, &child_context)?;
        found.insert(child_name);
    }

    if let Some((child_name, _)) = declared
        .iter()
        .find(|(name, child)| child.required && !found.contains(name.as_str()))
    {
        return Err(fail(
            SpecificationError::MissingChild,
            context,
            format!("Child {} is required but not found", child_name),
        ));
    }

    Ok(())
}

fn check_not_empty(
    fields: &Map<String, Value>,
    schema: &SchemaNode,
    context: &ValidationContext,
) -> ValidationResult<()> {
    let has_children = has_children(fields);

    if schema.declares_children() && !has_children {
        return Err(fail(
            SpecificationError::ChildlessChild,
            context,
            format!("Item {} has no children but cannot be childless", item_name(fields)),
        ));
    }

    let has_value = fields.get(VALUE).is_some_and(|value| !value.is_null());
    let has_attributes = fields
        .get(ATTRIBUTES)
        .and_then(Value::as_object)
        .is_some_and(|attributes| !attributes.is_empty());

    if !has_value && !has_attributes && !has_children {
        return Err(fail(
            SpecificationError::EmptyItem,
            context,
            format!("Item {} is empty but cannot be", item_name(fields)),
        ));
    }

    Ok(())
}
