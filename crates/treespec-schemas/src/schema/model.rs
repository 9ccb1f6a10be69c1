//! Canonical schema model
//!
//! Copyright (c) 2025 Specado Team
//! Licensed under the Apache-2.0 license

use crate::dict::ConstDict;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Type constraint of an attribute value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeType {
    #[default]
    String,
    Integer,
    Date,
}

impl ConstDict for AttributeType {
    type Value = &'static str;
    const DICTIONARY: &'static str = "AttributeType";

    fn entries() -> &'static [(&'static str, Self)] {
        &[
            ("STRING", Self::String),
            ("INTEGER", Self::Integer),
            ("DATE", Self::Date),
        ]
    }

    fn value(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Date => "date",
        }
    }
}

/// Constraints of one attribute
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeSpec {
    pub required: bool,
    #[serde(rename = "type")]
    pub kind: AttributeType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_format: Option<String>,
}

impl Default for AttributeSpec {
    fn default() -> Self {
        Self {
            required: true,
            kind: AttributeType::String,
            max_length: None,
            enum_values: None,
            date_format: None,
        }
    }
}

impl AttributeSpec {
    /// Copy of this spec with every field set in `patch` replaced
    pub fn merged(&self, patch: &AttributePatch) -> Self {
        Self {
            required: patch.required.unwrap_or(self.required),
            kind: patch.kind.unwrap_or(self.kind),
            max_length: patch.max_length.unwrap_or(self.max_length),
            enum_values: patch
                .enum_values
                .clone()
                .unwrap_or_else(|| self.enum_values.clone()),
            date_format: patch
                .date_format
                .clone()
                .or_else(|| self.date_format.clone()),
        }
    }
}

/// Partial attribute spec, merged field by field over a default
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<AttributeType>,
    /// `Some(None)` clears an inherited limit
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<Option<usize>>,
    /// `Some(None)` clears an inherited enum
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Option<Vec<Value>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_format: Option<String>,
}

impl AttributePatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = Some(required);
        self
    }

    pub fn kind(mut self, kind: AttributeType) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn max_length(mut self, max_length: usize) -> Self {
        self.max_length = Some(Some(max_length));
        self
    }

    pub fn clear_max_length(mut self) -> Self {
        self.max_length = Some(None);
        self
    }

    pub fn enum_values(mut self, values: Vec<Value>) -> Self {
        self.enum_values = Some(Some(values));
        self
    }

    pub fn clear_enum_values(mut self) -> Self {
        self.enum_values = Some(None);
        self
    }

    pub fn date_format(mut self, format: impl Into<String>) -> Self {
        self.date_format = Some(format.into());
        self
    }
}

/// How a child name is constrained inside its parent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChildSpec {
    /// The name must appear at least once among the parent's children
    pub required: bool,
    /// An instance may omit its own children
    pub may_be_childless: bool,
}

impl Default for ChildSpec {
    fn default() -> Self {
        Self {
            required: true,
            may_be_childless: false,
        }
    }
}

impl ChildSpec {
    pub fn merged(&self, patch: &ChildPatch) -> Self {
        Self {
            required: patch.required.unwrap_or(self.required),
            may_be_childless: patch.may_be_childless.unwrap_or(self.may_be_childless),
        }
    }
}

/// Partial child spec
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChildPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub may_be_childless: Option<bool>,
}

impl ChildPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = Some(required);
        self
    }

    pub fn may_be_childless(mut self, may_be_childless: bool) -> Self {
        self.may_be_childless = Some(may_be_childless);
        self
    }
}

/// Attribute and child templates used while normalizing
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Defaults {
    pub attribute: AttributeSpec,
    pub child: ChildSpec,
}

impl Defaults {
    /// Built-in templates with optional caller overrides applied
    pub fn with_overrides(attribute: Option<&AttributePatch>, child: Option<&ChildPatch>) -> Self {
        let base = Self::default();
        Self {
            attribute: attribute
                .map(|patch| base.attribute.merged(patch))
                .unwrap_or(base.attribute),
            child: child
                .map(|patch| base.child.merged(patch))
                .unwrap_or(base.child),
        }
    }
}

/// Canonical schema for one item shape
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaNode {
    /// Exact name instances must carry
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// `None` when the schema declares no attributes at all
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attributes: Option<IndexMap<String, AttributeSpec>>,
    /// `None` when the schema declares no children at all
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<IndexMap<String, ChildNode>>,
    pub may_be_childless: bool,
}

impl SchemaNode {
    /// Node with no name, attributes or children
    pub fn leaf(may_be_childless: bool) -> Self {
        Self {
            name: None,
            attributes: None,
            children: None,
            may_be_childless,
        }
    }

    pub fn declares_children(&self) -> bool {
        self.children.is_some()
    }

    /// Look up a declared child by name
    pub fn child(&self, name: &str) -> Option<&ChildNode> {
        self.children.as_ref().and_then(|children| children.get(name))
    }

    /// Depth of the deepest declared child chain, 1 for a node without children
    pub fn depth(&self) -> usize {
        1 + self
            .children
            .iter()
            .flat_map(|children| children.values())
            .map(|child| child.node.depth())
            .max()
            .unwrap_or(0)
    }

    /// Render back to the schema document form
    ///
    /// Normalizing the result with the built-in defaults yields this node again.
    pub fn to_document(&self) -> serde_json::Result<Value> {
        serde_json::to_value(self)
    }
}

/// A declared child: its constraint in the parent plus its own shape
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChildNode {
    pub required: bool,
    #[serde(flatten)]
    pub node: SchemaNode,
}

impl ChildNode {
    /// A child declared by bare name: it only has to exist
    pub fn bare(defaults: &ChildSpec) -> Self {
        Self {
            required: defaults.required,
            node: SchemaNode::leaf(defaults.may_be_childless),
        }
    }

    pub fn spec(&self) -> ChildSpec {
        ChildSpec {
            required: self.required,
            may_be_childless: self.node.may_be_childless,
        }
    }
}
