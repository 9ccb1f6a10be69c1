//! Shorthand to canonical schema conversion
//!
//! Copyright (c) 2025 Specado Team
//! Licensed under the Apache-2.0 license

use crate::schema::error::SchemaResult;
use crate::schema::model::{AttributeSpec, ChildNode, ChildSpec, Defaults, SchemaNode};
use crate::schema::raw::{AttributeEntry, ChildEntry, RawSchema};
use indexmap::IndexMap;
use serde_json::Value;
use tracing::{debug, trace};

/// Converts shorthand schema documents into canonical [`SchemaNode`] trees
#[derive(Debug, Clone, Default)]
pub struct SchemaNormalizer {
    defaults: Defaults,
}

impl SchemaNormalizer {
    pub fn new(defaults: Defaults) -> Self {
        Self { defaults }
    }

    /// Parse and normalize a schema document
    pub fn normalize(&self, schema: &Value) -> SchemaResult<SchemaNode> {
        let raw = RawSchema::from_value(schema)?;
        let node = self.normalize_raw(&raw);
        debug!(
            name = ?node.name,
            depth = node.depth(),
            "Normalized schema"
        );
        Ok(node)
    }

    /// Normalize an already parsed document
    pub fn normalize_raw(&self, raw: &RawSchema) -> SchemaNode {
        normalize_node(raw, &self.defaults.attribute, &self.defaults.child)
    }
}

/// Normalize `schema` with explicit attribute and child templates
pub fn normalize(
    schema: &Value,
    attribute_default: &AttributeSpec,
    child_default: &ChildSpec,
) -> SchemaResult<SchemaNode> {
    SchemaNormalizer::new(Defaults {
        attribute: attribute_default.clone(),
        child: *child_default,
    })
    .normalize(schema)
}

fn normalize_node(
    raw: &RawSchema,
    inherited_attribute: &AttributeSpec,
    child_default: &ChildSpec,
) -> SchemaNode {
    // `_default_` applies to this node and everything below it
    let attribute_default = match &raw.attribute_default {
        Some(patch) => inherited_attribute.merged(patch),
        None => inherited_attribute.clone(),
    };

    let attributes = raw.attributes.as_ref().map(|entries| {
        entries
            .iter()
            .map(|entry| match entry {
                AttributeEntry::Bare(name) => (name.clone(), attribute_default.clone()),
                AttributeEntry::Keyed(name, patch) => (name.clone(), attribute_default.merged(patch)),
            })
            .collect::<IndexMap<_, _>>()
    });

    // Last child's flag, except that a `false` is never overridden
    let mut fallback: Option<bool> = None;
    let children = match &raw.children {
        None => None,
        Some(entries) => {
            let mut children = IndexMap::with_capacity(entries.len());
            for entry in entries {
                let (name, child) = match entry {
                    ChildEntry::Bare(name) => (name, ChildNode::bare(child_default)),
                    ChildEntry::Keyed(name, sub) => {
                        let node = normalize_node(sub, &attribute_default, child_default);
                        let required = sub.required.unwrap_or(child_default.required);
                        (name, ChildNode { required, node })
                    }
                };

                if fallback != Some(false) {
                    fallback = Some(child.node.may_be_childless);
                }
                trace!(child = %name, required = child.required, "Normalized child");
                children.insert(name.clone(), child);
            }
            Some(children)
        }
    };

    SchemaNode {
        name: raw.name.clone(),
        attributes,
        children,
        may_be_childless: raw
            .may_be_childless
            .or(fallback)
            .unwrap_or(child_default.may_be_childless),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::model::{AttributePatch, AttributeType, ChildPatch};
    use serde_json::json;

    fn normalize_default(schema: Value) -> SchemaNode {
        SchemaNormalizer::default().normalize(&schema).unwrap()
    }

    #[test]
    fn test_bare_attribute_takes_local_default() {
        let node = normalize_default(json!({
            "attributes": {
                "_default_": {"maxLength": 10},
                "plain": {},
                "longer": {"maxLength": 35}
            }
        }));
        let attributes = node.attributes.unwrap();
        assert_eq!(attributes.len(), 2);
        assert_eq!(attributes["plain"].max_length, Some(10));
        assert_eq!(attributes["longer"].max_length, Some(35));
        assert!(attributes["plain"].required);
    }

    #[test]
    fn test_local_default_reaches_descendants() {
        let node = normalize_default(json!({
            "attributes": {"_default_": {"required": false}},
            "children": {"c": {"attributes": ["x"]}}
        }));
        assert_eq!(node.attributes, Some(IndexMap::new()));
        let child = node.child("c").unwrap();
        assert!(!child.node.attributes.as_ref().unwrap()["x"].required);
    }

    #[test]
    fn test_local_default_wins_over_caller_default() {
        let normalizer = SchemaNormalizer::new(Defaults::with_overrides(
            Some(&AttributePatch::new().max_length(3).kind(AttributeType::String)),
            None,
        ));
        let node = normalizer
            .normalize(&json!({"attributes": {"_default_": {"maxLength": 7}, "a": {}}}))
            .unwrap();
        assert_eq!(node.attributes.unwrap()["a"].max_length, Some(7));
    }

    #[test]
    fn test_bare_child_uses_child_default() {
        let normalizer = SchemaNormalizer::new(Defaults::with_overrides(
            None,
            Some(&ChildPatch::new().required(false)),
        ));
        let node = normalizer.normalize(&json!({"children": ["bar"]})).unwrap();
        let bar = node.child("bar").unwrap();
        assert!(!bar.required);
        assert!(!bar.node.may_be_childless);
        assert!(!bar.node.declares_children());
    }

    #[test]
    fn test_keyed_child_overrides_child_default() {
        let node = normalize_default(json!({
            "children": {"foos": {"required": false, "mayBeChildless": true, "children": ["bar"]}}
        }));
        let foos = node.child("foos").unwrap();
        assert_eq!(
            foos.spec(),
            ChildSpec {
                required: false,
                may_be_childless: true
            }
        );
        assert!(node.may_be_childless);
    }

    #[test]
    fn test_first_false_wins_fallback() {
        let node = normalize_default(json!({
            "children": {
                "a": {"mayBeChildless": true},
                "b": {"mayBeChildless": false},
                "c": {"mayBeChildless": true}
            }
        }));
        assert!(!node.may_be_childless);

        let node = normalize_default(json!({
            "children": {
                "a": {"mayBeChildless": false},
                "b": {"mayBeChildless": true}
            }
        }));
        assert!(!node.may_be_childless);

        let node = normalize_default(json!({
            "children": {
                "a": {"mayBeChildless": true},
                "b": {"mayBeChildless": true}
            }
        }));
        assert!(node.may_be_childless);
    }

    #[test]
    fn test_explicit_flag_wins_over_fallback() {
        let node = normalize_default(json!({
            "mayBeChildless": true,
            "children": ["bar"]
        }));
        assert!(node.may_be_childless);
    }

    #[test]
    fn test_without_children_falls_back_to_child_default() {
        assert!(!normalize_default(json!({"name": "x"})).may_be_childless);

        let normalizer = SchemaNormalizer::new(Defaults::with_overrides(
            None,
            Some(&ChildPatch::new().may_be_childless(true)),
        ));
        assert!(normalizer.normalize(&json!({"name": "x"})).unwrap().may_be_childless);
    }

    #[test]
    fn test_free_function_matches_normalizer() {
        let schema = json!({"name": "foo", "attributes": ["a"], "children": ["b"]});
        let defaults = Defaults::default();
        assert_eq!(
            normalize(&schema, &defaults.attribute, &defaults.child).unwrap(),
            normalize_default(schema)
        );
    }
}
