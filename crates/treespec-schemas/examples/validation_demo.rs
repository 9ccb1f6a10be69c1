//! Item tree validation walkthrough
//!
//! Copyright (c) 2025 Specado Team
//! Licensed under the Apache-2.0 license

use serde_json::json;
use treespec_schemas::{
    validate_batch, AttributePatch, BatchConfig, SchemaValidator, SpecificationValidator,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Treespec Validation Demo ===\n");

    let schema = json!({
        "name": "library",
        "attributes": {
            "_default_": {"maxLength": 20},
            "city": {},
            "opened": {"type": "date", "format": "%Y-%m-%d", "required": false}
        },
        "children": {
            "book": {
                "attributes": {
                    "title": {},
                    "pages": {"type": "integer", "required": false},
                    "genre": {"enum": ["novel", "poetry"], "required": false}
                }
            }
        }
    });

    let validator = SpecificationValidator::new(&schema)?;
    println!("Canonical schema:\n{}\n", serde_json::to_string_pretty(&validator.schema().to_document()?)?);

    let item = json!({
        "name": "library",
        "attributes": {"city": "Arrakeen", "opened": "2024-02-29"},
        "children": [
            {"name": "book", "attributes": {"title": "Dune", "pages": "412", "genre": "novel"}}
        ]
    });
    report("complete library", validator.validate(&item));

    let too_long = json!({
        "name": "library",
        "attributes": {"city": "Arrakeen"},
        "children": [
            {"name": "book", "attributes": {"title": "God Emperor of Dune, Book Four"}}
        ]
    });
    report("long title", validator.validate(&too_long));

    // Relaxed defaults: attributes optional unless stated otherwise
    let relaxed = SpecificationValidator::with_defaults(
        &json!({"name": "shelf", "attributes": ["label"], "mayBeChildless": true}),
        Some(&AttributePatch::new().required(false)),
        None,
    )?;
    report(
        "shelf without label",
        relaxed.validate(&json!({"name": "shelf", "attributes": {}})),
    );

    let items = vec![item, too_long, json!({"name": "archive"})];
    match validate_batch(&validator, &items, &BatchConfig::default()) {
        Ok(()) => println!("\nBatch: all items valid"),
        Err(failures) => println!("\nBatch: {}", failures),
    }

    Ok(())
}

fn report(label: &str, result: treespec_schemas::ValidationResult<()>) {
    match result {
        Ok(()) => println!("[valid]   {}", label),
        Err(failure) => println!("[invalid] {} -> {} at {}: {}", label, failure.kind, failure.path, failure.message),
    }
}
