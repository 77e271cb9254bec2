//! Import-requirement detection.
//!
//! A few BSON types map to TypeScript names that are not built-ins
//! (`Decimal128`, `ObjectId`); generated files need an import line for each
//! one that actually occurs. Detection is a separate pass over the original
//! schema rather than a byproduct of annotation, so it does not depend on
//! what the annotator injected.

use serde_json::Value;

/// BSON types whose TypeScript equivalent must be imported, paired with the
/// imported name. Declaration order is the preamble line order.
pub const IMPORT_WORTHY: [(&str, &str); 2] = [("decimal", "Decimal128"), ("objectId", "ObjectId")];

/// Module the driver re-exports these types from.
pub const IMPORT_MODULE: &str = "mongodb";

/// True when `bson_type` occurs anywhere in the tree's `bsonType`
/// attributes, as a scalar or as a union member.
pub fn uses_bson_type(schema: &Value, bson_type: &str) -> bool {
    match schema {
        Value::Array(items) => items.iter().any(|item| uses_bson_type(item, bson_type)),
        Value::Object(fields) => fields.iter().any(|(key, value)| {
            if key == "bsonType" {
                match value {
                    Value::String(name) => name == bson_type,
                    Value::Array(members) => {
                        members.iter().any(|m| m.as_str() == Some(bson_type))
                    }
                    _ => false,
                }
            } else {
                uses_bson_type(value, bson_type)
            }
        }),
        _ => false,
    }
}

/// The imported names `schema` requires, in `IMPORT_WORTHY` order.
pub fn required_imports(schema: &Value) -> Vec<&'static str> {
    IMPORT_WORTHY
        .iter()
        .filter(|(bson, _)| uses_bson_type(schema, bson))
        .map(|(_, ts)| *ts)
        .collect()
}

/// Import statements to prepend to the generated banner; empty when the
/// schema uses no import-worthy type.
pub fn import_preamble(schema: &Value) -> Vec<String> {
    required_imports(schema)
        .into_iter()
        .map(|ts| format!("import {{ {ts} }} from \"{IMPORT_MODULE}\";"))
        .collect()
}

// ------------------------------- Tests ------------------------------------ //
