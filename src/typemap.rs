//! BSON → TypeScript type-name table.
//!
//! MongoDB validators use `bsonType` (the BSON type system) in place of or
//! alongside the JSON-Schema `type` keyword. A generic JSON-Schema compiler
//! only understands the latter, so BSON-specific types are resolved here and
//! injected into the schema as `tsType` directives (see `annotate`).
//!
//! Available keywords:
//! https://www.mongodb.com/docs/manual/reference/operator/query/jsonSchema/#available-keywords
//! https://www.mongodb.com/docs/manual/reference/operator/query/type/#available-types

use indexmap::IndexMap;

/// Reserved attribute the downstream compiler reads as a type override.
/// Fixed string contract with `json-schema-to-typescript`; not configurable.
pub const DIRECTIVE_KEY: &str = "tsType";

/// TypeScript union/alternation syntax, used to join multi-type `bsonType`s.
pub const UNION_SEPARATOR: &str = "|";

/// Immutable BSON-to-TypeScript name table. Passed into the annotator as a
/// value so tests (or another target language) can swap tables without
/// global state. Lookup order is irrelevant; `IndexMap` just keeps the
/// debug/serde views deterministic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeMap {
    entries: IndexMap<String, String>,
}

impl TypeMap {
    /// The default table for TypeScript output.
    ///
    /// `object` and `array` are intentionally absent: the compiler infers
    /// those shapes itself from `properties`/`items`. `Decimal128`,
    /// `ObjectId` and `Double` are not built-ins and need an import line
    /// (see `imports`).
    pub fn typescript() -> Self {
        let entries = [
            // BSON -> TS
            ("string", "string"),
            ("number", "number"),
            ("int", "number"),
            ("double", "Double"),
            ("bool", "boolean"),
            ("date", "Date"),
            ("null", "null"),
            ("decimal", "Decimal128"),
            ("objectId", "ObjectId"),
        ]
        .into_iter()
        .map(|(b, t)| (b.to_string(), t.to_string()))
        .collect();
        Self { entries }
    }

    /// An empty table; every lookup defers to the downstream compiler.
    pub fn empty() -> Self {
        Self { entries: IndexMap::new() }
    }

    /// `Some(ts_name)` for a known BSON type, `None` for "no mapping"
    /// (the compiler's own inference from `type` applies instead).
    pub fn lookup(&self, bson_type: &str) -> Option<&str> {
        self.entries.get(bson_type).map(String::as_str)
    }

    pub fn with(mut self, bson_type: &str, ts_type: &str) -> Self {
        self.entries.insert(bson_type.to_string(), ts_type.to_string());
        self
    }

    pub fn without(mut self, bson_type: &str) -> Self {
        self.entries.shift_remove(bson_type);
        self
    }
}

impl Default for TypeMap {
    fn default() -> Self {
        Self::typescript()
    }
}

// ------------------------------- Tests ------------------------------------ //
