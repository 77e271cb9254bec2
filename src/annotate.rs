//! Schema annotator: a recursive walk over a `$jsonSchema` tree that injects
//! `tsType` directives wherever a `bsonType` resolves through the type table.
//!
//! The walk never mutates its input; it rebuilds the tree, so one schema can
//! be annotated under several tables/policies, and callers may run passes in
//! parallel. Trees are assumed finite and acyclic (`$ref` cycles are not
//! resolved and not detected).

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::typemap::{TypeMap, DIRECTIVE_KEY, UNION_SEPARATOR};

/// What to do with a `bsonType` union member that has no table entry.
///
/// The two published behaviors of the original tool; kept as a switch rather
/// than picking one silently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "camelCase")]
pub enum UnionPolicy {
    /// Keep the members that do map and drop the rest. No members mapped
    /// means no directive.
    #[default]
    KeepMapped,
    /// A single unmapped member withholds the whole directive, deferring the
    /// node to the downstream compiler's own inference.
    AllOrNothing,
}

#[derive(Debug, Clone, Default)]
pub struct Annotator {
    pub types: TypeMap,
    pub union_policy: UnionPolicy,
}

impl Annotator {
    pub fn new(types: TypeMap, union_policy: UnionPolicy) -> Self {
        Self { types, union_policy }
    }

    /// Returns a copy of `schema` with a `tsType` directive added to every
    /// object node whose `bsonType` resolves through the table — except
    /// nodes carrying an `enum`, which must stay literal unions.
    pub fn annotate(&self, schema: &Value) -> Value {
        match schema {
            Value::Array(items) => {
                Value::Array(items.iter().map(|item| self.annotate(item)).collect())
            }
            Value::Object(fields) => {
                let directive = if fields.contains_key("enum") {
                    // enum wins over any bsonType on the same node
                    None
                } else {
                    fields.get("bsonType").and_then(|bt| self.directive_for(bt))
                };

                let mut out = Map::with_capacity(fields.len() + 1);
                for (key, value) in fields {
                    out.insert(key.clone(), self.annotate(value));
                }
                if let Some(ts_type) = directive {
                    out.insert(DIRECTIVE_KEY.to_string(), Value::String(ts_type));
                }
                Value::Object(out)
            }
            // scalars and null are constraint values, not schema nodes
            scalar => scalar.clone(),
        }
    }

    /// The candidate directive for one `bsonType` value.
    ///
    /// A union joins its mapped members with `|` in input order; the order is
    /// kept byte-for-byte so generated output is reproducible. Malformed
    /// shapes (non-string scalars, nested arrays) count as unmapped rather
    /// than erroring.
    fn directive_for(&self, bson_type: &Value) -> Option<String> {
        match bson_type {
            Value::String(name) => self.types.lookup(name).map(str::to_string),
            Value::Array(members) => {
                let mut parts: Vec<&str> = Vec::with_capacity(members.len());
                for member in members {
                    let mapped = member.as_str().and_then(|name| self.types.lookup(name));
                    match mapped {
                        Some(ts) => parts.push(ts),
                        None => match self.union_policy {
                            UnionPolicy::KeepMapped => {}
                            UnionPolicy::AllOrNothing => return None,
                        },
                    }
                }
                if parts.is_empty() {
                    None
                } else {
                    Some(parts.join(UNION_SEPARATOR))
                }
            }
            _ => None,
        }
    }
}

// ------------------------------- Tests ------------------------------------ //
