//! Drives the whole transform for one schema: annotate, detect imports,
//! assemble the banner, and hand everything to a downstream compiler.
//!
//! The generic JSON-Schema-to-TypeScript compiler itself is an external
//! collaborator behind the [`SchemaCompiler`] trait; this crate only
//! prepares its input.

use anyhow::{bail, Result};
use serde_json::Value;

use crate::annotate::Annotator;
use crate::imports::import_preamble;

/// Banner lines prepended to every generated file unless the configuration
/// overrides them.
pub const DEFAULT_BANNER: [&str; 7] = [
    "/* eslint-disable */",
    "/* tslint:disable */",
    "/**",
    " * This file was automatically generated by bson2ts.",
    " * Do not modify it by hand. Instead, modify the MongoDB $jsonSchema",
    " * validator, and run bson2ts to regenerate this file.",
    " */",
];

/// Switches forwarded verbatim to the downstream compiler; this crate
/// never interprets them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompileFlags {
    pub enable_const_enums: bool,
    pub ignore_min_and_max_items: bool,
    pub strict_index_signatures: bool,
    pub unknown_any: bool,
}

impl Default for CompileFlags {
    fn default() -> Self {
        Self {
            enable_const_enums: true,
            ignore_min_and_max_items: false,
            strict_index_signatures: false,
            unknown_any: true,
        }
    }
}

/// Everything the downstream compiler needs for one schema.
#[derive(Debug, Clone, PartialEq)]
pub struct CompilerInput {
    /// The annotated schema tree (`tsType` directives injected).
    pub schema: Value,
    /// Name for the root type declaration, from the schema `title`.
    pub root_name: String,
    /// Banner comment with the import preamble appended.
    pub banner: String,
    /// Pass-through compiler switches from the configuration.
    pub flags: CompileFlags,
}

/// The out-of-process-of-this-crate generic compiler: annotated schema in,
/// type-declaration text out.
pub trait SchemaCompiler {
    fn compile(&self, input: &CompilerInput) -> Result<String>;
}

/// Builds the compiler input package for one validator schema.
///
/// Import detection runs on the original tree, before annotation, so the
/// result does not depend on how the annotator treats `bsonType`.
pub fn prepare(
    schema: &Value,
    annotator: &Annotator,
    banner_lines: &[String],
    flags: CompileFlags,
) -> Result<CompilerInput> {
    let root_name = match schema.get("title").and_then(Value::as_str) {
        Some(title) if !title.is_empty() => title.to_string(),
        _ => bail!("schema has no string `title`; one is required to name the generated type"),
    };

    let mut banner = banner_lines.join("\n");
    let preamble = import_preamble(schema);
    if !preamble.is_empty() {
        banner.push_str("\n\n");
        banner.push_str(&preamble.join("\n"));
    }

    Ok(CompilerInput {
        schema: annotator.annotate(schema),
        root_name,
        banner,
        flags,
    })
}

/// `prepare` + one compiler invocation.
pub fn compile_schema<C: SchemaCompiler>(
    compiler: &C,
    schema: &Value,
    annotator: &Annotator,
    banner_lines: &[String],
    flags: CompileFlags,
) -> Result<String> {
    let input = prepare(schema, annotator, banner_lines, flags)?;
    compiler.compile(&input)
}

// ------------------------------- Tests ------------------------------------ //
