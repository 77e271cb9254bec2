//! Turn MongoDB `$jsonSchema` collection validators into the input a
//! generic JSON-Schema-to-TypeScript compiler needs: a schema tree with
//! `tsType` directives injected for BSON-specific types, plus the banner
//! and import preamble the generated file must start with.

pub mod annotate;
pub mod cli;
pub mod compile;
pub mod imports;
pub mod options;
pub mod path_de;
pub mod typemap;

pub use annotate::{Annotator, UnionPolicy};
pub use compile::{compile_schema, prepare, CompileFlags, CompilerInput, SchemaCompiler};
pub use imports::{import_preamble, required_imports, uses_bson_type};
pub use options::{expand_env, parse_config, Config, ConfigError};
pub use typemap::TypeMap;
