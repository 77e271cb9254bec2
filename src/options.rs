//! Tool configuration: a strict JSON file (`bson2ts.json` by default) with
//! `$VAR` environment expansion for connection settings.
//!
//! Parsing is deliberately unforgiving: unknown fields and wrong-typed
//! fields are rejected rather than ignored, so a typo in the config file
//! cannot silently fall back to a default.

use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use thiserror::Error;

use crate::annotate::UnionPolicy;
use crate::compile::{CompileFlags, DEFAULT_BANNER};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),
    #[error("environment variable ${0} is not defined")]
    UndefinedEnvVar(String),
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
}

/// Wire names are camelCase to match the original `bson2ts.json` format.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct Config {
    /// MongoDB connection string, for the acquisition layer. Supports `$VAR`.
    pub uri: String,
    /// Database name. Supports `$VAR`.
    pub database: String,
    /// Directory generated files are written to.
    pub out: String,
    /// Banner lines prepended to every generated file.
    pub banner_comment: Vec<String>,
    /// How `bsonType` unions with unmapped members are annotated.
    pub union_policy: UnionPolicy,
    // Pass-through switches for the downstream compiler.
    pub enable_const_enums: bool,
    pub ignore_min_and_max_items: bool,
    pub strict_index_signatures: bool,
    pub unknown_any: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            uri: "mongodb://localhost:27017".to_string(),
            database: String::new(),
            out: "src/__generated__".to_string(),
            banner_comment: DEFAULT_BANNER.iter().map(|s| s.to_string()).collect(),
            union_policy: UnionPolicy::default(),
            enable_const_enums: true,
            ignore_min_and_max_items: false,
            strict_index_signatures: false,
            unknown_any: true,
        }
    }
}

impl Config {
    /// Reads and parses a config file. A missing file is not an error;
    /// defaults apply, matching the original tool.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let src = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let mut config = parse_config(&src)?;
        config.uri = expand_env(&config.uri)?;
        config.database = expand_env(&config.database)?;
        Ok(config)
    }

    /// The downstream-compiler switches in the form `prepare` forwards.
    pub fn compile_flags(&self) -> CompileFlags {
        CompileFlags {
            enable_const_enums: self.enable_const_enums,
            ignore_min_and_max_items: self.ignore_min_and_max_items,
            strict_index_signatures: self.strict_index_signatures,
            unknown_any: self.unknown_any,
        }
    }
}

/// Parses a config document, rejecting anything that is not an object with
/// exactly the known, correctly-typed fields.
pub fn parse_config(src: &str) -> Result<Config, ConfigError> {
    crate::path_de::from_str_with_path::<Config>(src).map_err(ConfigError::Invalid)
}

static ENV_VAR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$([A-Za-z_][A-Za-z0-9_]*)").unwrap());

/// Replaces every `$NAME` token with the value of the environment variable
/// `NAME`. Text without `$` passes through; an undefined variable is an
/// error rather than an empty substitution.
pub fn expand_env(value: &str) -> Result<String, ConfigError> {
    let mut out = String::with_capacity(value.len());
    let mut last = 0;
    for caps in ENV_VAR.captures_iter(value) {
        let token = caps.get(0).unwrap();
        let name = &caps[1];
        let expanded =
            std::env::var(name).map_err(|_| ConfigError::UndefinedEnvVar(name.to_string()))?;
        out.push_str(&value[last..token.start()]);
        out.push_str(&expanded);
        last = token.end();
    }
    out.push_str(&value[last..]);
    Ok(out)
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_yields_defaults() {
        assert_eq!(parse_config("{}").unwrap(), Config::default());
    }

    #[test]
    fn non_object_documents_are_invalid() {
        for src in ["null", "false", "true", "1", "1.1", "[]", "[\"1\"]", "\"\"", "\"x\"", "", "x"] {
            let err = parse_config(src).unwrap_err();
            assert!(err.to_string().starts_with("Invalid configuration"), "input {src:?}");
        }
    }

    #[test]
    fn unknown_fields_are_invalid() {
        assert!(parse_config(r#"{ "excessOption": false }"#).is_err());
        assert!(parse_config(r#"{ "enableConstEnums": false, "excessOption": false }"#).is_err());
    }

    #[test]
    fn wrong_typed_fields_are_invalid() {
        for src in [
            r#"{ "out": 1 }"#,
            r#"{ "bannerComment": true }"#,
            r#"{ "bannerComment": [false] }"#,
            r#"{ "enableConstEnums": "some string" }"#,
            r#"{ "ignoreMinAndMaxItems": { "x": 1 } }"#,
            r#"{ "strictIndexSignatures": null }"#,
            r#"{ "unknownAny": ["1"] }"#,
            r#"{ "unionPolicy": "bogus" }"#,
        ] {
            assert!(parse_config(src).is_err(), "input {src}");
        }
    }

    #[test]
    fn known_fields_override_defaults() {
        let config = parse_config(r#"{ "out": "newPath/", "bannerComment": ["some banner"] }"#).unwrap();
        assert_eq!(config.out, "newPath/");
        assert_eq!(config.banner_comment, vec!["some banner".to_string()]);
        assert_eq!(config.unknown_any, true, "untouched fields keep defaults");
    }

    #[test]
    fn compile_flags_mirror_the_parsed_fields() {
        let config = parse_config(
            r#"{ "enableConstEnums": false, "ignoreMinAndMaxItems": true, "unknownAny": false }"#,
        )
        .unwrap();
        let flags = config.compile_flags();
        assert!(!flags.enable_const_enums);
        assert!(flags.ignore_min_and_max_items);
        assert!(!flags.strict_index_signatures);
        assert!(!flags.unknown_any);
        assert_eq!(Config::default().compile_flags(), CompileFlags::default());
    }

    #[test]
    fn union_policy_parses_from_camel_case() {
        let config = parse_config(r#"{ "unionPolicy": "allOrNothing" }"#).unwrap();
        assert_eq!(config.union_policy, UnionPolicy::AllOrNothing);
    }

    #[test]
    fn expand_env_passes_plain_text_through() {
        assert_eq!(expand_env("SOME_VALUE").unwrap(), "SOME_VALUE");
        assert_eq!(expand_env("").unwrap(), "");
    }

    #[test]
    fn expand_env_substitutes_defined_variables() {
        // var name unique to this test; tests run in parallel
        unsafe { std::env::set_var("BSON2TS_TEST_DEFINED", "connection-string") };
        assert_eq!(expand_env("$BSON2TS_TEST_DEFINED").unwrap(), "connection-string");
        assert_eq!(
            expand_env("mongodb://$BSON2TS_TEST_DEFINED/db").unwrap(),
            "mongodb://connection-string/db"
        );
        unsafe { std::env::remove_var("BSON2TS_TEST_DEFINED") };
    }

    #[test]
    fn expand_env_errors_on_undefined_variable() {
        let err = expand_env("$BSON2TS_TEST_UNDEFINED").unwrap_err();
        assert!(matches!(err, ConfigError::UndefinedEnvVar(name) if name == "BSON2TS_TEST_UNDEFINED"));
    }
}
