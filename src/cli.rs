//! Minimal CLI: annotate → (compiler-ready schema JSON | banner preamble)
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use rayon::prelude::*;
use serde_json::Value;

use crate::annotate::{Annotator, UnionPolicy};
use crate::compile::{prepare, CompilerInput};
use crate::options::Config;
use crate::typemap::TypeMap;

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// annotate MongoDB $jsonSchema validators for a generic JSON-Schema-to-TypeScript compiler
#[derive(Parser, Debug)]
pub struct CommandLineInterface {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// annotate validator schemas and write compiler-ready JSON files
    Annotate(AnnotateOut),
    /// print the banner and import preamble each schema needs
    Preamble(PreambleOut),
}

#[derive(Args, Debug, Clone)]
struct InputSettings {
    /// One or more inputs. May be literal paths or quoted glob patterns.
    ///
    /// Each file holds either a bare $jsonSchema document or the collection
    /// options document `listCollections` returns (`validator.$jsonSchema`)
    #[arg(long, short, num_args = 1.., required = true)]
    input: Vec<String>,

    /// configuration file (defaults apply when it does not exist)
    #[arg(long, default_value = "bson2ts.json")]
    config: PathBuf,

    /// override the configured handling of partially-unmapped bsonType unions
    #[arg(long, value_enum)]
    union_policy: Option<UnionPolicy>,
}

#[derive(clap::Parser, Debug)]
struct AnnotateOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// output directory (config `out` if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// debugging
    #[arg(long)]
    no_op: bool,
}

#[derive(clap::Parser, Debug)]
struct PreambleOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// debugging
    #[arg(long)]
    no_op: bool,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl InputSettings {
    /// Config + annotator + the resolved input paths.
    fn load(&self) -> Result<(Config, Annotator, Vec<PathBuf>)> {
        let mut config = Config::load(&self.config)
            .with_context(|| format!("loading config {}", self.config.display()))?;
        if let Some(policy) = self.union_policy {
            config.union_policy = policy;
        }
        let annotator = Annotator::new(TypeMap::typescript(), config.union_policy);
        let paths = resolve_file_path_patterns(&self.input)?;
        Ok((config, annotator, paths))
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    pub fn run(&self) -> Result<()> {
        match &self.cmd {
            Command::Annotate(target) => {
                // debug path
                if target.no_op {
                    eprintln!("{self:#?}");
                    return Ok(());
                }

                let (config, annotator, paths) = target.input_settings.load()?;
                match output_target(target.out.as_deref(), &config.out, paths.len()) {
                    // a single input with no --out goes to stdout
                    None => {
                        let Some(input) = load_compiler_input(&paths[0], &annotator, &config)?
                        else {
                            return Ok(());
                        };
                        println!("{}", serde_json::to_string_pretty(&input.schema)?);
                        Ok(())
                    }
                    Some(out_dir) => {
                        std::fs::create_dir_all(&out_dir).with_context(|| {
                            format!("creating output directory {}", out_dir.display())
                        })?;

                        // schemas are independent; annotate them in parallel
                        paths
                            .par_iter()
                            .map(|path| annotate_to_dir(path, &annotator, &config, &out_dir))
                            .collect::<Result<Vec<()>>>()?;
                        Ok(())
                    }
                }
            }
            Command::Preamble(target) => {
                // debug path
                if target.no_op {
                    eprintln!("{self:#?}");
                    return Ok(());
                }

                let (config, annotator, paths) = target.input_settings.load()?;
                for path in &paths {
                    let Some(input) = load_compiler_input(path, &annotator, &config)? else {
                        continue;
                    };
                    println!("{}", input.banner);
                }
                Ok(())
            }
        }
    }
}

/// Where annotated output goes: `None` means stdout (a single input with no
/// `--out` override); otherwise the override, falling back to the configured
/// directory.
fn output_target(cli_out: Option<&Path>, config_out: &str, input_count: usize) -> Option<PathBuf> {
    match cli_out {
        Some(dir) => Some(dir.to_path_buf()),
        None if input_count == 1 => None,
        None => Some(PathBuf::from(config_out)),
    }
}

/// The compiler input for one file, or `None` (with a status line) when the
/// file holds no schema. Schema-less files are skipped, not failed, matching
/// how schema-less collections are treated when reading off a server.
fn load_compiler_input(
    path: &Path,
    annotator: &Annotator,
    config: &Config,
) -> Result<Option<CompilerInput>> {
    let doc = read_schema_file(path)?;

    let Some(schema) = unwrap_validator(doc) else {
        eprintln!("{}  {}", "-".dimmed(), path.display());
        return Ok(None);
    };

    let input = prepare(&schema, annotator, &config.banner_comment, config.compile_flags())
        .with_context(|| format!("annotating {}", path.display()))?;
    Ok(Some(input))
}

fn annotate_to_dir(path: &Path, annotator: &Annotator, config: &Config, out_dir: &Path) -> Result<()> {
    let Some(input) = load_compiler_input(path, annotator, config)? else {
        return Ok(());
    };

    let schema_src = serde_json::to_string_pretty(&input.schema)?;
    let out_path = out_dir.join(format!("{}.json", input.root_name));
    std::fs::write(&out_path, schema_src)
        .with_context(|| format!("writing {}", out_path.display()))?;

    eprintln!("{} {}", "OK".green(), input.root_name);
    Ok(())
}

fn read_schema_file(path: &Path) -> Result<Value> {
    let src = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read schema file {}", path.display()))?;
    crate::path_de::from_str_with_path::<Value>(&src)
        .map_err(|err| anyhow::anyhow!("{}: {err}", path.display()))
}

/// Accepts either a bare `$jsonSchema` document or a collection-options
/// document wrapping one under `validator.$jsonSchema`. Anything else has
/// no schema.
fn unwrap_validator(doc: Value) -> Option<Value> {
    if let Some(schema) = doc.pointer("/validator/$jsonSchema") {
        return Some(schema.clone());
    }
    doc.is_object().then_some(doc)
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn resolve_file_path_patterns<I>(patterns: I) -> Result<Vec<PathBuf>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn has_glob_chars(s: &str) -> bool {
        // Minimal glob detection for the `glob` crate syntax.
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'[' | b'{'))
    }

    let mut out = Vec::<PathBuf>::new();

    for raw in patterns {
        let pattern = raw.as_ref();

        if has_glob_chars(pattern) {
            // Treat as a glob pattern
            let mut matched_any = false;
            for entry in glob::glob(pattern)? {
                out.push(entry?);
                matched_any = true;
            }
            if !matched_any {
                // Pattern was explicitly a glob but matched nothing -> surface as an error
                bail!("glob pattern matched no files: {pattern}");
            }
        } else {
            // Treat as a literal path
            out.push(PathBuf::from(pattern));
        }
    }

    Ok(out)
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unwrap_validator_accepts_bare_schemas() {
        let doc = json!({ "title": "A", "bsonType": "object" });
        assert_eq!(unwrap_validator(doc.clone()), Some(doc));
    }

    #[test]
    fn unwrap_validator_unwraps_collection_options() {
        let doc = json!({
            "validator": { "$jsonSchema": { "title": "A" } },
            "validationLevel": "strict"
        });
        assert_eq!(unwrap_validator(doc), Some(json!({ "title": "A" })));
    }

    #[test]
    fn unwrap_validator_skips_schema_less_documents() {
        assert_eq!(unwrap_validator(json!(null)), None);
        assert_eq!(unwrap_validator(json!([1, 2])), None);
    }

    #[test]
    fn single_input_without_out_flag_goes_to_stdout() {
        assert_eq!(output_target(None, "src/__generated__", 1), None);
    }

    #[test]
    fn multiple_inputs_or_an_out_flag_write_to_a_directory() {
        assert_eq!(
            output_target(None, "src/__generated__", 2),
            Some(PathBuf::from("src/__generated__"))
        );
        assert_eq!(
            output_target(Some(Path::new("types/")), "src/__generated__", 1),
            Some(PathBuf::from("types/"))
        );
    }

    #[test]
    fn literal_paths_resolve_without_touching_the_fs() {
        let paths = resolve_file_path_patterns(["a/b.json", "c.json"]).unwrap();
        assert_eq!(paths, vec![PathBuf::from("a/b.json"), PathBuf::from("c.json")]);
    }

    #[test]
    fn unmatched_glob_is_an_error() {
        assert!(resolve_file_path_patterns(["no/such/dir/*.json"]).is_err());
    }
}
