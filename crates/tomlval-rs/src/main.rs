//! Command-line front end for checking TOML documents against schemas.

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use log::{debug, info};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use toml::{Table, Value};
use tomlval_rs::{Schema, Validator, flatten};

/// Command-line options for the validator.
#[derive(Parser)]
#[command(name = "tomlval", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validate a document against a TOML schema description
    Check {
        /// Document to validate
        data: PathBuf,
        /// Schema description file
        #[arg(long)]
        schema: PathBuf,
        /// Report format
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },
    /// Print each flattened schema key with its expected types
    Schema {
        /// Schema description file
        schema: PathBuf,
    },
    /// Print every leaf of a document as `path = value`
    Flatten {
        /// Document to flatten
        data: PathBuf,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

/// Rendered command output.
struct Output {
    text: String,
    violations: bool,
}

/// Entry point for the tomlval CLI.
fn main() -> anyhow::Result<ExitCode> {
    tomlval_rs::init_logging();
    let cli = Cli::parse();
    let output = run(cli.command)?;
    if !output.text.is_empty() {
        println!("{}", output.text);
    }
    Ok(if output.violations {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

fn run(command: Command) -> anyhow::Result<Output> {
    match command {
        Command::Check {
            data,
            schema,
            format,
        } => check(&data, &schema, format),
        Command::Schema { schema } => {
            let schema = load_schema(&schema)?;
            Ok(Output {
                text: schema.to_string(),
                violations: false,
            })
        }
        Command::Flatten { data } => {
            let table = read_table(&data)?;
            let lines = flatten(&table)
                .into_iter()
                .map(|(path, value)| format!("{path} = {value}"))
                .collect::<Vec<_>>();
            Ok(Output {
                text: lines.join("\n"),
                violations: false,
            })
        }
    }
}

/// Validate `data` and render the report.
fn check(data: &Path, schema: &Path, format: Format) -> anyhow::Result<Output> {
    let schema = load_schema(schema)?;
    let document = Value::Table(read_table(data)?);
    let validator = Validator::new(&document, Some(&schema))?;
    let report = validator.validate();
    let violations = report.violations().count();
    info!(
        "checked document (path={}, outcomes={}, violations={})",
        data.display(),
        report.len(),
        violations
    );
    let text = match format {
        Format::Text => report.to_string(),
        Format::Json => {
            serde_json::to_string_pretty(&report).context("failed to encode report as JSON")?
        }
    };
    Ok(Output {
        text,
        violations: violations > 0,
    })
}

fn load_schema(path: &Path) -> anyhow::Result<Schema> {
    let description = read_table(path)?;
    let schema = Schema::from_toml(&description)
        .with_context(|| format!("invalid schema in {}", path.display()))?;
    debug!("loaded schema (path={}, keys={})", path.display(), schema.len());
    Ok(schema)
}

/// Read and decode a TOML file.
fn read_table(path: &Path) -> anyhow::Result<Table> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    toml::from_str(&contents).with_context(|| format!("failed to parse {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    /// Write `contents` under the temp dir and return its path.
    fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, contents).expect("write");
        path
    }

    /// A conforming document reports no violations.
    #[test]
    fn check_passes_conforming_document() {
        let dir = TempDir::new().expect("tmp");
        let schema = write(&dir, "schema.toml", "name = \"str\"\nport = \"int\"\n");
        let data = write(&dir, "data.toml", "name = \"api\"\nport = 8080\n");
        let output = check(&data, &schema, Format::Text).expect("check");
        assert!(!output.violations);
        assert_eq!(output.text, "name: ok\nport: ok");
    }

    /// Violations are rendered and flagged for a failing exit status.
    #[test]
    fn check_flags_violations() {
        let dir = TempDir::new().expect("tmp");
        let schema = write(&dir, "schema.toml", "name = \"str\"\nport = \"int\"\n");
        let data = write(&dir, "data.toml", "port = \"http\"\n");
        let output = check(&data, &schema, Format::Text).expect("check");
        assert!(output.violations);
        assert_eq!(
            output.text,
            "name: missing\nport: expected int, got str (\"http\")"
        );
    }

    #[test]
    fn check_renders_json() {
        let dir = TempDir::new().expect("tmp");
        let schema = write(&dir, "schema.toml", "port = \"int\"\n");
        let data = write(&dir, "data.toml", "port = 1\n");
        let output = check(&data, &schema, Format::Json).expect("check");
        let value: serde_json::Value = serde_json::from_str(&output.text).expect("json");
        assert_eq!(value, serde_json::json!({ "port": { "outcome": "ok" } }));
    }

    /// Schema errors carry the file name.
    #[test]
    fn invalid_schema_is_reported_with_path() {
        let dir = TempDir::new().expect("tmp");
        let schema = write(&dir, "schema.toml", "port = \"integer\"\n");
        let data = write(&dir, "data.toml", "port = 1\n");
        let err = check(&data, &schema, Format::Text).err().expect("error");
        let msg = format!("{err:#}");
        assert!(msg.contains("schema.toml"));
        assert!(msg.contains("unknown type 'integer'"));
    }

    #[test]
    fn missing_file_is_reported() {
        let dir = TempDir::new().expect("tmp");
        let err = read_table(&dir.path().join("absent.toml")).unwrap_err();
        assert!(format!("{err}").contains("failed to read"));
    }

    #[test]
    fn flatten_prints_paths_and_values() {
        let dir = TempDir::new().expect("tmp");
        let data = write(&dir, "data.toml", "tags = [\"a\"]\n[owner]\nid = 1\n");
        let output = run(Command::Flatten { data }).expect("flatten");
        assert_eq!(output.text, "owner.id = 1\ntags.[0] = \"a\"");
    }

    #[test]
    fn schema_prints_flattened_keys() {
        let dir = TempDir::new().expect("tmp");
        let schema = write(
            &dir,
            "schema.toml",
            "num = \"int | float\"\n[[items]]\nid = \"int\"\n",
        );
        let output = run(Command::Schema { schema }).expect("schema");
        assert_eq!(output.text, "items.[].id = int\nnum = (int, float)");
    }

    /// The argument parser accepts the documented command lines.
    #[test]
    fn parses_check_arguments() {
        let cli = Cli::try_parse_from([
            "tomlval", "check", "data.toml", "--schema", "schema.toml", "--format", "json",
        ])
        .expect("args");
        assert!(matches!(
            cli.command,
            Command::Check {
                format: Format::Json,
                ..
            }
        ));
    }
}
