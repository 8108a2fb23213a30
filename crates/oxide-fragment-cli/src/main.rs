//! oxide-fragment CLI
//!
//! Expands a template against JSON arguments and prints the statement
//! rendered for a dialect.

use clap::{Parser, Subcommand};
use serde_json::Value;
use tracing::{Level, debug, error};
use tracing_subscriber::FmtSubscriber;

use oxide_fragment::{Arg, Dialect, Query, SqlValue};

/// Render SQL fragments for a dialect.
#[derive(Parser)]
#[command(name = "oxide-fragment")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Expand a template and render it.
    Render {
        /// Template with `?` placeholders and `??` literal question marks.
        #[arg(short, long)]
        template: String,

        /// Argument for the next `?`, as JSON (plain text if not valid JSON).
        #[arg(short, long = "arg")]
        args: Vec<String>,

        /// Target dialect (sql, mysql, postgres, raw).
        #[arg(short, long, env = "OXIDE_FRAGMENT_DIALECT", default_value = "sql")]
        dialect: Dialect,

        /// Print the statement and parameters as JSON.
        #[arg(long)]
        json: bool,
    },

    /// List the known dialects.
    Dialects,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Render {
            template,
            args,
            dialect,
            json,
        } => {
            let args = args.iter().map(String::as_str).map(parse_arg).collect();
            let query = Query::new(&template, args).with_dialect(dialect);

            let rendered = match query.to_sql() {
                Ok(rendered) => rendered,
                Err(e) => {
                    error!(sql = %e.sql, "Rendering failed");
                    return Err(e.into());
                }
            };

            if json {
                println!("{}", serde_json::to_string_pretty(&rendered)?);
            } else {
                println!("{}", rendered.sql);
                for (i, param) in rendered.params.iter().enumerate() {
                    println!("  {}: {}", i + 1, serde_json::to_string(param)?);
                }
            }
        }

        Commands::Dialects => {
            for dialect in Dialect::KNOWN {
                println!("{:<10} {}", dialect.name(), dialect.parameter_placeholder());
            }
        }
    }

    Ok(())
}

/// Parses one command-line argument.
fn parse_arg(raw: &str) -> Arg {
    match serde_json::from_str::<Value>(raw) {
        Ok(value) => json_to_arg(value),
        Err(e) => {
            debug!(arg = raw, error = %e, "Not JSON, binding as text");
            Arg::from(raw)
        }
    }
}

/// Maps a JSON value to the argument shape it stands for.
fn json_to_arg(value: Value) -> Arg {
    match value {
        Value::Array(items) => Arg::List(items.into_iter().map(json_to_value).collect()),
        Value::Object(map) => Arg::json(&map),
        scalar => Arg::Value(json_to_value(scalar)),
    }
}

fn json_to_value(value: Value) -> SqlValue {
    match value {
        Value::Null => SqlValue::Null,
        Value::Bool(b) => SqlValue::Bool(b),
        Value::Number(n) => n
            .as_i64()
            .map_or_else(|| SqlValue::Float(n.as_f64().unwrap_or(f64::NAN)), SqlValue::Int),
        Value::String(s) => SqlValue::Text(s),
        nested @ (Value::Array(_) | Value::Object(_)) => SqlValue::Text(nested.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_scalars() {
        assert!(matches!(parse_arg("1"), Arg::Value(SqlValue::Int(1))));
        assert!(matches!(parse_arg("1.5"), Arg::Value(SqlValue::Float(_))));
        assert!(matches!(parse_arg("true"), Arg::Value(SqlValue::Bool(true))));
        assert!(matches!(parse_arg("null"), Arg::Value(SqlValue::Null)));
        assert!(matches!(parse_arg(r#""a""#), Arg::Value(SqlValue::Text(s)) if s == "a"));
    }

    #[test]
    fn test_parse_plain_text() {
        assert!(matches!(parse_arg("Alice"), Arg::Value(SqlValue::Text(s)) if s == "Alice"));
    }

    #[test]
    fn test_parse_list_and_object() {
        match parse_arg("[1, \"b\", [2]]") {
            Arg::List(values) => assert_eq!(
                values,
                vec![
                    SqlValue::Int(1),
                    SqlValue::Text(String::from("b")),
                    SqlValue::Text(String::from("[2]"))
                ]
            ),
            other => panic!("Expected list, got {other:?}"),
        }
        assert!(matches!(parse_arg(r#"{"a": 1}"#), Arg::Json(_)));
    }

    #[test]
    fn test_cli_parses() {
        let cli = Cli::try_parse_from([
            "oxide-fragment",
            "render",
            "-t",
            "a = ?",
            "--arg",
            "1",
            "-d",
            "postgres",
        ])
        .unwrap();
        match cli.command {
            Commands::Render { dialect, args, .. } => {
                assert_eq!(dialect, Dialect::Postgres);
                assert_eq!(args, vec![String::from("1")]);
            }
            Commands::Dialects => panic!("Expected render"),
        }
    }
}
