//! Command implementations.

use std::fs;
use std::io::{self, Read};
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use serde_json::Value;
use tracing::{info, info_span};

use fieldmap_engine::loader::{load_document, load_input};
use fieldmap_engine::{
    ErrorPolicy, FileTransformer, TransformError, Transformer, check_document,
    execute_mapping_report,
};

use crate::builtins::{BUILTINS, builtin_capabilities};
use crate::cli::{CheckArgs, RunArgs};
use crate::summary::{capability_table, issue_table, outcome_table};

/// Run a document and write its output.
pub fn run_mapping(args: &RunArgs) -> Result<()> {
    let span = info_span!("run", mapping = %args.mapping.display());
    let _guard = span.enter();
    let start = Instant::now();

    let input = read_input(args.input.as_deref())?;
    let policy = args.show_all_errors.then_some(ErrorPolicy::Aggregate);
    let transformer =
        FileTransformer::new(&args.mapping, builtin_capabilities()).with_policy(policy);

    let output = if args.summary {
        let document = transformer.document()?;
        let policy =
            policy.unwrap_or_else(|| ErrorPolicy::from_parameters(&document.parameters));
        let report =
            execute_mapping_report(&document, &input, transformer.capabilities(), policy)?;
        eprintln!("{}", outcome_table(&report));
        report.into_output()?
    } else {
        transformer.transform(&input)?
    };

    info!(
        elapsed_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
        "run finished"
    );
    write_output(&output, args.output.as_deref(), args.compact)
}

/// Check a document. Returns the number of issues found.
pub fn check_mapping(args: &CheckArgs) -> Result<usize> {
    let document = load_document(&args.mapping)?;
    let issues = check_document(&document, &builtin_capabilities());
    if issues.is_empty() {
        println!("{}: no issues found", args.mapping.display());
    } else {
        println!("{}", issue_table(&issues));
        println!("{} issue(s) in {}", issues.len(), args.mapping.display());
    }
    Ok(issues.len())
}

pub fn list_capabilities() {
    println!("{}", capability_table(BUILTINS));
}

/// Lines to print for a failed command.
///
/// Aggregated violations are listed one per line.
pub fn error_lines(error: &anyhow::Error) -> Vec<String> {
    match error.downcast_ref::<TransformError>() {
        Some(TransformError::Aggregated(violations)) => {
            let mut lines = vec![format!(
                "error: mapping failed with {} violation(s)",
                violations.len()
            )];
            lines.extend(violations.iter().map(|violation| format!("  - {violation}")));
            lines
        }
        _ => vec![format!("error: {error:#}")],
    }
}

fn read_input(path: Option<&Path>) -> Result<Value> {
    if let Some(path) = path {
        return Ok(load_input(path)?);
    }
    let mut raw = String::new();
    io::stdin()
        .read_to_string(&mut raw)
        .context("read input from stdin")?;
    serde_json::from_str(&raw).context("parse JSON input from stdin")
}

/// Render mapped output as JSON text.
pub fn render_output(output: &Value, compact: bool) -> Result<String> {
    let rendered = if compact {
        serde_json::to_string(output)
    } else {
        serde_json::to_string_pretty(output)
    };
    rendered.context("serialize output")
}

fn write_output(output: &Value, path: Option<&Path>, compact: bool) -> Result<()> {
    let rendered = render_output(output, compact)?;
    match path {
        Some(path) => fs::write(path, format!("{rendered}\n"))
            .with_context(|| format!("write output: {}", path.display())),
        None => {
            println!("{rendered}");
            Ok(())
        }
    }
}
