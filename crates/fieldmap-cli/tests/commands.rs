//! Integration tests for CLI commands.

use std::fs;
use std::path::PathBuf;

use fieldmap_cli::cli::{CheckArgs, RunArgs};
use fieldmap_cli::commands::{check_mapping, error_lines, render_output, run_mapping};
use serde_json::{Value, json};
use tempfile::TempDir;

fn run_args(mapping: PathBuf, input: PathBuf, output: PathBuf) -> RunArgs {
    RunArgs {
        mapping,
        input: Some(input),
        output: Some(output),
        show_all_errors: false,
        compact: false,
        summary: false,
    }
}

const CUSTOMER_MAPPING: &str = "\
mapping:
  name:
    to: client.name
    required: true
    function:
      name: join
      params: [separator, customer.first, customer.last]
  email:
    from: customer.email
    to: client.email
    default:
      function:
        name: lower
        params: [customer.login]
  vip:
    to: client.vip
    function:
      name: to_bool
      params: [customer.vip]
    condition:
      exists: customer.vip
";

#[test]
fn run_writes_mapped_output() {
    let dir = TempDir::new().unwrap();
    let mapping = dir.path().join("customer.yaml");
    let input = dir.path().join("input.json");
    let output = dir.path().join("output.json");
    fs::write(&mapping, CUSTOMER_MAPPING).unwrap();
    fs::write(
        &input,
        json!({
            "separator": " ",
            "customer": { "first": "Ada", "last": "Lovelace", "login": "ADA@EXAMPLE.COM", "vip": "yes" }
        })
        .to_string(),
    )
    .unwrap();

    run_mapping(&run_args(mapping, input, output.clone())).expect("run mapping");

    let written: Value = serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(
        written,
        json!({ "client": { "name": "Ada Lovelace", "email": "ada@example.com", "vip": true } })
    );
}

#[test]
fn run_reports_all_violations_when_requested() {
    let dir = TempDir::new().unwrap();
    let mapping = dir.path().join("strict.json");
    let input = dir.path().join("input.json");
    fs::write(
        &mapping,
        r#"{"mapping": {
            "node": {"from": "foo", "to": "bar", "required": true},
            "node2": {"from": "bar", "to": "foo", "required": true}
        }}"#,
    )
    .unwrap();
    fs::write(&input, "{}").unwrap();

    let mut args = run_args(mapping, input, dir.path().join("out.json"));
    let fail_fast = run_mapping(&args).unwrap_err();
    assert_eq!(error_lines(&fail_fast), ["error: Field foo required."]);

    args.show_all_errors = true;
    let aggregated = run_mapping(&args).unwrap_err();
    assert_eq!(
        error_lines(&aggregated),
        [
            "error: mapping failed with 2 violation(s)",
            "  - Field foo required.",
            "  - Field bar required.",
        ]
    );
    assert!(!dir.path().join("out.json").exists());
}

#[test]
fn run_with_summary_still_reports_violations() {
    let dir = TempDir::new().unwrap();
    let mapping = dir.path().join("partial.json");
    let input = dir.path().join("input.json");
    fs::write(
        &mapping,
        r#"{"mapping": {
            "name": {"from": "name", "required": true},
            "city": {"from": "city", "to": "address.city"}
        }}"#,
    )
    .unwrap();
    fs::write(&input, r#"{"city": "Paris"}"#).unwrap();

    let mut args = run_args(mapping, input, dir.path().join("out.json"));
    args.summary = true;
    args.show_all_errors = true;
    let err = run_mapping(&args).unwrap_err();
    assert_eq!(
        error_lines(&err),
        [
            "error: mapping failed with 1 violation(s)",
            "  - Field name required.",
        ]
    );
    assert!(!dir.path().join("out.json").exists());
}

#[test]
fn run_with_summary_produces_same_output() {
    let dir = TempDir::new().unwrap();
    let mapping = dir.path().join("customer.yaml");
    let input = dir.path().join("input.yaml");
    let output = dir.path().join("output.json");
    fs::write(&mapping, CUSTOMER_MAPPING).unwrap();
    fs::write(
        &input,
        "separator: '-'\ncustomer:\n  first: A\n  last: B\n  email: a@b.c\n",
    )
    .unwrap();

    let mut args = run_args(mapping, input, output.clone());
    args.summary = true;
    args.compact = true;
    run_mapping(&args).expect("run mapping");

    assert_eq!(
        fs::read_to_string(&output).unwrap(),
        "{\"client\":{\"name\":\"A-B\",\"email\":\"a@b.c\"}}\n"
    );
}

#[test]
fn check_counts_issues() {
    let dir = TempDir::new().unwrap();
    let clean = dir.path().join("clean.yaml");
    fs::write(&clean, CUSTOMER_MAPPING).unwrap();
    assert_eq!(check_mapping(&CheckArgs { mapping: clean }).unwrap(), 0);

    let broken = dir.path().join("broken.yaml");
    fs::write(
        &broken,
        "mapping:\n  a:\n    from: x\n    function:\n      name: shout\n      params: []\n",
    )
    .unwrap();
    assert_eq!(check_mapping(&CheckArgs { mapping: broken }).unwrap(), 2);

    let unsupported = dir.path().join("mapping.toml");
    fs::write(&unsupported, "").unwrap();
    let err = check_mapping(&CheckArgs {
        mapping: unsupported,
    })
    .unwrap_err();
    assert!(error_lines(&err)[0].starts_with("error: unsupported document format"));
}

#[test]
fn pretty_output_rendering() {
    let rendered = render_output(&json!({ "bar1": { "bar2": { "bar3": "foo" } } }), false).unwrap();
    insta::assert_snapshot!(rendered, @r#"
    {
      "bar1": {
        "bar2": {
          "bar3": "foo"
        }
      }
    }
    "#);
}
