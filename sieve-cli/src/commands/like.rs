use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use serde_json::Value;
use sieve_core::LikePattern;

use super::OutputContext;

#[derive(Args)]
pub struct LikeArgs {
    /// Pattern with exactly one `%`, e.g. `PROMO%SUMMER`
    pub pattern: String,

    /// Values to test against the pattern
    #[arg(required = true)]
    pub values: Vec<String>,
}

#[derive(Debug, Serialize)]
struct Probe<'a> {
    value: &'a str,
    matches: bool,
}

pub fn execute(args: LikeArgs, output: &OutputContext) -> Result<()> {
    let pattern: LikePattern = args
        .pattern
        .parse()
        .with_context(|| format!("invalid LIKE pattern '{}'", args.pattern))?;

    let probes: Vec<Probe<'_>> = args
        .values
        .iter()
        .map(|value| Probe {
            value,
            matches: pattern.matches(value.as_bytes()),
        })
        .collect();

    if output.json {
        return output.print_json(&serde_json::json!({
            "pattern": pattern.to_string(),
            "results": probes,
        }));
    }

    let rows: Vec<Vec<Value>> = probes
        .iter()
        .map(|probe| vec![Value::from(probe.value), Value::from(probe.matches)])
        .collect();
    output.print_table(&["value", "matches"], &rows);
    Ok(())
}
