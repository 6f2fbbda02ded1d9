use anyhow::{Result, bail};
use clap::Args;
use serde::Serialize;
use serde_json::Value;
use sieve_core::fixture::{self, EXPECTED_AVG_PRICE, EXPECTED_DISCOUNT_RATIO, RESULT_TOLERANCE};
use sieve_core::{aggregate, filter};

use super::OutputContext;

#[derive(Args)]
pub struct VerifyArgs {
    /// Absolute tolerance for each aggregate
    #[arg(long, default_value_t = RESULT_TOLERANCE)]
    pub tolerance: f64,
}

#[derive(Debug, Serialize)]
pub struct Check {
    pub name: &'static str,
    pub actual: f64,
    pub expected: f64,
    pub passed: bool,
}

/// Run the reference query on the reference batch and compare both aggregates
pub fn check_reference(tolerance: f64) -> Result<Vec<Check>> {
    let input = fixture::reference_batch()?;
    let result = aggregate(&filter(&input)?);

    Ok([
        ("discount_ratio", result.discount_ratio(), EXPECTED_DISCOUNT_RATIO),
        ("avg_price", result.avg_price(), EXPECTED_AVG_PRICE),
    ]
    .into_iter()
    .map(|(name, actual, expected)| Check {
        name,
        actual,
        expected,
        // NaN never passes
        passed: (actual - expected).abs() <= tolerance,
    })
    .collect())
}

pub fn execute(args: VerifyArgs, output: &OutputContext) -> Result<()> {
    if !(args.tolerance.is_finite() && args.tolerance >= 0.0) {
        bail!("tolerance must be a finite non-negative number, got {}", args.tolerance);
    }

    let checks = check_reference(args.tolerance)?;
    let passed = checks.iter().all(|check| check.passed);

    if output.json {
        output.print_json(&serde_json::json!({
            "passed": passed,
            "tolerance": args.tolerance,
            "checks": checks,
        }))?;
    } else {
        let rows: Vec<Vec<Value>> = checks
            .iter()
            .map(|check| {
                vec![
                    Value::from(check.name),
                    Value::from(format!("{:.7}", check.actual)),
                    Value::from(format!("{:.7}", check.expected)),
                    Value::from(if check.passed { "ok" } else { "MISMATCH" }),
                ]
            })
            .collect();
        output.print_table(&["aggregate", "actual", "expected", "status"], &rows);
    }

    if !passed {
        for check in checks.iter().filter(|check| !check.passed) {
            output.print_error(&format!(
                "{}: got {}, expected {} ± {}",
                check.name, check.actual, check.expected, args.tolerance
            ));
        }
        bail!("reference query result does not match");
    }

    if !output.json {
        output.print_success("reference query result matches");
    }
    Ok(())
}
