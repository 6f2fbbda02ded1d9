use anyhow::Result;
use clap::Args;
use serde::Serialize;
use serde_json::Value;
use sieve_core::execution::{ItemQuery, gather_batch};
use sieve_core::{AggregatedBatch, FilteredBatch};
use std::path::PathBuf;

use super::{OutputContext, display_bytes, layout_rows, load_input};
use crate::config::Config;

#[derive(Args)]
pub struct RunArgs {
    /// Input batch as JSON (defaults to the built-in reference batch)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Only print the aggregate result
    #[arg(long)]
    pub summary: bool,
}

#[derive(Serialize)]
struct RunReport<'a> {
    input_rows: usize,
    selection: &'a [u32],
    #[serde(skip_serializing_if = "Option::is_none")]
    filtered: Option<&'a FilteredBatch>,
    result: &'a AggregatedBatch,
}

pub fn execute(args: RunArgs, cfg: &Config, output: &OutputContext) -> Result<()> {
    let input_path = args.input.as_deref().or(cfg.input.as_deref());
    let input = load_input(input_path)?;
    let query = ItemQuery::new(cfg.query.clone())?;
    if output.verbose && !output.json {
        output.print_info(&format!("query parameters: {:?}", query.params()));
    }

    let selection = query.selection(&input)?;
    let filtered = gather_batch(&input, &selection)?;
    let result = query.aggregate(&filtered);

    if output.json {
        return output.print_json(&RunReport {
            input_rows: input.num_rows(),
            selection: selection.as_slice(),
            filtered: (!args.summary).then_some(&filtered),
            result: &result,
        });
    }

    output.print_info(&format!(
        "{} of {} rows selected",
        filtered.num_rows(),
        input.num_rows()
    ));

    if !args.summary {
        print_filtered(&filtered, selection.as_slice(), output);
    }
    print_result(&result, output);
    Ok(())
}

fn print_filtered(filtered: &FilteredBatch, selection: &[u32], output: &OutputContext) {
    let columns = filtered.columns();

    let rows: Vec<Vec<Value>> = selection
        .iter()
        .enumerate()
        .map(|(row, &source)| {
            vec![
                Value::from(row),
                Value::from(source),
                Value::from(columns.quantity[row]),
                Value::from(columns.price[row]),
                Value::from(columns.discount[row]),
                Value::from(display_bytes(columns.status.value(row).unwrap_or_default())),
                Value::from(display_bytes(columns.comment.value(row).unwrap_or_default())),
            ]
        })
        .collect();
    output.print_table(
        &["row", "source_row", "quantity", "price", "discount", "status", "comment"],
        &rows,
    );

    for (name, column) in [("status", &columns.status), ("comment", &columns.comment)] {
        println!(
            "{} buffer ({} bytes): {:?}",
            name,
            column.buffer().len(),
            display_bytes(column.buffer())
        );
        output.print_table(&["row", "offset", "length", "value"], &layout_rows(column));
    }
}

fn print_result(result: &AggregatedBatch, output: &OutputContext) {
    output.print_table(
        &["discount_ratio", "avg_price"],
        &[vec![
            Value::from(format!("{:.7}", result.discount_ratio())),
            Value::from(format!("{:.7}", result.avg_price())),
        ]],
    );
}
