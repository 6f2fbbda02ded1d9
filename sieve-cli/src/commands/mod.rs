pub mod config;
pub mod like;
pub mod run;
pub mod verify;

use anyhow::{Context, Result};
use comfy_table::{Table, presets::UTF8_FULL};
use serde_json::Value;
use sieve_core::{InputBatch, StringColumn, fixture};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct OutputContext {
    pub json: bool,
    pub verbose: bool,
}

impl OutputContext {
    pub fn print_table(&self, columns: &[&str], rows: &[Vec<Value>]) {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.set_header(columns);

        for row in rows {
            let values: Vec<String> = row.iter().map(value_to_string).collect();
            table.add_row(values);
        }

        println!("{table}");
    }

    pub fn print_json<T: serde::Serialize>(&self, data: &T) -> Result<()> {
        println!("{}", serde_json::to_string_pretty(data)?);
        Ok(())
    }

    pub fn print_success(&self, message: &str) {
        use colored::Colorize;
        println!("{} {}", "✓".green(), message);
    }

    pub fn print_error(&self, message: &str) {
        use colored::Colorize;
        eprintln!("{} {}", "✗".red(), message);
    }

    pub fn print_info(&self, message: &str) {
        use colored::Colorize;
        println!("{} {}", "ℹ".blue(), message);
    }
}

/// Read a JSON batch, or fall back to the built-in reference batch
pub fn load_input(path: Option<&Path>) -> Result<InputBatch> {
    match path {
        Some(path) => {
            let content = fs::read_to_string(path)
                .with_context(|| format!("failed to read input batch {}", path.display()))?;
            let batch = InputBatch::from_json(&content)
                .with_context(|| format!("invalid input batch {}", path.display()))?;
            tracing::debug!(path = %path.display(), rows = batch.num_rows(), "loaded input batch");
            Ok(batch)
        }
        None => Ok(fixture::reference_batch()?),
    }
}

/// Printable form of a byte string
pub fn display_bytes(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

/// One row per string of `column`: row, offset, length and value
pub fn layout_rows(column: &StringColumn) -> Vec<Vec<Value>> {
    column
        .offsets()
        .iter()
        .zip(column.lengths())
        .enumerate()
        .map(|(row, (&offset, &length))| {
            vec![
                Value::from(row),
                Value::from(offset),
                Value::from(length),
                Value::from(display_bytes(column.value(row).unwrap_or_default())),
            ]
        })
        .collect()
}

fn value_to_string(v: &Value) -> String {
    match v {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Array(arr) => {
            let items: Vec<String> = arr.iter().map(value_to_string).collect();
            format!("[{}]", items.join(", "))
        }
        Value::Object(obj) => serde_json::to_string(obj).unwrap_or_default(),
    }
}
