//! Output records produced by one execution pass.

use comfy_table::Cell;
use serde::{Serialize, Serializer};
use serde_json::{Value, json};

use crate::error::NodeError;
use crate::ui;

/// The shaped result of one successful conversion.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ConversionRecord {
    pub from_currency: String,
    pub to_currency: String,
    pub original_amount: f64,
    pub converted_amount: f64,
    pub rate: f64,
    pub timestamp: String,
}

/// One entry of the output sequence: a conversion record, or (in
/// failure-tolerant mode) the item's error paired back to its input.
#[derive(Debug, Clone)]
pub enum ItemOutcome {
    Success(ConversionRecord),
    Failure {
        /// The originating item's payload, passed through unchanged.
        json: Value,
        error: NodeError,
        /// Index correlating this error back to its input item.
        paired_item: usize,
    },
}

impl ItemOutcome {
    /// The record shape the host consumes.
    pub fn to_host_json(&self) -> Value {
        match self {
            ItemOutcome::Success(record) => json!({ "json": record }),
            ItemOutcome::Failure {
                json,
                error,
                paired_item,
            } => json!({
                "json": json,
                "error": error.to_string(),
                "pairedItem": paired_item,
            }),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ItemOutcome::Success(_))
    }
}

impl Serialize for ItemOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_host_json().serialize(serializer)
    }
}

/// Render a pass's outcomes as a styled table, with per-item errors listed
/// underneath.
pub fn display_as_table(outcomes: &[ItemOutcome]) -> String {
    let title = ui::style_text("Conversions", ui::StyleType::Title);
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Item"),
        ui::header_cell("From"),
        ui::header_cell("To"),
        ui::header_cell("Amount"),
        ui::header_cell("Converted"),
        ui::header_cell("Rate"),
        ui::header_cell("Timestamp"),
    ]);

    let mut errors = Vec::new();
    for (index, outcome) in outcomes.iter().enumerate() {
        match outcome {
            ItemOutcome::Success(record) => {
                table.add_row(vec![
                    Cell::new(index),
                    Cell::new(&record.from_currency),
                    Cell::new(&record.to_currency),
                    ui::amount_cell(record.original_amount),
                    ui::amount_cell(record.converted_amount),
                    ui::rate_cell(record.rate),
                    Cell::new(&record.timestamp),
                ]);
            }
            ItemOutcome::Failure {
                error, paired_item, ..
            } => {
                table.add_row(vec![
                    Cell::new(index),
                    ui::na_cell(true),
                    ui::na_cell(true),
                    ui::na_cell(true),
                    ui::na_cell(true),
                    ui::na_cell(true),
                    ui::na_cell(true),
                ]);
                errors.push(format!(
                    "item {}: {}",
                    paired_item,
                    ui::style_text(&error.to_string(), ui::StyleType::Error)
                ));
            }
        }
    }

    let mut output = format!("{title}\n\n{table}");
    for line in errors {
        output.push('\n');
        output.push_str(&line);
    }
    output
}
