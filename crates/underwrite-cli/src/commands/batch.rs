use clap::Args;
use serde_json::{Map, Value};

use underwrite_core::{underwrite_batch, DealInput, DealMetrics, UnderwriteResult};

use crate::input;

/// Keys of a serialized `DealMetrics`, used to pad failed rows.
const METRIC_KEYS: [&str; 9] = [
    "loan_amount",
    "monthly_principal_and_interest",
    "monthly_taxes",
    "monthly_insurance",
    "monthly_operating_expenses",
    "monthly_noi",
    "monthly_piti",
    "annual_cash_flow",
    "cash_on_cash_roi",
];

/// Arguments for batch underwriting
#[derive(Args)]
pub struct BatchArgs {
    /// Path to a JSON/YAML array or a CSV file with one deal per row
    #[arg(long)]
    pub input: String,

    /// Round money to cents and the return ratio to four places
    #[arg(long)]
    pub round: bool,
}

pub fn run_batch(args: BatchArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let deals: Vec<DealInput> = if input::file::is_csv(&args.input) {
        input::file::read_csv(&args.input)?
    } else {
        input::file::read_structured(&args.input)?
    };
    tracing::debug!(deals = deals.len(), path = %args.input, "underwriting batch");

    let results = underwrite_batch(&deals);
    let failures = results.iter().filter(|r| r.is_err()).count();
    if failures > 0 {
        tracing::warn!(failures, total = results.len(), "some deals failed to underwrite");
    }

    let rows = results
        .into_iter()
        .enumerate()
        .map(|(index, result)| batch_row(index, result, args.round))
        .collect::<Result<Vec<Value>, _>>()?;

    Ok(Value::Array(rows))
}

/// Flat row with the same keys whether the deal succeeded or failed.
fn batch_row(
    index: usize,
    result: UnderwriteResult<DealMetrics>,
    round: bool,
) -> Result<Value, serde_json::Error> {
    let mut row = Map::new();
    row.insert("index".into(), Value::from(index));

    match result {
        Ok(metrics) => {
            let metrics = if round { metrics.rounded() } else { metrics };
            if let Value::Object(fields) = serde_json::to_value(metrics)? {
                row.extend(fields);
            }
            row.insert("error".into(), Value::Null);
        }
        Err(e) => {
            for key in METRIC_KEYS {
                row.insert(key.into(), Value::Null);
            }
            row.insert("error".into(), Value::String(e.to_string()));
        }
    }

    Ok(Value::Object(row))
}
