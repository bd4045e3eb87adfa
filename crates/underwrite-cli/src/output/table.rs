use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::flatten_object;

/// Format output as a table using the tabled crate.
pub fn print_table(value: &Value) {
    println!("{}", render_table(value));
}

fn render_table(value: &Value) -> String {
    match value {
        Value::Object(map) => match map.get("result") {
            Some(Value::Object(result)) => render_analysis(result, map),
            _ => field_value_table(map),
        },
        Value::Array(rows) => rows_table(rows),
        other => format_cell(other),
    }
}

/// Analysis envelope: a field/value table of the result, then warnings
/// and methodology underneath.
fn render_analysis(result: &Map<String, Value>, envelope: &Map<String, Value>) -> String {
    let mut out = field_value_table(result);

    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            out.push_str("\n\nWarnings:");
            for w in warnings.iter().filter_map(Value::as_str) {
                out.push_str(&format!("\n  - {w}"));
            }
        }
    }

    if let Some(Value::String(methodology)) = envelope.get("methodology") {
        out.push_str(&format!("\n\nMethodology: {methodology}"));
    }

    out
}

fn field_value_table(map: &Map<String, Value>) -> String {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in flatten_object(map) {
        builder.push_record([key, format_cell(&val)]);
    }
    Table::from(builder).to_string()
}

/// One row per schedule year or batch entry; headers from the first row.
fn rows_table(rows: &[Value]) -> String {
    let Some(Value::Object(first)) = rows.first() else {
        return if rows.is_empty() {
            "(empty)".to_string()
        } else {
            rows.iter().map(format_cell).collect::<Vec<_>>().join("\n")
        };
    };

    let headers: Vec<String> = first.keys().cloned().collect();
    let mut builder = Builder::default();
    builder.push_record(headers.clone());
    for map in rows.iter().filter_map(Value::as_object) {
        builder.push_record(
            headers
                .iter()
                .map(|h| map.get(h).map(format_cell).unwrap_or_default()),
        );
    }
    Table::from(builder).to_string()
}

fn format_cell(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "-".to_string(),
        Value::Array(items) => items.iter().map(format_cell).collect::<Vec<_>>().join(", "),
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_analysis_table_includes_warnings() {
        let value = json!({
            "result": { "dscr": 0.9, "metrics": { "monthly_noi": 900.0 } },
            "methodology": "Rental Deal Underwriting (Fixed-Rate Amortizing Loan)",
            "warnings": ["DSCR below 1.20"]
        });
        let out = render_table(&value);
        assert!(out.contains("metrics.monthly_noi"));
        assert!(out.contains("  - DSCR below 1.20"));
        assert!(out.contains("Methodology: Rental Deal Underwriting"));
    }

    #[test]
    fn test_schedule_rows() {
        let value = json!([
            { "year": 1, "ending_balance": 237000.0 },
            { "year": 2, "ending_balance": 234000.0 }
        ]);
        let out = render_table(&value);
        assert!(out.contains("ending_balance"));
        assert!(out.contains("234000"));
    }

    #[test]
    fn test_empty_batch() {
        assert_eq!(render_table(&json!([])), "(empty)");
    }
}
