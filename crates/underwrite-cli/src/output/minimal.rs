use serde_json::Value;

/// Key underwriting answers, most decisive first.
const PRIORITY_KEYS: [&str; 5] = [
    "cash_on_cash_roi",
    "annual_cash_flow",
    "monthly_piti",
    "monthly_principal_and_interest",
    "ending_balance",
];

/// Print just the key answer value from the output.
pub fn print_minimal(value: &Value) {
    println!("{}", render_minimal(value));
}

/// Heuristic: unwrap the `result` envelope and any nested `metrics`, then
/// take the first well-known key; fall back to the first field. Arrays
/// (schedules, batches) render one line per element.
fn render_minimal(value: &Value) -> String {
    if let Value::Array(items) = value {
        return items
            .iter()
            .map(render_minimal)
            .collect::<Vec<_>>()
            .join("\n");
    }

    let mut result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);
    if let Some(metrics) = result_obj.get("metrics") {
        result_obj = metrics;
    }

    if let Value::Object(map) = result_obj {
        if let Some(Value::String(err)) = map.get("error") {
            return format!("error: {err}");
        }

        for key in &PRIORITY_KEYS {
            if let Some(val) = map.get(*key) {
                if !val.is_null() {
                    return format_minimal(val);
                }
            }
        }

        if let Some((key, val)) = map.iter().next() {
            return format!("{}: {}", key, format_minimal(val));
        }
    }

    format_minimal(result_obj)
}

fn format_minimal(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
