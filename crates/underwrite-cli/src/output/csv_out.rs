use serde_json::{Map, Value};
use std::io::{self, Write};

use super::flatten_object;

/// Write output as CSV to stdout.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    if let Err(e) = write_csv(stdout.lock(), value) {
        eprintln!("CSV write error: {}", e);
    }
}

/// Objects become `field,value` pairs with nested keys dotted; arrays
/// become one record per element under the first element's headers.
fn write_csv<W: Write>(writer: W, value: &Value) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_writer(writer);

    match value {
        Value::Object(map) => {
            let body = match map.get("result") {
                Some(Value::Object(result)) => result,
                _ => map,
            };
            write_pairs(&mut wtr, body)?;
        }
        Value::Array(rows) => write_rows(&mut wtr, rows)?,
        other => wtr.write_record([format_field(other)])?,
    }

    wtr.flush()?;
    Ok(())
}

fn write_pairs<W: Write>(wtr: &mut csv::Writer<W>, map: &Map<String, Value>) -> Result<(), csv::Error> {
    wtr.write_record(["field", "value"])?;
    for (key, val) in flatten_object(map) {
        wtr.write_record([key, format_field(&val)])?;
    }
    Ok(())
}

fn write_rows<W: Write>(wtr: &mut csv::Writer<W>, rows: &[Value]) -> Result<(), csv::Error> {
    let Some(Value::Object(first)) = rows.first() else {
        for row in rows {
            wtr.write_record([format_field(row)])?;
        }
        return Ok(());
    };

    let headers: Vec<&String> = first.keys().collect();
    wtr.write_record(&headers)?;
    for map in rows.iter().filter_map(Value::as_object) {
        wtr.write_record(
            headers
                .iter()
                .map(|h| map.get(*h).map(format_field).unwrap_or_default()),
        )?;
    }
    Ok(())
}

fn format_field(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn render(value: &Value) -> String {
        let mut buf = Vec::new();
        write_csv(&mut buf, value).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_metrics_as_pairs() {
        let out = render(&json!({ "loan_amount": 240000.0, "monthly_noi": 1975.0 }));
        assert_eq!(out, "field,value\nloan_amount,240000.0\nmonthly_noi,1975.0\n");
    }

    #[test]
    fn test_batch_rows_with_failure() {
        let out = render(&json!([
            { "index": 0, "loan_amount": 150000.0, "error": null },
            { "index": 1, "loan_amount": null, "error": "Degenerate investment" }
        ]));
        assert_eq!(
            out,
            "error,index,loan_amount\n,0,150000.0\nDegenerate investment,1,\n"
        );
    }
}
