use serde_json::Value;

/// Pretty-print JSON to stdout.
pub fn print_json(value: &Value) {
    match render_json(value) {
        Ok(s) => println!("{}", s),
        Err(e) => eprintln!("JSON serialization error: {}", e),
    }
}

fn render_json(value: &Value) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(value)
}
