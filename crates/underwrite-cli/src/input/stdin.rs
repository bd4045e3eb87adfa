use serde::de::DeserializeOwned;
use std::io::{self, Read};

/// Deserialize a JSON document piped on stdin.
/// Returns None when stdin is a terminal or the pipe is empty.
pub fn read_stdin<T: DeserializeOwned>() -> Result<Option<T>, Box<dyn std::error::Error>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;
    parse_piped(&buffer)
}

fn parse_piped<T: DeserializeOwned>(buffer: &str) -> Result<Option<T>, Box<dyn std::error::Error>> {
    let trimmed = buffer.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let value: T = serde_json::from_str(trimmed)
        .map_err(|e| format!("Failed to parse stdin as JSON: {e}"))?;
    Ok(Some(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use underwrite_core::DealInput;

    #[test]
    fn test_empty_pipe_is_none() {
        let parsed: Option<DealInput> = parse_piped("  \n").unwrap();
        assert!(parsed.is_none());
    }

    #[test]
    fn test_partial_deal_rejected() {
        let err = parse_piped::<DealInput>(r#"{"purchase_price": 100000}"#).unwrap_err();
        assert!(err.to_string().contains("stdin"));
    }
}
