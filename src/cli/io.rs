//! JSON I/O handling for CLI
//!
//! - Input: JSON objects, one per line
//! - Output: one JSON object per line
//! - UTF-8 only

use std::io::{self, BufRead, Read, Write};

use serde_json::Value;

use super::errors::{CliError, CliResult};

/// Read one JSON document from stdin
pub fn read_request() -> CliResult<Value> {
    let mut input = String::new();
    io::stdin().lock().read_to_string(&mut input)?;

    if input.trim().is_empty() {
        return Err(CliError::io_error("Empty input"));
    }

    let value: Value = serde_json::from_str(&input)?;
    Ok(value)
}

/// Read line-delimited JSON requests; blank lines are skipped
pub fn read_requests<R: BufRead>(input: R) -> impl Iterator<Item = CliResult<Value>> {
    input.lines().filter_map(|line| match line {
        Err(e) => Some(Err(CliError::from(e))),
        Ok(line) if line.trim().is_empty() => None,
        Ok(line) => Some(serde_json::from_str(&line).map_err(CliError::from)),
    })
}

/// Write a success response
pub fn write_response<W: Write>(out: &mut W, data: Value) -> CliResult<()> {
    let response = serde_json::json!({
        "status": "ok",
        "data": data
    });

    serde_json::to_writer(&mut *out, &response)?;
    writeln!(out)?;
    out.flush()?;

    Ok(())
}

/// Write an error response
pub fn write_error<W: Write>(out: &mut W, code: &str, message: &str) -> CliResult<()> {
    let response = serde_json::json!({
        "status": "error",
        "code": code,
        "message": message
    });

    serde_json::to_writer(&mut *out, &response)?;
    writeln!(out)?;
    out.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_read_requests_skips_blank_lines() {
        let input = "{\"op\":\"list\"}\n\n   \n{\"op\":\"remove\",\"id\":\"ubc\"}\nnot json\n";
        let parsed: Vec<_> = read_requests(input.as_bytes()).collect();
        assert_eq!(parsed.len(), 3);
        assert_eq!(parsed[0].as_ref().unwrap(), &json!({"op": "list"}));
        assert!(parsed[2].is_err());
    }

    #[test]
    fn test_response_lines() {
        let mut out = Vec::new();
        write_response(&mut out, json!(["ubc"])).unwrap();
        write_error(&mut out, "INSIGHT_NOT_FOUND", "gone").unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<Value> = text.lines().map(|l| serde_json::from_str(l).unwrap()).collect();
        assert_eq!(lines[0], json!({"status": "ok", "data": ["ubc"]}));
        assert_eq!(lines[1]["code"], json!("INSIGHT_NOT_FOUND"));
    }
}
