//! JSON output for CLI commands
//!
//! - Output: single JSON object per line on stdout
//! - UTF-8 only

use std::io::{self, Write};

use serde_json::Value;

use super::errors::CliResult;

/// Write a success response to stdout
pub fn write_response(data: Value) -> CliResult<()> {
    let response = serde_json::json!({
        "status": "ok",
        "data": data
    });
    write_line(&response)
}

fn write_line(value: &Value) -> CliResult<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer(&mut stdout, value)?;
    writeln!(stdout)?;
    stdout.flush()?;
    Ok(())
}
