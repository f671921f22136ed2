//! Shared CLI helpers used across multiple command handlers.

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};

/// Read a line from stdin without its line terminator. Other whitespace is
/// kept. EOF reads as empty.
pub(crate) fn read_line() -> Result<String> {
    let mut input = String::new();
    io::stdin()
        .lock()
        .read_line(&mut input)
        .with_context(|| "Failed to read input")?;
    Ok(strip_line_ending(&input).to_string())
}

/// Print `message` on its own line and read the answer.
pub(crate) fn prompt(message: &str) -> Result<String> {
    println!("{}", message);
    io::stdout().flush().with_context(|| "Failed to flush stdout")?;
    read_line()
}

/// Remove one trailing `\n` or `\r\n`.
fn strip_line_ending(line: &str) -> &str {
    match line.strip_suffix('\n') {
        Some(rest) => rest.strip_suffix('\r').unwrap_or(rest),
        None => line,
    }
}
