//! Loading raw inputs from disk or stdin.

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use hts_model::RawInput;

/// Reads a JSON array of raw values. `-` reads stdin.
pub fn load_raw_input(path: &Path) -> Result<RawInput> {
    let text = if path == Path::new("-") {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("read raw input from stdin")?;
        text
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("read raw input {}", path.display()))?
    };
    parse_raw_input(&text).with_context(|| format!("parse raw input {}", path.display()))
}

/// Parses a JSON array of raw values.
pub fn parse_raw_input(text: &str) -> Result<RawInput> {
    let input: RawInput =
        serde_json::from_str(text).context("expected a JSON array of codes, numbers or null")?;
    tracing::debug!(positions = input.len(), "loaded raw input");
    Ok(input)
}
