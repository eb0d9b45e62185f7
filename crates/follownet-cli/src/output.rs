//! Output formatting utilities

use crate::error::Result;
use colored::Colorize;
use serde::Serialize;

/// Print a section header
pub(crate) fn section(title: &str) {
    println!("\n{}", format!("=== {title} ===").cyan().bold());
}

/// Print a key-value pair
pub(crate) fn kv(key: &str, value: impl std::fmt::Display) {
    println!("  {}: {}", key.white().bold(), value);
}

/// Print a success message
pub(crate) fn success(msg: &str) {
    println!("{} {}", "[PASS]".green().bold(), msg);
}

/// Print a warning message
pub(crate) fn warning(msg: &str) {
    println!("{} {}", "[WARN]".yellow().bold(), msg);
}

/// Print a pass/warn line for a sanity check
pub(crate) fn check(ok: bool, msg: &str) {
    if ok {
        success(msg);
    } else {
        warning(msg);
    }
}

/// Print a value as pretty JSON on stdout
pub(crate) fn json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Format a float with fixed precision
pub(crate) fn float(value: f64) -> String {
    format!("{value:.4}")
}

/// Format percentages as a compact list
pub(crate) fn percents(values: &[f64]) -> String {
    values
        .iter()
        .map(|v| format!("{v:.2}%"))
        .collect::<Vec<_>>()
        .join(", ")
}
