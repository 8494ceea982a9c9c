//! CLI output formatting module
//!
//! Every command result renders either as human-readable text or as JSON.

pub mod progress;
pub mod table;

use serde::Serialize;

pub use progress::create_progress_bar;
pub use table::TableFormatter;

/// Command results printable as a human summary or as JSON.
pub trait CommandOutput: Serialize {
    fn to_human(&self) -> String;
    fn to_json(&self) -> serde_json::Value;
}

/// Print `result` in the selected mode.
pub fn output<T: CommandOutput>(result: &T, json_mode: bool) {
    if json_mode {
        println!("{}", serde_json::to_string_pretty(&result.to_json()).unwrap_or_default());
    } else {
        println!("{}", result.to_human());
    }
}
