pub mod compile;
pub mod completions;
pub mod extract;
pub mod info;
pub mod validate;

use console::Style;

pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_FAILURE: u8 = 1;
pub const EXIT_INVALID: u8 = 2;
pub const EXIT_INPUT_ERROR: u8 = 3;

pub fn json_pretty(value: &impl serde::Serialize) -> Result<String, String> {
    serde_json::to_string_pretty(value).map_err(|e| format!("JSON serialization failed: {e}"))
}

/// Map an error message from a command to the process exit code.
pub fn exit_code_for(msg: &str) -> u8 {
    if msg.starts_with("failed to read")
        || msg.starts_with("invalid config")
        || msg.starts_with("unknown theme")
        || msg.starts_with("output path")
        || msg.starts_with("container I/O error")
    {
        EXIT_INPUT_ERROR
    } else if msg.starts_with("invalid .mpdf file")
        || msg.starts_with("invalid entry name")
        || msg.starts_with("duplicate entry")
        || msg.starts_with("archive error")
        || msg.starts_with("manifest error")
    {
        EXIT_INVALID
    } else {
        EXIT_FAILURE
    }
}

pub fn ok_mark() -> String {
    Style::new().green().bold().apply_to("✓").to_string()
}

pub fn fail_mark() -> String {
    Style::new().red().bold().apply_to("✗").to_string()
}

pub fn warn_mark() -> String {
    Style::new().yellow().bold().apply_to("!").to_string()
}

pub fn heading(text: &str) -> String {
    Style::new().bold().apply_to(text).to_string()
}
