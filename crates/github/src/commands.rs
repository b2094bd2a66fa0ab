//! Workflow command formatting.
//!
//! See <https://docs.github.com/actions/reference/workflow-commands-for-github-actions>.

/// Escape a command message so it stays on one line.
#[must_use]
pub fn escape_data(message: &str) -> String {
    message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

/// Format a workflow command such as `::warning::message`.
#[must_use]
pub fn format_command(command: &str, message: &str) -> String {
    format!("::{command}::{}", escape_data(message))
}

/// Format a `name=value` entry for a file command.
///
/// Values spanning several lines use the heredoc form with `delimiter`:
///
/// ```text
/// name<<delimiter
/// line one
/// line two
/// delimiter
/// ```
///
/// Returns `None` if `delimiter` occurs in the name or value.
#[must_use]
pub fn format_file_entry(name: &str, value: &str, delimiter: &str) -> Option<String> {
    if !value.contains('\n') && !value.contains('\r') && !name.contains('=') {
        return Some(format!("{name}={value}\n"));
    }
    if name.contains(delimiter) || value.contains(delimiter) {
        return None;
    }
    Some(format!("{name}<<{delimiter}\n{value}\n{delimiter}\n"))
}
