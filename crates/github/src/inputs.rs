//! Action inputs.
//!
//! The runner passes each input `foo-bar` as the environment variable
//! `INPUT_FOO-BAR`. Hyphens are kept; spaces become underscores.

use setup_task_core::{Error, Result};

/// Parse a boolean input value.
///
/// Accepts `true`, `True`, `TRUE`, `false`, `False`, `FALSE`. An empty value
/// is `false`.
///
/// # Errors
///
/// Returns [`Error::Configuration`] for any other value.
pub fn parse_bool(value: &str) -> Result<bool> {
    match value.trim() {
        "true" | "True" | "TRUE" => Ok(true),
        "false" | "False" | "FALSE" | "" => Ok(false),
        other => Err(Error::configuration(format!(
            "boolean input must be one of true|True|TRUE|false|False|FALSE, got '{other}'"
        ))),
    }
}

/// Whether the process runs inside a GitHub Actions job.
#[must_use]
pub fn is_actions() -> bool {
    std::env::var("GITHUB_ACTIONS").is_ok_and(|v| v == "true")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bool_accepted_spellings() {
        for value in ["true", "True", "TRUE"] {
            assert!(parse_bool(value).unwrap());
        }
        for value in ["false", "False", "FALSE", ""] {
            assert!(!parse_bool(value).unwrap());
        }
    }

    #[test]
    fn test_parse_bool_rejects_other_values() {
        for value in ["yes", "1", "tRuE", "on"] {
            let err = parse_bool(value).unwrap_err();
            assert!(matches!(err, Error::Configuration { .. }));
            assert!(err.to_string().contains(value));
        }
    }

    #[test]
    fn test_is_actions() {
        temp_env::with_var("GITHUB_ACTIONS", Some("true"), || assert!(is_actions()));
        temp_env::with_var("GITHUB_ACTIONS", Some("false"), || assert!(!is_actions()));
        temp_env::with_var_unset("GITHUB_ACTIONS", || assert!(!is_actions()));
    }
}
