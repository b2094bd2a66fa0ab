//! Command-line interface.
//!
//! Every option falls back to the environment variable the Actions runner
//! sets for the matching action input (`INPUT_<NAME>`), so the binary can be
//! invoked from `action.yml` without arguments.

use clap::Parser;
use setup_task_core::request::LATEST;
use setup_task_github::inputs::parse_bool;
use setup_task_tools_github::{DEFAULT_API_BASE, DEFAULT_DOWNLOAD_BASE};
use std::path::PathBuf;

use crate::logging::TracingFormat;

#[derive(Parser, Debug)]
#[command(name = "setup-task")]
#[command(about = "Install the Task CLI and put it on PATH")]
#[command(long_about = None)]
#[command(disable_version_flag = true)]
pub struct Cli {
    #[arg(
        long,
        env = "INPUT_VERSION",
        default_value = LATEST,
        help = "Task version to install, or 'latest'"
    )]
    pub version: String,

    #[arg(
        long,
        env = "INPUT_VERSION-FROM-FILE",
        help = "File whose first line holds the version to install"
    )]
    pub version_from_file: Option<PathBuf>,

    #[arg(
        long,
        env = "INPUT_SKIP-CACHE",
        action = clap::ArgAction::Set,
        value_parser = parse_bool,
        num_args = 0..=1,
        default_value = "false",
        default_missing_value = "true",
        help = "Always download instead of using the cache"
    )]
    pub skip_cache: bool,

    #[arg(
        long,
        env = "INPUT_GITHUB-TOKEN",
        hide_env_values = true,
        help = "Token for GitHub API requests"
    )]
    pub github_token: Option<String>,

    #[arg(
        long,
        env = "INPUT_VARS",
        default_value = "",
        help = "KEY=VALUE lines exported to later steps"
    )]
    pub vars: String,

    #[arg(
        long,
        env = "INPUT_VERBOSE",
        action = clap::ArgAction::Set,
        value_parser = parse_bool,
        num_args = 0..=1,
        default_value = "false",
        default_missing_value = "true",
        help = "Show debug messages in the job log"
    )]
    pub verbose: bool,

    #[arg(
        long,
        env = "SETUP_TASK_CACHE_DIR",
        help = "Directory the executable is installed into from the cache"
    )]
    pub cache_dir: Option<PathBuf>,

    #[arg(
        long,
        env = "SETUP_TASK_CACHE_STORE",
        help = "Directory holding cache entries"
    )]
    pub cache_store: Option<PathBuf>,

    #[arg(
        long,
        env = "SETUP_TASK_WORK_DIR",
        help = "Scratch directory for downloads"
    )]
    pub work_dir: Option<PathBuf>,

    #[arg(
        long,
        env = "GITHUB_API_URL",
        default_value = DEFAULT_API_BASE,
        help = "GitHub API base URL"
    )]
    pub api_url: String,

    #[arg(
        long,
        env = "SETUP_TASK_DOWNLOAD_URL",
        default_value = DEFAULT_DOWNLOAD_BASE,
        help = "Base URL release archives are downloaded from"
    )]
    pub download_url: String,

    #[arg(
        long,
        env = "SETUP_TASK_LOG_FORMAT",
        value_enum,
        default_value = "compact",
        help = "Log format on stderr"
    )]
    pub log_format: TracingFormat,
}

#[cfg(test)]
mod tests {
    use super::*;

    const ISOLATED: [(&str, Option<&str>); 6] = [
        ("INPUT_VERSION", None),
        ("INPUT_VERSION-FROM-FILE", None),
        ("INPUT_SKIP-CACHE", None),
        ("INPUT_GITHUB-TOKEN", None),
        ("INPUT_VARS", None),
        ("INPUT_VERBOSE", None),
    ];

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        temp_env::with_vars(ISOLATED, || {
            Cli::try_parse_from(std::iter::once("setup-task").chain(args.iter().copied()))
        })
    }

    #[test]
    fn test_defaults() {
        let cli = parse(&[]).unwrap();
        assert_eq!(cli.version, "latest");
        assert!(cli.version_from_file.is_none());
        assert!(!cli.skip_cache);
        assert!(!cli.verbose);
        assert!(cli.github_token.is_none());
        assert_eq!(cli.vars, "");
    }

    #[test]
    fn test_version_is_an_option() {
        let cli = parse(&["--version", "3.42.0"]).unwrap();
        assert_eq!(cli.version, "3.42.0");
    }

    #[test]
    fn test_bare_boolean_flag_is_true() {
        let cli = parse(&["--skip-cache", "--verbose"]).unwrap();
        assert!(cli.skip_cache);
        assert!(cli.verbose);
    }

    #[test]
    fn test_boolean_spellings() {
        assert!(parse(&["--skip-cache", "TRUE"]).unwrap().skip_cache);
        assert!(!parse(&["--skip-cache", "False"]).unwrap().skip_cache);
        assert!(parse(&["--skip-cache", "yes"]).is_err());
    }

    #[test]
    fn test_inputs_from_environment() {
        let cli = temp_env::with_vars(
            [
                ("INPUT_VERSION", Some("3.40.0")),
                ("INPUT_SKIP-CACHE", Some("true")),
                ("INPUT_VARS", Some("A=1\nB=2")),
                ("INPUT_GITHUB-TOKEN", Some("ghp_x")),
            ],
            || Cli::try_parse_from(["setup-task"]),
        )
        .unwrap();

        assert_eq!(cli.version, "3.40.0");
        assert!(cli.skip_cache);
        assert_eq!(cli.vars, "A=1\nB=2");
        assert_eq!(cli.github_token.as_deref(), Some("ghp_x"));
    }
}
