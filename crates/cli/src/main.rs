//! `setup-task`: install the Task CLI on a CI agent.

mod cli;
mod logging;

use clap::Parser;
use clap::error::ErrorKind;
use setup_task_core::cache::{CacheStore, LocalCacheBackend};
use setup_task_core::environment::EnvironmentOverlay;
use setup_task_core::host::SystemProbe;
use setup_task_core::paths;
use setup_task_core::pipeline::InstallPipeline;
use setup_task_core::reporter::{Reporter, TracingReporter};
use setup_task_core::request::InstallRequest;
use setup_task_core::tools::{InstalledExecutable, Platform};
use setup_task_core::version::VersionResolver;
use setup_task_github::commands::format_command;
use setup_task_github::inputs::is_actions;
use setup_task_github::{ActionsHost, ActionsReporter};
use setup_task_tools_github::{ArchiveInstaller, GitHubReleaseIndex, HttpDownloader, http_client};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{debug, instrument};

use crate::cli::Cli;
use crate::logging::{TracingConfig, init_tracing};

#[tokio::main]
async fn main() -> ExitCode {
    let in_actions = is_actions();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            let _ = e.print();
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            if in_actions {
                #[allow(clippy::print_stdout)]
                {
                    println!("{}", format_command("error", e.to_string().trim_end()));
                }
            } else {
                let _ = e.print();
            }
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = init_tracing(&TracingConfig::for_run(cli.log_format, cli.verbose)) {
        #[allow(clippy::print_stderr)]
        {
            eprintln!("Warning: {e}");
        }
    }

    let reporter: Arc<dyn Reporter> = if in_actions {
        Arc::new(ActionsReporter::stdout(cli.verbose))
    } else {
        TracingReporter::shared()
    };

    match run(&cli, Arc::clone(&reporter)).await {
        Ok(installed) => {
            reporter.debug(&format!(
                "task available at {} ({})",
                installed.path.display(),
                installed.source
            ));
            ExitCode::SUCCESS
        }
        Err(e) => {
            reporter.fail(&e.to_string());
            ExitCode::FAILURE
        }
    }
}

/// Assemble the pipeline from the parsed inputs and run it once.
#[instrument(skip_all)]
async fn run(cli: &Cli, reporter: Arc<dyn Reporter>) -> setup_task_core::Result<InstalledExecutable> {
    let vars = EnvironmentOverlay::parse(&cli.vars, reporter.as_ref());
    let request = InstallRequest::new(&cli.version, cli.version_from_file.as_deref())?
        .with_cache(!cli.skip_cache)
        .with_auth_token(cli.github_token.clone())
        .with_vars(vars);

    let platform = Platform::current()?;
    let client = http_client()?;

    let index = GitHubReleaseIndex::new(client.clone()).with_api_base(&cli.api_url);
    let resolver = VersionResolver::new(Arc::new(index), Arc::clone(&reporter));

    let cache_dir = match &cli.cache_dir {
        Some(dir) => dir.clone(),
        None => paths::cache_dir()?,
    };
    let backend = match &cli.cache_store {
        Some(dir) => LocalCacheBackend::new(dir.clone()),
        None => LocalCacheBackend::from_env()?,
    };
    debug!(
        cache_dir = %cache_dir.display(),
        store = %backend.root().display(),
        "Cache locations"
    );
    let cache = CacheStore::new(Arc::new(backend), cache_dir, platform, Arc::clone(&reporter));

    let work_dir = cli.work_dir.clone().unwrap_or_else(paths::work_dir);
    let installer = ArchiveInstaller::new(
        platform,
        Arc::new(HttpDownloader::new(client)),
        work_dir,
        Arc::clone(&reporter),
    )
    .with_base_url(&cli.download_url);

    let host = ActionsHost::from_env(Arc::clone(&reporter));

    let pipeline = InstallPipeline::new(
        resolver,
        cache,
        Arc::new(installer),
        Arc::new(host),
        Arc::new(SystemProbe),
        reporter,
    );
    pipeline.run(&request).await
}
