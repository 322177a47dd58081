//! org-watch CLI entry point.
//!
//! This binary is the composition root for the entire system. Responsibilities:
//!
//! 1. **Parse configuration**: flags and their environment fallbacks
//!    ([`args::Args`]), validated into a [`watch::WatchConfig`].
//! 2. **Wire observability**: `tracing-subscriber` with a text or JSON layer,
//!    plus an OpenTelemetry OTLP exporter when `OTEL_EXPORTER_OTLP_ENDPOINT`
//!    is set.
//! 3. **Construct infrastructure**: `GithubFetcher`, `JsonFileStore`, and
//!    either `FeishuNotifier` or `LogNotifier` (`--dry-run`), injected into
//!    [`runner::Monitor`].
//! 4. **Run once and exit**: scheduling is left to cron or CI. The exit code
//!    is 0 when the run completes, even if nothing new was found, and 1 when
//!    the organization cannot be listed, the snapshot cannot be saved, or the
//!    configuration is invalid.

mod args;
mod telemetry;

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use github::{GithubConfig, GithubFetcher};
use runner::Monitor;
use store::JsonFileStore;
use watch::Notifier;
use webhook::{FeishuNotifier, LogNotifier};

use crate::args::Args;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let telemetry = match telemetry::init(args.log_format) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("org-watch: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    let code = match run(&args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %format!("{e:#}"), "Run failed");
            ExitCode::FAILURE
        }
    };

    telemetry.shutdown();
    code
}

async fn run(args: &Args) -> anyhow::Result<()> {
    let config = args.watch_config()?;

    let github_config = GithubConfig::new(config.organization.clone())
        .with_api_url(&args.github_api_url)
        .with_token(args.github_token.clone())
        .with_max_pages(args.max_pages);
    let fetcher = GithubFetcher::new(github_config).context("failed to build GitHub client")?;

    let store = JsonFileStore::new(&args.state_file);

    let notifier: Box<dyn Notifier> = if args.dry_run {
        Box::new(LogNotifier)
    } else {
        let url = args.require_webhook_url()?;
        Box::new(FeishuNotifier::new(url).context("failed to build webhook client")?)
    };

    tracing::info!(
        org = %config.organization,
        state_file = %args.state_file.display(),
        dry_run = args.dry_run,
        "Starting org-watch"
    );

    let report = Monitor::new(config, &fetcher, &store, notifier.as_ref())
        .run()
        .await?;

    tracing::info!(
        first_run = report.first_run,
        detected = report.detected,
        notified = report.notified,
        failed_deliveries = report.failed_deliveries,
        snapshot_size = report.snapshot_size,
        "org-watch completed"
    );
    Ok(())
}
