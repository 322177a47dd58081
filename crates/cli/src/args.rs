//! Command-line arguments. Every flag can also be supplied through the
//! environment so the scheduler only needs to export secrets.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use watch::{DeliveryFailurePolicy, FirstRunPolicy, HighlightPatterns, RunError, WatchConfig};

#[derive(Debug, Parser)]
#[command(
    name = "org-watch",
    version,
    about = "Notify a chat webhook about new repositories, releases, and tags in a GitHub organization"
)]
pub struct Args {
    /// GitHub organization to watch.
    #[arg(long, env = "ORG_WATCH_ORG", default_value = "deepseek-ai")]
    pub org: String,

    /// Feishu custom-bot webhook URL. Required unless --dry-run is given.
    #[arg(long, env = "FEISHU_WEBHOOK_URL", hide_env_values = true)]
    pub webhook_url: Option<String>,

    /// GitHub token for a higher API rate limit.
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub github_token: Option<String>,

    /// GitHub API root.
    #[arg(long, env = "GITHUB_API_URL", default_value = github::DEFAULT_API_URL)]
    pub github_api_url: String,

    /// Where the snapshot of seen entities is kept between runs.
    #[arg(long, env = "ORG_WATCH_STATE_FILE", default_value = "org-watch-state.json")]
    pub state_file: PathBuf,

    /// Case-insensitive substrings that mark a release or tag as notable.
    #[arg(
        long,
        env = "ORG_WATCH_HIGHLIGHT",
        value_delimiter = ',',
        default_value = "v3,r2"
    )]
    pub highlight: Vec<String>,

    /// Behaviour when no previous snapshot exists.
    #[arg(long, env = "ORG_WATCH_FIRST_RUN", value_enum, default_value_t = FirstRunArg::Baseline)]
    pub first_run: FirstRunArg,

    /// Behaviour when a notification cannot be delivered.
    #[arg(
        long,
        env = "ORG_WATCH_ON_DELIVERY_FAILURE",
        value_enum,
        default_value_t = DeliveryFailureArg::Retry
    )]
    pub on_delivery_failure: DeliveryFailureArg,

    /// Maximum pages (of 100 items) fetched per GitHub listing.
    #[arg(long, env = "ORG_WATCH_MAX_PAGES", default_value_t = 10)]
    pub max_pages: u32,

    /// Log messages instead of posting them.
    #[arg(long, env = "ORG_WATCH_DRY_RUN")]
    pub dry_run: bool,

    /// Log output format.
    #[arg(long, env = "ORG_WATCH_LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FirstRunArg {
    /// Record everything without notifying.
    Baseline,
    /// Notify everything.
    ReportAll,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DeliveryFailureArg {
    /// Send again on the next run.
    Retry,
    /// Give up on the message.
    MarkSeen,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

impl From<FirstRunArg> for FirstRunPolicy {
    fn from(arg: FirstRunArg) -> Self {
        match arg {
            FirstRunArg::Baseline => FirstRunPolicy::Baseline,
            FirstRunArg::ReportAll => FirstRunPolicy::ReportAll,
        }
    }
}

impl From<DeliveryFailureArg> for DeliveryFailurePolicy {
    fn from(arg: DeliveryFailureArg) -> Self {
        match arg {
            DeliveryFailureArg::Retry => DeliveryFailurePolicy::Retry,
            DeliveryFailureArg::MarkSeen => DeliveryFailurePolicy::MarkSeen,
        }
    }
}

impl Args {
    /// Builds the domain configuration.
    pub fn watch_config(&self) -> Result<WatchConfig, RunError> {
        Ok(WatchConfig::for_organization(&self.org)?
            .with_highlight(HighlightPatterns::new(&self.highlight))
            .with_first_run(self.first_run.into())
            .with_delivery_failure(self.on_delivery_failure.into()))
    }

    /// The webhook URL, which must be present unless this is a dry run.
    pub fn require_webhook_url(&self) -> Result<&str, RunError> {
        self.webhook_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .ok_or_else(|| RunError::Configuration {
                message: "FEISHU_WEBHOOK_URL (or --webhook-url) is required unless --dry-run is set"
                    .to_string(),
            })
    }
}
