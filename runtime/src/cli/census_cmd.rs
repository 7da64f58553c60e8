//! `census` — crawl sitemaps and print per-class totals.

use crate::acquisition::http_client::HttpClient;
use crate::cartography::census::{Census, CensusReport, Reporter};
use crate::cli::output::Styled;
use crate::cli::report::{ConsoleReporter, JsonReporter};
use crate::config::{CensusConfig, FileConfig, Overrides};
use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;
use tracing::info;

/// Options for a census run.
#[derive(Debug, Clone, Default, Args)]
pub struct CensusArgs {
    /// Sitemap URL to crawl (repeatable). Overrides the config file.
    #[arg(long = "sitemap", value_name = "URL")]
    pub sitemaps: Vec<String>,

    /// CSS class name to count (repeatable, without the leading dot).
    #[arg(long = "class", value_name = "NAME")]
    pub classes: Vec<String>,

    /// JSON config file with `sitemaps`, `classes`, `timeout_ms`, `user_agent`.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Per-request timeout in milliseconds (no timeout by default).
    #[arg(long, value_name = "MS")]
    pub timeout_ms: Option<u64>,

    /// User-Agent header for every request.
    #[arg(long)]
    pub user_agent: Option<String>,

    /// Print the final report as JSON instead of console lines.
    #[arg(long)]
    pub json: bool,

    /// Only print errors and the final totals.
    #[arg(long, short)]
    pub quiet: bool,

    /// Disable colored output.
    #[arg(long)]
    pub no_color: bool,
}

impl CensusArgs {
    /// Resolve the effective configuration for these arguments.
    pub fn resolve_config(&self) -> Result<CensusConfig> {
        let file = match &self.config {
            Some(path) => FileConfig::load(path)?,
            None => FileConfig::default(),
        };
        let overrides = Overrides {
            sitemaps: self.sitemaps.clone(),
            classes: self.classes.clone(),
            timeout_ms: self.timeout_ms,
            user_agent: self.user_agent.clone(),
        };
        Ok(CensusConfig::resolve(file, overrides)?)
    }
}

/// Run the census command.
pub async fn run(args: &CensusArgs) -> Result<CensusReport> {
    let config = args.resolve_config().context("invalid configuration")?;
    info!(
        sitemaps = config.sitemaps.len(),
        classes = config.classes.len(),
        "starting census"
    );

    let client = HttpClient::new(&config.http()).context("failed to build HTTP client")?;
    let census = Census::new(client, config.sitemaps, config.classes);

    let mut reporter: Box<dyn Reporter> = if args.json {
        Box::new(JsonReporter::stdio())
    } else {
        Box::new(ConsoleReporter::stdio(Styled::new(args.no_color), args.quiet))
    };

    let report = census.run(reporter.as_mut()).await?;
    Ok(report)
}
