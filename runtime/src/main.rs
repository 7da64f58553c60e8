//! `census` binary entry point.

use anyhow::Result;
use clap::Parser;
use sitemap_census::cli::census_cmd::{self, CensusArgs};
use tracing_subscriber::EnvFilter;

/// Count CSS class usage across every page listed in a set of sitemaps.
#[derive(Parser)]
#[command(name = "census", version, about)]
struct Cli {
    #[command(flatten)]
    args: CensusArgs,

    /// More log output (-v info, -vv debug). `RUST_LOG` takes precedence.
    #[arg(long, short, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit logs as JSON lines.
    #[arg(long)]
    log_json: bool,
}

fn init_tracing(verbose: u8, json: bool) -> Result<()> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::new("warn").add_directive(format!("sitemap_census={level}").parse()?),
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.log_json)?;

    census_cmd::run(&cli.args).await?;
    Ok(())
}
