#[path = "mailscore-cli/args.rs"]
mod args;
#[path = "mailscore-cli/output.rs"]
mod output;

use anyhow::{Context, Result};
use mailscore_lib::scan_domain_with_options;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::args::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| cli.log_filter().into()))
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    let result = scan_domain_with_options(&cli.domain, &cli.scan_options())
        .with_context(|| format!("scan de {}", cli.domain))?;
    output::write_report(&result, &cli)
}
