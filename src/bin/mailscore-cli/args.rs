use std::time::Duration;

use clap::Parser;
use mailscore_lib::{ProbeOptions, ScanOptions};

#[derive(Parser)]
#[command(name = "mailscore-cli", version)]
pub struct Cli {
    /// domaine à analyser (ex: example.com)
    pub domain: String,

    /// format: human|json|csv
    #[arg(long, default_value = "json")]
    pub format: String,

    /// write report to file (JSON/CSV selon --format)
    #[arg(long)]
    pub out: Option<String>,

    /// sélecteur DKIM à interroger (répétable, remplace la liste par défaut)
    #[arg(long = "dkim-selector")]
    pub dkim_selectors: Vec<String>,

    /// désactive la sonde SMTP
    #[arg(long = "no-smtp")]
    pub no_smtp: bool,

    /// budget par tentative SMTP, connexion + accueil + NOOP (ms)
    #[arg(long = "smtp-timeout-ms", default_value_t = 3_000)]
    pub smtp_timeout_ms: u64,

    /// timeout par requête DNS (ms)
    #[arg(long = "dns-timeout-ms", default_value_t = 5_000)]
    pub dns_timeout_ms: u64,

    /// budget global du scan (ms, 0 = illimité)
    #[arg(long = "deadline-ms", default_value_t = 30_000)]
    pub deadline_ms: u64,

    /// logs plus bavards sur stderr (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    pub fn scan_options(&self) -> ScanOptions {
        let mut options = ScanOptions::new()
            .with_smtp_probe(!self.no_smtp)
            .with_dns_timeout(Duration::from_millis(self.dns_timeout_ms))
            .with_deadline(match self.deadline_ms {
                0 => None,
                ms => Some(Duration::from_millis(ms)),
            })
            .with_probe_options(ProbeOptions {
                timeout: Duration::from_millis(self.smtp_timeout_ms),
                ..ProbeOptions::default()
            });
        if !self.dkim_selectors.is_empty() {
            options = options.with_dkim_selectors(self.dkim_selectors.iter().cloned());
        }
        options
    }

    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    }
}
