use std::time::Duration;

use crate::checks::DEFAULT_DKIM_SELECTORS;
use crate::smtp::ProbeOptions;

/// Tuning for [`scan_domain_with_options`](crate::scan_domain_with_options).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOptions {
    dkim_selectors: Vec<String>,
    dns_timeout: Duration,
    deadline: Option<Duration>,
    smtp_probe: bool,
    probe: ProbeOptions,
}

impl ScanOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one selector to the DKIM search list.
    pub fn with_dkim_selector(mut self, selector: impl Into<String>) -> Self {
        if let Some(normalized) = normalize_selector(selector.into()) {
            if !self.dkim_selectors.contains(&normalized) {
                self.dkim_selectors.push(normalized);
            }
        }
        self
    }

    /// Replaces the DKIM search list, keeping the given order.
    pub fn with_dkim_selectors<I, S>(mut self, selectors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dkim_selectors.clear();
        for selector in selectors {
            self = self.with_dkim_selector(selector);
        }
        self
    }

    pub fn with_dns_timeout(mut self, timeout: Duration) -> Self {
        self.dns_timeout = timeout;
        self
    }

    /// Overall budget for the whole scan; `None` disables it.
    pub fn with_deadline(mut self, deadline: Option<Duration>) -> Self {
        self.deadline = deadline;
        self
    }

    pub fn with_smtp_probe(mut self, enabled: bool) -> Self {
        self.smtp_probe = enabled;
        self
    }

    pub fn with_probe_options(mut self, probe: ProbeOptions) -> Self {
        self.probe = probe;
        self
    }

    pub fn dkim_selectors(&self) -> &[String] {
        &self.dkim_selectors
    }

    pub fn dns_timeout(&self) -> Duration {
        self.dns_timeout
    }

    pub fn deadline(&self) -> Option<Duration> {
        self.deadline
    }

    pub fn smtp_probe(&self) -> bool {
        self.smtp_probe
    }

    pub fn probe(&self) -> &ProbeOptions {
        &self.probe
    }
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            dkim_selectors: DEFAULT_DKIM_SELECTORS
                .iter()
                .map(|selector| selector.to_string())
                .collect(),
            dns_timeout: Duration::from_secs(5),
            deadline: Some(Duration::from_secs(30)),
            smtp_probe: true,
            probe: ProbeOptions::default(),
        }
    }
}

fn normalize_selector(input: String) -> Option<String> {
    let trimmed = input.trim().trim_end_matches('.');
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.to_ascii_lowercase())
}
