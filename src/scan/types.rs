use crate::checks::{RecordKind, RecordResult};
use crate::smtp::SMTP_WEIGHT;

/// Highest reachable total: every record check plus the SMTP probe.
pub const MAX_SCORE: u32 = 9;

/// One result per record kind; the set is fixed.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Records {
    mx: RecordResult,
    a: RecordResult,
    aaaa: RecordResult,
    spf: RecordResult,
    dmarc: RecordResult,
    dkim: RecordResult,
    bimi: RecordResult,
}

impl Records {
    /// Builds the set by asking `result_for` once per kind, in
    /// [`RecordKind::ALL`] order.
    pub(crate) fn collect(mut result_for: impl FnMut(RecordKind) -> RecordResult) -> Self {
        Self {
            mx: result_for(RecordKind::Mx),
            a: result_for(RecordKind::A),
            aaaa: result_for(RecordKind::Aaaa),
            spf: result_for(RecordKind::Spf),
            dmarc: result_for(RecordKind::Dmarc),
            dkim: result_for(RecordKind::Dkim),
            bimi: result_for(RecordKind::Bimi),
        }
    }

    pub fn get(&self, kind: RecordKind) -> &RecordResult {
        match kind {
            RecordKind::Mx => &self.mx,
            RecordKind::A => &self.a,
            RecordKind::Aaaa => &self.aaaa,
            RecordKind::Spf => &self.spf,
            RecordKind::Dmarc => &self.dmarc,
            RecordKind::Dkim => &self.dkim,
            RecordKind::Bimi => &self.bimi,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (RecordKind, &RecordResult)> + '_ {
        RecordKind::ALL.into_iter().map(|kind| (kind, self.get(kind)))
    }

    pub fn score(&self) -> u32 {
        self.iter().map(|(_, result)| result.score()).sum()
    }
}

#[cfg_attr(feature = "with-serde", derive(serde::Serialize))]
#[cfg_attr(feature = "with-serde", serde(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceKind {
    Smtp,
}

impl ServiceKind {
    pub const ALL: [ServiceKind; 1] = [Self::Smtp];

    pub fn weight(self) -> u32 {
        match self {
            Self::Smtp => SMTP_WEIGHT,
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            Self::Smtp => "smtp",
        }
    }
}

/// Live-service probes.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Services {
    smtp: RecordResult,
}

impl Services {
    pub(crate) fn new(smtp: RecordResult) -> Self {
        Self { smtp }
    }

    pub fn smtp(&self) -> &RecordResult {
        &self.smtp
    }

    pub fn get(&self, kind: ServiceKind) -> &RecordResult {
        match kind {
            ServiceKind::Smtp => &self.smtp,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (ServiceKind, &RecordResult)> + '_ {
        ServiceKind::ALL.into_iter().map(|kind| (kind, self.get(kind)))
    }

    pub fn score(&self) -> u32 {
        self.iter().map(|(_, result)| result.score()).sum()
    }
}

/// Everything learned about one domain. Built once per scan, never mutated.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanResult {
    domain: String,
    records: Records,
    services: Services,
    total_score: u32,
}

impl ScanResult {
    pub(crate) fn new(domain: impl Into<String>, records: Records, services: Services) -> Self {
        let total_score = records.score() + services.score();
        Self {
            domain: domain.into(),
            records,
            services,
            total_score,
        }
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn records(&self) -> &Records {
        &self.records
    }

    pub fn services(&self) -> &Services {
        &self.services
    }

    pub fn total_score(&self) -> u32 {
        self.total_score
    }
}
