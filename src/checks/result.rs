use std::fmt;

/// Outcome of one record check or service probe.
///
/// A positive score always comes with non-empty `data`. A zero score comes
/// with either no data (lookup failed) or an empty list (records exist but
/// none carries the expected marker).
#[cfg_attr(feature = "with-serde", derive(serde::Serialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordResult {
    #[cfg_attr(feature = "with-serde", serde(rename = "record_data"))]
    data: Option<Vec<String>>,
    detail: String,
    score: u32,
}

impl RecordResult {
    pub(crate) fn found(data: Vec<String>, detail: impl Into<String>, score: u32) -> Self {
        debug_assert!(!data.is_empty(), "found result without data");
        Self {
            data: Some(data),
            detail: detail.into(),
            score,
        }
    }

    /// Records exist, but none matched.
    pub(crate) fn unmatched(detail: impl Into<String>) -> Self {
        Self {
            data: Some(Vec::new()),
            detail: detail.into(),
            score: 0,
        }
    }

    pub(crate) fn not_found(detail: impl Into<String>) -> Self {
        Self {
            data: None,
            detail: detail.into(),
            score: 0,
        }
    }

    pub fn data(&self) -> Option<&[String]> {
        self.data.as_deref()
    }

    pub fn detail(&self) -> &str {
        &self.detail
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn is_found(&self) -> bool {
        self.score > 0
    }
}

impl fmt::Display for RecordResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "score={} {}", self.score, self.detail)
    }
}
