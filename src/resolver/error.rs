use thiserror::Error;

use super::QueryType;

/// Every way a lookup can come back without answers.
///
/// Checkers treat all variants the same ("no record"); the distinction only
/// shows up in logs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupFailure {
    #[error("{name} does not exist")]
    NxDomain { name: String },
    #[error("no {query} records for {name}")]
    NoRecords { name: String, query: QueryType },
    #[error("{query} lookup for {name} timed out")]
    Timeout { name: String, query: QueryType },
    #[error("scan deadline exceeded before {query} lookup for {name}")]
    DeadlineExceeded { name: String, query: QueryType },
    #[error("{query} lookup failed for {name}: {message}")]
    Resolver {
        name: String,
        query: QueryType,
        message: String,
    },
}

impl LookupFailure {
    pub(crate) fn nx_domain(name: impl Into<String>) -> Self {
        Self::NxDomain { name: name.into() }
    }

    pub(crate) fn no_records(name: impl Into<String>, query: QueryType) -> Self {
        Self::NoRecords {
            name: name.into(),
            query,
        }
    }

    pub(crate) fn timeout(name: impl Into<String>, query: QueryType) -> Self {
        Self::Timeout {
            name: name.into(),
            query,
        }
    }

    pub(crate) fn deadline(name: impl Into<String>, query: QueryType) -> Self {
        Self::DeadlineExceeded {
            name: name.into(),
            query,
        }
    }

    pub(crate) fn resolver(
        name: impl Into<String>,
        query: QueryType,
        message: impl Into<String>,
    ) -> Self {
        Self::Resolver {
            name: name.into(),
            query,
            message: message.into(),
        }
    }
}
