use thiserror::Error;

use super::{ProbeBudget, SmtpReply};

/// Why a single host/port probe did not confirm a live server.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("no socket address for {host}:{port}")]
    NoAddress { host: String, port: u16 },
    #[error("connection to {target} failed: {source}")]
    Connect {
        target: String,
        #[source]
        source: std::io::Error,
    },
    #[error("I/O error: {source}")]
    Io {
        #[source]
        source: std::io::Error,
    },
    #[cfg(feature = "with-tls")]
    #[error("TLS handshake failed: {source}")]
    Tls {
        #[source]
        source: native_tls::Error,
    },
    #[error("probe budget exhausted during {stage}")]
    Timeout { stage: &'static str },
    #[error("superseded by an earlier port")]
    Cancelled,
    #[error("protocol error: {0}")]
    Protocol(String),
    #[error("unexpected reply to {stage}: {reply}")]
    UnexpectedReply { stage: &'static str, reply: SmtpReply },
}

impl ProbeError {
    pub(crate) fn io(source: std::io::Error) -> Self {
        Self::Io { source }
    }

    pub(crate) fn out_of_budget(budget: &ProbeBudget<'_>, stage: &'static str) -> Self {
        if budget.is_cancelled() {
            Self::Cancelled
        } else {
            Self::Timeout { stage }
        }
    }
}
