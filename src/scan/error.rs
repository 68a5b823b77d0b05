use thiserror::Error;

use crate::smtp::ProbeError;

/// Failures setting up a scan. Once running, a scan always completes.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("resolver initialization failed: {source}")]
    ResolverInit {
        #[source]
        source: std::io::Error,
    },
    #[error("SMTP prober initialization failed: {source}")]
    ProberInit {
        #[source]
        source: ProbeError,
    },
}

impl ScanError {
    pub(crate) fn resolver_init(source: std::io::Error) -> Self {
        Self::ResolverInit { source }
    }

    pub(crate) fn prober_init(source: ProbeError) -> Self {
        Self::ProberInit { source }
    }
}
