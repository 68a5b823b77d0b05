use std::time::Duration;

/// Controls how [`probe_mx`](crate::smtp::probe_mx) reaches the mail servers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeOptions {
    /// Tried in this order for every MX host.
    pub ports: Vec<u16>,
    /// Budget for one candidate: address lookup, connect, greeting and
    /// `NOOP` together, further capped by the scan deadline.
    pub timeout: Duration,
    /// Ports speaking TLS from the first byte (SMTPS). Only honoured with
    /// the `with-tls` feature; otherwise they are probed in clear text.
    pub implicit_tls_ports: Vec<u16>,
}

impl Default for ProbeOptions {
    fn default() -> Self {
        Self {
            ports: vec![25, 465, 587],
            timeout: Duration::from_secs(3),
            implicit_tls_ports: vec![465],
        }
    }
}

impl ProbeOptions {
    pub fn uses_implicit_tls(&self, port: u16) -> bool {
        self.implicit_tls_ports.contains(&port)
    }
}
