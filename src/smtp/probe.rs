use std::net::{SocketAddr, ToSocketAddrs};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

#[cfg(feature = "with-tls")]
use native_tls::TlsConnector;
use tracing::debug;

use super::session::SmtpSession;
use super::{Candidate, ProbeBudget, ProbeError, ProbeOptions, SmtpReply};

/// Confirms that something answering SMTP listens on a host/port.
///
/// `Ok` means the server accepted `NOOP` with `250`; anything else is an
/// error and the caller moves on to the next candidate. Implementations must
/// give up once `budget` is exhausted.
pub trait SmtpProbe {
    fn probe(&self, candidate: &Candidate, budget: &ProbeBudget<'_>)
    -> Result<SmtpReply, ProbeError>;
}

/// Probes over real TCP connections: greeting, `NOOP`, `QUIT`.
#[derive(Debug, Clone)]
pub struct TcpProbe {
    options: ProbeOptions,
    #[cfg(feature = "with-tls")]
    connector: TlsConnector,
}

impl TcpProbe {
    pub fn new(options: &ProbeOptions) -> Result<Self, ProbeError> {
        Ok(Self {
            options: options.clone(),
            #[cfg(feature = "with-tls")]
            connector: liveness_connector()?,
        })
    }

    /// Whether `port` is wrapped in TLS before the greeting. Always `false`
    /// without the `with-tls` feature.
    pub fn implicit_tls(&self, port: u16) -> bool {
        cfg!(feature = "with-tls") && self.options.uses_implicit_tls(port)
    }

    fn open(
        &self,
        candidate: &Candidate,
        addresses: &[SocketAddr],
        budget: &ProbeBudget<'_>,
    ) -> Result<SmtpSession, ProbeError> {
        let (session, peer) = SmtpSession::connect(addresses, self.options.timeout, budget)?;
        debug!(%candidate, %peer, tls = self.implicit_tls(candidate.port), "connected");
        #[cfg(feature = "with-tls")]
        if self.implicit_tls(candidate.port) {
            return session.upgrade_tls(&candidate.host, &self.connector, budget);
        }
        Ok(session)
    }
}

impl SmtpProbe for TcpProbe {
    fn probe(
        &self,
        candidate: &Candidate,
        budget: &ProbeBudget<'_>,
    ) -> Result<SmtpReply, ProbeError> {
        let addresses = resolve_socket_addrs(candidate, self.options.timeout, budget)?;
        let mut session = self.open(candidate, &addresses, budget)?;

        let greeting = session.read_reply(budget)?;
        if !greeting.is_positive_completion() {
            session.quit(budget);
            return Err(ProbeError::UnexpectedReply {
                stage: "greeting",
                reply: greeting,
            });
        }

        let noop = session.send_command("NOOP", budget)?;
        session.quit(budget);
        if noop.is_ok() {
            Ok(noop)
        } else {
            Err(ProbeError::UnexpectedReply {
                stage: "NOOP",
                reply: noop,
            })
        }
    }
}

// Liveness only: a self-signed or mismatched certificate still proves a
// listening server.
#[cfg(feature = "with-tls")]
fn liveness_connector() -> Result<TlsConnector, ProbeError> {
    TlsConnector::builder()
        .danger_accept_invalid_certs(true)
        .danger_accept_invalid_hostnames(true)
        .build()
        .map_err(|err| ProbeError::Tls { source: err })
}

// getaddrinfo cannot be interrupted; a stuck lookup is left to finish on its
// own thread while the attempt gives up.
fn resolve_socket_addrs(
    candidate: &Candidate,
    timeout: Duration,
    budget: &ProbeBudget<'_>,
) -> Result<Vec<SocketAddr>, ProbeError> {
    let wait = budget
        .next_wait(timeout)
        .ok_or_else(|| ProbeError::out_of_budget(budget, "address lookup"))?;

    let (tx, rx) = mpsc::channel();
    let target = (candidate.host.clone(), candidate.port);
    thread::spawn(move || {
        let resolved = (target.0.as_str(), target.1)
            .to_socket_addrs()
            .map(|addrs| addrs.collect::<Vec<_>>());
        tx.send(resolved).ok();
    });

    let addresses = match rx.recv_timeout(wait) {
        Ok(resolved) => resolved.map_err(|err| ProbeError::Connect {
            target: candidate.to_string(),
            source: err,
        })?,
        Err(_) => return Err(ProbeError::out_of_budget(budget, "address lookup")),
    };
    if addresses.is_empty() {
        return Err(ProbeError::NoAddress {
            host: candidate.host.clone(),
            port: candidate.port,
        });
    }
    Ok(addresses)
}
