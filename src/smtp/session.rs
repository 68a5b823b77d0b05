use std::io::{self, Read, Write};
use std::net::{SocketAddr, TcpStream};
use std::time::Duration;

#[cfg(feature = "with-tls")]
use native_tls::{HandshakeError, TlsConnector, TlsStream};

use super::{ProbeBudget, ProbeError, SmtpReply};

/// Longest single blocking read before the budget is checked again.
const POLL_SLICE: Duration = Duration::from_millis(100);

/// Reply lines are capped at 512 octets by RFC 5321; a peer sending far more
/// without a line break is not an SMTP server.
pub(crate) const MAX_LINE_LEN: usize = 1024;

pub(crate) const MAX_REPLY_LINES: usize = 32;

#[derive(Debug)]
enum StreamState {
    Plain(TcpStream),
    #[cfg(feature = "with-tls")]
    Tls(TlsStream<TcpStream>),
}

/// Minimal SMTP client: enough to read a greeting and exchange one-line
/// commands. Every blocking call is bounded by the caller's [`ProbeBudget`].
#[derive(Debug)]
pub(crate) struct SmtpSession {
    state: StreamState,
    buffer: Vec<u8>,
    timeout: Duration,
}

impl SmtpSession {
    /// `timeout` bounds each connect and write; the budget bounds the whole
    /// attempt.
    pub(crate) fn connect(
        addresses: &[SocketAddr],
        timeout: Duration,
        budget: &ProbeBudget<'_>,
    ) -> Result<(Self, SocketAddr), ProbeError> {
        let mut last_err = None;
        for addr in addresses {
            let wait = budget
                .next_wait(timeout)
                .ok_or_else(|| ProbeError::out_of_budget(budget, "connect"))?;
            match TcpStream::connect_timeout(addr, wait) {
                Ok(stream) => {
                    let session = Self {
                        state: StreamState::Plain(stream),
                        buffer: Vec::new(),
                        timeout,
                    };
                    return Ok((session, *addr));
                }
                Err(err) => {
                    last_err = Some(ProbeError::Connect {
                        target: addr.to_string(),
                        source: err,
                    })
                }
            }
        }
        Err(last_err.unwrap_or_else(|| {
            ProbeError::io(io::Error::new(
                io::ErrorKind::AddrNotAvailable,
                "no socket address available",
            ))
        }))
    }

    /// Wraps the connection in TLS before anything is read (SMTPS).
    #[cfg(feature = "with-tls")]
    pub(crate) fn upgrade_tls(
        self,
        domain: &str,
        connector: &TlsConnector,
        budget: &ProbeBudget<'_>,
    ) -> Result<Self, ProbeError> {
        let plain = match self.state {
            StreamState::Plain(stream) => stream,
            StreamState::Tls(_) => return Ok(self),
        };
        set_timeouts(&plain, budget, self.timeout, "TLS handshake")?;
        let tls = complete_handshake(connector, domain, plain, budget)?;
        Ok(Self {
            state: StreamState::Tls(tls),
            buffer: self.buffer,
            timeout: self.timeout,
        })
    }

    pub(crate) fn send_command(
        &mut self,
        command: &str,
        budget: &ProbeBudget<'_>,
    ) -> Result<SmtpReply, ProbeError> {
        let mut line = command.as_bytes().to_vec();
        line.extend_from_slice(b"\r\n");
        self.write_all(&line, budget)?;
        self.read_reply(budget)
    }

    pub(crate) fn quit(&mut self, budget: &ProbeBudget<'_>) {
        self.send_command("QUIT", budget).ok();
    }

    fn tcp(&self) -> &TcpStream {
        match &self.state {
            StreamState::Plain(stream) => stream,
            #[cfg(feature = "with-tls")]
            StreamState::Tls(stream) => stream.get_ref(),
        }
    }

    fn write_all(&mut self, data: &[u8], budget: &ProbeBudget<'_>) -> Result<(), ProbeError> {
        let wait = budget
            .next_wait(self.timeout)
            .ok_or_else(|| ProbeError::out_of_budget(budget, "write"))?;
        self.tcp()
            .set_write_timeout(Some(wait))
            .map_err(ProbeError::io)?;
        match &mut self.state {
            StreamState::Plain(stream) => {
                stream.write_all(data).map_err(ProbeError::io)?;
                stream.flush().map_err(ProbeError::io)
            }
            #[cfg(feature = "with-tls")]
            StreamState::Tls(stream) => {
                stream.write_all(data).map_err(ProbeError::io)?;
                stream.flush().map_err(ProbeError::io)
            }
        }
    }

    pub(crate) fn read_reply(&mut self, budget: &ProbeBudget<'_>) -> Result<SmtpReply, ProbeError> {
        let mut code: Option<u16> = None;
        let mut lines = Vec::new();
        loop {
            if lines.len() >= MAX_REPLY_LINES {
                return Err(ProbeError::Protocol(format!(
                    "reply exceeds {MAX_REPLY_LINES} lines"
                )));
            }
            let raw = self.read_line(budget)?;
            let line = parse_reply_line(&raw)?;
            if let Some(existing) = code {
                if existing != line.code {
                    return Err(ProbeError::Protocol(format!(
                        "inconsistent reply codes: {existing} vs {}",
                        line.code
                    )));
                }
            } else {
                code = Some(line.code);
            }
            lines.push(line.text);
            if line.last {
                break;
            }
        }
        let code =
            code.ok_or_else(|| ProbeError::Protocol("reply missing status code".to_string()))?;
        Ok(SmtpReply::new(code, lines.join("\n")))
    }

    fn read_line(&mut self, budget: &ProbeBudget<'_>) -> Result<String, ProbeError> {
        loop {
            if let Some(pos) = self.buffer.iter().position(|byte| *byte == b'\n') {
                let mut line = self.buffer.drain(..=pos).collect::<Vec<_>>();
                if line.ends_with(b"\r\n") {
                    line.truncate(line.len() - 2);
                } else {
                    line.truncate(line.len() - 1);
                }
                return String::from_utf8(line)
                    .map_err(|err| ProbeError::Protocol(format!("utf8 error: {err}")));
            }
            if self.buffer.len() > MAX_LINE_LEN {
                return Err(ProbeError::Protocol(format!(
                    "reply line exceeds {MAX_LINE_LEN} bytes"
                )));
            }

            let wait = budget
                .next_wait(POLL_SLICE)
                .ok_or_else(|| ProbeError::out_of_budget(budget, "read"))?;
            self.tcp()
                .set_read_timeout(Some(wait))
                .map_err(ProbeError::io)?;

            let mut buf = [0u8; 512];
            let read = match &mut self.state {
                StreamState::Plain(stream) => stream.read(&mut buf),
                #[cfg(feature = "with-tls")]
                StreamState::Tls(stream) => stream.read(&mut buf),
            };
            match read {
                Ok(0) => {
                    return Err(ProbeError::io(io::Error::new(
                        io::ErrorKind::UnexpectedEof,
                        "connection closed",
                    )));
                }
                Ok(read) => self.buffer.extend_from_slice(&buf[..read]),
                Err(err) if is_retryable(&err) => continue,
                Err(err) => return Err(ProbeError::io(err)),
            }
        }
    }
}

fn is_retryable(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut | io::ErrorKind::Interrupted
    )
}

#[cfg(feature = "with-tls")]
fn set_timeouts(
    stream: &TcpStream,
    budget: &ProbeBudget<'_>,
    timeout: Duration,
    stage: &'static str,
) -> Result<(), ProbeError> {
    let read = budget
        .next_wait(POLL_SLICE)
        .ok_or_else(|| ProbeError::out_of_budget(budget, stage))?;
    let write = budget
        .next_wait(timeout)
        .ok_or_else(|| ProbeError::out_of_budget(budget, stage))?;
    stream.set_read_timeout(Some(read)).map_err(ProbeError::io)?;
    stream.set_write_timeout(Some(write)).map_err(ProbeError::io)
}

#[derive(Debug, PartialEq, Eq)]
pub(crate) struct ReplyLine {
    pub(crate) code: u16,
    pub(crate) last: bool,
    pub(crate) text: String,
}

/// Splits `250-PIPELINING` / `250 OK` into code, continuation flag and text.
pub(crate) fn parse_reply_line(line: &str) -> Result<ReplyLine, ProbeError> {
    let code_part = line
        .get(..3)
        .ok_or_else(|| ProbeError::Protocol(format!("invalid reply: '{line}'")))?;
    let code = code_part
        .parse::<u16>()
        .map_err(|_| ProbeError::Protocol(format!("invalid code in line: '{line}'")))?;
    let last = line.as_bytes().get(3) != Some(&b'-');
    let text = line.get(4..).unwrap_or("").to_string();
    Ok(ReplyLine { code, last, text })
}

// A read timeout surfaces as `WouldBlock` mid-handshake; the budget decides
// whether to keep going.
#[cfg(feature = "with-tls")]
fn complete_handshake(
    connector: &TlsConnector,
    domain: &str,
    stream: TcpStream,
    budget: &ProbeBudget<'_>,
) -> Result<TlsStream<TcpStream>, ProbeError> {
    match connector.connect(domain, stream) {
        Ok(tls) => Ok(tls),
        Err(HandshakeError::Failure(err)) => Err(ProbeError::Tls { source: err }),
        Err(HandshakeError::WouldBlock(mut mid)) => loop {
            let wait = budget
                .next_wait(POLL_SLICE)
                .ok_or_else(|| ProbeError::out_of_budget(budget, "TLS handshake"))?;
            mid.get_ref()
                .set_read_timeout(Some(wait))
                .map_err(ProbeError::io)?;
            match mid.handshake() {
                Ok(tls) => break Ok(tls),
                Err(HandshakeError::Failure(err)) => {
                    break Err(ProbeError::Tls { source: err });
                }
                Err(HandshakeError::WouldBlock(next)) => mid = next,
            }
        },
    }
}
