//! A single timed GET request and its classified outcome.

use std::fmt;
use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, warn};
use url::Url;

use crate::error::Result;
use crate::status;

/// Classified result of one probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// The server answered.
    Status { code: u16, reason: &'static str },
    /// The connection failed or the request timed out.
    NetworkError,
}

impl ProbeOutcome {
    /// Build a status outcome, falling back to [`status::UNKNOWN_STATUS`] for
    /// codes missing from the reason-phrase table.
    pub fn from_code(code: u16) -> Self {
        let reason = status::reason_phrase(code).unwrap_or_else(|| {
            warn!(code, "unknown status code");
            status::UNKNOWN_STATUS
        });
        ProbeOutcome::Status { code, reason }
    }

    pub fn code(&self) -> Option<u16> {
        match self {
            ProbeOutcome::Status { code, .. } => Some(*code),
            ProbeOutcome::NetworkError => None,
        }
    }

    /// True for 2xx responses.
    pub fn is_success(&self) -> bool {
        self.code().is_some_and(status::is_success)
    }
}

impl fmt::Display for ProbeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeOutcome::Status { code, reason } => write!(f, "{code} {reason}"),
            ProbeOutcome::NetworkError => f.write_str("Error"),
        }
    }
}

/// Outcome of a probe together with its wall-clock duration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Probe {
    pub outcome: ProbeOutcome,
    pub elapsed: Duration,
}

/// Send one GET to `url`, reading the whole body, bounded by `timeout`.
///
/// Connection failures and timeouts are part of the outcome. Any other
/// client failure (redirect loops, malformed requests) is returned as an error.
pub async fn probe(http: &reqwest::Client, url: &Url, timeout: Duration) -> Result<Probe> {
    let start = Instant::now();
    let result = async {
        let response = http.get(url.clone()).timeout(timeout).send().await?;
        let code = response.status().as_u16();
        response.bytes().await?;
        Ok::<_, reqwest::Error>(code)
    }
    .await;
    let elapsed = start.elapsed();

    let outcome = match result {
        Ok(code) => ProbeOutcome::from_code(code),
        Err(e) if is_network_error(&e) => {
            debug!(error = %e, "probe failed");
            ProbeOutcome::NetworkError
        }
        Err(e) => return Err(e.into()),
    };
    debug!(%url, %outcome, ?elapsed, "probe finished");

    Ok(Probe { outcome, elapsed })
}

fn is_network_error(e: &reqwest::Error) -> bool {
    e.is_connect() || e.is_timeout() || e.is_request() || e.is_body()
}
