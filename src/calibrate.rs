//! Automatic timeout calibration.
//!
//! A handful of warm-up requests are sent with the failsafe timeout. The
//! slowest `200 OK` among them, plus a safety margin, becomes the timeout used
//! for the probing phase. A connection error or timeout aborts calibration,
//! and so does a warm-up without a single `200 OK`; both fall back to the
//! failsafe timeout.

use std::time::Duration;

use tracing::debug;
use url::Url;

use crate::error::Result;
use crate::params;
use crate::probe::{ProbeOutcome, probe};

/// Timeout chosen by the calibrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Calibration {
    /// Estimated from the warm-up requests.
    Calibrated(Duration),
    /// Calibration failed, the failsafe timeout is used instead.
    Fallback(Duration),
}

impl Calibration {
    pub fn timeout(&self) -> Duration {
        match self {
            Calibration::Calibrated(d) | Calibration::Fallback(d) => *d,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Calibration::Fallback(_))
    }
}

/// Calibration parameters.
#[derive(Debug, Clone)]
pub struct Calibrator {
    /// Number of warm-up requests.
    pub rounds: usize,
    /// Timeout for each warm-up request, and the fallback result.
    pub failsafe: Duration,
    /// Added to a measured duration before it is accepted.
    pub margin: Duration,
}

impl Default for Calibrator {
    fn default() -> Self {
        Calibrator {
            rounds: params::CALIBRATION_ROUNDS,
            failsafe: params::FAILSAFE_TIMEOUT,
            margin: params::CALIBRATION_MARGIN,
        }
    }
}

impl Calibrator {
    pub async fn run(&self, http: &reqwest::Client, url: &Url) -> Result<Calibration> {
        let mut best = Duration::ZERO;

        for round in 1..=self.rounds {
            let sample = probe(http, url, self.failsafe).await?;
            match sample.outcome {
                ProbeOutcome::NetworkError => {
                    debug!(round, "calibration aborted by a network error");
                    return Ok(Calibration::Fallback(self.failsafe));
                }
                ProbeOutcome::Status { code: 200, .. } if sample.elapsed > best => {
                    best = sample.elapsed + self.margin;
                }
                _ => {}
            }
            debug!(round, elapsed = ?sample.elapsed, ?best, "calibration round");
        }

        if best.is_zero() {
            debug!("no 200 response during calibration");
            return Ok(Calibration::Fallback(self.failsafe));
        }

        Ok(Calibration::Calibrated(best))
    }
}
