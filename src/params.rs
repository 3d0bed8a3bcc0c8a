//! Defaults and tuning parameters.

use std::time::Duration;

/// Target probed when `-u` is not given.
pub const DEFAULT_URL: &str = "https://google.com";

/// Scheme prepended to targets given without one.
pub const DEFAULT_SCHEME: &str = "http://";

/// Number of probes sent when `-c` is not given.
pub const DEFAULT_COUNT: i64 = 1000;

/// Pause between probes, in milliseconds, when `-d` is not given.
pub const DEFAULT_DELAY_MS: i64 = 900;

/// Per-request timeout used during calibration, and the fallback when
/// calibration cannot produce an estimate.
pub const FAILSAFE_TIMEOUT: Duration = Duration::from_secs(5);

/// Number of warm-up requests sent by the calibrator.
pub const CALIBRATION_ROUNDS: usize = 8;

/// Added to the slowest successful warm-up request to absorb short network hiccups.
pub const CALIBRATION_MARGIN: Duration = Duration::from_secs(2);
