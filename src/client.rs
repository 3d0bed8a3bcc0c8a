use std::future::Future;
use std::time::Duration;

use tracing::{debug, info};

use crate::calibrate::{Calibration, Calibrator};
use crate::config::{Config, TimeoutSetting};
use crate::emitter::Emitter;
use crate::error::Result;
use crate::probe::probe;

/// Runs a probing session: resolve the timeout, then probe the target
/// `count` times with a fixed delay in between.
pub struct Client {
    http: reqwest::Client,
    config: Config,
    calibrator: Calibrator,
}

impl Client {
    pub fn new(config: Config) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(user_agent())
            .build()?;
        Ok(Client {
            http,
            config,
            calibrator: Calibrator::default(),
        })
    }

    /// Replace the default calibration parameters.
    pub fn with_calibrator(mut self, calibrator: Calibrator) -> Self {
        self.calibrator = calibrator;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Pick the per-request timeout, calibrating when none was given.
    pub async fn resolve_timeout(&self, emitter: &mut dyn Emitter) -> Result<Duration> {
        let calibration = match self.config.timeout {
            TimeoutSetting::Manual(timeout) => Calibration::Calibrated(timeout),
            TimeoutSetting::Auto => {
                emitter.on_calibrating()?;
                self.calibrator.run(&self.http, &self.config.url).await?
            }
        };

        match calibration {
            Calibration::Fallback(timeout) => emitter.on_fallback(timeout)?,
            Calibration::Calibrated(timeout) => emitter.on_timeout_chosen(timeout)?,
        }
        info!(?calibration, "timeout resolved");

        Ok(calibration.timeout())
    }

    /// Run the whole session. Probe errors never end the loop early.
    pub async fn run(&self, emitter: &mut dyn Emitter) -> Result<()> {
        let timeout = self.resolve_timeout(emitter).await?;
        let width = self.config.index_width();

        for index in 1..=self.config.count {
            let sample = probe(&self.http, &self.config.url, timeout).await?;
            emitter.on_probe(index, width, &sample.outcome)?;
            tokio::time::sleep(self.config.delay).await;
        }
        debug!(count = self.config.count, "session complete");

        Ok(())
    }

    /// Run the session until it completes or `shutdown` resolves.
    ///
    /// On shutdown the in-flight request or delay is dropped, the interrupt
    /// notice is emitted and `Ok` is returned.
    pub async fn run_until<F>(&self, emitter: &mut dyn Emitter, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        let interrupted = tokio::select! {
            res = self.run(&mut *emitter) => {
                res?;
                false
            }
            _ = shutdown => true,
        };

        if interrupted {
            debug!("session interrupted");
            emitter.on_interrupt()?;
        }

        Ok(())
    }
}

fn user_agent() -> String {
    format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}
