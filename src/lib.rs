//! Probe an HTTP endpoint at a fixed interval and report every response.
//!
//! A session first settles on a per-request timeout, either the one given on
//! the command line or one calibrated from a few warm-up requests, then sends
//! `count` GET requests with a fixed delay between them. Each request is
//! reported as its status code and reason phrase, or as a network error.
//!
//! # Quick start
//!
//! ```no_run
//! use netcheck::client::Client;
//! use netcheck::config::Config;
//! use netcheck::emitter::HumanReadableEmitter;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::from_args(["netcheck", "-u", "example.com", "-c", "10"])?;
//! let client = Client::new(config)?;
//!
//! let mut emitter = HumanReadableEmitter::new(std::io::stdout(), true);
//! client.run(&mut emitter).await?;
//! # Ok(())
//! # }
//! ```

pub mod calibrate;
pub mod client;
pub mod config;
pub mod emitter;
pub mod error;
pub mod params;
pub mod probe;
pub mod status;

#[cfg(test)]
mod test_server;
