//! Output formatting for a probing session.
//!
//! The [`Emitter`] trait defines callbacks for each stage of a run.
//! [`HumanReadableEmitter`] renders them as (optionally colored) lines of text.

use std::fmt::Display;
use std::io::Write;
use std::time::Duration;

use crate::error::Result;
use crate::probe::ProbeOutcome;

/// Callbacks for the stages of a probing session.
pub trait Emitter {
    /// Called before the warm-up requests are sent.
    fn on_calibrating(&mut self) -> Result<()>;
    /// Called when calibration failed and the failsafe timeout is used.
    fn on_fallback(&mut self, timeout: Duration) -> Result<()>;
    /// Called with the timeout used for probing, unless the fallback is active.
    fn on_timeout_chosen(&mut self, timeout: Duration) -> Result<()>;
    /// Called for every probe. `width` is the zero-padding width of `index`.
    fn on_probe(&mut self, index: u64, width: usize, outcome: &ProbeOutcome) -> Result<()>;
    /// Called when the user interrupts the session.
    fn on_interrupt(&mut self) -> Result<()>;
    /// Called with the usage text when the command line is malformed.
    fn on_usage(&mut self, usage: &str) -> Result<()>;
    /// Called with a warning that ends the session early.
    fn on_warning(&mut self, message: &str) -> Result<()>;
}

#[derive(Debug, Clone, Copy)]
enum Color {
    Cyan,
    Green,
    Red,
    Yellow,
}

impl Color {
    fn sgr(self) -> &'static str {
        match self {
            Color::Cyan => "\x1b[36m",
            Color::Green => "\x1b[32m",
            Color::Red => "\x1b[31m",
            Color::Yellow => "\x1b[33m",
        }
    }
}

const RESET: &str = "\x1b[0m";

/// Emits human-readable lines to a writer.
///
/// The writer is flushed when the emitter is dropped, so output is released on
/// every exit path.
pub struct HumanReadableEmitter<W: Write> {
    out: W,
    color: bool,
}

impl<W: Write> HumanReadableEmitter<W> {
    /// Create a new emitter writing to `out`, with ANSI colors when `color` is set.
    pub fn new(out: W, color: bool) -> Self {
        HumanReadableEmitter { out, color }
    }

    fn paint(&self, color: Color, text: impl Display) -> String {
        if self.color {
            format!("{}{text}{RESET}", color.sgr())
        } else {
            text.to_string()
        }
    }

    fn line(&mut self, color: Color, text: impl Display) -> Result<()> {
        let painted = self.paint(color, text);
        writeln!(self.out, "{painted}")?;
        self.out.flush()?;
        Ok(())
    }
}

impl<W: Write> Emitter for HumanReadableEmitter<W> {
    fn on_calibrating(&mut self) -> Result<()> {
        self.line(Color::Cyan, "Choosing the best timeout automatically..")
    }

    fn on_fallback(&mut self, timeout: Duration) -> Result<()> {
        self.line(
            Color::Yellow,
            format_args!(
                "Something went wrong, using {} seconds timeout.",
                timeout.as_secs_f64()
            ),
        )
    }

    fn on_timeout_chosen(&mut self, timeout: Duration) -> Result<()> {
        // rounded to two decimals, printed in the shortest form that keeps a fraction
        let secs = (timeout.as_secs_f64() * 100.0).round() / 100.0;
        self.line(Color::Cyan, format_args!("Using {secs:?} seconds timeout."))
    }

    fn on_probe(&mut self, index: u64, width: usize, outcome: &ProbeOutcome) -> Result<()> {
        let color = if outcome.is_success() {
            Color::Green
        } else {
            Color::Red
        };
        let status = self.paint(color, outcome);
        writeln!(self.out, "{index:0width$} | Response: {status}")?;
        self.out.flush()?;
        Ok(())
    }

    fn on_interrupt(&mut self) -> Result<()> {
        writeln!(self.out)?;
        self.line(Color::Yellow, "Quitting..")
    }

    fn on_usage(&mut self, usage: &str) -> Result<()> {
        self.line(Color::Cyan, "Usage:")?;
        writeln!(self.out, "{usage}")?;
        Ok(())
    }

    fn on_warning(&mut self, message: &str) -> Result<()> {
        self.line(Color::Yellow, message)
    }
}

impl<W: Write> Drop for HumanReadableEmitter<W> {
    fn drop(&mut self) {
        let _ = self.out.flush();
    }
}
