use std::fmt;

use thiserror::Error;

/// Numeric settings that must be strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Setting {
    Count,
    Timeout,
    Delay,
}

impl fmt::Display for Setting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Setting::Count => "count",
            Setting::Timeout => "timeout",
            Setting::Delay => "delay",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum NetcheckError {
    #[error("invalid arguments: {0}")]
    Usage(Box<clap::Error>),
    #[error("unexpected argument '{0}'")]
    UnexpectedArgument(String),
    #[error("Can't use a {0} less than or equal to zero.")]
    NonPositive(Setting),
    #[error("timeout must be a finite number of seconds")]
    NonFiniteTimeout,
    #[error("bad target URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("http client error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

// clap::Error is large, keep NetcheckError small by boxing it
impl From<clap::Error> for NetcheckError {
    fn from(e: clap::Error) -> Self {
        NetcheckError::Usage(Box::new(e))
    }
}

impl NetcheckError {
    /// Whether the error means the command line was malformed and the usage
    /// text should be shown.
    pub fn is_usage(&self) -> bool {
        matches!(
            self,
            NetcheckError::Usage(_)
                | NetcheckError::UnexpectedArgument(_)
                | NetcheckError::NonFiniteTimeout
                | NetcheckError::InvalidUrl(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, NetcheckError>;
