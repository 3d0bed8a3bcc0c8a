//! Command line resolution.
//!
//! [`Config::from_args`] consumes the raw argument list once and returns an
//! immutable [`Config`]. Malformed input surfaces as a usage error, values that
//! parse but are not strictly positive surface as [`NetcheckError::NonPositive`].

use std::ffi::{OsStr, OsString};
use std::time::Duration;

use clap::Parser;
use url::Url;

use crate::emitter::Emitter;
use crate::error::{NetcheckError, Result, Setting};
use crate::params;

const FLAGS: [&str; 4] = ["-u", "-c", "-t", "-d"];

#[derive(Parser, Debug)]
#[command(
    name = "netcheck",
    disable_help_flag = true,
    disable_version_flag = true,
    args_override_self = true
)]
struct Args {
    /// URL used to check the connectivity
    #[arg(short = 'u', default_value = params::DEFAULT_URL, allow_hyphen_values = true)]
    url: String,
    /// How many requests should be sent
    #[arg(short = 'c', default_value_t = params::DEFAULT_COUNT, allow_negative_numbers = true)]
    count: i64,
    /// Maximum time for each request, in seconds
    #[arg(short = 't', allow_negative_numbers = true)]
    timeout: Option<f64>,
    /// Time between each request, in milliseconds
    #[arg(short = 'd', default_value_t = params::DEFAULT_DELAY_MS, allow_negative_numbers = true)]
    delay: i64,
    /// Bare words are accepted and ignored
    #[arg(hide = true)]
    _ignored: Vec<String>,
}

/// How the per-request timeout is chosen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TimeoutSetting {
    /// Given on the command line, used verbatim.
    Manual(Duration),
    /// Estimated by the calibrator before probing starts.
    Auto,
}

/// Resolved run configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub url: Url,
    pub count: u64,
    pub timeout: TimeoutSetting,
    pub delay: Duration,
}

impl Config {
    /// Resolve a configuration from the full argument list, program name included.
    pub fn from_args<I, T>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let args: Vec<OsString> = args.into_iter().map(Into::into).collect();
        check_flags(&args)?;
        let args = Args::try_parse_from(args)?;

        if args.count <= 0 {
            return Err(NetcheckError::NonPositive(Setting::Count));
        }

        let timeout = match args.timeout {
            None => TimeoutSetting::Auto,
            Some(secs) if secs.is_nan() => return Err(NetcheckError::NonFiniteTimeout),
            Some(secs) if secs <= 0.0 => return Err(NetcheckError::NonPositive(Setting::Timeout)),
            Some(secs) => TimeoutSetting::Manual(
                Duration::try_from_secs_f64(secs).map_err(|_| NetcheckError::NonFiniteTimeout)?,
            ),
        };

        if args.delay <= 0 {
            return Err(NetcheckError::NonPositive(Setting::Delay));
        }

        let url = Url::parse(&normalize_url(&args.url))?;

        Ok(Config {
            url,
            count: args.count as u64,
            timeout,
            delay: Duration::from_millis(args.delay as u64),
        })
    }

    /// Width of the zero-padded probe index: the digit count of `count`.
    pub fn index_width(&self) -> usize {
        self.count.to_string().len()
    }
}

/// Reject dash tokens other than the four whole flags, unless they are the
/// value of the preceding flag. Glued (`-c5`, `-c=5`) and long forms, as well
/// as `--`, are not accepted.
fn check_flags(args: &[OsString]) -> Result<()> {
    let mut prev: Option<&OsStr> = None;
    for arg in args.iter().skip(1) {
        let token = arg.to_string_lossy();
        let is_flag = FLAGS.iter().any(|f| *f == token);
        let is_flag_value = prev.is_some_and(|p| FLAGS.iter().any(|f| OsStr::new(f) == p));
        if token.starts_with('-') && !is_flag && !is_flag_value {
            return Err(NetcheckError::UnexpectedArgument(token.into_owned()));
        }
        prev = Some(arg.as_os_str());
    }
    Ok(())
}

/// Report a configuration error: the usage text for malformed command lines,
/// the warning itself for settings that are out of range.
pub fn report_config_error(err: &NetcheckError, emitter: &mut dyn Emitter) -> Result<()> {
    if err.is_usage() {
        tracing::debug!(error = %err, "rejected command line");
        emitter.on_usage(&usage())
    } else {
        emitter.on_warning(&err.to_string())
    }
}

/// Prepend the default scheme unless the target already names http or https.
pub fn normalize_url(raw: &str) -> String {
    if raw.contains("http://") || raw.contains("https://") {
        raw.to_string()
    } else {
        format!("{}{raw}", params::DEFAULT_SCHEME)
    }
}

/// Usage text shown for malformed command lines.
pub fn usage() -> String {
    format!(
        "netcheck [ -u URL | -c COUNT | -t TIMEOUT | -d DELAY ]\n\
         \x20-u\turl used to check the connectivity [Default: {}]\n\
         \x20-c\thow many requests should be sent [Default: {}]\n\
         \x20-t\tmaximum amount of time used for each request, in seconds [Default: automatic]\n\
         \x20-d\ttime between each request, in milliseconds [Default: {}]",
        params::DEFAULT_URL,
        params::DEFAULT_COUNT,
        params::DEFAULT_DELAY_MS,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emitter::HumanReadableEmitter;

    fn resolve(args: &[&str]) -> Result<Config> {
        Config::from_args(std::iter::once("netcheck").chain(args.iter().copied()))
    }

    #[test]
    fn defaults() {
        let config = resolve(&[]).unwrap();
        assert_eq!(config.url.as_str(), "https://google.com/");
        assert_eq!(config.count, 1000);
        assert_eq!(config.timeout, TimeoutSetting::Auto);
        assert_eq!(config.delay, Duration::from_millis(900));
        assert_eq!(config.index_width(), 4);
    }

    #[test]
    fn flags_in_any_order() {
        let config = resolve(&["-d", "100", "-t", "2", "-c", "5", "-u", "example.com"]).unwrap();
        assert_eq!(config.url.as_str(), "http://example.com/");
        assert_eq!(config.count, 5);
        assert_eq!(config.timeout, TimeoutSetting::Manual(Duration::from_secs(2)));
        assert_eq!(config.delay, Duration::from_millis(100));
        assert_eq!(config.index_width(), 1);
    }

    #[test]
    fn scheme_is_prepended_only_when_missing() {
        assert_eq!(normalize_url("example.com"), "http://example.com");
        assert_eq!(normalize_url("https://example.com"), "https://example.com");
        assert_eq!(normalize_url("http://example.com:8080/x"), "http://example.com:8080/x");
    }

    #[test]
    fn fractional_timeout() {
        let config = resolve(&["-t", "0.25"]).unwrap();
        assert_eq!(config.timeout, TimeoutSetting::Manual(Duration::from_millis(250)));
    }

    #[test]
    fn last_repeated_flag_wins() {
        let config = resolve(&["-c", "3", "-c", "7"]).unwrap();
        assert_eq!(config.count, 7);
    }

    #[test]
    fn non_positive_values_are_rejected() {
        for (args, setting) in [
            (&["-c", "0"][..], Setting::Count),
            (&["-c", "-4"][..], Setting::Count),
            (&["-t", "0"][..], Setting::Timeout),
            (&["-t", "-1.5"][..], Setting::Timeout),
            (&["-u", "example.com", "-c", "3", "-d", "0"][..], Setting::Delay),
        ] {
            match resolve(args) {
                Err(NetcheckError::NonPositive(s)) => assert_eq!(s, setting, "{args:?}"),
                other => panic!("expected non-positive {setting} for {args:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn non_positive_warning_text() {
        let err = resolve(&["-d", "0"]).unwrap_err();
        assert!(!err.is_usage());
        assert_eq!(err.to_string(), "Can't use a delay less than or equal to zero.");
    }

    #[test]
    fn malformed_arguments_are_usage_errors() {
        for args in [
            &["-c"][..],
            &["-c", "ten"][..],
            &["-d", "1.5"][..],
            &["-t", "soon"][..],
            &["-t", "inf"][..],
            &["-t", "NaN"][..],
            &["-x"][..],
            &["-h"][..],
            &["-c", "5", "--verbose"][..],
            &["-c5"][..],
            &["-c=5"][..],
            &["-d10", "-c", "3"][..],
            &["--"][..],
            &["-"][..],
            &["-c", "5", "-u", "example.com", "-t2"][..],
        ] {
            let err = resolve(args).unwrap_err();
            assert!(err.is_usage(), "{args:?} gave {err:?}");
        }
    }

    #[test]
    fn glued_flag_is_named_in_the_error() {
        match resolve(&["-c", "3", "-d10"]) {
            Err(NetcheckError::UnexpectedArgument(token)) => assert_eq!(token, "-d10"),
            other => panic!("expected unexpected argument, got {other:?}"),
        }
    }

    #[test]
    fn bare_words_are_ignored() {
        let config = resolve(&["foo", "-c", "5", "6", "-d", "20"]).unwrap();
        assert_eq!(config.count, 5);
        assert_eq!(config.delay, Duration::from_millis(20));
        assert_eq!(config.url.as_str(), "https://google.com/");
    }

    #[test]
    fn url_value_may_start_with_a_dash() {
        let config = resolve(&["-u", "-example.com"]).unwrap();
        assert_eq!(config.url.host_str(), Some("-example.com"));
    }

    fn report(err: &NetcheckError) -> String {
        let mut buf = Vec::new();
        {
            let mut emitter = HumanReadableEmitter::new(&mut buf, false);
            report_config_error(err, &mut emitter).unwrap();
        }
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn malformed_command_line_reports_usage() {
        let err = resolve(&["-c5"]).unwrap_err();
        let out = report(&err);

        assert!(out.starts_with("Usage:\nnetcheck [ -u URL"), "{out}");
        assert!(!out.contains("-c5"));
    }

    #[test]
    fn out_of_range_setting_reports_warning_only() {
        let err = resolve(&["-u", "example.com", "-c", "3", "-d", "0"]).unwrap_err();

        assert_eq!(report(&err), "Can't use a delay less than or equal to zero.\n");
    }

    #[test]
    fn usage_lists_every_flag() {
        let text = usage();
        for flag in ["-u", "-c", "-t", "-d"] {
            assert!(text.contains(flag), "{flag} missing from usage");
        }
    }
}
