//! FFmpeg console verbosity.
//!
//! Seeking through a lecture recording makes FFmpeg chatty: every seek that
//! lands between keyframes can print decoder warnings to stderr. This module
//! wraps FFmpeg's log-level API so callers can quieten it without importing
//! `ffmpeg-next` themselves.
//!
//! This controls **FFmpeg's own console output** only. Diagnostics emitted by
//! `slidesift` itself go through the [`log`](https://crates.io/crates/log)
//! facade.
//!
//! # Example
//!
//! ```no_run
//! use slidesift::FfmpegLogLevel;
//!
//! slidesift::set_ffmpeg_log_level(FfmpegLogLevel::Error);
//! ```

use std::str::FromStr;

use ffmpeg_next::util::log::Level;

/// FFmpeg internal log verbosity, from silent to most verbose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FfmpegLogLevel {
    /// Print nothing.
    Quiet,
    /// Only unrecoverable errors.
    Fatal,
    /// Recoverable errors.
    Error,
    /// Warnings (FFmpeg's default).
    Warning,
    /// Informational messages.
    Info,
    /// Debugging output.
    Debug,
}

impl FfmpegLogLevel {
    fn to_ffmpeg_level(self) -> Level {
        match self {
            FfmpegLogLevel::Quiet => Level::Quiet,
            FfmpegLogLevel::Fatal => Level::Fatal,
            FfmpegLogLevel::Error => Level::Error,
            FfmpegLogLevel::Warning => Level::Warning,
            FfmpegLogLevel::Info => Level::Info,
            FfmpegLogLevel::Debug => Level::Debug,
        }
    }
}

impl FromStr for FfmpegLogLevel {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "quiet" | "off" => Ok(FfmpegLogLevel::Quiet),
            "fatal" | "panic" => Ok(FfmpegLogLevel::Fatal),
            "error" => Ok(FfmpegLogLevel::Error),
            "warning" | "warn" => Ok(FfmpegLogLevel::Warning),
            "info" => Ok(FfmpegLogLevel::Info),
            "debug" | "verbose" | "trace" => Ok(FfmpegLogLevel::Debug),
            other => Err(format!("unknown FFmpeg log level: {other}")),
        }
    }
}

/// Set the FFmpeg internal log verbosity level.
///
/// Does **not** affect Rust-side `log` output.
pub fn set_ffmpeg_log_level(level: FfmpegLogLevel) {
    ffmpeg_next::util::log::set_level(level.to_ffmpeg_level());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_aliases() {
        assert_eq!("warn".parse::<FfmpegLogLevel>(), Ok(FfmpegLogLevel::Warning));
        assert_eq!("OFF".parse::<FfmpegLogLevel>(), Ok(FfmpegLogLevel::Quiet));
        assert_eq!(" error ".parse::<FfmpegLogLevel>(), Ok(FfmpegLogLevel::Error));
        assert_eq!("trace".parse::<FfmpegLogLevel>(), Ok(FfmpegLogLevel::Debug));
    }

    #[test]
    fn rejects_unknown_level() {
        assert!("loud".parse::<FfmpegLogLevel>().is_err());
    }
}
