// SPDX-License-Identifier: GPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Normation SAS

//! Logs and status output
//!
//! The style is heavily inspired from cargo/rustc.

use std::{
    env,
    fmt::{Display, Formatter},
    io,
    str::FromStr,
};

use anyhow::{Error, Result, bail};
use colored::Colorize;
use tracing_subscriber::{EnvFilter, Layer, filter::LevelFilter, fmt, layer::SubscriberExt};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Human,
    Json,
}

impl Display for OutputFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::Human => "human",
                Self::Json => "json",
            }
        )
    }
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_lowercase().as_str() {
            "json" => Self::Json,
            "human" => Self::Human,
            _ => bail!("Unrecognized output format '{s}'"),
        })
    }
}

fn level(verbose: u8, quiet: bool) -> LevelFilter {
    match (verbose, quiet) {
        (0, true) => LevelFilter::WARN,
        (0, false) => LevelFilter::INFO,
        (1, _) => LevelFilter::DEBUG,
        (_, _) => LevelFilter::TRACE,
    }
}

/// Logs always go to stderr, stdout is kept for the report.
pub fn init(verbose: u8, quiet: bool, format: OutputFormat) -> Result<()> {
    let level = level(verbose, quiet);
    // Already handled by the colored crate by default for other output
    let no_color = env::var("NO_COLOR").is_ok();

    let filter = || {
        EnvFilter::builder()
            .from_env_lossy()
            .add_directive(level.into())
    };

    let human = if format == OutputFormat::Human {
        let stderr_fmt = fmt::format()
            .compact()
            .without_time()
            .with_target(false)
            .with_ansi(!no_color);
        Some(
            fmt::layer()
                .event_format(stderr_fmt)
                .with_writer(io::stderr)
                .with_filter(filter()),
        )
    } else {
        None
    };

    let json = if format == OutputFormat::Json {
        let json_fmt = fmt::format().without_time().with_target(false).json();
        Some(
            fmt::layer()
                .event_format(json_fmt)
                .with_writer(io::stderr)
                .with_filter(filter()),
        )
    } else {
        None
    };

    let logger = tracing_subscriber::registry().with(human).with(json);
    tracing::subscriber::set_global_default(logger)?;
    Ok(())
}

/// Output a successful step
/// In the `cargo` style
pub fn ok_output<T: Display>(step: &'static str, message: T) {
    println!("{:>12} {message}", step.green().bold());
}

/// Output a failed step
pub fn fail_output<T: Display>(step: &'static str, message: T) {
    println!("{:>12} {message}", step.red().bold());
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn it_parses_output_formats() {
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!(
            "human".parse::<OutputFormat>().unwrap(),
            OutputFormat::Human
        );
        assert!("xml".parse::<OutputFormat>().is_err());
        assert_eq!(OutputFormat::Json.to_string(), "json");
    }

    #[test]
    fn it_computes_log_level() {
        assert_eq!(level(0, true), LevelFilter::WARN);
        assert_eq!(level(0, false), LevelFilter::INFO);
        assert_eq!(level(1, true), LevelFilter::DEBUG);
        assert_eq!(level(3, false), LevelFilter::TRACE);
    }
}
