use crate::cli::Args;
use anyhow::{Context, Result};
use std::str::FromStr;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{fmt, EnvFilter, Registry};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogRotation {
    Daily,
    Hourly,
    Never,
}

impl FromStr for LogRotation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "daily" => Ok(LogRotation::Daily),
            "hourly" => Ok(LogRotation::Hourly),
            "never" => Ok(LogRotation::Never),
            other => Err(format!(
                "Unknown log rotation '{}' (expected daily, hourly or never)",
                other
            )),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LogOptions {
    pub level: String,
    pub file_enable: bool,
    pub dir: String,
    pub filename: String,
    pub rotation: LogRotation,
}

impl LogOptions {
    pub fn from_args(args: &Args) -> Result<Self> {
        Ok(Self {
            level: args.log_level.clone(),
            file_enable: args.log_file_enable,
            dir: args.log_dir.clone(),
            filename: args.log_filename.clone(),
            rotation: args.log_rotate.parse().map_err(anyhow::Error::msg)?,
        })
    }
}

/// Installs the global subscriber. Output goes to stderr since stdout carries
/// the stdio protocol. `RUST_LOG` overrides the configured level.
///
/// Keep the returned guard alive, or buffered file output is lost on exit.
pub fn init(opts: &LogOptions) -> Result<Option<WorkerGuard>> {
    tracing_log::LogTracer::init().context("Failed to install log bridge")?;

    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&opts.level)
            .with_context(|| format!("Invalid log level '{}'", opts.level))?,
    };

    let stderr_layer = fmt::layer().with_writer(std::io::stderr);

    let (file_layer, guard) = if opts.file_enable {
        let appender = match opts.rotation {
            LogRotation::Daily => rolling::daily(&opts.dir, &opts.filename),
            LogRotation::Hourly => rolling::hourly(&opts.dir, &opts.filename),
            LogRotation::Never => rolling::never(&opts.dir, &opts.filename),
        };
        let (writer, guard) = tracing_appender::non_blocking(appender);
        (
            Some(fmt::layer().with_writer(writer).with_ansi(false)),
            Some(guard),
        )
    } else {
        (None, None)
    };

    let subscriber = Registry::default()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer);
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to install tracing subscriber")?;

    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotation_parsing() {
        assert_eq!("daily".parse::<LogRotation>(), Ok(LogRotation::Daily));
        assert_eq!("Hourly".parse::<LogRotation>(), Ok(LogRotation::Hourly));
        assert_eq!("never".parse::<LogRotation>(), Ok(LogRotation::Never));
        assert!("weekly".parse::<LogRotation>().is_err());
    }

    #[test]
    fn test_options_from_defaults() {
        use clap::Parser;

        let args = Args::try_parse_from(["pve-mcp"]).unwrap();
        let opts = LogOptions::from_args(&args).unwrap();
        assert_eq!(opts.level, "info");
        assert_eq!(opts.filename, "pve-mcp.log");
        assert_eq!(opts.rotation, LogRotation::Daily);
        assert!(!opts.file_enable);
    }
}
