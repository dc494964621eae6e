use anyhow::Result;
use std::io;
use std::io::IsTerminal;
use std::path::Path;
use tracing_subscriber::{
    layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry,
};
use tracing_subscriber::fmt::{self, time::ChronoUtc};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use watchnext_config::LoggingConfig;

/// Install the global subscriber
///
/// `-v`/`-vv` win over `RUST_LOG`, which wins over the configured level.
/// `RUST_LOG_JSON=true` forces JSON lines, otherwise the configured value or
/// the terminal check decides.
pub fn init_logging(verbose_level: u8, quiet: bool, config: Option<&LoggingConfig>) -> Result<()> {
    let filter = if quiet {
        EnvFilter::new("error")
    } else if verbose_level > 0 {
        let filter_str = match verbose_level {
            1 => "debug",
            _ => "trace",
        };
        EnvFilter::new(filter_str)
    } else {
        let default_level = config.map(|c| c.level.as_str()).unwrap_or("info");
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_level))
    };

    let json = match std::env::var("RUST_LOG_JSON") {
        Ok(v) => v == "true",
        Err(_) => config
            .map(|c| c.json)
            .unwrap_or_else(|| !io::stdout().is_terminal()),
    };

    let registry = Registry::default().with(filter);

    match config.and_then(|c| c.file.as_deref()) {
        Some(log_path) => {
            let file_appender = rolling_appender(log_path)?;
            if json {
                let json_layer = fmt::layer()
                    .json()
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_writer(file_appender);

                registry.with(json_layer).init();
            } else {
                let fmt_layer = fmt::layer()
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_ansi(false)
                    .with_writer(file_appender);

                registry.with(fmt_layer).init();
            }
        }
        None => {
            if json {
                let json_layer = fmt::layer()
                    .json()
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_writer(io::stderr);

                registry.with(json_layer).init();
            } else {
                let fmt_layer = fmt::layer()
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_writer(io::stderr);

                registry.with(fmt_layer).init();
            }
        }
    }

    Ok(())
}

/// Daily rotated files named after the configured file, e.g. `watchnext.2026-01-17`
fn rolling_appender(log_path: &Path) -> Result<RollingFileAppender> {
    let log_dir = log_path.parent()
        .ok_or_else(|| anyhow::anyhow!("Log file path has no parent directory"))?;
    std::fs::create_dir_all(log_dir)?;

    let log_filename = log_path.file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| anyhow::anyhow!("Invalid log filename"))?;
    let log_prefix = log_filename
        .rsplit_once('.')
        .map(|(stem, _)| stem)
        .unwrap_or(log_filename);

    Ok(RollingFileAppender::new(Rotation::DAILY, log_dir, log_prefix))
}
