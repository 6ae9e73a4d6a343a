//! Tracing subscriber setup: console layer plus an optional rolling JSON file.

use crate::cli::FILE_GUARD;
use loadcell_config::Logging;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, fmt};

fn rotation(name: Option<&str>) -> tracing_appender::rolling::Rotation {
    use tracing_appender::rolling::Rotation;
    match name {
        Some("daily") => Rotation::DAILY,
        Some("hourly") => Rotation::HOURLY,
        _ => Rotation::NEVER,
    }
}

/// Install the global subscriber. `RUST_LOG` wins over `console_level`.
///
/// Console output goes to stderr so stdout stays clean for readings.
pub fn init(console_level: &str, json: bool, file_cfg: &Logging) -> eyre::Result<()> {
    let console_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(console_level))?;

    let console = if json {
        fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_filter(console_filter)
            .boxed()
    } else {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_filter(console_filter)
            .boxed()
    };

    let file = match file_cfg.file.as_deref() {
        Some(path) => {
            let path = std::path::Path::new(path);
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| std::path::Path::new("."));
            let name = path
                .file_name()
                .ok_or_else(|| eyre::eyre!("logging.file has no file name: {:?}", path))?;
            let appender = tracing_appender::rolling::RollingFileAppender::builder()
                .rotation(rotation(file_cfg.rotation.as_deref()))
                .filename_prefix(name.to_string_lossy())
                .build(dir)?;
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let _ = FILE_GUARD.set(guard);
            let level = file_cfg.level.as_deref().unwrap_or("info");
            Some(
                fmt::layer()
                    .json()
                    .with_ansi(false)
                    .with_writer(writer)
                    .with_filter(EnvFilter::try_new(level)?)
                    .boxed(),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(console)
        .with(file)
        .try_init()?;
    Ok(())
}
