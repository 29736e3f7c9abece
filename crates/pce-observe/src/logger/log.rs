use time::{UtcOffset, format_description::well_known::Rfc3339};
use tracing_subscriber::{
    EnvFilter, fmt, fmt::time::OffsetTime, layer::SubscriberExt, util::SubscriberInitExt,
    util::TryInitError,
};

use crate::logger::{config::LoggerConfig, error::LoggerError, format::LoggerFormat};

/// Build the subscriber for `cfg` and make it the global default.
pub(crate) fn install(cfg: &LoggerConfig) -> Result<(), LoggerError> {
    let registry = tracing_subscriber::registry().with(level_filter(&cfg.level)?);

    let installed = match cfg.format {
        LoggerFormat::Text => registry
            .with(
                fmt::layer()
                    .with_ansi(cfg.use_color)
                    .with_target(cfg.with_targets)
                    .with_timer(local_rfc3339()),
            )
            .try_init(),
        LoggerFormat::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .with_ansi(false)
                    .with_target(cfg.with_targets)
                    .with_timer(local_rfc3339()),
            )
            .try_init(),
        LoggerFormat::Journald => {
            #[cfg(all(target_os = "linux", feature = "journald"))]
            {
                let journald = tracing_journald::layer()
                    .map_err(|e| LoggerError::Init(format!("journald: {e}")))?;
                registry.with(journald).try_init()
            }
            #[cfg(not(all(target_os = "linux", feature = "journald")))]
            {
                drop(registry);
                return Err(LoggerError::JournaldUnavailable);
            }
        }
    };
    installed.map_err(init_error)
}

fn level_filter(level: &str) -> Result<EnvFilter, LoggerError> {
    EnvFilter::try_new(level).map_err(|_| LoggerError::InvalidLevel(level.to_string()))
}

fn local_rfc3339() -> OffsetTime<Rfc3339> {
    let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
    OffsetTime::new(offset, Rfc3339)
}

fn init_error(e: TryInitError) -> LoggerError {
    let msg = e.to_string();
    if msg.contains("global default") || msg.contains("SetGlobalDefaultError") {
        LoggerError::AlreadyInitialized
    } else {
        LoggerError::Init(msg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bad_level_is_reported() {
        let err = level_filter("pce_client=loud").unwrap_err();
        assert!(matches!(err, LoggerError::InvalidLevel(_)));
    }

    #[test]
    fn plain_levels_are_accepted() {
        assert!(level_filter("debug").is_ok());
        assert!(level_filter("pce_client=trace,info").is_ok());
    }

    #[test]
    fn second_install_is_rejected() {
        let cfg = LoggerConfig::for_verbosity(false);
        let _ = install(&cfg);
        assert!(matches!(install(&cfg), Err(LoggerError::AlreadyInitialized)));
    }
}
