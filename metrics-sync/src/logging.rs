//! Tracing setup
//!
//! The subscriber is installed before the config file is read so that config
//! loading is logged. Its filter starts from RUST_LOG, then the command-line
//! level, then [`DEFAULT_LOG_LEVEL`], and can be narrowed or widened once the
//! TOML `log_level` is known.

use metrics_common::config::DEFAULT_LOG_LEVEL;
use tracing::Subscriber;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{fmt, reload, EnvFilter, Registry};

/// Reload handle for the startup filter
pub struct LogLevelHandle {
    handle: reload::Handle<EnvFilter, Registry>,
    pinned_by_env: bool,
    initial: String,
}

impl LogLevelHandle {
    /// Switch to the resolved level
    ///
    /// Returns `Ok(false)` without touching the filter when RUST_LOG set it or
    /// the level is unchanged.
    pub fn apply(&self, level: &str) -> Result<bool, reload::Error> {
        if self.pinned_by_env || level == self.initial {
            return Ok(false);
        }
        self.handle.reload(EnvFilter::new(level))?;
        Ok(true)
    }
}

/// Build the startup subscriber writing to `writer`
///
/// `rust_log` is the raw RUST_LOG value; an unparseable one is ignored.
pub fn startup_subscriber<W>(
    rust_log: Option<&str>,
    cli_level: Option<&str>,
    writer: W,
) -> (impl Subscriber + Send + Sync + 'static, LogLevelHandle)
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let initial = cli_level.unwrap_or(DEFAULT_LOG_LEVEL).to_string();
    let env_filter = rust_log.and_then(|raw| EnvFilter::try_new(raw).ok());
    let pinned_by_env = env_filter.is_some();
    let filter = env_filter.unwrap_or_else(|| EnvFilter::new(&initial));

    let (filter, handle) = reload::Layer::new(filter);
    let subscriber = Registry::default()
        .with(filter)
        .with(fmt::layer().with_writer(writer));

    (
        subscriber,
        LogLevelHandle {
            handle,
            pinned_by_env,
            initial,
        },
    )
}
