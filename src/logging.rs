//! Stderr logging that starts before the config is read.
//!
//! The subscriber comes up at [`DEFAULT_LOG_LEVEL`] so config loading is
//! logged, and [`LevelHandle::apply`] switches to the configured level once it
//! is known. `REMINDME_LOG` pins the filter and wins over the config.

use tracing::Subscriber;
use tracing_subscriber::fmt::{self, MakeWriter};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Registry, reload};

pub const LOG_ENV: &str = "REMINDME_LOG";
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Swaps the active filter for the configured log level
pub struct LevelHandle {
    handle: reload::Handle<EnvFilter, Registry>,
    pinned: bool,
}

impl LevelHandle {
    /// Apply the configured level unless `REMINDME_LOG` already set one
    pub fn apply(&self, level: &str) {
        if self.pinned {
            return;
        }
        match EnvFilter::try_new(level) {
            Ok(filter) => {
                if let Err(e) = self.handle.reload(filter) {
                    tracing::warn!(error = %e, "could not change log level");
                }
            }
            Err(e) => tracing::warn!(level, error = %e, "ignoring invalid log level"),
        }
    }
}

/// Install the global subscriber writing to stderr
pub fn init() -> LevelHandle {
    let (subscriber, level) = subscriber(std::io::stderr, EnvFilter::try_from_env(LOG_ENV).ok());
    subscriber.init();
    level
}

/// Build the subscriber; `pinned` is a filter that config may not override
pub fn subscriber<W>(
    writer: W,
    pinned: Option<EnvFilter>,
) -> (impl Subscriber + Send + Sync + 'static, LevelHandle)
where
    W: for<'writer> MakeWriter<'writer> + Send + Sync + 'static,
{
    let is_pinned = pinned.is_some();
    let filter = pinned.unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_LEVEL));
    let (filter, handle) = reload::Layer::new(filter);

    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(writer).with_target(false));

    (
        subscriber,
        LevelHandle {
            handle,
            pinned: is_pinned,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use std::io;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Captured {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for Captured {
        type Writer = Captured;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    #[test]
    fn config_loading_is_logged() {
        let out = Captured::default();
        let (subscriber, _level) = subscriber(out.clone(), None);
        let dir = tempfile::tempdir().unwrap();

        tracing::subscriber::with_default(subscriber, || {
            Config::load_from_path(&dir.path().join("config.toml")).unwrap();
        });

        assert!(out.contents().contains("created default config"), "{}", out.contents());
    }

    #[test]
    fn configured_level_takes_over_after_load() {
        let out = Captured::default();
        let (subscriber, level) = subscriber(out.clone(), None);

        tracing::subscriber::with_default(subscriber, || {
            tracing::debug!("hidden at the default level");
            level.apply("debug");
            tracing::debug!("shown once debug is configured");
        });

        let logged = out.contents();
        assert!(!logged.contains("hidden at the default level"), "{}", logged);
        assert!(logged.contains("shown once debug is configured"), "{}", logged);
    }

    #[test]
    fn environment_filter_is_not_overridden() {
        let out = Captured::default();
        let (subscriber, level) = subscriber(out.clone(), Some(EnvFilter::new("warn")));

        tracing::subscriber::with_default(subscriber, || {
            level.apply("debug");
            tracing::info!("info stays filtered");
        });

        assert!(!out.contents().contains("info stays filtered"));
    }
}
