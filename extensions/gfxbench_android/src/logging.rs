//! Logcat logging
//!
//! The first call installs a `tracing` subscriber whose tag layer and level
//! filter sit behind `tracing_subscriber::reload` handles, so a handle
//! created with its own `[logging]` table after `JNI_OnLoad` still gets its
//! tag and level. The most recent configuration wins.

use gfxbench_core::{LoggingConfig, Result};

/// What a call to [`init_logging`] has to do given the current state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoggingUpdate {
    /// Nothing installed yet
    Install,
    /// Installed with the same settings
    Unchanged,
    /// Installed with a different tag or level
    Reconfigure,
}

pub fn logging_update(installed: Option<&LoggingConfig>, requested: &LoggingConfig) -> LoggingUpdate {
    match installed {
        None => LoggingUpdate::Install,
        Some(current) if current == requested => LoggingUpdate::Unchanged,
        Some(_) => LoggingUpdate::Reconfigure,
    }
}

/// Route `tracing` (and `log`) output to logcat under the configured tag.
///
/// Records emitted through the `log` crate keep the tag of the first call,
/// since `android_logger` can only be initialized once; their level follows
/// the latest configuration.
#[cfg(target_os = "android")]
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    use std::sync::{Mutex, PoisonError};

    static INSTALLED: Mutex<Option<android::Installed>> = Mutex::new(None);

    let mut installed = INSTALLED.lock().unwrap_or_else(PoisonError::into_inner);
    match logging_update(installed.as_ref().map(|i| &i.config), config) {
        LoggingUpdate::Unchanged => Ok(()),
        LoggingUpdate::Install => {
            *installed = Some(android::install(config)?);
            Ok(())
        }
        LoggingUpdate::Reconfigure => match installed.as_mut() {
            Some(state) => android::reconfigure(state, config),
            None => Ok(()),
        },
    }
}

#[cfg(target_os = "android")]
mod android {
    use gfxbench_core::{LogLevel, LoggingConfig, Result, SignalError};
    use tracing_subscriber::filter::LevelFilter;
    use tracing_subscriber::layer::{Layered, SubscriberExt};
    use tracing_subscriber::{reload, Layer, Registry};

    type FilteredRegistry = Layered<reload::Layer<LevelFilter, Registry>, Registry>;
    type TagLayer = Box<dyn Layer<FilteredRegistry> + Send + Sync>;

    pub(super) struct Installed {
        pub(super) config: LoggingConfig,
        level: reload::Handle<LevelFilter, Registry>,
        tag: reload::Handle<TagLayer, FilteredRegistry>,
    }

    pub(super) fn install(config: &LoggingConfig) -> Result<Installed> {
        android_logger::init_once(
            android_logger::Config::default()
                .with_max_level(log::LevelFilter::Trace)
                .with_tag(config.tag.as_str()),
        );
        log::set_max_level(log_level(config.level));

        let (level_layer, level) = reload::Layer::new(level_filter(config.level));
        let (tag_reload, tag) = reload::Layer::new(tag_layer(&config.tag)?);
        let subscriber = tracing_subscriber::registry().with(level_layer).with(tag_reload);
        tracing::subscriber::set_global_default(subscriber)
            .map_err(|e| SignalError::Config(format!("logging: {}", e)))?;

        Ok(Installed {
            config: config.clone(),
            level,
            tag,
        })
    }

    pub(super) fn reconfigure(state: &mut Installed, config: &LoggingConfig) -> Result<()> {
        if state.config.level != config.level {
            state
                .level
                .reload(level_filter(config.level))
                .map_err(|e| SignalError::Config(format!("logging level: {}", e)))?;
            log::set_max_level(log_level(config.level));
        }
        if state.config.tag != config.tag {
            state
                .tag
                .reload(tag_layer(&config.tag)?)
                .map_err(|e| SignalError::Config(format!("logging tag: {}", e)))?;
        }
        state.config = config.clone();
        tracing::debug!("Logging reconfigured: tag {:?}, level {:?}", config.tag, config.level);
        Ok(())
    }

    fn tag_layer(tag: &str) -> Result<TagLayer> {
        let layer = tracing_android::layer(tag)
            .map_err(|e| SignalError::Config(format!("logcat tag {:?}: {}", tag, e)))?;
        Ok(Box::new(layer))
    }

    fn level_filter(level: LogLevel) -> LevelFilter {
        match level.as_tracing_level() {
            Some(level) => LevelFilter::from_level(level),
            None => LevelFilter::OFF,
        }
    }

    fn log_level(level: LogLevel) -> log::LevelFilter {
        match level {
            LogLevel::Off => log::LevelFilter::Off,
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Logcat is only available on Android; host programs install their own
/// subscriber.
#[cfg(not(target_os = "android"))]
pub fn init_logging(_config: &LoggingConfig) -> Result<()> {
    Err(gfxbench_core::SignalError::Unsupported(
        "logcat logging only available on Android".to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use gfxbench_core::{LogLevel, SignalConfig};

    #[test]
    fn test_first_call_installs() {
        assert_eq!(
            logging_update(None, &LoggingConfig::default()),
            LoggingUpdate::Install
        );
    }

    #[test]
    fn test_same_settings_are_left_alone() {
        let config = LoggingConfig::default();
        assert_eq!(
            logging_update(Some(&config), &config.clone()),
            LoggingUpdate::Unchanged
        );
    }

    #[test]
    fn test_config_after_load_hook_reconfigures() {
        // JNI_OnLoad installs the defaults; a configured handle comes later.
        let on_load = LoggingConfig::default();
        let configured = SignalConfig::from_toml_str("[logging]\ntag = \"Bench\"\nlevel = \"trace\"")
            .unwrap()
            .logging;

        assert_eq!(configured.level, LogLevel::Trace);
        assert_eq!(
            logging_update(Some(&on_load), &configured),
            LoggingUpdate::Reconfigure
        );

        let level_only = LoggingConfig {
            level: LogLevel::Debug,
            ..LoggingConfig::default()
        };
        assert_eq!(
            logging_update(Some(&on_load), &level_only),
            LoggingUpdate::Reconfigure
        );
    }

    #[cfg(not(target_os = "android"))]
    #[test]
    fn test_host_logging_is_unsupported() {
        let err = init_logging(&LoggingConfig::default()).unwrap_err();
        assert_eq!(err.code(), -8);
    }
}
