//! Configuration read from environment variables. The variables are process
//! global, so every test holds `ENV_LOCK` while it sets and clears them.

use interceptor_log_kit::backend::{logger_from_env, FormatError, LogFormat, LoggerConfig};
use interceptor_log_kit::env::{env_flag, env_or, LOG_FORMAT_ENV, LOG_LEVEL_ENV, LOG_TIMESTAMP_ENV};
use interceptor_log_kit::fields;
use interceptor_log_kit::init::{InitError, TracingConfig};
use interceptor_log_kit::level::ParseLevelError;
use interceptor_log_kit::{KvLogger, Level};
use std::sync::{Mutex, MutexGuard};

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Holds the lock and clears the given variables on drop.
struct EnvGuard {
    keys: Vec<&'static str>,
    _lock: MutexGuard<'static, ()>,
}

impl EnvGuard {
    fn new(vars: &[(&'static str, &str)]) -> Self {
        let lock = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        for key in [LOG_FORMAT_ENV, LOG_LEVEL_ENV, LOG_TIMESTAMP_ENV] {
            std::env::remove_var(key);
        }
        for (key, value) in vars {
            std::env::set_var(key, value);
        }
        EnvGuard {
            keys: vars.iter().map(|(k, _)| *k).collect(),
            _lock: lock,
        }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for key in &self.keys {
            std::env::remove_var(key);
        }
    }
}

#[test]
fn env_flag_accepts_common_spellings() {
    for value in ["1", "true", "YES", " on "] {
        let _env = EnvGuard::new(&[(LOG_TIMESTAMP_ENV, value)]);
        assert!(env_flag(LOG_TIMESTAMP_ENV), "{value:?} should be set");
    }
    for value in ["0", "false", "off", ""] {
        let _env = EnvGuard::new(&[(LOG_TIMESTAMP_ENV, value)]);
        assert!(!env_flag(LOG_TIMESTAMP_ENV), "{value:?} should be unset");
    }

    let _env = EnvGuard::new(&[]);
    assert!(!env_flag(LOG_TIMESTAMP_ENV));
}

#[test]
fn env_or_falls_back_when_unset() {
    let _env = EnvGuard::new(&[]);
    assert_eq!(env_or(LOG_FORMAT_ENV, "logfmt"), "logfmt");
    drop(_env);

    let _env = EnvGuard::new(&[(LOG_FORMAT_ENV, "json")]);
    assert_eq!(env_or(LOG_FORMAT_ENV, "logfmt"), "json");
}

#[test]
fn logger_config_defaults_to_logfmt_without_timestamp() {
    let _env = EnvGuard::new(&[]);
    assert_eq!(LoggerConfig::from_env(), Ok(LoggerConfig::new(LogFormat::Logfmt)));
}

#[test]
fn logger_config_reads_format_and_timestamp() {
    let _env = EnvGuard::new(&[(LOG_FORMAT_ENV, "JSON"), (LOG_TIMESTAMP_ENV, "yes")]);
    assert_eq!(
        LoggerConfig::from_env(),
        Ok(LoggerConfig {
            format: LogFormat::Json,
            timestamp: true,
        })
    );
}

#[test]
fn logger_from_env_builds_selected_logger() {
    let _env = EnvGuard::new(&[(LOG_FORMAT_ENV, "nop")]);
    let logger = logger_from_env().unwrap_or_else(|e| panic!("nop format rejected: {e}"));
    assert!(logger.log(&fields!["msg" => "finished call", "level" => "info"]).is_ok());
}

#[test]
fn logger_from_env_rejects_unknown_format() {
    let _env = EnvGuard::new(&[(LOG_FORMAT_ENV, "yaml")]);
    assert_eq!(logger_from_env().err(), Some(FormatError::Unknown("yaml".to_string())));
}

#[test]
fn tracing_config_reads_level() {
    let _env = EnvGuard::new(&[]);
    assert_eq!(TracingConfig::from_env().unwrap().max_level, Level::Info);
    drop(_env);

    let _env = EnvGuard::new(&[(LOG_LEVEL_ENV, "debug")]);
    let config = TracingConfig::from_env().unwrap();
    assert_eq!(config.max_level, Level::Debug);
    assert!(config.with_target);
    assert!(!config.stderr);
}

#[test]
fn tracing_config_rejects_invalid_level() {
    let _env = EnvGuard::new(&[(LOG_LEVEL_ENV, "loud")]);
    match TracingConfig::from_env() {
        Err(InitError::InvalidLevel(ParseLevelError(name))) => assert_eq!(name, "loud"),
        other => panic!("expected invalid level, got {other:?}"),
    }
}
