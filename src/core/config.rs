//! Application configuration loaded from environment variables.
use envconfig::Envconfig;
use humantime::Duration;
use reqwest::Url;
use thiserror::Error;

pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");

/// The inverter must not be polled more often than this.
pub const MIN_POLL_INTERVAL: std::time::Duration = std::time::Duration::from_secs(10);

#[derive(Envconfig)]
pub struct Config {
    #[allow(dead_code)]
    #[envconfig(from = "APP_LOG", default = "error")]
    pub app_log: String,
    #[allow(dead_code)]
    #[envconfig(from = "APP_LOG_STYLE", default = "always")]
    pub app_log_style: String,
    #[envconfig(from = "INVERTER_URL")]
    pub inverter_url: Url,
    #[envconfig(from = "INVERTER_PASSWORD")]
    pub inverter_password: String,
    #[envconfig(from = "INVERTER_POLL_INTERVAL", default = "10s")]
    pub inverter_poll_interval: Duration,
    #[envconfig(from = "INVERTER_REQUEST_TIMEOUT", default = "10s")]
    pub inverter_request_timeout: Duration,
    #[envconfig(from = "INVERTER_MAX_FAILED_POLLS", default = "10")]
    pub inverter_max_failed_polls: u32,
    #[envconfig(from = "HOMEASSISTANT_URL")]
    pub homeassistant_url: Url,
    #[envconfig(from = "HOMEASSISTANT_TOKEN")]
    pub homeassistant_token: String,
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("INVERTER_POLL_INTERVAL must be at least {min}, got {actual}")]
    PollIntervalTooShort { min: Duration, actual: Duration },
    #[error("INVERTER_MAX_FAILED_POLLS must be at least 1")]
    NoFailedPollsAllowed,
}

impl Config {
    /// Check the values that parse but make no sense.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if *self.inverter_poll_interval < MIN_POLL_INTERVAL {
            return Err(ConfigError::PollIntervalTooShort {
                min: MIN_POLL_INTERVAL.into(),
                actual: self.inverter_poll_interval,
            });
        }
        if self.inverter_max_failed_polls == 0 {
            return Err(ConfigError::NoFailedPollsAllowed);
        }
        Ok(())
    }
}

pub fn configure_logger() {
    let env = env_logger::Env::default()
        .filter_or("APP_LOG", "info")
        .write_style_or("APP_LOG_STYLE", "always");
    let _ = env_logger::try_init_from_env(env);
}

#[cfg(test)]
mod tests {
    use super::*;
    use temp_env::{with_var, with_vars};

    type Vars = Vec<(&'static str, Option<&'static str>)>;

    /// Required variables plus `extra`.
    fn required_vars(extra: &[(&'static str, Option<&'static str>)]) -> Vars {
        let mut vars: Vars = vec![
            ("INVERTER_URL", Some("http://192.168.1.50")),
            ("INVERTER_PASSWORD", Some("SWXXXXXXXX")),
            ("HOMEASSISTANT_URL", Some("http://localhost:8123")),
            ("HOMEASSISTANT_TOKEN", Some("test_token")),
        ];
        vars.extend_from_slice(extra);
        vars
    }

    #[test]
    fn test_config_from_env() {
        with_vars(
            [
                ("APP_LOG", Some("debug")),
                ("APP_LOG_STYLE", Some("auto")),
                ("INVERTER_URL", Some("http://192.168.1.50")),
                ("INVERTER_PASSWORD", Some("SWXXXXXXXX")),
                ("INVERTER_POLL_INTERVAL", Some("30s")),
                ("INVERTER_REQUEST_TIMEOUT", Some("5s")),
                ("INVERTER_MAX_FAILED_POLLS", Some("3")),
                ("HOMEASSISTANT_URL", Some("http://localhost:8123")),
                ("HOMEASSISTANT_TOKEN", Some("test_token")),
            ],
            || {
                let config = Config::init_from_env().unwrap();
                assert_eq!(config.app_log, "debug");
                assert_eq!(config.app_log_style, "auto");
                assert_eq!(
                    config.inverter_url,
                    Url::parse("http://192.168.1.50").unwrap()
                );
                assert_eq!(config.inverter_password, "SWXXXXXXXX");
                assert_eq!(
                    config.inverter_poll_interval,
                    std::time::Duration::from_secs(30).into()
                );
                assert_eq!(
                    config.inverter_request_timeout,
                    std::time::Duration::from_secs(5).into()
                );
                assert_eq!(config.inverter_max_failed_polls, 3);
                assert_eq!(
                    config.homeassistant_url,
                    Url::parse("http://localhost:8123").unwrap()
                );
                assert_eq!(config.homeassistant_token, "test_token");
                assert_eq!(config.validate(), Ok(()));
            },
        );
    }

    #[test]
    fn test_config_defaults() {
        with_vars(required_vars(&[]), || {
            let config = Config::init_from_env().unwrap();
            assert_eq!(
                config.inverter_poll_interval,
                std::time::Duration::from_secs(10).into()
            );
            assert_eq!(
                config.inverter_request_timeout,
                std::time::Duration::from_secs(10).into()
            );
            assert_eq!(config.inverter_max_failed_polls, 10);
            assert_eq!(config.validate(), Ok(()));
        });
    }

    #[test]
    fn test_config_missing_inverter_url() {
        with_vars(
            [
                ("INVERTER_URL", None),
                ("INVERTER_PASSWORD", Some("SWXXXXXXXX")),
                ("HOMEASSISTANT_URL", Some("http://localhost:8123")),
                ("HOMEASSISTANT_TOKEN", Some("test_token")),
            ],
            || {
                assert!(Config::init_from_env().is_err());
            },
        );
    }

    #[test]
    fn test_config_rejects_short_poll_interval() {
        with_vars(
            required_vars(&[("INVERTER_POLL_INTERVAL", Some("9s"))]),
            || {
                let config = Config::init_from_env().unwrap();
                assert!(matches!(
                    config.validate(),
                    Err(ConfigError::PollIntervalTooShort { .. })
                ));
            },
        );
    }

    #[test]
    fn test_config_rejects_zero_failed_polls() {
        with_vars(
            required_vars(&[("INVERTER_MAX_FAILED_POLLS", Some("0"))]),
            || {
                let config = Config::init_from_env().unwrap();
                assert_eq!(config.validate(), Err(ConfigError::NoFailedPollsAllowed));
            },
        );
    }

    #[test]
    fn test_configure_logger() {
        with_var("APP_LOG", Some("debug"), || {
            configure_logger();
            let log_level = log::max_level();
            assert_eq!(log_level, log::LevelFilter::Debug);
        });
    }
}
