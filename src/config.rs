//! Executor configuration
//!
//! Defaults match the reference board; every field can be overridden with a
//! `HEXFORGE_*` environment variable.

use hexforge_shared::limits;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Configuration errors are fatal at startup
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },
}

/// Byte stream the host talks over
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportConfig {
    /// Serial port, e.g. a USB CDC-ACM gadget (`/dev/ttyGS0`)
    Serial { port: String, baud: u32 },
    /// TCP connection to a host-side harness (for development)
    Tcp { address: String },
}

/// Where HID reports go
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HidConfig {
    /// Linux USB gadget device nodes
    Gadget {
        keyboard: PathBuf,
        mouse: PathBuf,
    },
    /// Log reports only
    Log,
}

/// How the physical interlock is read
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InterlockConfig {
    Sysfs { path: PathBuf, active_high: bool },
    Simulated { engaged: bool },
}

/// Configuration for the executor process
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutorConfig {
    /// Device ID reported in status events
    pub device_id: String,
    pub transport: TransportConfig,
    pub hid: HidConfig,
    pub interlock: InterlockConfig,
    /// Minimum spacing between dispatched actions
    pub min_action_delay: Duration,
    /// Status heartbeat period
    pub heartbeat_interval: Duration,
    /// Longest inbound line in bytes
    pub max_line_length: usize,
    /// Reconnection delay (initial)
    pub reconnect_delay: Duration,
    /// Maximum reconnection delay
    pub max_reconnect_delay: Duration,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            device_id: "esp32-hid".into(),
            transport: TransportConfig::Serial {
                port: "/dev/ttyGS0".into(),
                baud: 115_200,
            },
            hid: HidConfig::Gadget {
                keyboard: "/dev/hidg0".into(),
                mouse: "/dev/hidg1".into(),
            },
            interlock: InterlockConfig::Sysfs {
                path: "/sys/class/gpio/gpio5/value".into(),
                active_high: true,
            },
            min_action_delay: Duration::from_millis(limits::MIN_ACTION_DELAY_MS),
            heartbeat_interval: Duration::from_millis(limits::HEARTBEAT_INTERVAL_MS),
            max_line_length: limits::MAX_LINE_LENGTH,
            reconnect_delay: Duration::from_secs(1),
            max_reconnect_delay: Duration::from_secs(30),
        }
    }
}

impl ExecutorConfig {
    /// Build from defaults overridden by the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from defaults overridden by `lookup`
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let env = Env(lookup);

        let device_id = env
            .string("HEXFORGE_DEVICE_ID")
            .unwrap_or_else(|| defaults.device_id.clone());

        let transport = match env.string("HEXFORGE_TRANSPORT").as_deref() {
            None | Some("serial") => TransportConfig::Serial {
                port: env
                    .string("HEXFORGE_SERIAL_PORT")
                    .unwrap_or_else(|| "/dev/ttyGS0".into()),
                baud: env.parse("HEXFORGE_BAUD")?.unwrap_or(115_200),
            },
            Some("tcp") => TransportConfig::Tcp {
                address: env
                    .string("HEXFORGE_TCP_ADDR")
                    .unwrap_or_else(|| "127.0.0.1:7000".into()),
            },
            Some(other) => return Err(invalid("HEXFORGE_TRANSPORT", other)),
        };

        let hid = match env.string("HEXFORGE_HID").as_deref() {
            None | Some("gadget") => HidConfig::Gadget {
                keyboard: env
                    .string("HEXFORGE_HID_KEYBOARD")
                    .map(PathBuf::from)
                    .unwrap_or_else(|| "/dev/hidg0".into()),
                mouse: env
                    .string("HEXFORGE_HID_MOUSE")
                    .map(PathBuf::from)
                    .unwrap_or_else(|| "/dev/hidg1".into()),
            },
            Some("log") => HidConfig::Log,
            Some(other) => return Err(invalid("HEXFORGE_HID", other)),
        };

        let interlock = match env.string("HEXFORGE_INTERLOCK").as_deref() {
            None | Some("sysfs") => InterlockConfig::Sysfs {
                path: env
                    .string("HEXFORGE_INTERLOCK_PATH")
                    .map(PathBuf::from)
                    .unwrap_or_else(|| "/sys/class/gpio/gpio5/value".into()),
                active_high: env.parse("HEXFORGE_INTERLOCK_ACTIVE_HIGH")?.unwrap_or(true),
            },
            Some("simulated") => InterlockConfig::Simulated {
                engaged: env.parse("HEXFORGE_SIMULATED_ENGAGED")?.unwrap_or(false),
            },
            Some(other) => return Err(invalid("HEXFORGE_INTERLOCK", other)),
        };

        let min_action_delay = env
            .parse("HEXFORGE_MIN_ACTION_DELAY_MS")?
            .map(Duration::from_millis)
            .unwrap_or(defaults.min_action_delay);

        let heartbeat_interval = match env.parse("HEXFORGE_HEARTBEAT_MS")? {
            Some(0) => return Err(invalid("HEXFORGE_HEARTBEAT_MS", "0")),
            Some(ms) => Duration::from_millis(ms),
            None => defaults.heartbeat_interval,
        };

        Ok(Self {
            device_id,
            transport,
            hid,
            interlock,
            min_action_delay,
            heartbeat_interval,
            ..defaults
        })
    }
}

struct Env<F>(F);

impl<F: Fn(&str) -> Option<String>> Env<F> {
    fn string(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|v| !v.is_empty())
    }

    fn parse<T: std::str::FromStr>(&self, key: &'static str) -> Result<Option<T>, ConfigError> {
        self.string(key)
            .map(|raw| raw.parse().map_err(|_| invalid(key, &raw)))
            .transpose()
    }
}

fn invalid(key: &'static str, value: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key,
        value: value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<ExecutorConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ExecutorConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_default_config() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config, ExecutorConfig::default());
        assert_eq!(config.device_id, "esp32-hid");
        assert_eq!(config.min_action_delay, Duration::from_millis(100));
        assert_eq!(config.heartbeat_interval, Duration::from_millis(1000));
        assert!(matches!(config.transport, TransportConfig::Serial { baud: 115_200, .. }));
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("HEXFORGE_DEVICE_ID", "bench-1"),
            ("HEXFORGE_TRANSPORT", "tcp"),
            ("HEXFORGE_TCP_ADDR", "10.0.0.2:7001"),
            ("HEXFORGE_HID", "log"),
            ("HEXFORGE_INTERLOCK", "simulated"),
            ("HEXFORGE_SIMULATED_ENGAGED", "true"),
            ("HEXFORGE_MIN_ACTION_DELAY_MS", "250"),
            ("HEXFORGE_HEARTBEAT_MS", "500"),
        ])
        .unwrap();

        assert_eq!(config.device_id, "bench-1");
        assert_eq!(
            config.transport,
            TransportConfig::Tcp {
                address: "10.0.0.2:7001".into()
            }
        );
        assert_eq!(config.hid, HidConfig::Log);
        assert_eq!(config.interlock, InterlockConfig::Simulated { engaged: true });
        assert_eq!(config.min_action_delay, Duration::from_millis(250));
        assert_eq!(config.heartbeat_interval, Duration::from_millis(500));
    }

    #[test]
    fn test_sysfs_active_low() {
        let config = config_from(&[
            ("HEXFORGE_INTERLOCK_PATH", "/sys/class/gpio/gpio17/value"),
            ("HEXFORGE_INTERLOCK_ACTIVE_HIGH", "false"),
        ])
        .unwrap();
        assert_eq!(
            config.interlock,
            InterlockConfig::Sysfs {
                path: "/sys/class/gpio/gpio17/value".into(),
                active_high: false,
            }
        );
    }

    #[test]
    fn test_invalid_values() {
        assert_eq!(
            config_from(&[("HEXFORGE_BAUD", "fast")]),
            Err(ConfigError::InvalidValue {
                key: "HEXFORGE_BAUD",
                value: "fast".into()
            })
        );
        assert!(config_from(&[("HEXFORGE_TRANSPORT", "carrier-pigeon")]).is_err());
        assert!(config_from(&[("HEXFORGE_HEARTBEAT_MS", "0")]).is_err());
        assert!(config_from(&[
            ("HEXFORGE_INTERLOCK", "simulated"),
            ("HEXFORGE_SIMULATED_ENGAGED", "1"),
        ])
        .is_err());
    }
}
