//! Physical interlock readers

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::warn;

/// A physical signal that must be engaged before arming is permitted
pub trait Interlock: Send + Sync {
    /// Live reading of the interlock
    fn is_engaged(&self) -> bool;

    /// Human-readable name for this interlock
    fn name(&self) -> &'static str;
}

/// Interlock wired to a GPIO exported through sysfs
///
/// Reads the `value` file (`0` or `1`) on every call. Any read failure is
/// treated as disengaged.
#[derive(Debug, Clone)]
pub struct SysfsInterlock {
    path: PathBuf,
    active_high: bool,
}

impl SysfsInterlock {
    pub fn new(path: impl Into<PathBuf>, active_high: bool) -> Self {
        Self {
            path: path.into(),
            active_high,
        }
    }

    fn read_level(&self) -> std::io::Result<bool> {
        let raw = std::fs::read_to_string(&self.path)?;
        match raw.trim() {
            "1" => Ok(true),
            "0" => Ok(false),
            other => Err(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("unexpected GPIO value {:?}", other),
            )),
        }
    }
}

impl Interlock for SysfsInterlock {
    fn is_engaged(&self) -> bool {
        match self.read_level() {
            Ok(level) => level == self.active_high,
            Err(e) => {
                warn!("[SAFETY] Interlock read from {} failed: {}", self.path.display(), e);
                false
            }
        }
    }

    fn name(&self) -> &'static str {
        "sysfs"
    }
}

/// Software interlock for bench setups and tests; clones share one switch
#[derive(Debug, Clone, Default)]
pub struct SimulatedInterlock {
    engaged: Arc<AtomicBool>,
}

impl SimulatedInterlock {
    pub fn new(engaged: bool) -> Self {
        Self {
            engaged: Arc::new(AtomicBool::new(engaged)),
        }
    }

    pub fn set(&self, engaged: bool) {
        self.engaged.store(engaged, Ordering::SeqCst);
    }
}

impl Interlock for SimulatedInterlock {
    fn is_engaged(&self) -> bool {
        self.engaged.load(Ordering::SeqCst)
    }

    fn name(&self) -> &'static str {
        "simulated"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gpio_file(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("hexforge-gpio-{}-{}", std::process::id(), name));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_sysfs_active_high() {
        let path = gpio_file("high", "1\n");
        assert!(SysfsInterlock::new(&path, true).is_engaged());
        assert!(!SysfsInterlock::new(&path, false).is_engaged());

        std::fs::write(&path, "0\n").unwrap();
        assert!(!SysfsInterlock::new(&path, true).is_engaged());
        assert!(SysfsInterlock::new(&path, false).is_engaged());
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn test_sysfs_failure_is_disengaged() {
        let garbage = gpio_file("garbage", "maybe");
        assert!(!SysfsInterlock::new(&garbage, true).is_engaged());
        assert!(!SysfsInterlock::new(&garbage, false).is_engaged());
        let _ = std::fs::remove_file(garbage);

        let missing = std::env::temp_dir().join("hexforge-gpio-missing/value");
        assert!(!SysfsInterlock::new(missing, true).is_engaged());
    }

    #[test]
    fn test_simulated_shared_switch() {
        let interlock = SimulatedInterlock::new(false);
        let handle = interlock.clone();
        assert!(!interlock.is_engaged());
        handle.set(true);
        assert!(interlock.is_engaged());
    }
}
