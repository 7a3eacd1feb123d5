//! Mechanical configuration parameters
//!
//! Angles and settling delays for the sorting servo, plus the pacing of the
//! debounce gate and the status display.  Values can be overridden via NVS;
//! the defaults match the reference build of the sorting station.
//!
//! The end-of-pass handshake cadence is deliberately absent: hosts depend
//! on it, so it lives in [`crate::protocol`] as constants.

use serde::{Deserialize, Serialize};

use crate::app::ports::{ConfigError, ConfigPort};

/// Core sorter configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SorterConfig {
    // --- Servo angles (degrees) ---
    /// Deflection toward the target pile
    pub target_angle: u8,
    /// Deflection toward the other pile
    pub other_angle: u8,
    /// Resting position between items
    pub neutral_angle: u8,

    // --- Motion timing ---
    /// Time held at the side angle so the item can drop (ms)
    pub sort_deflect_ms: u32,
    /// Time allowed for the return to neutral to settle (ms)
    pub sort_return_ms: u32,
    /// Wait on PAUSE_SORT before reporting, so in-flight motion completes (ms)
    pub pause_settle_ms: u32,
    /// Settle time after the boot-time move to neutral (ms)
    pub boot_settle_ms: u32,
    /// How long the "Session Done" screen is held on FINISH_SORT (ms)
    pub finish_hold_ms: u32,

    // --- Pacing ---
    /// Window in which a repeated identical label is suppressed (ms)
    pub sort_cooldown_ms: u32,
    /// Minimum interval between periodic status redraws (ms)
    pub display_refresh_interval_ms: u32,

    // --- Host link ---
    /// UART baud rate for the host link
    pub serial_baud: u32,
}

impl Default for SorterConfig {
    fn default() -> Self {
        Self {
            // Servo
            target_angle: 135,
            other_angle: 53,
            neutral_angle: 93,

            // Motion
            sort_deflect_ms: 800,
            sort_return_ms: 300,
            pause_settle_ms: 1000,
            boot_settle_ms: 500,
            finish_hold_ms: 2000,

            // Pacing
            sort_cooldown_ms: 1500,
            display_refresh_interval_ms: 500,

            // Host link
            serial_baud: 9600,
        }
    }
}

/// Load the stored config.  A stored config that fails to decode or
/// validate is overwritten with the defaults; an I/O failure leaves the
/// store alone.  Never fails: the defaults are always usable.
pub fn load_or_restore(port: &mut impl ConfigPort) -> SorterConfig {
    match port.load() {
        Ok(cfg) => cfg,
        Err(ConfigError::IoError) => {
            log::warn!("config: storage unreadable, using defaults");
            SorterConfig::default()
        }
        Err(e) => {
            log::warn!("config: stored copy rejected ({}), restoring defaults", e);
            let cfg = SorterConfig::default();
            if let Err(e) = port.save(&cfg) {
                log::warn!("config: restoring defaults failed ({})", e);
            }
            cfg
        }
    }
}

/// Range-check every field.  Used by the NVS adapter on load and save.
pub fn validate_config(cfg: &SorterConfig) -> Result<(), ConfigError> {
    for angle in [cfg.target_angle, cfg.other_angle, cfg.neutral_angle] {
        if angle > 180 {
            return Err(ConfigError::ValidationFailed("servo angles must be 0–180"));
        }
    }
    if cfg.target_angle == cfg.neutral_angle || cfg.other_angle == cfg.neutral_angle {
        return Err(ConfigError::ValidationFailed(
            "side angles must differ from neutral_angle",
        ));
    }
    if cfg.target_angle == cfg.other_angle {
        return Err(ConfigError::ValidationFailed(
            "target_angle and other_angle must differ",
        ));
    }
    if !(100..=5000).contains(&cfg.sort_deflect_ms) {
        return Err(ConfigError::ValidationFailed(
            "sort_deflect_ms must be 100–5000",
        ));
    }
    if !(50..=5000).contains(&cfg.sort_return_ms) {
        return Err(ConfigError::ValidationFailed(
            "sort_return_ms must be 50–5000",
        ));
    }
    if cfg.pause_settle_ms > 10_000 {
        return Err(ConfigError::ValidationFailed(
            "pause_settle_ms must be ≤ 10000",
        ));
    }
    if !(100..=60_000).contains(&cfg.sort_cooldown_ms) {
        return Err(ConfigError::ValidationFailed(
            "sort_cooldown_ms must be 100–60000",
        ));
    }
    if !(100..=10_000).contains(&cfg.display_refresh_interval_ms) {
        return Err(ConfigError::ValidationFailed(
            "display_refresh_interval_ms must be 100–10000",
        ));
    }
    if !matches!(cfg.serial_baud, 9600 | 19_200 | 38_400 | 57_600 | 115_200) {
        return Err(ConfigError::ValidationFailed(
            "serial_baud must be a standard rate 9600–115200",
        ));
    }
    Ok(())
}
