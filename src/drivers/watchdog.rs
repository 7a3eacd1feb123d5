//! Task Watchdog Timer (TWDT) driver.
//!
//! Subscribes the main task to the ESP-IDF TWDT so a wedged main loop
//! resets the device.  The longest legitimate stall is a FINISH_SORT hold
//! (about 2.3 s), well inside the timeout.
//!
//! The main loop must call [`Watchdog::feed`] on every iteration.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

use log::info;

/// Reset the device if the main loop stalls for this long.
pub const WATCHDOG_TIMEOUT_MS: u32 = 10_000;

pub struct Watchdog {
    subscribed: bool,
}

impl Watchdog {
    /// Reconfigure the TWDT and subscribe the calling task.
    pub fn subscribe() -> Self {
        #[cfg(target_os = "espidf")]
        {
            // SAFETY: plain FFI calls on the current task's handle.
            let subscribed = unsafe {
                let cfg = esp_task_wdt_config_t {
                    timeout_ms: WATCHDOG_TIMEOUT_MS,
                    idle_core_mask: 0,
                    trigger_panic: true,
                };
                let ret = esp_task_wdt_reconfigure(&cfg);
                if ret != ESP_OK {
                    log::warn!("TWDT reconfigure returned {} (may already be configured)", ret);
                }
                esp_task_wdt_add(core::ptr::null_mut()) == ESP_OK
            };
            if subscribed {
                info!("Watchdog: subscribed ({} ms timeout)", WATCHDOG_TIMEOUT_MS);
            } else {
                log::warn!("Watchdog: failed to subscribe, running unsupervised");
            }
            Self { subscribed }
        }

        #[cfg(not(target_os = "espidf"))]
        {
            info!("Watchdog(sim): no-op");
            Self { subscribed: false }
        }
    }

    /// Feed the watchdog.
    pub fn feed(&self) {
        #[cfg(target_os = "espidf")]
        if self.subscribed {
            // SAFETY: the task subscribed itself in `subscribe`.
            unsafe {
                esp_task_wdt_reset();
            }
        }
    }

    pub fn is_subscribed(&self) -> bool {
        self.subscribed
    }
}
