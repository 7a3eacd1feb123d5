//! NVS (Non-Volatile Storage) adapter.
//!
//! Implements both [`ConfigPort`] and [`ByteStorePort`] for the sorter.
//!
//! - Config: `postcard`-encoded [`SorterConfig`] under key `sortcfg`,
//!   validated before every save.
//! - Label store: the ESP32-S3 has no EEPROM, so the byte-addressed label
//!   image (`1 + 30 × 50` bytes) lives in one NVS blob under key `labels`.
//!   Reads and writes hit a RAM copy; [`commit`](ByteStorePort::commit)
//!   writes the blob and calls `nvs_commit`.  A missing blob reads as all
//!   zeros, i.e. an empty list.
//!
//! On host targets both live in an in-memory map.

use core::ffi::CStr;

use crate::app::ports::{ByteStorePort, ConfigError, ConfigPort, StorageError};
use crate::config::{SorterConfig, validate_config};
use crate::labels::STORE_SIZE;
use log::{info, warn};

#[cfg(not(target_os = "espidf"))]
use std::collections::HashMap;

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

const NAMESPACE: &CStr = c"binsorter";
const CONFIG_KEY: &CStr = c"sortcfg";
const LABELS_KEY: &CStr = c"labels";

/// Largest blob this adapter will read back.
const MAX_BLOB_SIZE: usize = 4000;

pub struct NvsAdapter {
    /// RAM copy of the label image.
    image: Vec<u8>,
    dirty: bool,
    /// `false` when flash is unusable: blobs are neither read nor written.
    persistent: bool,
    #[cfg(not(target_os = "espidf"))]
    store: HashMap<String, Vec<u8>>,
}

impl NvsAdapter {
    /// Initialise NVS flash and load the label image.
    ///
    /// Returns `Err(ConfigError::IoError)` if flash initialisation fails
    /// unrecoverably. On first boot or after a version mismatch the NVS
    /// partition is erased and re-initialised automatically.
    pub fn new() -> Result<Self, ConfigError> {
        #[cfg(target_os = "espidf")]
        {
            // SAFETY: called once from the main task before any other NVS use.
            let ret = unsafe { nvs_flash_init() };
            if ret == ESP_ERR_NVS_NO_FREE_PAGES || ret == ESP_ERR_NVS_NEW_VERSION_FOUND {
                warn!("NVS: erasing and re-initialising flash partition");
                if unsafe { nvs_flash_erase() } != ESP_OK {
                    return Err(ConfigError::IoError);
                }
                if unsafe { nvs_flash_init() } != ESP_OK {
                    return Err(ConfigError::IoError);
                }
            } else if ret != ESP_OK {
                return Err(ConfigError::IoError);
            }
            info!("NvsAdapter: ESP-IDF NVS initialised");
        }

        #[cfg(not(target_os = "espidf"))]
        info!("NvsAdapter: simulation backend");

        let mut adapter = Self::empty();
        adapter.reload_image();
        Ok(adapter)
    }

    /// Fallback when flash init fails: a blank RAM image that is never
    /// persisted.  Flash is not touched again.
    pub fn ram_only() -> Self {
        Self {
            persistent: false,
            ..Self::empty()
        }
    }

    /// An adapter with a blank image and nothing persisted yet.
    fn empty() -> Self {
        Self {
            image: vec![0; STORE_SIZE],
            dirty: false,
            persistent: true,
            #[cfg(not(target_os = "espidf"))]
            store: HashMap::new(),
        }
    }

    /// Refresh the RAM image from flash.  Missing or unreadable blobs
    /// leave a zeroed image.
    fn reload_image(&mut self) {
        self.image.fill(0);
        match self.read_blob(LABELS_KEY) {
            Ok(Some(bytes)) => {
                let len = bytes.len().min(STORE_SIZE);
                self.image[..len].copy_from_slice(&bytes[..len]);
                info!("NvsAdapter: label image loaded ({} bytes)", bytes.len());
            }
            Ok(None) => info!("NvsAdapter: no label image, starting empty"),
            Err(e) => warn!("NvsAdapter: label image unreadable ({}), starting empty", e),
        }
        self.dirty = false;
    }

    fn read_blob(&self, key: &CStr) -> Result<Option<Vec<u8>>, StorageError> {
        if !self.persistent {
            return Ok(None);
        }
        self.backend_read(key)
    }

    fn write_blob(&mut self, key: &CStr, data: &[u8]) -> Result<(), StorageError> {
        if !self.persistent {
            return Ok(());
        }
        self.backend_write(key, data)
    }

    #[cfg(not(target_os = "espidf"))]
    fn backend_read(&self, key: &CStr) -> Result<Option<Vec<u8>>, StorageError> {
        Ok(self.store.get(&Self::composite_key(key)).cloned())
    }

    #[cfg(not(target_os = "espidf"))]
    fn backend_write(&mut self, key: &CStr, data: &[u8]) -> Result<(), StorageError> {
        self.store.insert(Self::composite_key(key), data.to_vec());
        Ok(())
    }

    #[cfg(not(target_os = "espidf"))]
    fn composite_key(key: &CStr) -> String {
        format!(
            "{}::{}",
            NAMESPACE.to_string_lossy(),
            key.to_string_lossy()
        )
    }

    #[cfg(target_os = "espidf")]
    fn backend_read(&self, key: &CStr) -> Result<Option<Vec<u8>>, StorageError> {
        let result = Self::with_nvs_handle(false, |handle| {
            let mut size: usize = 0;
            // First call: get size
            let ret = unsafe { nvs_get_blob(handle, key.as_ptr(), core::ptr::null_mut(), &mut size) };
            if ret == ESP_ERR_NVS_NOT_FOUND {
                return Ok(None);
            }
            if ret != ESP_OK || size > MAX_BLOB_SIZE {
                return Err(ret);
            }

            let mut buf = vec![0u8; size];
            let ret = unsafe {
                nvs_get_blob(handle, key.as_ptr(), buf.as_mut_ptr() as *mut _, &mut size)
            };
            if ret != ESP_OK {
                return Err(ret);
            }
            buf.truncate(size);
            Ok(Some(buf))
        });
        match result {
            // A namespace that was never written cannot be opened read-only.
            Err(e) if e == ESP_ERR_NVS_NOT_FOUND => Ok(None),
            Err(e) => {
                warn!("NvsAdapter: NVS read error {}", e);
                Err(StorageError::IoError)
            }
            Ok(v) => Ok(v),
        }
    }

    #[cfg(target_os = "espidf")]
    fn backend_write(&mut self, key: &CStr, data: &[u8]) -> Result<(), StorageError> {
        let result = Self::with_nvs_handle(true, |handle| {
            let ret = unsafe {
                nvs_set_blob(handle, key.as_ptr(), data.as_ptr() as *const _, data.len())
            };
            if ret != ESP_OK {
                return Err(ret);
            }
            let ret = unsafe { nvs_commit(handle) };
            if ret != ESP_OK {
                return Err(ret);
            }
            Ok(())
        });
        result.map_err(|e| {
            warn!("NvsAdapter: NVS write error {}", e);
            if e == ESP_ERR_NVS_NOT_ENOUGH_SPACE {
                StorageError::Full
            } else {
                StorageError::IoError
            }
        })
    }

    /// Open the namespace, execute a closure with the handle, then close.
    #[cfg(target_os = "espidf")]
    fn with_nvs_handle<F, T>(write: bool, f: F) -> Result<T, i32>
    where
        F: FnOnce(nvs_handle_t) -> Result<T, i32>,
    {
        let mut handle: nvs_handle_t = 0;
        let mode = if write {
            nvs_open_mode_t_NVS_READWRITE
        } else {
            nvs_open_mode_t_NVS_READONLY
        };

        let ret = unsafe { nvs_open(NAMESPACE.as_ptr(), mode, &mut handle) };
        if ret != ESP_OK {
            return Err(ret);
        }

        let result = f(handle);
        unsafe {
            nvs_close(handle);
        }
        result
    }
}

// ── ConfigPort ────────────────────────────────────────────────

impl ConfigPort for NvsAdapter {
    fn load(&self) -> Result<SorterConfig, ConfigError> {
        match self.read_blob(CONFIG_KEY) {
            Ok(Some(bytes)) => {
                let cfg: SorterConfig =
                    postcard::from_bytes(&bytes).map_err(|_| ConfigError::Corrupted)?;
                validate_config(&cfg)?;
                info!("NvsAdapter: loaded config ({} bytes)", bytes.len());
                Ok(cfg)
            }
            Ok(None) => {
                info!("NvsAdapter: no stored config, using defaults");
                Ok(SorterConfig::default())
            }
            Err(_) => Err(ConfigError::IoError),
        }
    }

    fn save(&mut self, config: &SorterConfig) -> Result<(), ConfigError> {
        validate_config(config)?;
        let bytes = postcard::to_allocvec(config).map_err(|_| ConfigError::IoError)?;
        self.write_blob(CONFIG_KEY, &bytes)
            .map_err(|_| ConfigError::IoError)?;
        info!("NvsAdapter: config saved ({} bytes)", bytes.len());
        Ok(())
    }
}

// ── ByteStorePort ─────────────────────────────────────────────

impl ByteStorePort for NvsAdapter {
    fn capacity(&self) -> usize {
        STORE_SIZE
    }

    fn read_byte(&self, addr: usize) -> Result<u8, StorageError> {
        self.image
            .get(addr)
            .copied()
            .ok_or(StorageError::OutOfBounds { addr })
    }

    fn write_byte(&mut self, addr: usize, value: u8) -> Result<(), StorageError> {
        let slot = self
            .image
            .get_mut(addr)
            .ok_or(StorageError::OutOfBounds { addr })?;
        if *slot != value {
            *slot = value;
            self.dirty = true;
        }
        Ok(())
    }

    fn commit(&mut self) -> Result<(), StorageError> {
        if !self.dirty {
            return Ok(());
        }
        let image = core::mem::take(&mut self.image);
        let result = self.write_blob(LABELS_KEY, &image);
        self.image = image;
        result?;
        self.dirty = false;
        Ok(())
    }
}
