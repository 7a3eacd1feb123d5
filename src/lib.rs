//! BinSorter firmware library.
//!
//! Exposes the pure-logic modules for integration testing and external
//! inspection. All ESP-IDF-specific code is guarded by
//! `#[cfg(target_os = "espidf")]` within each module.

#![deny(unused_must_use)]

pub mod app;
pub mod config;
pub mod display;
pub mod error;
pub mod fsm;
pub mod labels;
pub mod pins;
pub mod protocol;
pub mod sorter;

// Hardware-facing layers compile on the host too; the ESP-IDF halves are
// cfg-gated inside.
pub mod adapters;
pub mod drivers;
