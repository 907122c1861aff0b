//! Raw capacitance driver for a flexible robot skin.
//!
//! The skin is a 21 x 12 TX/RX matrix read by an FT5x06-family controller
//! over I²C. In its test mode the controller exposes the raw capacitance of
//! every cell, one TX row per burst read. [`MatrixScanner`] drives that
//! protocol and packs the active lines into a dense [`Grid`].
//!
//! The driver is built on the `embedded_hal` 0.2 `blocking::i2c` and
//! `blocking::delay` traits, so any HAL providing them can host it.
//!
//! ```ignore
//! let mut skin = MatrixScanner::new(i2c, delay, Config::default());
//! skin.initialize()?;
//! skin.enable_raw_mode(true)?;
//! loop {
//!     if skin.poll() {
//!         let grid = skin.grid().unwrap();
//!         // grid.get(row, col) ...
//!     }
//! }
//! ```

#![cfg_attr(not(test), no_std)]

mod bus;
mod config;
mod error;
mod grid;
mod lines;
mod matrix;
pub mod registers;

pub use bus::RegisterBus;
pub use config::{BusConfig, Config};
pub use error::{Error, FaultKind, ScanHealth, TransactionFault};
pub use grid::Grid;
pub use lines::LineMask;
pub use matrix::MatrixScanner;
pub use registers::{RegisterMap, RX_COUNT, TX_COUNT};
