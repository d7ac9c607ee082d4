//! Board-independent logic for the segsign scrolling message sign.
//!
//! Everything here builds for the host so it can be unit tested; the
//! nRF52840 firmware in `main.rs` wires it to real pins and tasks.
//!
//! Usage: `cargo test`
//!
//! Firmware: `cargo run --release --features embedded --target thumbv7em-none-eabihf`
//!
//! Data flow:
//!
//! ```text
//!   keypad task ──► Keypad::scan ──┐
//!                                  ▼
//!                              SignState ◄── ui::Controller ──► store ──► ByteStore
//!                                  │
//!   refresh task ◄─ Multiplexer ◄──┘
//! ```

#![cfg_attr(not(test), no_std)]

// Must come first so the logging macros are visible to every module.
#[macro_use]
mod fmt;

pub mod codec;
pub mod config;
pub mod display;
pub mod eeprom;
pub mod error;
pub mod hal;
pub mod keypad;
pub mod message;
pub mod rotate;
pub mod shared;
pub mod store;
pub mod ui;

pub use error::Error;
pub use shared::{ButtonEvent, SignState};
