//! segsign firmware for the nRF52840.
//!
//! Six multiplexed 16-segment digits, a 4×4 multi-tap keypad and a 24C02
//! EEPROM holding one message.

#![no_std]
#![no_main]

mod board;

use defmt::{info, unwrap};
use embassy_executor::Spawner;
use segsign::SignState;
use {defmt_rtt as _, panic_probe as _};

use board::{tasks, Board};

/// Shared between the refresh, keypad and UI tasks.
static SIGN: SignState = SignState::new();

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("segsign starting...");

    let p = embassy_nrf::init(Default::default());
    let board = Board::new(p);
    info!("Peripherals initialized");

    unwrap!(spawner.spawn(tasks::display_task(board.display)));
    unwrap!(spawner.spawn(tasks::keypad_task(board.keypad)));
    unwrap!(spawner.spawn(tasks::ui_task(board.eeprom)));
}
