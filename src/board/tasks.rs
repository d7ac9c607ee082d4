//! The three long-running tasks.
//!
//! The refresh and keypad tasks only do a few microseconds of pin work per
//! wake-up; the UI task spends almost all its time awaiting delays, so one
//! cooperative executor keeps all three on time.

use defmt::info;
use embassy_futures::select::{select, select4, Either};
use embassy_time::{Delay, Duration, Ticker, Timer};
use segsign::codec::Polarity;
use segsign::config::{KEY_IDLE_RESET_MS, KEY_SCAN_PERIOD_US, MULTIPLEX_TICK_US};
use segsign::display::Multiplexer;
use segsign::eeprom::Eeprom24x;
use segsign::keypad::Keypad;
use segsign::ui::Controller;

use super::{DisplayPins, EepromBus, KeypadPins, Matrix};
use crate::SIGN;

/// Light one digit per tick, forever.
#[embassy_executor::task]
pub async fn display_task(pins: DisplayPins) {
    let DisplayPins {
        mut digits,
        mut segments,
    } = pins;
    // The segment drivers sink current: a lit segment is a low output.
    let mut mux = Multiplexer::new(Polarity::ActiveLow);
    let mut ticker = Ticker::every(Duration::from_micros(MULTIPLEX_TICK_US));

    info!("display: refreshing every {} us", MULTIPLEX_TICK_US);
    loop {
        mux.tick(&SIGN, &mut digits, &mut segments);
        ticker.next().await;
    }
}

/// Sleep until a column goes low, scan while keys are down, then reset the
/// hold counter once the keypad has been quiet for the idle period.
#[embassy_executor::task]
pub async fn keypad_task(pins: KeypadPins) {
    let KeypadPins {
        mut matrix,
        mut led,
    } = pins;
    let mut keypad = Keypad::new();

    info!("keypad: ready");
    loop {
        any_column_low(&mut matrix).await;

        led.set_low();
        let mut ticker = Ticker::every(Duration::from_micros(KEY_SCAN_PERIOD_US));
        while keypad.scan(&mut matrix, &SIGN) {
            ticker.next().await;
        }
        led.set_high();

        let quiet = Timer::after(Duration::from_millis(KEY_IDLE_RESET_MS));
        if let Either::Second(()) = select(any_column_low(&mut matrix), quiet).await {
            keypad.idle_reset(&SIGN);
        }
    }
}

/// All rows are driven between scans, so any press pulls its column low.
async fn any_column_low(matrix: &mut Matrix) {
    let [c0, c1, c2, c3] = matrix.columns_mut();
    select4(
        c0.wait_for_low(),
        c1.wait_for_low(),
        c2.wait_for_low(),
        c3.wait_for_low(),
    )
    .await;
}

#[embassy_executor::task]
pub async fn ui_task(bus: EepromBus) {
    let mut ui = Controller::new(&SIGN, Eeprom24x::new(bus), Delay);
    ui.run().await
}
