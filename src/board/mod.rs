//! nRF52840 bring-up: pins grouped per task.
//!
//! Pin choices are documented in `segsign::config`.

pub mod tasks;

use embassy_nrf::gpio::{Input, Level, Output, OutputDrive, Pin, Pull};
use embassy_nrf::peripherals::TWISPI0;
use embassy_nrf::twim::{self, Twim};
use embassy_nrf::{bind_interrupts, Peripheral, Peripherals};
use segsign::config::DIGIT_COUNT;
use segsign::hal::{DigitPins, MatrixPins, ShiftRegisterPins};

bind_interrupts!(struct Irqs {
    TWISPI0 => twim::InterruptHandler<TWISPI0>;
});

pub type Digits = DigitPins<Output<'static>, DIGIT_COUNT>;
pub type Segments = ShiftRegisterPins<Output<'static>, Output<'static>, Output<'static>>;
pub type Matrix = MatrixPins<Output<'static>, Input<'static>>;
pub type EepromBus = Twim<'static, TWISPI0>;

/// Display side: digit enables and the segment shift register.
pub struct DisplayPins {
    pub digits: Digits,
    pub segments: Segments,
}

/// Keypad side: the matrix and its activity LED.
pub struct KeypadPins {
    pub matrix: Matrix,
    pub led: Output<'static>,
}

pub struct Board {
    pub display: DisplayPins,
    pub keypad: KeypadPins,
    pub eeprom: EepromBus,
}

fn out(pin: impl Peripheral<P = impl Pin> + 'static, level: Level) -> Output<'static> {
    Output::new(pin, level, OutputDrive::Standard)
}

impl Board {
    pub fn new(p: Peripherals) -> Self {
        // Digit and row drivers idle high (off / not selected).
        let digits = DigitPins::new([
            out(p.P0_03, Level::High),
            out(p.P0_04, Level::High),
            out(p.P0_28, Level::High),
            out(p.P0_29, Level::High),
            out(p.P0_30, Level::High),
            out(p.P0_31, Level::High),
        ]);
        let segments = ShiftRegisterPins::new(
            out(p.P1_10, Level::Low),
            out(p.P1_11, Level::Low),
            out(p.P1_12, Level::Low),
        );

        let matrix = MatrixPins::new(
            [
                out(p.P1_01, Level::High),
                out(p.P1_02, Level::High),
                out(p.P1_03, Level::High),
                out(p.P1_04, Level::High),
            ],
            [
                Input::new(p.P1_05, Pull::Up),
                Input::new(p.P1_06, Pull::Up),
                Input::new(p.P1_07, Pull::Up),
                Input::new(p.P1_08, Pull::Up),
            ],
        );
        // DK LED1 is active-low.
        let led = out(p.P0_13, Level::High);

        let mut i2c_config = twim::Config::default();
        i2c_config.frequency = twim::Frequency::K100;
        let eeprom = Twim::new(p.TWISPI0, Irqs, p.P0_26, p.P0_27, i2c_config);

        Self {
            display: DisplayPins { digits, segments },
            keypad: KeypadPins { matrix, led },
            eeprom,
        }
    }
}
