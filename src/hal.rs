//! Hardware seams the sign logic is written against.
//!
//! The board owns pin direction, pull-ups and bus set-up; the core only sees
//! these four traits. Adapters for plain `embedded-hal` pins are provided so
//! the firmware binary can hand over its GPIOs directly.

use embedded_hal::digital::{InputPin, OutputPin};

use crate::error::Error;

/// Data, shift-clock and latch-clock lines of the segment shift register.
pub trait SerialLines {
    /// Put one bit on the data line.
    fn set_data(&mut self, high: bool);
    /// Clock the data line into the shift stage.
    fn pulse_shift(&mut self);
    /// Transfer the shift stage to the outputs.
    fn pulse_latch(&mut self);
}

/// The per-digit enable lines of the display.
pub trait DigitSelect {
    fn enable_digit(&mut self, digit: usize);
    fn disable_digit(&mut self, digit: usize);
}

/// Row drivers and column sense lines of the key matrix.
pub trait KeyMatrix {
    /// Make `row` the only active row.
    fn drive_row(&mut self, row: usize);
    /// Sample the columns. Bit `c` is set when column `c` sees a pressed key.
    fn read_columns(&mut self) -> u8;
    /// Activate every row so any press shows up on the columns (idle state).
    fn drive_all_rows(&mut self);
}

/// Byte-addressable non-volatile memory.
///
/// Writes are not instantaneous; callers must honour the settle intervals
/// in [`crate::config`] before the next access.
#[allow(async_fn_in_trait)]
pub trait ByteStore {
    async fn write_byte(&mut self, addr: u8, value: u8) -> Result<(), Error>;
    async fn read_byte(&mut self, addr: u8) -> Result<u8, Error>;
}

// ═══════════════════════════════════════════════════════════════════════════
// embedded-hal adapters
// ═══════════════════════════════════════════════════════════════════════════

/// 74HC595-style shift register wired to three GPIOs.
///
/// GPIO writes on the target are infallible; errors are ignored.
pub struct ShiftRegisterPins<D, SH, ST> {
    data: D,
    shift_clk: SH,
    latch_clk: ST,
}

impl<D: OutputPin, SH: OutputPin, ST: OutputPin> ShiftRegisterPins<D, SH, ST> {
    pub fn new(mut data: D, mut shift_clk: SH, mut latch_clk: ST) -> Self {
        let _ = data.set_low();
        let _ = shift_clk.set_low();
        let _ = latch_clk.set_low();
        Self {
            data,
            shift_clk,
            latch_clk,
        }
    }
}

impl<D: OutputPin, SH: OutputPin, ST: OutputPin> SerialLines for ShiftRegisterPins<D, SH, ST> {
    fn set_data(&mut self, high: bool) {
        let _ = self.data.set_state(high.into());
    }

    fn pulse_shift(&mut self) {
        let _ = self.shift_clk.set_high();
        let _ = self.shift_clk.set_low();
    }

    fn pulse_latch(&mut self) {
        let _ = self.latch_clk.set_high();
        let _ = self.latch_clk.set_low();
    }
}

/// Digit enables switched through PNP transistors: low turns a digit on.
pub struct DigitPins<P, const N: usize> {
    pins: [P; N],
}

impl<P: OutputPin, const N: usize> DigitPins<P, N> {
    /// Take the pins and switch every digit off.
    pub fn new(mut pins: [P; N]) -> Self {
        for pin in pins.iter_mut() {
            let _ = pin.set_high();
        }
        Self { pins }
    }
}

impl<P: OutputPin, const N: usize> DigitSelect for DigitPins<P, N> {
    fn enable_digit(&mut self, digit: usize) {
        if let Some(pin) = self.pins.get_mut(digit) {
            let _ = pin.set_low();
        }
    }

    fn disable_digit(&mut self, digit: usize) {
        if let Some(pin) = self.pins.get_mut(digit) {
            let _ = pin.set_high();
        }
    }
}

/// 4×4 matrix with active-low row drivers and pulled-up column inputs.
pub struct MatrixPins<R, C> {
    rows: [R; 4],
    cols: [C; 4],
}

impl<R: OutputPin, C: InputPin> MatrixPins<R, C> {
    pub fn new(rows: [R; 4], cols: [C; 4]) -> Self {
        let mut matrix = Self { rows, cols };
        matrix.drive_all_rows();
        matrix
    }

    /// Column inputs, for edge waiting on the target.
    pub fn columns_mut(&mut self) -> &mut [C; 4] {
        &mut self.cols
    }
}

impl<R: OutputPin, C: InputPin> KeyMatrix for MatrixPins<R, C> {
    fn drive_row(&mut self, row: usize) {
        for (i, pin) in self.rows.iter_mut().enumerate() {
            let _ = pin.set_state((i != row).into());
        }
    }

    fn read_columns(&mut self) -> u8 {
        let mut bits = 0;
        for (i, pin) in self.cols.iter_mut().enumerate() {
            if pin.is_low().unwrap_or(false) {
                bits |= 1 << i;
            }
        }
        bits
    }

    fn drive_all_rows(&mut self) {
        for pin in self.rows.iter_mut() {
            let _ = pin.set_low();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::RefCell;
    use core::convert::Infallible;
    use embedded_hal::digital::ErrorType;
    use std::rc::Rc;
    use std::vec::Vec;

    /// Output pin that appends `(name, level)` to a shared log.
    struct LogPin {
        name: &'static str,
        log: Rc<RefCell<Vec<(&'static str, bool)>>>,
    }

    impl ErrorType for LogPin {
        type Error = Infallible;
    }

    impl OutputPin for LogPin {
        fn set_low(&mut self) -> Result<(), Infallible> {
            self.log.borrow_mut().push((self.name, false));
            Ok(())
        }
        fn set_high(&mut self) -> Result<(), Infallible> {
            self.log.borrow_mut().push((self.name, true));
            Ok(())
        }
    }

    /// Input pin reading a shared level (true = high).
    struct LevelPin(Rc<RefCell<bool>>);

    impl ErrorType for LevelPin {
        type Error = Infallible;
    }

    impl InputPin for LevelPin {
        fn is_high(&mut self) -> Result<bool, Infallible> {
            Ok(*self.0.borrow())
        }
        fn is_low(&mut self) -> Result<bool, Infallible> {
            Ok(!*self.0.borrow())
        }
    }

    fn log_pin(name: &'static str, log: &Rc<RefCell<Vec<(&'static str, bool)>>>) -> LogPin {
        LogPin {
            name,
            log: log.clone(),
        }
    }

    #[test]
    fn shift_register_pulses_clock_high_then_low() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut sr = ShiftRegisterPins::new(
            log_pin("data", &log),
            log_pin("sh", &log),
            log_pin("st", &log),
        );
        log.borrow_mut().clear();

        sr.set_data(true);
        sr.pulse_shift();
        sr.pulse_latch();

        assert_eq!(
            *log.borrow(),
            [
                ("data", true),
                ("sh", true),
                ("sh", false),
                ("st", true),
                ("st", false)
            ]
        );
    }

    #[test]
    fn digit_pins_start_disabled_and_are_active_low() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut digits = DigitPins::new([log_pin("d0", &log), log_pin("d1", &log)]);
        assert_eq!(*log.borrow(), [("d0", true), ("d1", true)]);

        log.borrow_mut().clear();
        digits.enable_digit(1);
        digits.disable_digit(1);
        digits.enable_digit(7); // out of range: ignored
        assert_eq!(*log.borrow(), [("d1", false), ("d1", true)]);
    }

    #[test]
    fn matrix_reads_low_columns_as_pressed() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let levels: [Rc<RefCell<bool>>; 4] = core::array::from_fn(|_| Rc::new(RefCell::new(true)));
        let rows = [
            log_pin("r0", &log),
            log_pin("r1", &log),
            log_pin("r2", &log),
            log_pin("r3", &log),
        ];
        let cols = core::array::from_fn(|i| LevelPin(levels[i].clone()));
        let mut matrix = MatrixPins::new(rows, cols);

        assert_eq!(matrix.read_columns(), 0);
        *levels[1].borrow_mut() = false;
        *levels[3].borrow_mut() = false;
        assert_eq!(matrix.read_columns(), 0b1010);
    }

    #[test]
    fn matrix_drive_row_pulls_only_that_row_low() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let rows = [
            log_pin("r0", &log),
            log_pin("r1", &log),
            log_pin("r2", &log),
            log_pin("r3", &log),
        ];
        let cols = core::array::from_fn(|_| LevelPin(Rc::new(RefCell::new(true))));
        let mut matrix = MatrixPins::new(rows, cols);
        log.borrow_mut().clear();

        matrix.drive_row(2);
        assert_eq!(
            *log.borrow(),
            [("r0", true), ("r1", true), ("r2", false), ("r3", true)]
        );
    }
}
