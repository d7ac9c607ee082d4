//! End-to-end host tests: keypad scans feed the UI, the UI feeds the
//! multiplexer and the EEPROM, all through the public API.

use embassy_futures::block_on;
use embedded_hal::i2c::{ErrorKind, ErrorType, Operation};
use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::i2c::I2c;

use segsign::codec::{self, Polarity};
use segsign::config::{
    BLANK, DIGIT_COUNT, KEY_DEBOUNCE_SCANS, SAVED_WORD, SCROLL_DELAY_MAX, SCROLL_DELAY_MIN,
};
use segsign::display::Multiplexer;
use segsign::eeprom::Eeprom24x;
use segsign::hal::{DigitSelect, KeyMatrix, SerialLines};
use segsign::keypad::Keypad;
use segsign::ui::{Controller, State};
use segsign::{ButtonEvent, SignState};

// ═══════════════════════════════════════════════════════════════════════════
// Fakes
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Default)]
struct Matrix {
    down: [[bool; 4]; 4],
    row: Option<usize>,
}

impl KeyMatrix for Matrix {
    fn drive_row(&mut self, row: usize) {
        self.row = Some(row);
    }
    fn read_columns(&mut self) -> u8 {
        let Some(row) = self.row else { return 0 };
        let mut bits = 0;
        for (col, &down) in self.down[row].iter().enumerate() {
            if down {
                bits |= 1 << col;
            }
        }
        bits
    }
    fn drive_all_rows(&mut self) {
        self.row = None;
    }
}

/// 24C02 behind an I²C bus.
struct Bus {
    cells: [u8; 256],
    pointer: u8,
}

impl Bus {
    fn new() -> Self {
        Self {
            cells: [0xFF; 256],
            pointer: 0,
        }
    }
}

impl ErrorType for Bus {
    type Error = ErrorKind;
}

impl I2c for Bus {
    async fn transaction(
        &mut self,
        _address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), ErrorKind> {
        for op in operations {
            match op {
                Operation::Write(bytes) => {
                    if let Some((&cell, data)) = bytes.split_first() {
                        self.pointer = cell;
                        for &b in data {
                            self.cells[self.pointer as usize] = b;
                            self.pointer = self.pointer.wrapping_add(1);
                        }
                    }
                }
                Operation::Read(buf) => {
                    for b in buf.iter_mut() {
                        *b = self.cells[self.pointer as usize];
                        self.pointer = self.pointer.wrapping_add(1);
                    }
                }
            }
        }
        Ok(())
    }
}

struct NoDelay;

impl DelayNs for NoDelay {
    async fn delay_ns(&mut self, _ns: u32) {}
}

#[derive(Default)]
struct Digits {
    lit: Option<usize>,
}

impl DigitSelect for Digits {
    fn enable_digit(&mut self, digit: usize) {
        assert_eq!(self.lit, None, "two digits lit at once");
        self.lit = Some(digit);
    }
    fn disable_digit(&mut self, digit: usize) {
        if self.lit == Some(digit) {
            self.lit = None;
        }
    }
}

#[derive(Default)]
struct Lines {
    data: bool,
    word: u16,
    bit: u32,
    latched: Vec<u16>,
}

impl SerialLines for Lines {
    fn set_data(&mut self, high: bool) {
        self.data = high;
    }
    fn pulse_shift(&mut self) {
        if self.data {
            self.word |= 1 << self.bit;
        }
        self.bit += 1;
    }
    fn pulse_latch(&mut self) {
        self.latched.push(self.word);
        self.word = 0;
        self.bit = 0;
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Keypad driver
// ═══════════════════════════════════════════════════════════════════════════

const KEY_A: (usize, usize) = (0, 3);
const KEY_B: (usize, usize) = (1, 3);
const KEY_C: (usize, usize) = (2, 3);
const KEY_D: (usize, usize) = (3, 3);
const KEY_4: (usize, usize) = (1, 0);
const KEY_5: (usize, usize) = (1, 1);
const KEY_6: (usize, usize) = (1, 2);
const KEY_STAR: (usize, usize) = (3, 0);
const KEY_HASH: (usize, usize) = (3, 2);

struct Fingers<'a> {
    sign: &'a SignState,
    keypad: Keypad,
    matrix: Matrix,
}

impl<'a> Fingers<'a> {
    fn new(sign: &'a SignState) -> Self {
        Self {
            sign,
            keypad: Keypad::new(),
            matrix: Matrix::default(),
        }
    }

    /// Hold `key` for `scans` decoder runs, release it and let the keypad go
    /// quiet long enough for the hold counter to reset.
    fn hold(&mut self, key: (usize, usize), scans: u32) {
        self.matrix.down[key.0][key.1] = true;
        for _ in 0..scans {
            assert!(self.keypad.scan(&mut self.matrix, self.sign));
        }
        self.matrix.down[key.0][key.1] = false;
        let mut released = false;
        for _ in 0..KEY_DEBOUNCE_SCANS {
            if !self.keypad.scan(&mut self.matrix, self.sign) {
                released = true;
                break;
            }
        }
        assert!(released, "release never settled");
        self.keypad.idle_reset(self.sign);
    }

    /// Shortest press the debouncer accepts.
    fn tap(&mut self, key: (usize, usize)) {
        self.hold(key, u32::from(KEY_DEBOUNCE_SCANS));
    }
}

fn render(sign: &SignState, mux: &mut Multiplexer) -> Vec<u16> {
    let mut digits = Digits::default();
    let mut lines = Lines::default();
    for _ in 0..DIGIT_COUNT {
        mux.tick(sign, &mut digits, &mut lines);
    }
    lines.latched
}

fn patterns(text: &[u8]) -> Vec<u16> {
    text.iter()
        .map(|&c| codec::pattern_for(c).wire(Polarity::ActiveLow))
        .collect()
}

// ═══════════════════════════════════════════════════════════════════════════
// Scenarios
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn compose_on_keypad_then_long_press_scrolls() {
    let sign = SignState::new();
    let mut fingers = Fingers::new(&sign);
    let mut bus = Bus::new();
    let mut ui = Controller::new(&sign, Eeprom24x::new(&mut bus), NoDelay);
    let mut mux = Multiplexer::new(Polarity::ActiveLow);

    fingers.tap(KEY_A);
    block_on(ui.step());
    assert_eq!(ui.state(), State::CharacterEntry);

    // "4GHI": past the second stage is H, past the third is I.
    fingers.hold(KEY_4, 6_000);
    assert_eq!(sign.candidate(), b'H');
    let shown = render(&sign, &mut mux);
    assert_eq!(shown[0], patterns(b"H")[0]);

    fingers.tap(KEY_A);
    block_on(ui.step());
    fingers.hold(KEY_4, 7_600);
    fingers.tap(KEY_A);
    block_on(ui.step());
    assert_eq!(ui.committed(), 2);

    // Held long enough for the long press; the release must not also tap.
    fingers.hold(KEY_A, 4_100);
    block_on(ui.step());
    assert_eq!(ui.state(), State::LongScrollEdit);
    assert_eq!(ui.message().as_bytes(), b"HI        ");
    assert!(sign.peek_event().is_idle());

    block_on(ui.step());
    assert_eq!(render(&sign, &mut mux), patterns(b"HI    "));
    block_on(ui.step());
    assert_eq!(render(&sign, &mut mux), patterns(b"I     "));

    fingers.tap(KEY_D);
    block_on(ui.step());
    assert_eq!(ui.state(), State::Greeting);
}

#[test]
fn saved_message_survives_a_restart() {
    let mut bus = Bus::new();

    {
        let sign = SignState::new();
        let mut fingers = Fingers::new(&sign);
        let mut ui = Controller::new(&sign, Eeprom24x::new(&mut bus), NoDelay);

        fingers.tap(KEY_A);
        block_on(ui.step());
        fingers.hold(KEY_6, 7_600);
        fingers.tap(KEY_A);
        block_on(ui.step());
        fingers.hold(KEY_5, 6_000);
        fingers.tap(KEY_A);
        block_on(ui.step());

        fingers.tap(KEY_C);
        block_on(ui.step());
        assert_eq!(ui.state(), State::RecallScroll);
        assert_eq!(sign.visible(), SAVED_WORD);
    }

    assert_eq!(&bus.cells[..7], b"\x06OK    ");

    let sign = SignState::new();
    let mut fingers = Fingers::new(&sign);
    let mut ui = Controller::new(&sign, Eeprom24x::new(&mut bus), NoDelay);

    fingers.tap(KEY_B);
    block_on(ui.step());
    assert_eq!(ui.state(), State::RecallScroll);
    assert_eq!(ui.message().as_bytes(), b"OK    ");

    block_on(ui.step());
    assert_eq!(&sign.visible(), b"OK    ");
}

#[test]
fn speed_keys_clamp_at_both_ends() {
    let sign = SignState::new();
    let mut fingers = Fingers::new(&sign);
    let mut bus = Bus::new();
    let mut ui = Controller::new(&sign, Eeprom24x::new(&mut bus), NoDelay);

    for _ in 0..20 {
        fingers.tap(KEY_HASH);
        block_on(ui.step());
    }
    assert_eq!(ui.speed().units(), SCROLL_DELAY_MIN);

    for _ in 0..20 {
        fingers.tap(KEY_STAR);
        block_on(ui.step());
    }
    assert_eq!(ui.speed().units(), SCROLL_DELAY_MAX);
    assert_eq!(ui.state(), State::Greeting);
}

#[test]
fn cursor_renders_while_composing() {
    let sign = SignState::new();
    let mut fingers = Fingers::new(&sign);
    let mut bus = Bus::new();
    let mut ui = Controller::new(&sign, Eeprom24x::new(&mut bus), NoDelay);
    let mut mux = Multiplexer::new(Polarity::ActiveLow);

    fingers.tap(KEY_A);
    block_on(ui.step());

    let mut expected = patterns(&[BLANK; DIGIT_COUNT]);
    expected[0] = patterns(b"_")[0];
    assert_eq!(render(&sign, &mut mux), expected);
}

#[test]
fn erased_eeprom_recalls_a_full_length_message() {
    let sign = SignState::new();
    let mut fingers = Fingers::new(&sign);
    let mut bus = Bus::new();
    let mut ui = Controller::new(&sign, Eeprom24x::new(&mut bus), NoDelay);

    fingers.tap(KEY_B);
    block_on(ui.step());
    assert_eq!(ui.state(), State::RecallScroll);
    assert_eq!(ui.message().len(), segsign::config::MESSAGE_CAPACITY);

    fingers.tap(KEY_D);
    block_on(ui.step());
    assert_eq!(ui.state(), State::Greeting);
    assert_eq!(sign.peek_event(), ButtonEvent::Idle);
}

#[test]
fn bouncing_tap_enters_entry_once() {
    let sign = SignState::new();
    let mut fingers = Fingers::new(&sign);
    let mut bus = Bus::new();
    let mut ui = Controller::new(&sign, Eeprom24x::new(&mut bus), NoDelay);

    fingers.matrix.down[KEY_A.0][KEY_A.1] = true;
    for _ in 0..30 {
        fingers.keypad.scan(&mut fingers.matrix, &sign);
    }
    fingers.matrix.down[KEY_A.0][KEY_A.1] = false;
    fingers.keypad.scan(&mut fingers.matrix, &sign);
    fingers.hold(KEY_A, 400);

    block_on(ui.step());
    assert_eq!(ui.state(), State::CharacterEntry);
    assert_eq!(ui.committed(), 0);
    assert!(sign.peek_event().is_idle());
}
