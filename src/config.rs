//! Application-wide constants and compile-time configuration.
//!
//! All display geometry, timing parameters, keypad thresholds and storage
//! constants live here so they can be tuned in one place.

// Display

/// Number of 16-segment digits on the sign.
pub const DIGIT_COUNT: usize = 6;

/// Cursor value meaning "no slot is being edited".
pub const NO_CURSOR: u8 = DIGIT_COUNT as u8;

/// Glyph shown at the cursor slot while no candidate character is pending.
pub const CURSOR_GLYPH: u8 = b'_';

/// The blank character.
pub const BLANK: u8 = b' ';

/// Multiplexer tick (µs). One digit is refreshed per tick, so a full cycle
/// takes `DIGIT_COUNT` ticks: 6 × 2 ms = 12 ms ≈ 83 Hz.
pub const MULTIPLEX_TICK_US: u64 = 2_000;

/// Full refresh cycles the bare cursor glyph stays on (and then off).
/// 20 cycles × 12 ms ≈ 240 ms per phase.
pub const CURSOR_BLINK_FRAMES: u16 = 20;

// Message

/// Maximum message length (characters), in RAM and in the store.
pub const MESSAGE_CAPACITY: usize = 80;

/// Blanks appended after a message so consecutive scroll loops are separated.
pub const LOOP_SEPARATOR: usize = 4;

/// Characters that can be typed before entry is capped. Leaves room for the
/// loop separator so a composed message always fits the store.
pub const MAX_COMPOSED_LEN: usize = MESSAGE_CAPACITY - LOOP_SEPARATOR;

/// Minimum characters that must be committed before a message can be
/// scrolled or saved.
pub const MIN_COMMITTED_TO_FINISH: usize = 2;

/// Idle animation text. The trailing blank separates consecutive loops.
pub const GREETING: &[u8] = b"A--WRITE B--SHOW C--STORE D--EXIT ";

/// Shown after a successful save.
pub const SAVED_WORD: [u8; DIGIT_COUNT] = *b"STORED";

/// Number of animation-step delays the save confirmation stays up.
pub const SAVED_DWELL_STEPS: u32 = 5;

// Scroll speed
//
// The speed value is a delay count; each unit is `SCROLL_UNIT_US`, so the
// default of 600 pauses 60 ms between animation steps.

/// Duration of one scroll delay unit (µs).
pub const SCROLL_UNIT_US: u32 = 100;

/// Shortest allowed animation delay (units).
pub const SCROLL_DELAY_MIN: u16 = 200;

/// Longest allowed animation delay (units).
pub const SCROLL_DELAY_MAX: u16 = 1_600;

/// Power-on animation delay (units).
pub const SCROLL_DELAY_DEFAULT: u16 = 600;

/// Change applied by one `#` or `*` press (units).
pub const SCROLL_DELAY_STEP: u16 = 100;

/// How often the UI polls for key events while composing (ms).
pub const ENTRY_POLL_MS: u32 = 5;

// Keypad

/// Period between decoder invocations while a key is held (µs).
///
/// Hold thresholds below count invocations, so with 200 µs per scan a
/// multi-tap stage lasts 500 ms and a long press needs 800 ms.
pub const KEY_SCAN_PERIOD_US: u64 = 200;

/// Consecutive identical scans before a press or release is believed.
/// 25 scans × 200 µs = 5 ms, longer than typical contact bounce.
pub const KEY_DEBOUNCE_SCANS: u8 = 25;

/// Quiet time after the last press before the hold counter resets (ms).
pub const KEY_IDLE_RESET_MS: u64 = 30;

/// Hold count above which each further multi-tap stage is selected.
pub const MULTI_TAP_STAGES: [u16; 4] = [2_500, 5_000, 7_500, 10_000];

/// Hold count above which `A` turns into a long press.
pub const LONG_PRESS_THRESHOLD: u16 = 4_000;

/// Hold count wraps back to zero above this value.
pub const HELD_CEILING: u16 = 12_500;

// Keypad pin assignments (nRF52840-DK defaults)
//
// These are logical names; actual `embassy_nrf::peripherals::*` types are
// selected in `main.rs`.  Adjust for your custom PCB.
//
//   Row 1..4 (out, active-low)        → P1.01 P1.02 P1.03 P1.04
//   Column 1..4 (in, pull-up)         → P1.05 P1.06 P1.07 P1.08
//   Digit 1..6 (out, active-low PNP)  → P0.03 P0.04 P0.28 P0.29 P0.30 P0.31
//   Shift register data/shift/latch   → P1.10 P1.11 P1.12
//   Keypad activity LED               → P0.13
//   EEPROM SDA / SCL                  → P0.26 / P0.27

// Storage

/// 7-bit I²C address of the 24C02-class message EEPROM.
pub const EEPROM_I2C_ADDRESS: u8 = 0x50;

/// Cell holding the stored message length; characters follow it.
pub const STORE_LENGTH_CELL: u8 = 0;

/// Wait after each byte write before touching the EEPROM again (ms).
pub const STORE_WRITE_SETTLE_MS: u32 = 5;

/// Extra wait after the last byte of a save (ms).
pub const STORE_FINAL_SETTLE_MS: u32 = 20;
