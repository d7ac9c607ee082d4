//! 4×4 matrix keypad decoder with hold-to-select multi-tap.
//!
//! ```text
//!         C1  C2  C3  C4
//!   R1     1   2   3   A     A: tap = next slot, hold = scroll
//!   R2     4   5   6   B     B: recall stored message
//!   R3     7   8   9   C     C: store message
//!   R4     *   0   #   D     D: exit, * slower, # faster
//! ```
//!
//! Digit keys do not cycle by repeated taps: the longer a key is held, the
//! further along its letter group the candidate moves (`2` → `A` → `B` →
//! `C`). The hold counter counts decoder invocations and is shared with the
//! rest of the sign through [`SignState`].

use crate::config::{HELD_CEILING, KEY_DEBOUNCE_SCANS, LONG_PRESS_THRESHOLD, MULTI_TAP_STAGES};
use crate::hal::KeyMatrix;
use crate::shared::{ButtonEvent, SignState};

pub const ROWS: usize = 4;
pub const COLS: usize = 4;

/// Physical key identity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Key {
    Digit(u8),
    A,
    B,
    C,
    D,
    Star,
    Hash,
}

/// Key at each (row, column).
pub const KEY_MAP: [[Key; COLS]; ROWS] = [
    [Key::Digit(1), Key::Digit(2), Key::Digit(3), Key::A],
    [Key::Digit(4), Key::Digit(5), Key::Digit(6), Key::B],
    [Key::Digit(7), Key::Digit(8), Key::Digit(9), Key::C],
    [Key::Star, Key::Digit(0), Key::Hash, Key::D],
];

/// Bit of the `A` key in a scan mask.
const A_BIT: u16 = 1 << 3;

/// Characters reachable from a digit key, in hold order.
pub fn letter_group(digit: u8) -> &'static [u8] {
    match digit {
        1 => b"1",
        2 => b"2ABC",
        3 => b"3DEF",
        4 => b"4GHI",
        5 => b"5JKL",
        6 => b"6MNO",
        7 => b"7PQRS",
        8 => b"8TUV",
        9 => b"9WXYZ",
        // 0 → blank → 0 again, with the counter restarted.
        _ => b"0 0",
    }
}

/// Outcome of a multi-tap lookup.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tap {
    pub c: u8,
    /// The hold counter must restart so the group repeats.
    pub restart: bool,
}

/// Candidate for `digit` after the key has been held for `held` scans.
pub fn multi_tap(digit: u8, held: u16) -> Tap {
    let group = letter_group(digit);
    let stage = MULTI_TAP_STAGES.iter().filter(|&&t| held > t).count();
    let index = stage.min(group.len() - 1);
    Tap {
        c: group[index],
        restart: digit == 0 && index == group.len() - 1,
    }
}

/// Debouncing, edge and long-press tracking across decoder invocations.
pub struct Keypad {
    /// Debounced keys down, bit `row * 4 + col`.
    pressed: u16,
    /// Last raw sample and how many scans in a row it has been seen.
    raw: u16,
    stable: u8,
    /// The current `A` press already produced its long-press event.
    long_press_sent: bool,
}

impl Keypad {
    pub const fn new() -> Self {
        Self {
            pressed: 0,
            raw: 0,
            stable: 0,
            long_press_sent: false,
        }
    }

    /// One decoder invocation: scan every row, publish what changed.
    ///
    /// A change in the matrix only counts once it has been sampled
    /// [`KEY_DEBOUNCE_SCANS`] times in a row, so contact bounce never makes
    /// an extra edge. Returns `true` while any key is down or still settling.
    /// With several keys down each is decoded in scan order and the last one
    /// wins the candidate/event slot.
    pub fn scan<M: KeyMatrix>(&mut self, matrix: &mut M, state: &SignState) -> bool {
        let mut held = state.held().saturating_add(1);
        if held > HELD_CEILING {
            held = 0;
        }

        let down = self.debounce(Self::sample(matrix));

        for bit in 0..(ROWS * COLS) {
            let mask = 1u16 << bit;
            if down & mask == 0 {
                continue;
            }
            let fresh = self.pressed & mask == 0;
            match KEY_MAP[bit / COLS][bit % COLS] {
                Key::Digit(d) => {
                    let tap = multi_tap(d, held);
                    state.set_candidate(tap.c);
                    if tap.restart {
                        held = 0;
                    }
                }
                Key::A => {
                    if fresh {
                        self.long_press_sent = false;
                    }
                    if held > LONG_PRESS_THRESHOLD && !self.long_press_sent {
                        self.long_press_sent = true;
                        debug!("keypad: A long press");
                        state.publish(ButtonEvent::KeyALongPress);
                    }
                }
                key if fresh => {
                    let event = command_event(key);
                    debug!("keypad: {}", event);
                    state.publish(event);
                }
                _ => {}
            }
        }

        if self.pressed & A_BIT != 0 && down & A_BIT == 0 && !self.long_press_sent {
            debug!("keypad: A tap");
            state.publish(ButtonEvent::KeyA);
        }

        state.set_held(held);
        self.pressed = down;
        down != 0 || self.raw != 0
    }

    /// No key for a whole idle period: the next press starts a fresh group
    /// and a fresh long-press window.
    pub fn idle_reset(&mut self, state: &SignState) {
        state.set_held(0);
        self.long_press_sent = false;
    }

    /// Debounced key set after taking `sample` into account.
    fn debounce(&mut self, sample: u16) -> u16 {
        if sample == self.raw {
            self.stable = self.stable.saturating_add(1);
        } else {
            self.raw = sample;
            self.stable = 1;
        }
        if self.stable >= KEY_DEBOUNCE_SCANS {
            self.raw
        } else {
            self.pressed
        }
    }

    fn sample<M: KeyMatrix>(matrix: &mut M) -> u16 {
        let mut down = 0u16;
        for row in 0..ROWS {
            matrix.drive_row(row);
            let cols = matrix.read_columns();
            for col in 0..COLS {
                if cols & (1 << col) != 0 {
                    down |= 1 << (row * COLS + col);
                }
            }
        }
        matrix.drive_all_rows();
        down
    }
}

impl Default for Keypad {
    fn default() -> Self {
        Self::new()
    }
}

fn command_event(key: Key) -> ButtonEvent {
    match key {
        Key::B => ButtonEvent::KeyB,
        Key::C => ButtonEvent::KeyC,
        Key::D => ButtonEvent::KeyD,
        Key::Star => ButtonEvent::KeyStar,
        Key::Hash => ButtonEvent::KeyHash,
        Key::A => ButtonEvent::KeyA,
        Key::Digit(_) => ButtonEvent::Idle,
    }
}
