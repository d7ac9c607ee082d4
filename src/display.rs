//! Time-division multiplexer for the six 16-segment digits.
//!
//! One digit is lit per tick. Each tick switches the old digit off, shifts
//! the next digit's pattern in, and only then switches the new digit on, so
//! a digit never flashes its neighbour's pattern.

use crate::codec::{self, Polarity};
use crate::config::{BLANK, CURSOR_BLINK_FRAMES, CURSOR_GLYPH, DIGIT_COUNT};
use crate::hal::{DigitSelect, SerialLines};
use crate::shared::SignState;

/// Renders [`SignState`]'s window and cursor; knows nothing of the UI.
pub struct Multiplexer {
    /// Slot that the next tick lights.
    next_slot: usize,
    /// Completed refresh cycles, for cursor blinking.
    frames: u16,
    polarity: Polarity,
}

impl Multiplexer {
    pub const fn new(polarity: Polarity) -> Self {
        Self {
            next_slot: 0,
            frames: 0,
            polarity,
        }
    }

    /// Slot lit by the most recent tick.
    pub fn active_slot(&self) -> usize {
        (self.next_slot + DIGIT_COUNT - 1) % DIGIT_COUNT
    }

    /// Advance to the next digit.
    pub fn tick<D, S>(&mut self, state: &SignState, digits: &mut D, lines: &mut S)
    where
        D: DigitSelect,
        S: SerialLines,
    {
        let slot = self.next_slot;
        digits.disable_digit(self.active_slot());

        let c = self.char_for(state, slot);
        codec::emit(lines, codec::pattern_for(c), self.polarity);

        digits.enable_digit(slot);

        self.next_slot = (slot + 1) % DIGIT_COUNT;
        if self.next_slot == 0 {
            self.frames = self.frames.wrapping_add(1);
        }
    }

    /// Character to show in `slot` right now.
    fn char_for(&self, state: &SignState, slot: usize) -> u8 {
        if usize::from(state.cursor()) != slot {
            return state.slot(slot);
        }
        match state.candidate() {
            CURSOR_GLYPH if self.cursor_blinked_off() => BLANK,
            c => c,
        }
    }

    fn cursor_blinked_off(&self) -> bool {
        (self.frames / CURSOR_BLINK_FRAMES) % 2 == 1
    }
}
