//! 16-segment font and the shift-register wire protocol.
//!
//! Patterns are kept as "lit" masks (bit set = segment on). The sign's
//! segment drivers are active-low, so the board emits with
//! [`Polarity::ActiveLow`], where blank shifts out as `0xFFFF`.

use crate::hal::SerialLines;

/// Number of segments (bits) per character cell.
pub const SEGMENT_BITS: u32 = 16;

/// Lit-segment mask of one character cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SegmentPattern(u16);

impl SegmentPattern {
    /// All segments off.
    pub const BLANK: Self = Self(0);

    pub const fn from_lit(bits: u16) -> Self {
        Self(bits)
    }

    /// Build from an active-low wire word (0 = segment on).
    pub const fn from_active_low(wire: u16) -> Self {
        Self(!wire)
    }

    pub const fn bits(self) -> u16 {
        self.0
    }

    pub const fn is_blank(self) -> bool {
        self.0 == 0
    }

    /// Word to shift out for the given driver polarity.
    pub const fn wire(self, polarity: Polarity) -> u16 {
        match polarity {
            Polarity::ActiveHigh => self.0,
            Polarity::ActiveLow => !self.0,
        }
    }
}

/// Electrical sense of the segment outputs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Polarity {
    ActiveHigh,
    ActiveLow,
}

/// Font ROM, active-low, for the characters the sign can show.
const FONT_WIRE: [(u8, u16); 40] = [
    (b' ', 0xFFFF),
    (b'-', 0xFF3F),
    (b'0', 0x00F6),
    (b'1', 0xCFF7),
    (b'2', 0x113F),
    (b'3', 0x03BF),
    (b'4', 0xCE3F),
    (b'5', 0x223F),
    (b'6', 0x203F),
    (b'7', 0x3F36),
    (b'8', 0x003F),
    (b'9', 0x023F),
    (b'>', 0xFFDE),
    (b'A', 0x0C3F),
    (b'B', 0x03AD),
    (b'C', 0x30FF),
    (b'D', 0x03ED),
    (b'E', 0x307F),
    (b'F', 0x3C7F),
    (b'G', 0x20BF),
    (b'H', 0xCC3F),
    (b'I', 0x33ED),
    (b'J', 0xC1FF),
    (b'K', 0xFC73),
    (b'L', 0xF0FF),
    (b'M', 0xCCD7),
    (b'N', 0xCCDB),
    (b'O', 0x00FF),
    (b'P', 0x1C3F),
    (b'Q', 0x00FB),
    (b'R', 0x1C3B),
    (b'S', 0x223F),
    (b'T', 0x3FED),
    (b'U', 0xC0FF),
    (b'V', 0xFCF6),
    (b'W', 0xCCFA),
    (b'X', 0xFFD2),
    (b'Y', 0xFFD5),
    (b'Z', 0x33F6),
    (b'_', 0xF3FF),
];

/// First character code covered by [`FONT`].
const FONT_FIRST: u8 = b' ';

/// Lit patterns indexed by `c - FONT_FIRST`, for `' '..='_'`.
const FONT: [u16; 64] = build_font();

const fn build_font() -> [u16; 64] {
    let mut font = [0u16; 64];
    let mut i = 0;
    while i < FONT_WIRE.len() {
        let (c, wire) = FONT_WIRE[i];
        font[(c - FONT_FIRST) as usize] = SegmentPattern::from_active_low(wire).bits();
        i += 1;
    }
    font
}

/// Segment pattern for `c`. Unsupported characters are blank.
pub fn pattern_for(c: u8) -> SegmentPattern {
    c.checked_sub(FONT_FIRST)
        .and_then(|i| FONT.get(i as usize))
        .map_or(SegmentPattern::BLANK, |&bits| SegmentPattern(bits))
}

/// Shift a pattern out LSB first, then latch it.
///
/// The latch pulse comes only after all 16 bits are in, so the outputs
/// never show a half-shifted word.
pub fn emit<S: SerialLines>(lines: &mut S, pattern: SegmentPattern, polarity: Polarity) {
    let word = pattern.wire(polarity);
    for bit in 0..SEGMENT_BITS {
        lines.set_data(word & (1 << bit) != 0);
        lines.pulse_shift();
    }
    lines.pulse_latch();
}
