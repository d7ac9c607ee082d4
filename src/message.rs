//! Bounded, length-tracked message buffer.

use heapless::Vec;

use crate::config::{BLANK, DIGIT_COUNT, MESSAGE_CAPACITY};
use crate::rotate;

/// The text being composed, scrolled or stored. Never exceeds
/// [`MESSAGE_CAPACITY`] characters.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Message {
    chars: Vec<u8, MESSAGE_CAPACITY>,
}

impl Message {
    pub const fn new() -> Self {
        Self { chars: Vec::new() }
    }

    /// Copy of `bytes`, truncated to capacity.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let n = bytes.len().min(MESSAGE_CAPACITY);
        let mut msg = Self::new();
        // Cannot fail: n <= capacity.
        let _ = msg.chars.extend_from_slice(&bytes[..n]);
        msg
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.chars
    }

    pub fn clear(&mut self) {
        self.chars.clear();
    }

    /// Store `c` at `index`, blank-filling any gap before it.
    ///
    /// Returns `false` (and changes nothing) when `index` is past capacity.
    pub fn set(&mut self, index: usize, c: u8) -> bool {
        if index >= MESSAGE_CAPACITY {
            return false;
        }
        if index < self.chars.len() {
            self.chars[index] = c;
            return true;
        }
        self.pad_to(index);
        self.chars.push(c).is_ok()
    }

    /// Append blanks until the message is at least `len` long (capped at
    /// capacity).
    pub fn pad_to(&mut self, len: usize) {
        let target = len.min(MESSAGE_CAPACITY);
        while self.chars.len() < target {
            let _ = self.chars.push(BLANK);
        }
    }

    /// Drop trailing blanks.
    pub fn trim_end(&mut self) {
        while self.chars.last() == Some(&BLANK) {
            self.chars.pop();
        }
    }

    /// Append up to `count` blanks. Returns `false` if capacity cut it short.
    pub fn append_blanks(&mut self, count: usize) -> bool {
        for _ in 0..count {
            if self.chars.push(BLANK).is_err() {
                return false;
            }
        }
        true
    }

    pub fn rotate_left(&mut self, by: usize) {
        rotate::rotate_left(&mut self.chars, by);
    }

    /// What the display shows for this message: its first six characters.
    pub fn window(&self) -> [u8; DIGIT_COUNT] {
        rotate::window(&self.chars)
    }
}
