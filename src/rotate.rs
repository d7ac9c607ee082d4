//! Left rotation used by every scrolling animation.

use crate::config::{BLANK, DIGIT_COUNT};

/// Rotate `seq` left by one: the first element moves to the end.
pub fn rotate_left_by_one(seq: &mut [u8]) {
    let Some((&first, _)) = seq.split_first() else {
        return;
    };
    let last = seq.len() - 1;
    seq.copy_within(1.., 0);
    seq[last] = first;
}

/// Rotate `seq` left by `by` positions, one step at a time.
pub fn rotate_left(seq: &mut [u8], by: usize) {
    if seq.is_empty() {
        return;
    }
    for _ in 0..by % seq.len() {
        rotate_left_by_one(seq);
    }
}

/// The first `DIGIT_COUNT` characters of `seq`, blank padded.
pub fn window(seq: &[u8]) -> [u8; DIGIT_COUNT] {
    let mut out = [BLANK; DIGIT_COUNT];
    let n = seq.len().min(DIGIT_COUNT);
    out[..n].copy_from_slice(&seq[..n]);
    out
}
