//! State shared between the refresh task, the keypad task and the UI loop.
//!
//! | field       | written by          | read by               |
//! |-------------|---------------------|-----------------------|
//! | `visible`   | UI                  | multiplexer           |
//! | `cursor`    | UI                  | multiplexer           |
//! | `candidate` | decoder, UI (reset) | multiplexer, UI       |
//! | `event`     | decoder, UI (take)  | UI                    |
//! | `held`      | decoder             | decoder               |
//!
//! Single values are atomics. The six-character window is replaced as a
//! whole inside a critical section so the multiplexer never renders half
//! of an update.

use core::cell::Cell;
use core::sync::atomic::{AtomicU16, AtomicU8, Ordering};

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;

use crate::config::{BLANK, CURSOR_GLYPH, DIGIT_COUNT, NO_CURSOR};

/// Decoded command keys, published by the keypad and consumed by the UI.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum ButtonEvent {
    /// Nothing has been pressed since power-on.
    None = 0,
    /// The last event was consumed.
    Idle = 1,
    KeyA = 2,
    KeyALongPress = 3,
    KeyB = 4,
    KeyC = 5,
    KeyD = 6,
    KeyHash = 7,
    KeyStar = 8,
}

impl ButtonEvent {
    /// `true` for the two "no pending event" values.
    pub fn is_idle(self) -> bool {
        matches!(self, ButtonEvent::None | ButtonEvent::Idle)
    }

    fn from_u8(raw: u8) -> Self {
        match raw {
            2 => ButtonEvent::KeyA,
            3 => ButtonEvent::KeyALongPress,
            4 => ButtonEvent::KeyB,
            5 => ButtonEvent::KeyC,
            6 => ButtonEvent::KeyD,
            7 => ButtonEvent::KeyHash,
            8 => ButtonEvent::KeyStar,
            0 => ButtonEvent::None,
            _ => ButtonEvent::Idle,
        }
    }
}

/// Everything the three actors exchange.
pub struct SignState {
    visible: Mutex<CriticalSectionRawMutex, Cell<[u8; DIGIT_COUNT]>>,
    cursor: AtomicU8,
    candidate: AtomicU8,
    event: AtomicU8,
    held: AtomicU16,
}

impl SignState {
    pub const fn new() -> Self {
        Self {
            visible: Mutex::new(Cell::new([BLANK; DIGIT_COUNT])),
            cursor: AtomicU8::new(NO_CURSOR),
            candidate: AtomicU8::new(CURSOR_GLYPH),
            event: AtomicU8::new(ButtonEvent::None as u8),
            held: AtomicU16::new(0),
        }
    }

    // Visible window

    /// Replace the whole window at once.
    pub fn show(&self, window: [u8; DIGIT_COUNT]) {
        self.visible.lock(|cell| cell.set(window));
    }

    /// Write one slot.
    pub fn set_slot(&self, slot: usize, c: u8) {
        self.visible.lock(|cell| {
            let mut window = cell.get();
            if let Some(s) = window.get_mut(slot) {
                *s = c;
                cell.set(window);
            }
        });
    }

    pub fn visible(&self) -> [u8; DIGIT_COUNT] {
        self.visible.lock(|cell| cell.get())
    }

    /// One slot, or blank if out of range.
    pub fn slot(&self, slot: usize) -> u8 {
        self.visible
            .lock(|cell| cell.get().get(slot).copied().unwrap_or(BLANK))
    }

    /// Rotate the window left by one, as a single update.
    pub fn rotate_visible(&self) {
        self.visible.lock(|cell| {
            let mut window = cell.get();
            crate::rotate::rotate_left_by_one(&mut window);
            cell.set(window);
        });
    }

    // Cursor

    pub fn set_cursor(&self, cursor: u8) {
        self.cursor.store(cursor.min(NO_CURSOR), Ordering::Release);
    }

    pub fn cursor(&self) -> u8 {
        self.cursor.load(Ordering::Acquire)
    }

    // Candidate character

    pub fn set_candidate(&self, c: u8) {
        self.candidate.store(c, Ordering::Release);
    }

    pub fn candidate(&self) -> u8 {
        self.candidate.load(Ordering::Acquire)
    }

    /// Take the pending candidate and put the cursor glyph back.
    pub fn take_candidate(&self) -> u8 {
        self.candidate.swap(CURSOR_GLYPH, Ordering::AcqRel)
    }

    // Button events

    pub fn publish(&self, event: ButtonEvent) {
        self.event.store(event as u8, Ordering::Release);
    }

    /// Look at the pending event without consuming it.
    pub fn peek_event(&self) -> ButtonEvent {
        ButtonEvent::from_u8(self.event.load(Ordering::Acquire))
    }

    /// Consume the pending event, leaving `Idle` behind.
    pub fn take_event(&self) -> ButtonEvent {
        ButtonEvent::from_u8(self.event.swap(ButtonEvent::Idle as u8, Ordering::AcqRel))
    }

    // Hold duration

    pub fn held(&self) -> u16 {
        self.held.load(Ordering::Relaxed)
    }

    pub fn set_held(&self, held: u16) {
        self.held.store(held, Ordering::Relaxed);
    }
}

impl Default for SignState {
    fn default() -> Self {
        Self::new()
    }
}
