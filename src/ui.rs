//! Sign UI: greeting, message composition, scrolling and save/recall.
//!
//! ```text
//!                 A                        long A (>=2 chars)
//!   Greeting ────────────► CharacterEntry ──────────────────► LongScrollEdit
//!     ▲  │ B                 │   │ C (>=2 chars)                   │ D
//!     │  ▼                   │   ▼                                 │
//!     │ RecallScroll ◄───── SaveConfirm                            │
//!     │  │ D        saved    │ store failure                       │
//!     └──┴───────────────────┴─────────────────────────────────────┘
//!                  D / abandon / store failure
//! ```
//!
//! The controller only writes [`SignState`]; rendering is the multiplexer's
//! job and key decoding the keypad's.

use embedded_hal_async::delay::DelayNs;

use crate::config::{
    BLANK, CURSOR_GLYPH, DIGIT_COUNT, ENTRY_POLL_MS, GREETING, LOOP_SEPARATOR, MAX_COMPOSED_LEN,
    MIN_COMMITTED_TO_FINISH, NO_CURSOR, SAVED_DWELL_STEPS, SAVED_WORD, SCROLL_DELAY_DEFAULT,
    SCROLL_DELAY_MAX, SCROLL_DELAY_MIN, SCROLL_DELAY_STEP, SCROLL_UNIT_US,
};
use crate::hal::ByteStore;
use crate::message::Message;
use crate::shared::{ButtonEvent, SignState};
use crate::store;

const LAST_SLOT: usize = DIGIT_COUNT - 1;

// ═══════════════════════════════════════════════════════════════════════════
// State machine
// ═══════════════════════════════════════════════════════════════════════════

/// UI states.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum State {
    /// Idle animation of the key legend.
    Greeting,
    /// Composing a message with the cursor.
    CharacterEntry,
    /// Scrolling the just-composed message without saving it.
    LongScrollEdit,
    /// Scrolling the message loaded from the store.
    RecallScroll,
    /// Writing the composed message, then showing the confirmation word.
    SaveConfirm,
}

/// What a state handler decided, already past its guards.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UiEvent {
    /// Begin composing.
    Start,
    /// Show the stored message.
    Recall,
    /// Leave to the greeting.
    Exit,
    /// Confirm on the last slot with nothing entered.
    Abandon,
    /// Scroll the composed message.
    Scroll,
    /// Store the composed message.
    Save,
    /// The store accepted the message.
    Saved,
    /// The byte store reported an error.
    StoreFailed,
}

impl State {
    /// Transition table. Pairs not listed leave the state unchanged.
    pub fn transition(self, event: UiEvent) -> State {
        use State::*;
        use UiEvent::*;

        match (self, event) {
            (Greeting, Start) => CharacterEntry,
            (Greeting, Recall) => RecallScroll,

            (CharacterEntry, Exit | Abandon) => Greeting,
            (CharacterEntry, Scroll) => LongScrollEdit,
            (CharacterEntry, Save) => SaveConfirm,

            (LongScrollEdit | RecallScroll, Exit) => Greeting,
            (RecallScroll, StoreFailed) => Greeting,

            (SaveConfirm, Saved) => RecallScroll,
            (SaveConfirm, StoreFailed) => Greeting,

            (state, _) => state,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Scroll speed
// ═══════════════════════════════════════════════════════════════════════════

/// Pause between animation steps, in delay units.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ScrollSpeed(u16);

impl ScrollSpeed {
    pub const fn new() -> Self {
        Self(SCROLL_DELAY_DEFAULT)
    }

    /// Shorter pause, clamped at the minimum.
    pub fn faster(&mut self) {
        self.0 = self
            .0
            .saturating_sub(SCROLL_DELAY_STEP)
            .max(SCROLL_DELAY_MIN);
    }

    /// Longer pause, clamped at the maximum.
    pub fn slower(&mut self) {
        self.0 = self
            .0
            .saturating_add(SCROLL_DELAY_STEP)
            .min(SCROLL_DELAY_MAX);
    }

    pub fn units(self) -> u16 {
        self.0
    }

    pub fn delay_us(self) -> u32 {
        u32::from(self.0) * SCROLL_UNIT_US
    }
}

impl Default for ScrollSpeed {
    fn default() -> Self {
        Self::new()
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Controller
// ═══════════════════════════════════════════════════════════════════════════

/// Runs the state machine against the shared sign state.
pub struct Controller<'a, S, D> {
    sign: &'a SignState,
    store: S,
    delay: D,
    state: State,
    message: Message,
    greeting: Message,
    /// Next message position to fill while composing.
    index: usize,
    speed: ScrollSpeed,
}

impl<'a, S, D> Controller<'a, S, D>
where
    S: ByteStore,
    D: DelayNs,
{
    pub fn new(sign: &'a SignState, store: S, delay: D) -> Self {
        sign.set_cursor(NO_CURSOR);
        Self {
            sign,
            store,
            delay,
            state: State::Greeting,
            message: Message::new(),
            greeting: Message::from_bytes(GREETING),
            index: 0,
            speed: ScrollSpeed::new(),
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn message(&self) -> &Message {
        &self.message
    }

    pub fn speed(&self) -> ScrollSpeed {
        self.speed
    }

    /// Characters committed since composition started.
    pub fn committed(&self) -> usize {
        self.index
    }

    pub async fn run(&mut self) -> ! {
        info!("ui: started in {:?}", self.state);
        loop {
            self.step().await;
        }
    }

    /// One iteration of the current state: an animation step while
    /// scrolling, one poll while composing.
    pub async fn step(&mut self) {
        let event = match self.state {
            State::Greeting => self.greeting_step().await,
            State::CharacterEntry => self.entry_step().await,
            State::LongScrollEdit | State::RecallScroll => self.scroll_step().await,
            // Transient; entered and left inside `apply`.
            State::SaveConfirm => None,
        };
        if let Some(event) = event {
            self.apply(event).await;
        }
    }

    /// Follow the table, running entry actions until the state settles.
    async fn apply(&mut self, event: UiEvent) {
        let mut pending = Some(event);
        while let Some(event) = pending.take() {
            let next = self.state.transition(event);
            if next == self.state {
                debug!("ui: {:?} ignored in {:?}", event, self.state);
                break;
            }
            info!("ui: {:?} -> {:?} on {:?}", self.state, next, event);
            self.state = next;
            pending = self.enter(next).await;
        }
    }

    async fn enter(&mut self, state: State) -> Option<UiEvent> {
        match state {
            State::Greeting => {
                self.message.clear();
                self.index = 0;
                self.sign.show([BLANK; DIGIT_COUNT]);
                self.sign.set_cursor(NO_CURSOR);
                self.sign.take_candidate();
                None
            }
            State::CharacterEntry => {
                self.message.clear();
                self.index = 0;
                self.sign.show([BLANK; DIGIT_COUNT]);
                self.sign.take_candidate();
                self.sign.set_cursor(0);
                None
            }
            State::LongScrollEdit => {
                self.sign.set_cursor(NO_CURSOR);
                self.prepare_for_scroll();
                None
            }
            State::RecallScroll => {
                self.sign.set_cursor(NO_CURSOR);
                match store::load(&mut self.store).await {
                    Ok(message) => {
                        self.message = message;
                        None
                    }
                    Err(e) => {
                        error!("ui: recall failed: {:?}", e);
                        Some(UiEvent::StoreFailed)
                    }
                }
            }
            State::SaveConfirm => {
                self.sign.set_cursor(NO_CURSOR);
                self.message.trim_end();
                self.message.append_blanks(LOOP_SEPARATOR);
                if let Err(e) = store::save(&mut self.store, &mut self.delay, &self.message).await {
                    error!("ui: save failed: {:?}", e);
                    return Some(UiEvent::StoreFailed);
                }
                self.sign.show(SAVED_WORD);
                for _ in 0..SAVED_DWELL_STEPS {
                    self.pause().await;
                }
                Some(UiEvent::Saved)
            }
        }
    }

    // ───────────────────────────────────────────────────────────────────────
    // Per-state handlers
    // ───────────────────────────────────────────────────────────────────────

    async fn greeting_step(&mut self) -> Option<UiEvent> {
        match self.sign.take_event() {
            ButtonEvent::KeyA => return Some(UiEvent::Start),
            ButtonEvent::KeyB => return Some(UiEvent::Recall),
            other => self.adjust_speed(other),
        }
        self.pause().await;
        self.sign.show(self.greeting.window());
        self.greeting.rotate_left(1);
        None
    }

    async fn scroll_step(&mut self) -> Option<UiEvent> {
        match self.sign.take_event() {
            ButtonEvent::KeyD => return Some(UiEvent::Exit),
            other => self.adjust_speed(other),
        }
        self.pause().await;
        self.sign.show(self.message.window());
        self.message.rotate_left(1);
        None
    }

    async fn entry_step(&mut self) -> Option<UiEvent> {
        let can_finish = self.index >= MIN_COMMITTED_TO_FINISH;
        let event = match self.sign.take_event() {
            ButtonEvent::KeyA => self.commit(),
            ButtonEvent::KeyD => Some(UiEvent::Exit),
            ButtonEvent::KeyALongPress if can_finish => Some(UiEvent::Scroll),
            ButtonEvent::KeyC if can_finish => Some(UiEvent::Save),
            _ => None,
        };
        if event.is_none() {
            self.delay.delay_ms(ENTRY_POLL_MS).await;
        }
        event
    }

    /// Commit the candidate at the cursor.
    ///
    /// On the last slot the window shifts left instead of the cursor moving
    /// right, so longer messages can be typed.
    fn commit(&mut self) -> Option<UiEvent> {
        let cursor = usize::from(self.sign.cursor()).min(LAST_SLOT);

        if cursor == LAST_SLOT && self.nothing_entered() {
            return Some(UiEvent::Abandon);
        }
        if self.index >= MAX_COMPOSED_LEN {
            let _ = self.sign.take_candidate();
            warn!("ui: message full, keystroke dropped");
            return None;
        }

        let c = match self.sign.take_candidate() {
            CURSOR_GLYPH => BLANK,
            c => c,
        };
        self.message.set(self.index, c);
        self.index += 1;
        self.sign.set_slot(cursor, c);

        if cursor == LAST_SLOT {
            self.sign.rotate_visible();
        } else {
            self.sign.set_cursor(cursor as u8 + 1);
        }
        None
    }

    fn nothing_entered(&self) -> bool {
        self.sign.visible()[..LAST_SLOT].iter().all(|&c| c == BLANK)
            && self.sign.candidate() == CURSOR_GLYPH
    }

    /// Short messages are padded to a full window, long ones lose trailing
    /// blanks (but never below a full window), then the loop separator.
    fn prepare_for_scroll(&mut self) {
        if self.message.len() > DIGIT_COUNT {
            self.message.trim_end();
        }
        self.message.pad_to(DIGIT_COUNT);
        self.message.append_blanks(LOOP_SEPARATOR);
    }

    fn adjust_speed(&mut self, event: ButtonEvent) {
        match event {
            ButtonEvent::KeyHash => self.speed.faster(),
            ButtonEvent::KeyStar => self.speed.slower(),
            _ => return,
        }
        debug!("ui: scroll delay {}", self.speed.units());
    }

    /// One animation-step delay at the current speed.
    async fn pause(&mut self) {
        self.delay.delay_us(self.speed.delay_us()).await;
    }
}
