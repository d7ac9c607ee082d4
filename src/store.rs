//! Persistent message storage.
//!
//! Layout in the byte store:
//!   - cell 0: message length
//!   - cells 1..=len: message characters, in order
//!
//! One message only; a save overwrites the previous one.

use embedded_hal_async::delay::DelayNs;

use crate::config::{
    MESSAGE_CAPACITY, STORE_FINAL_SETTLE_MS, STORE_LENGTH_CELL, STORE_WRITE_SETTLE_MS,
};
use crate::error::Error;
use crate::hal::ByteStore;
use crate::message::Message;

/// Write `message` to the store.
///
/// Every byte write is followed by the per-byte settle wait, and the whole
/// save by the longer final wait, so the store is idle when this returns.
pub async fn save<S, D>(store: &mut S, delay: &mut D, message: &Message) -> Result<(), Error>
where
    S: ByteStore,
    D: DelayNs,
{
    let len = message.len();
    debug_assert!(len <= MESSAGE_CAPACITY);

    store.write_byte(STORE_LENGTH_CELL, len as u8).await?;
    delay.delay_ms(STORE_WRITE_SETTLE_MS).await;

    for (i, &c) in message.as_bytes().iter().enumerate() {
        store.write_byte(char_cell(i), c).await?;
        delay.delay_ms(STORE_WRITE_SETTLE_MS).await;
    }
    delay.delay_ms(STORE_FINAL_SETTLE_MS).await;

    info!("store: saved {} chars", len);
    Ok(())
}

/// Read the stored message back.
///
/// A length cell larger than the capacity (erased or corrupted memory) is
/// clamped before any character is read.
pub async fn load<S: ByteStore>(store: &mut S) -> Result<Message, Error> {
    let raw_len = store.read_byte(STORE_LENGTH_CELL).await? as usize;
    let len = raw_len.min(MESSAGE_CAPACITY);
    if len != raw_len {
        warn!("store: length {} clamped to {}", raw_len, len);
    }

    let mut chars = [0u8; MESSAGE_CAPACITY];
    for (i, slot) in chars[..len].iter_mut().enumerate() {
        *slot = store.read_byte(char_cell(i)).await?;
    }

    info!("store: loaded {} chars", len);
    Ok(Message::from_bytes(&chars[..len]))
}

fn char_cell(index: usize) -> u8 {
    STORE_LENGTH_CELL + 1 + index as u8
}
