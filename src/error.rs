//! Unified error type for segsign.
//!
//! We avoid `alloc` - all error variants carry only fixed-size data.
//! Nothing here is fatal: the UI logs the error and falls back to the
//! greeting.

/// Top-level error type used across the library.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    // Storage
    /// The EEPROM did not acknowledge (absent, or still in a write cycle).
    StoreNack,

    /// Any other bus-level failure talking to the byte store.
    StoreBus,
}

impl From<embedded_hal::i2c::ErrorKind> for Error {
    fn from(kind: embedded_hal::i2c::ErrorKind) -> Self {
        match kind {
            embedded_hal::i2c::ErrorKind::NoAcknowledge(_) => Error::StoreNack,
            _ => Error::StoreBus,
        }
    }
}
