//! 24C02-class I²C EEPROM as a [`ByteStore`].

use embedded_hal::i2c::Error as _;
use embedded_hal_async::i2c::I2c;

use crate::config::EEPROM_I2C_ADDRESS;
use crate::error::Error;
use crate::hal::ByteStore;

/// Single-byte random access over I²C.
///
/// Writes are "byte write" frames (`[cell, value]`); reads set the cell
/// address and read one byte back in a repeated-start transaction. The
/// chip's internal write cycle is not polled; callers wait it out.
pub struct Eeprom24x<I2C> {
    i2c: I2C,
    address: u8,
}

impl<I2C: I2c> Eeprom24x<I2C> {
    pub fn new(i2c: I2C) -> Self {
        Self::with_address(i2c, EEPROM_I2C_ADDRESS)
    }

    /// For boards that strap A0..A2 differently.
    pub fn with_address(i2c: I2C, address: u8) -> Self {
        Self { i2c, address }
    }

    pub fn release(self) -> I2C {
        self.i2c
    }
}

impl<I2C: I2c> ByteStore for Eeprom24x<I2C> {
    async fn write_byte(&mut self, addr: u8, value: u8) -> Result<(), Error> {
        self.i2c
            .write(self.address, &[addr, value])
            .await
            .map_err(|e| Error::from(e.kind()))
    }

    async fn read_byte(&mut self, addr: u8) -> Result<u8, Error> {
        let mut buf = [0u8; 1];
        self.i2c
            .write_read(self.address, &[addr], &mut buf)
            .await
            .map_err(|e| Error::from(e.kind()))?;
        Ok(buf[0])
    }
}
