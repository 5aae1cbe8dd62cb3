// -*- coding: utf-8 -*-
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! AD7928 8 channel 12 bit SPI ADC.

use embedded_hal::{delay::DelayNs, digital::OutputPin, spi::SpiBus};

const WRITE_CR: u16 = 0x0800;
const CODING_STRAIGHT_BINARY: u16 = 0x0001;
const PM_NORMAL: u16 = 0x0030;
const SEQUENCE_OFF: u16 = 0x0000;
const ADDR_SHIFT: u16 = 6;
/// The 12 bit control word is sent MSB aligned in a 16 bit frame.
const FRAME_SHIFT: u16 = 4;

/// Wait time after writing the control register.
pub const SETTLE_DELAY_MS: u32 = 10;

pub const ADC_MAX: u16 = 0x0FFF;
pub const NR_CHANNELS: u8 = 8;

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum Error<SpiE, PinE> {
    #[error("ADC channel {0} is out of range 0..=7")]
    InvalidChannel(i32),
    #[error("SPI transfer failed: {0:?}")]
    Spi(SpiE),
    #[error("Chip select failed: {0:?}")]
    Pin(PinE),
}

/// ADC input channel 0..=7.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Channel(u8);

impl Channel {
    pub const fn new(chan: u8) -> Option<Self> {
        if chan < NR_CHANNELS {
            Some(Self(chan))
        } else {
            None
        }
    }

    pub const fn get(self) -> u8 {
        self.0
    }

    /// Control register word selecting this channel, aligned to the serial frame.
    pub const fn command(self) -> u16 {
        (WRITE_CR
            | ((self.0 as u16) << ADDR_SHIFT)
            | SEQUENCE_OFF
            | CODING_STRAIGHT_BINARY
            | PM_NORMAL)
            << FRAME_SHIFT
    }
}

impl TryFrom<i32> for Channel {
    type Error = i32;

    fn try_from(chan: i32) -> Result<Self, i32> {
        u8::try_from(chan).ok().and_then(Self::new).ok_or(chan)
    }
}

impl TryFrom<u8> for Channel {
    type Error = i32;

    fn try_from(chan: u8) -> Result<Self, i32> {
        Self::new(chan).ok_or(chan.into())
    }
}

/// Something that delivers raw 12 bit conversion results.
pub trait SampleSource {
    type Error;

    fn sample(&mut self, chan: Channel) -> Result<u16, Self::Error>;
}

pub struct Ad7928<SPI, CS, D>
where
    CS: OutputPin,
{
    spi: SPI,
    cs: CS,
    delay: D,
}

impl<SPI, CS, D> Ad7928<SPI, CS, D>
where
    SPI: SpiBus<u8>,
    CS: OutputPin,
    D: DelayNs,
{
    pub fn new(spi: SPI, mut cs: CS, delay: D) -> Result<Self, Error<SPI::Error, CS::Error>> {
        cs.set_high().map_err(Error::Pin)?;
        Ok(Self { spi, cs, delay })
    }

    /// Run `f` with chip select asserted.
    /// Chip select is released again, even if `f` fails.
    fn selected<F>(&mut self, f: F) -> Result<(), Error<SPI::Error, CS::Error>>
    where
        F: FnOnce(&mut SPI) -> Result<(), SPI::Error>,
    {
        self.cs.set_low().map_err(Error::Pin)?;
        let res = f(&mut self.spi).and_then(|()| self.spi.flush());
        let cs_res = self.cs.set_high();
        res.map_err(Error::Spi)?;
        cs_res.map_err(Error::Pin)
    }

    /// Write the control register and wait for the device to settle.
    pub fn configure(&mut self, chan: Channel) -> Result<(), Error<SPI::Error, CS::Error>> {
        let cmd = chan.command();
        log::info!(
            "AD7928: configure channel {}, command word {cmd:#06X}",
            chan.get()
        );
        self.selected(|spi| spi.write(&cmd.to_be_bytes()))?;
        self.delay.delay_ms(SETTLE_DELAY_MS);
        Ok(())
    }

    /// Convert one sample on `chan`.
    pub fn read(&mut self, chan: Channel) -> Result<u16, Error<SPI::Error, CS::Error>> {
        let [cmd_hi, cmd_lo] = chan.command().to_be_bytes();
        let tx = [cmd_hi, cmd_lo, 0x00, 0x00];
        let mut rx = [0_u8; 4];
        self.selected(|spi| spi.transfer(&mut rx, &tx))?;
        let code = (u16::from(rx[2] & 0x0F) << 8) | u16::from(rx[3]);
        log::trace!("AD7928: channel {} rx {rx:02X?} code {code}", chan.get());
        Ok(code)
    }

    /// Convert one sample on channel number `chan`.
    ///
    /// Channel numbers outside of 0..=7 are rejected before touching the bus.
    pub fn read_channel(
        &mut self,
        chan: impl Into<i32>,
    ) -> Result<u16, Error<SPI::Error, CS::Error>> {
        let chan: i32 = chan.into();
        let chan = Channel::try_from(chan).map_err(Error::InvalidChannel)?;
        self.read(chan)
    }
}

impl<SPI, CS, D> SampleSource for Ad7928<SPI, CS, D>
where
    SPI: SpiBus<u8>,
    CS: OutputPin,
    D: DelayNs,
{
    type Error = Error<SPI::Error, CS::Error>;

    fn sample(&mut self, chan: Channel) -> Result<u16, Self::Error> {
        self.read(chan)
    }
}

impl<SPI, CS, D> Drop for Ad7928<SPI, CS, D>
where
    CS: OutputPin,
{
    fn drop(&mut self) {
        let _ = self.cs.set_high();
    }
}


// vim: ts=4 sw=4 expandtab
