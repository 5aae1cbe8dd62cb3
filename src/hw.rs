// -*- coding: utf-8 -*-
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Raspberry Pi SPI bus and chip select binding.

use crate::adc::Ad7928;
use anyhow::{self as ah, Context as _, format_err as err};
use rppal::{
    gpio::{Gpio, OutputPin},
    hal::Delay,
    spi::{Bus, Mode, SlaveSelect, Spi},
};

pub type PiAdc = Ad7928<Spi, OutputPin, Delay>;

#[derive(Clone, Debug)]
pub struct BusConfig {
    pub bus: u8,
    pub slave_select: u8,
    pub clock_hz: u32,
    /// BCM GPIO number of the chip select line.
    pub cs_pin: u8,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            bus: 5,
            slave_select: 0,
            clock_hz: 500_000,
            cs_pin: 12,
        }
    }
}

fn spi_bus(bus: u8) -> ah::Result<Bus> {
    Ok(match bus {
        0 => Bus::Spi0,
        1 => Bus::Spi1,
        2 => Bus::Spi2,
        3 => Bus::Spi3,
        4 => Bus::Spi4,
        5 => Bus::Spi5,
        6 => Bus::Spi6,
        _ => return Err(err!("Invalid SPI bus number {bus}")),
    })
}

fn slave_select(ss: u8) -> ah::Result<SlaveSelect> {
    Ok(match ss {
        0 => SlaveSelect::Ss0,
        1 => SlaveSelect::Ss1,
        2 => SlaveSelect::Ss2,
        _ => return Err(err!("Invalid SPI slave select {ss}")),
    })
}

/// Open the SPI bus in mode 1 and claim the chip select GPIO.
///
/// Bus and pin are released when the returned ADC is dropped.
pub fn open(conf: &BusConfig) -> ah::Result<PiAdc> {
    let spi = Spi::new(
        spi_bus(conf.bus)?,
        slave_select(conf.slave_select)?,
        conf.clock_hz,
        Mode::Mode1,
    )
    .with_context(|| format!("Open SPI bus {}.{}", conf.bus, conf.slave_select))?;

    let cs = Gpio::new()
        .context("Open GPIO")?
        .get(conf.cs_pin)
        .with_context(|| format!("Get GPIO {}", conf.cs_pin))?
        .into_output_high();

    log::info!(
        "SPI{}.{} at {} Hz, chip select on GPIO {}",
        conf.bus,
        conf.slave_select,
        conf.clock_hz,
        conf.cs_pin
    );

    Ad7928::new(spi, cs, Delay::new()).context("Deselect ADC")
}


// vim: ts=4 sw=4 expandtab
