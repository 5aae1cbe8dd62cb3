// -*- coding: utf-8 -*-
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Thermistor temperature acquisition through an AD7928 SPI ADC.

#![forbid(unsafe_code)]

pub mod adc;
pub mod filter;
#[cfg(feature = "rpi")]
pub mod hw;
pub mod ntc;
pub mod sim;
pub mod temp;
pub mod volts;

pub use crate::{
    adc::{Ad7928, Channel, SampleSource},
    temp::{Estimator, EstimatorConfig, Reading},
    volts::Volts,
};

// vim: ts=4 sw=4 expandtab
