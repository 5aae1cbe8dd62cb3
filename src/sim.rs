// -*- coding: utf-8 -*-
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Simulated ADC for running without hardware.

use crate::{
    adc::{ADC_MAX, Channel, SampleSource},
    volts::Volts,
};
use core::convert::Infallible;

const JITTER: [i32; 8] = [0, 1, -1, 2, 0, -2, 1, -1];

/// Produces codes for a fixed input voltage with a little jitter
/// and periodic dropouts to zero.
pub struct SimAdc {
    code: u16,
    glitch_every: usize,
    count: usize,
}

impl SimAdc {
    pub fn new(volts: Volts, supply: Volts) -> Self {
        let code = (volts.get() * f64::from(ADC_MAX) / supply.get())
            .round()
            .clamp(0.0, f64::from(ADC_MAX)) as u16;
        Self {
            code,
            glitch_every: 0,
            count: 0,
        }
    }

    /// Replace every `n`th sample by a zero code. 0 disables glitches.
    pub fn with_glitches(mut self, n: usize) -> Self {
        self.glitch_every = n;
        self
    }

    pub fn code(&self) -> u16 {
        self.code
    }
}

impl SampleSource for SimAdc {
    type Error = Infallible;

    fn sample(&mut self, _chan: Channel) -> Result<u16, Infallible> {
        let n = self.count;
        self.count = self.count.wrapping_add(1);

        if self.glitch_every > 0 && n % self.glitch_every == self.glitch_every - 1 {
            return Ok(0);
        }
        let jitter = JITTER[n % JITTER.len()];
        let code = (i32::from(self.code) + jitter).clamp(0, i32::from(ADC_MAX));
        Ok(code as u16)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn chan() -> Channel {
        Channel::new(6).unwrap()
    }

    #[test]
    fn test_code() {
        let supply = Volts::new(5.0);
        assert_eq!(SimAdc::new(Volts::new(0.0), supply).code(), 0);
        assert_eq!(SimAdc::new(Volts::new(5.0), supply).code(), ADC_MAX);
        assert_eq!(SimAdc::new(Volts::new(9.0), supply).code(), ADC_MAX);
        assert_eq!(SimAdc::new(Volts::new(-1.0), supply).code(), 0);
        assert_eq!(SimAdc::new(Volts::new(2.5), supply).code(), 2048);
    }

    #[test]
    fn test_jitter_clamped() {
        let mut sim = SimAdc::new(Volts::new(5.0), Volts::new(5.0));
        for _ in 0..100 {
            let code = sim.sample(chan()).unwrap();
            assert!(code <= ADC_MAX && code >= ADC_MAX - 2);
        }
        let mut sim = SimAdc::new(Volts::new(0.0), Volts::new(5.0));
        for _ in 0..100 {
            assert!(sim.sample(chan()).unwrap() <= 2);
        }
    }

    #[test]
    fn test_glitches() {
        let mut sim = SimAdc::new(Volts::new(2.5), Volts::new(5.0)).with_glitches(10);
        let samples: Vec<u16> = (0..100).map(|_| sim.sample(chan()).unwrap()).collect();
        assert_eq!(samples.iter().filter(|&&s| s == 0).count(), 10);
        assert_eq!(samples[9], 0);
        assert_ne!(samples[0], 0);
    }
}

// vim: ts=4 sw=4 expandtab
