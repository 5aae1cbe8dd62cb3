// -*- coding: utf-8 -*-
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::{
    adc::{ADC_MAX, Channel, SampleSource},
    filter::{FilteredMean, filtered_mean},
    ntc::NTC_TABLE,
    volts::Volts,
};

pub const ADC_UREF: Volts = Volts::new(5.0);
pub const THERMISTOR_CHANNEL: Channel = match Channel::new(6) {
    Some(chan) => chan,
    None => panic!("Invalid thermistor channel"),
};
pub const NUM_SAMPLES: usize = 100;
pub const OUTLIER_THRESHOLD: f64 = 3.0;

/// Convert an ADC code (or a mean of codes) to volts at the ADC pin.
pub fn adc_value_to_voltage(adc: f64, supply: Volts) -> Volts {
    Volts::new(adc * supply.get() / f64::from(ADC_MAX))
}

/// Map a divider voltage to degree Celsius.
pub fn temperature_from_voltage(volts: Volts) -> i8 {
    NTC_TABLE.temperature_from_voltage(volts)
}

#[derive(Clone, Debug)]
pub struct EstimatorConfig {
    pub channel: Channel,
    pub num_samples: usize,
    /// Samples with an absolute z-score at or above this are dropped.
    pub outlier_threshold: f64,
    pub supply: Volts,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            channel: THERMISTOR_CHANNEL,
            num_samples: NUM_SAMPLES,
            outlier_threshold: OUTLIER_THRESHOLD,
            supply: ADC_UREF,
        }
    }
}

/// Result of one estimation cycle.
#[derive(Clone, Debug, PartialEq)]
pub struct Reading {
    pub celsius: i8,
    pub volts: Volts,
    pub filtered: FilteredMean,
}

impl Reading {
    /// The voltage was outside of the calibration table.
    /// The temperature is a saturated value then.
    pub fn is_at_range_limit(&self) -> bool {
        !NTC_TABLE.contains_voltage(self.volts)
    }
}

pub struct Estimator {
    conf: EstimatorConfig,
}

impl Estimator {
    pub fn new(conf: EstimatorConfig) -> Self {
        Self { conf }
    }

    pub fn config(&self) -> &EstimatorConfig {
        &self.conf
    }

    /// Reduce a batch of raw codes to one temperature.
    pub fn estimate(&self, samples: &[u16]) -> Reading {
        let filtered = filtered_mean(samples, self.conf.outlier_threshold);
        if filtered.fallback {
            log::warn!(
                "Temp: all {} samples rejected as outliers. Using unfiltered mean.",
                samples.len()
            );
        }
        let volts = adc_value_to_voltage(filtered.mean, self.conf.supply);
        let celsius = temperature_from_voltage(volts);
        log::debug!(
            "Temp: mean {:.1} ({} kept, {} rejected), {volts}, {celsius} C",
            filtered.mean,
            filtered.kept,
            filtered.rejected,
        );
        Reading {
            celsius,
            volts,
            filtered,
        }
    }

    /// Acquire one batch from `source` and estimate the temperature.
    ///
    /// The first acquisition error aborts the cycle.
    pub fn read_temperature<S: SampleSource>(&self, source: &mut S) -> Result<Reading, S::Error> {
        let samples = (0..self.conf.num_samples)
            .map(|_| source.sample(self.conf.channel))
            .collect::<Result<Vec<u16>, S::Error>>()?;
        Ok(self.estimate(&samples))
    }
}


// vim: ts=4 sw=4 expandtab
