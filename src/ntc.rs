// -*- coding: utf-8 -*-
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! NTC thermistor calibration table.
//!
//! Voltage at the divider tap over temperature, for a 10 kOhm NTC
//! with a 10 kOhm fixed resistor supplied from 5 V.

use crate::volts::Volts;

macro_rules! ntc {
    ($cel:literal, $volts:literal) => {
        NtcEntry {
            celsius: $cel,
            volts: Volts::new($volts),
        }
    };
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct NtcEntry {
    pub celsius: i8,
    pub volts: Volts,
}

/// Immutable table of (temperature, voltage) points.
/// Sorted by ascending temperature, voltage falling.
pub struct NtcTable<const SIZE: usize> {
    entries: [NtcEntry; SIZE],
}

impl<const SIZE: usize> NtcTable<SIZE> {
    pub const fn new(entries: [NtcEntry; SIZE]) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[NtcEntry] {
        &self.entries
    }

    /// Lowest and highest temperature of the table.
    pub fn range(&self) -> (i8, i8) {
        match (self.entries.first(), self.entries.last()) {
            (Some(first), Some(last)) => (first.celsius, last.celsius),
            _ => (0, 0),
        }
    }

    /// `volts` lies between the first and the last table voltage.
    pub fn contains_voltage(&self, volts: Volts) -> bool {
        match (self.entries.first(), self.entries.last()) {
            (Some(first), Some(last)) => volts <= first.volts && volts >= last.volts,
            _ => false,
        }
    }

    /// Temperature of the entry closest to `volts`.
    ///
    /// Voltages outside of the table saturate to the boundary temperatures.
    /// On equal distance the entry found first wins, which is the lower temperature.
    pub fn temperature_from_voltage(&self, volts: Volts) -> i8 {
        let mut best = 0;
        let mut best_diff = f64::INFINITY;
        for entry in &self.entries {
            let diff = (entry.volts - volts).abs().get();
            if diff < best_diff {
                best_diff = diff;
                best = entry.celsius;
            }
        }
        best
    }

    /// Check that the voltage strictly falls with rising temperature.
    pub fn check_monotonic(&self) -> bool {
        self.entries
            .windows(2)
            .all(|w| w[0].celsius < w[1].celsius && w[0].volts > w[1].volts)
    }
}

#[rustfmt::skip]
pub const NTC_TABLE: NtcTable<101> = NtcTable::new([
    ntc!(0, 1.148), ntc!(1, 1.134), ntc!(2, 1.120), ntc!(3, 1.106),
    ntc!(4, 1.091), ntc!(5, 1.076), ntc!(6, 1.061), ntc!(7, 1.046),
    ntc!(8, 1.030), ntc!(9, 1.014), ntc!(10, 0.998), ntc!(11, 0.982),
    ntc!(12, 0.966), ntc!(13, 0.950), ntc!(14, 0.933), ntc!(15, 0.917),
    ntc!(16, 0.900), ntc!(17, 0.883), ntc!(18, 0.867), ntc!(19, 0.850),
    ntc!(20, 0.833), ntc!(21, 0.816), ntc!(22, 0.800), ntc!(23, 0.783),
    ntc!(24, 0.767), ntc!(25, 0.750), ntc!(26, 0.734), ntc!(27, 0.717),
    ntc!(28, 0.701), ntc!(29, 0.685), ntc!(30, 0.669), ntc!(31, 0.654),
    ntc!(32, 0.638), ntc!(33, 0.623), ntc!(34, 0.608), ntc!(35, 0.593),
    ntc!(36, 0.578), ntc!(37, 0.563), ntc!(38, 0.549), ntc!(39, 0.535),
    ntc!(40, 0.521), ntc!(41, 0.508), ntc!(42, 0.494), ntc!(43, 0.481),
    ntc!(44, 0.469), ntc!(45, 0.456), ntc!(46, 0.444), ntc!(47, 0.432),
    ntc!(48, 0.420), ntc!(49, 0.408), ntc!(50, 0.397), ntc!(51, 0.386),
    ntc!(52, 0.376), ntc!(53, 0.365), ntc!(54, 0.355), ntc!(55, 0.345),
    ntc!(56, 0.335), ntc!(57, 0.326), ntc!(58, 0.317), ntc!(59, 0.308),
    ntc!(60, 0.299), ntc!(61, 0.290), ntc!(62, 0.282), ntc!(63, 0.274),
    ntc!(64, 0.266), ntc!(65, 0.259), ntc!(66, 0.251), ntc!(67, 0.244),
    ntc!(68, 0.237), ntc!(69, 0.230), ntc!(70, 0.224), ntc!(71, 0.217),
    ntc!(72, 0.211), ntc!(73, 0.205), ntc!(74, 0.199), ntc!(75, 0.193),
    ntc!(76, 0.188), ntc!(77, 0.182), ntc!(78, 0.177), ntc!(79, 0.172),
    ntc!(80, 0.167), ntc!(81, 0.163), ntc!(82, 0.158), ntc!(83, 0.154),
    ntc!(84, 0.149), ntc!(85, 0.145), ntc!(86, 0.141), ntc!(87, 0.137),
    ntc!(88, 0.133), ntc!(89, 0.129), ntc!(90, 0.126), ntc!(91, 0.122),
    ntc!(92, 0.119), ntc!(93, 0.116), ntc!(94, 0.112), ntc!(95, 0.109),
    ntc!(96, 0.106), ntc!(97, 0.104), ntc!(98, 0.101), ntc!(99, 0.098),
    ntc!(100, 0.095),
]);


// vim: ts=4 sw=4 expandtab
