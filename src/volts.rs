// -*- coding: utf-8 -*-
// SPDX-License-Identifier: Apache-2.0 OR MIT

use derive_more::{Add, AddAssign, Display, From, Sub, SubAssign};

/// Electrical potential in volts.
#[derive(
    Copy, Clone, Debug, Default, PartialEq, PartialOrd, Add, AddAssign, Sub, SubAssign, From, Display,
)]
#[display("{_0:.3} V")]
pub struct Volts(pub f64);

impl Volts {
    pub const fn new(v: f64) -> Self {
        Self(v)
    }

    pub const fn get(self) -> f64 {
        self.0
    }

    pub fn abs(self) -> Self {
        Self(self.0.abs())
    }
}


// vim: ts=4 sw=4 expandtab
