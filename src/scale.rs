// Typed value scales.
//
// Recovery composites arrive on a -1..1 scale while capability benchmarks and
// every dashboard score are on 0..100. Keeping the two in distinct types makes
// the single conversion point explicit.
use serde::{Deserialize, Serialize};
use std::fmt;

/// A composite score nominally in `-1.0..=1.0` (recovery domain).
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Composite(f64);

/// A score on the `0..=100` dashboard scale.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Percent(f64);

impl Composite {
    pub const fn new(value: f64) -> Self {
        Self(value)
    }

    pub const fn value(self) -> f64 {
        self.0
    }

    /// Map `-1..1` onto `0..100` without clamping: `(x + 1) / 2 * 100`.
    pub fn to_percent(self) -> Percent {
        Percent(((self.0 + 1.0) / 2.0) * 100.0)
    }
}

impl Percent {
    pub const fn new(value: f64) -> Self {
        Self(value)
    }

    pub const fn value(self) -> f64 {
        self.0
    }

    pub fn clamped(self) -> Self {
        Self(self.0.clamp(0.0, 100.0))
    }
}

impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}%", self.0)
    }
}
