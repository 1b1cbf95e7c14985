use serde::{Deserialize, Serialize};

/// Trailing high/low reference prices. Zero on either side means unset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WatermarkState {
    pub high: f64,
    pub low: f64,
}

impl WatermarkState {
    pub fn new(high: f64, low: f64) -> Self {
        Self { high, low }
    }

    /// Whether both sides hold usable values for a persisted record.
    pub fn is_valid(&self) -> bool {
        self.high.is_finite() && self.low.is_finite() && self.high >= 0.0 && self.low >= 0.0
    }
}
