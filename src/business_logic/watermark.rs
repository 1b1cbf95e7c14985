use crate::business_logic::config::{Overrides, ThresholdConfig};
use crate::models::alert::Alert;
use crate::models::watermark::WatermarkState;

/// Result of evaluating one price against the trailing watermarks
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub state: WatermarkState,
    /// Zero, one or both directions
    pub alerts: Vec<Alert>,
}

/// Apply one price observation to the watermarks.
///
/// Steps run in a fixed order: reset, high override or natural high update,
/// low override or natural low update, drop check, rise check. Updating the
/// watermarks before the checks means a first observation (`{0, 0}`) can never
/// alert, since both sides are seeded from the price itself.
///
/// A fired alert restarts its side from the triggering price. Drop and rise are
/// checked independently and may both fire for the same price.
pub fn compute(
    state: WatermarkState,
    price: f64,
    overrides: &Overrides,
    thresholds: &ThresholdConfig,
) -> Evaluation {
    let WatermarkState { mut high, mut low } = state;

    if overrides.reset {
        high = 0.0;
        low = 0.0;
    }

    match overrides.set_high {
        Some(value) => high = value,
        None => high = high.max(price),
    }

    match overrides.set_low {
        Some(value) => low = value,
        None if low == 0.0 => low = price,
        None => low = low.min(price),
    }

    let mut alerts = Vec::new();

    let drop = thresholds.drop_percent;
    if drop > 0.0 && high > 0.0 && price <= high * (1.0 - drop / 100.0) {
        tracing::debug!("drop of {}% from high {} at {}", drop, high, price);
        alerts.push(Alert::drop_from(high, price, drop));
        high = price;
    }

    let rise = thresholds.rise_percent;
    if rise > 0.0 && low > 0.0 && price >= low * (1.0 + rise / 100.0) {
        tracing::debug!("rise of {}% from low {} at {}", rise, low, price);
        alerts.push(Alert::rise_from(low, price, rise));
        low = price;
    }

    Evaluation {
        state: WatermarkState::new(high, low),
        alerts,
    }
}
