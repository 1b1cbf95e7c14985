use crate::models::alert::Alert;
use crate::models::amount::{format_cents, format_whole};
use crate::models::watermark::WatermarkState;

/// Outcome of one evaluation pass.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub price: f64,
    pub state: WatermarkState,
    pub alerts: Vec<Alert>,
    /// Alerts whose notification could not be delivered
    pub notify_failures: usize,
}

impl RunReport {
    pub fn summary_line(&self) -> String {
        format!(
            "${} | high {} | low {}",
            format_whole(self.price),
            format_whole(self.state.high),
            format_whole(self.state.low)
        )
    }
}

/// Read-only view of the price against the persisted watermarks.
#[derive(Debug, Clone)]
pub struct StatusReport {
    pub symbol: String,
    pub price: f64,
    pub state: WatermarkState,
}

impl StatusReport {
    pub fn drop_from_high(&self) -> Option<f64> {
        (self.state.high > 0.0).then(|| (self.state.high - self.price) / self.state.high * 100.0)
    }

    pub fn rise_from_low(&self) -> Option<f64> {
        (self.state.low > 0.0).then(|| (self.price - self.state.low) / self.state.low * 100.0)
    }

    pub fn render(&self) -> String {
        let mut lines = vec![
            format!("Current {} price: ${}", self.symbol, format_cents(self.price)),
            format!("Session high:      ${}", format_cents(self.state.high)),
            format!("Session low:       ${}", format_cents(self.state.low)),
        ];
        if let Some(pct) = self.drop_from_high() {
            lines.push(format!("Drop from high:    {pct:.1}%"));
        }
        if let Some(pct) = self.rise_from_low() {
            lines.push(format!("Rise from low:     {pct:.1}%"));
        }
        lines.join("\n")
    }
}
