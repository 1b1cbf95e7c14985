use crate::models::amount::format_whole;

/// Which watermark an alert was measured from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Price retraced from the trailing high
    Drop,
    /// Price climbed from the trailing low
    Rise,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Alert {
    pub direction: Direction,
    pub from_value: f64,
    pub to_value: f64,
    pub percent: f64,
}

impl Alert {
    pub fn drop_from(from_value: f64, to_value: f64, percent: f64) -> Self {
        Self {
            direction: Direction::Drop,
            from_value,
            to_value,
            percent,
        }
    }

    pub fn rise_from(from_value: f64, to_value: f64, percent: f64) -> Self {
        Self {
            direction: Direction::Rise,
            from_value,
            to_value,
            percent,
        }
    }

    /// Push message text, e.g. `▼ BTC −10%: 60,000→53,900 USD`.
    pub fn message(&self, symbol: &str, currency: &str) -> String {
        let (arrow, sign) = match self.direction {
            Direction::Drop => ('▼', '−'),
            Direction::Rise => ('▲', '+'),
        };
        format!(
            "{arrow} {symbol} {sign}{}%: {}→{} {}",
            self.percent,
            format_whole(self.from_value),
            format_whole(self.to_value),
            currency.to_uppercase()
        )
    }
}
