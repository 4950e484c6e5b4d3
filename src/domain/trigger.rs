//! Alert trigger policy

use std::str::FromStr;

use super::price::percent_change;

/// Comparator deciding whether a run sends a notification.
///
/// Exactly one policy is active per run; each variant is a single
/// comparison, never a compound condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TriggerPolicy {
    /// Notify when the current price is at or below the threshold,
    /// read as an absolute price level.
    #[default]
    ThresholdBelow,
    /// Notify when the price fell at least threshold percent below the
    /// previous observation. Never fires on the first run for a url.
    PriceDrop,
}

impl TriggerPolicy {
    pub fn should_notify(&self, price: f64, previous: Option<f64>, threshold: f64) -> bool {
        match self {
            TriggerPolicy::ThresholdBelow => price <= threshold,
            TriggerPolicy::PriceDrop => match previous {
                Some(prev) => price < prev && -percent_change(prev, price) >= threshold,
                None => false,
            },
        }
    }
}

impl FromStr for TriggerPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "threshold" => Ok(TriggerPolicy::ThresholdBelow),
            "drop" => Ok(TriggerPolicy::PriceDrop),
            other => Err(format!(
                "unknown trigger policy {:?}, expected \"threshold\" or \"drop\"",
                other
            )),
        }
    }
}
