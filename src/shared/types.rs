//! Common types used across the application

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single scraped price point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub url: String,
    pub name: String,
    pub price: f64,
    pub timestamp: DateTime<Utc>,
}

impl Observation {
    pub fn new(url: impl Into<String>, name: impl Into<String>, price: f64) -> Self {
        Self {
            url: url.into(),
            name: name.into(),
            price,
            timestamp: Utc::now(),
        }
    }
}

/// Ordered price observations per url, insertion order is chronological.
///
/// BTreeMap keeps the serialized file stable between runs so the
/// history stays diffable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceHistory(pub BTreeMap<String, Vec<Observation>>);

impl PriceHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recent prior observation for a url
    pub fn last_observation(&self, url: &str) -> Option<&Observation> {
        self.0.get(url).and_then(|observations| observations.last())
    }

    pub fn append(&mut self, url: &str, observation: Observation) {
        self.0.entry(url.to_string()).or_default().push(observation);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_keeps_insertion_order() {
        let mut history = PriceHistory::new();
        history.append("u", Observation::new("u", "a", 10.0));
        history.append("u", Observation::new("u", "a", 20.0));
        history.append("u", Observation::new("u", "a", 15.0));

        let prices: Vec<f64> = history.0["u"].iter().map(|o| o.price).collect();
        assert_eq!(prices, vec![10.0, 20.0, 15.0]);
        assert_eq!(history.last_observation("u").unwrap().price, 15.0);
    }

    #[test]
    fn test_last_observation_missing_url() {
        let history = PriceHistory::new();
        assert!(history.last_observation("nope").is_none());
    }
}
