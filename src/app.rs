// src/app.rs
use anyhow::Result;
use std::path::PathBuf;
use tracing::{error, info};

use crate::config::Config;
use crate::domain::price::percent_change;
use crate::infrastructure::{HistoryStore, Notifier, PageFetcher};
use crate::shared::types::Observation;

/// Operational knobs that are not part of the watch configuration
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub history_file: PathBuf,
    pub dry_run: bool,
}

/// Execute one watch run: fetch, decide, notify, persist.
///
/// A notification failure is logged and the observation is still
/// persisted; fetch, parse and persistence failures abort the run.
/// History is only mutated after a successful fetch, so a failed run
/// never records an observation.
pub async fn run(
    config: &Config,
    options: &RunOptions,
    fetcher: &dyn PageFetcher,
    notifier: &dyn Notifier,
) -> Result<()> {
    let mut history = HistoryStore::load(&options.history_file);
    let previous = history.last_observation(&config.url).map(|o| o.price);

    let observation = fetcher
        .fetch(&config.url, &config.name_selector, &config.price_selector)
        .await?;
    info!("💰 {} is {:.2}", observation.name, observation.price);

    match previous {
        Some(prev) => info!(
            "previous price {:.2} ({:+.1} %)",
            prev,
            percent_change(prev, observation.price)
        ),
        None => info!("no previous observation for {}", config.url),
    }

    if config
        .policy
        .should_notify(observation.price, previous, config.threshold)
    {
        let message = alert_message(&observation, previous);
        if options.dry_run {
            info!("dry run, would have sent: {}", message);
        } else {
            match notifier.notify(&message).await {
                Ok(()) => info!("🔔 notification sent"),
                // delivery failure must not abort persistence
                Err(e) => error!("failed to send notification: {}", e),
            }
        }
    } else {
        info!(
            "price {:.2} did not trigger {:?}, no alert",
            observation.price, config.policy
        );
    }

    history.append(&config.url, observation);
    HistoryStore::save(&history, &options.history_file)?;
    info!("history saved to {}", options.history_file.display());

    Ok(())
}

/// Alert text for Telegram, HTML parse mode
fn alert_message(observation: &Observation, previous: Option<f64>) -> String {
    match previous {
        Some(prev) => format!(
            "⚠️ <b>{}</b>\n{:.2} → {:.2} ({:+.1} %)",
            observation.name,
            prev,
            observation.price,
            percent_change(prev, observation.price)
        ),
        None => format!(
            "⚠️ <b>{}</b> is now {:.2}",
            observation.name, observation.price
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TriggerPolicy;
    use crate::shared::errors::{FetchError, NotifyError};
    use crate::shared::types::PriceHistory;
    use async_trait::async_trait;
    use std::fs;
    use std::sync::Mutex;
    use tempfile::tempdir;

    struct PriceStub(f64);

    #[async_trait]
    impl PageFetcher for PriceStub {
        async fn fetch(&self, url: &str, _: &str, _: &str) -> Result<Observation, FetchError> {
            Ok(Observation::new(url, "Widget", self.0))
        }
    }

    struct FailingFetcher;

    #[async_trait]
    impl PageFetcher for FailingFetcher {
        async fn fetch(&self, _: &str, _: &str, price_selector: &str) -> Result<Observation, FetchError> {
            Err(FetchError::NoMatch(price_selector.to_string()))
        }
    }

    #[derive(Default)]
    struct RecordingNotifier {
        messages: Mutex<Vec<String>>,
        fail: bool,
    }

    impl RecordingNotifier {
        fn failing() -> Self {
            Self {
                fail: true,
                ..Self::default()
            }
        }

        fn sent(&self) -> Vec<String> {
            self.messages.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Notifier for RecordingNotifier {
        async fn notify(&self, message: &str) -> Result<(), NotifyError> {
            self.messages.lock().unwrap().push(message.to_string());
            if self.fail {
                return Err(NotifyError::Api {
                    status: reqwest::StatusCode::BAD_REQUEST,
                    body: "chat not found".to_string(),
                });
            }
            Ok(())
        }
    }

    fn test_config(threshold: f64, policy: TriggerPolicy) -> Config {
        Config {
            url: "https://shop.test/widget".to_string(),
            name_selector: ".title".to_string(),
            price_selector: ".price".to_string(),
            threshold,
            bot_token: "token".to_string(),
            chat_id: 1,
            policy,
        }
    }

    fn options(history_file: PathBuf) -> RunOptions {
        RunOptions {
            history_file,
            dry_run: false,
        }
    }

    #[tokio::test]
    async fn test_price_at_threshold_notifies_once() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("prices.json");
        let config = test_config(200.0, TriggerPolicy::ThresholdBelow);
        let notifier = RecordingNotifier::default();

        run(&config, &options(path.clone()), &PriceStub(199.99), &notifier)
            .await
            .unwrap();

        let sent = notifier.sent();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].contains("199.99"));
        assert!(sent[0].contains("Widget"));

        let history = HistoryStore::load(&path);
        assert_eq!(history.0[&config.url].len(), 1);
        assert_eq!(history.0[&config.url][0].price, 199.99);
    }

    #[tokio::test]
    async fn test_price_above_threshold_is_recorded_silently() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("prices.json");
        let config = test_config(200.0, TriggerPolicy::ThresholdBelow);

        let mut seeded = PriceHistory::new();
        seeded.append(&config.url, Observation::new(&config.url, "Widget", 250.0));
        HistoryStore::save(&seeded, &path).unwrap();

        let notifier = RecordingNotifier::default();
        run(&config, &options(path.clone()), &PriceStub(300.0), &notifier)
            .await
            .unwrap();

        assert!(notifier.sent().is_empty());
        let history = HistoryStore::load(&path);
        assert_eq!(history.0[&config.url].len(), 2);
        assert_eq!(history.last_observation(&config.url).unwrap().price, 300.0);
    }

    #[tokio::test]
    async fn test_fetch_error_leaves_history_untouched() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("prices.json");
        let config = test_config(200.0, TriggerPolicy::ThresholdBelow);

        let mut seeded = PriceHistory::new();
        seeded.append(&config.url, Observation::new(&config.url, "Widget", 250.0));
        HistoryStore::save(&seeded, &path).unwrap();
        let before = fs::read_to_string(&path).unwrap();

        let notifier = RecordingNotifier::default();
        let result = run(&config, &options(path.clone()), &FailingFetcher, &notifier).await;

        assert!(result.is_err());
        assert!(notifier.sent().is_empty());
        assert_eq!(fs::read_to_string(&path).unwrap(), before);
    }

    #[tokio::test]
    async fn test_notifier_failure_still_persists() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("prices.json");
        let config = test_config(200.0, TriggerPolicy::ThresholdBelow);
        let notifier = RecordingNotifier::failing();

        run(&config, &options(path.clone()), &PriceStub(150.0), &notifier)
            .await
            .unwrap();

        assert_eq!(notifier.sent().len(), 1);
        let history = HistoryStore::load(&path);
        assert_eq!(history.0[&config.url].len(), 1);
    }

    #[tokio::test]
    async fn test_dry_run_skips_delivery() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("prices.json");
        let config = test_config(200.0, TriggerPolicy::ThresholdBelow);
        let notifier = RecordingNotifier::default();
        let options = RunOptions {
            history_file: path.clone(),
            dry_run: true,
        };

        run(&config, &options, &PriceStub(150.0), &notifier)
            .await
            .unwrap();

        assert!(notifier.sent().is_empty());
        assert_eq!(HistoryStore::load(&path).0[&config.url].len(), 1);
    }

    #[tokio::test]
    async fn test_drop_policy_end_to_end() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("prices.json");
        let config = test_config(5.0, TriggerPolicy::PriceDrop);
        let notifier = RecordingNotifier::default();
        let options = options(path.clone());

        // first run has no history to compare against
        run(&config, &options, &PriceStub(250.0), &notifier).await.unwrap();
        assert!(notifier.sent().is_empty());

        // 250 -> 200 is a 20% drop
        run(&config, &options, &PriceStub(200.0), &notifier).await.unwrap();
        let sent = notifier.sent();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].contains("250.00"));
        assert!(sent[0].contains("200.00"));
        assert!(sent[0].contains("-20.0"));
    }

    #[test]
    fn test_alert_message_includes_change() {
        let observation = Observation::new("u", "Widget", 199.99);
        let message = alert_message(&observation, Some(250.0));
        assert!(message.contains("Widget"));
        assert!(message.contains("250.00"));
        assert!(message.contains("199.99"));
        assert!(message.contains("-20.0"));

        let first = alert_message(&observation, None);
        assert!(first.contains("199.99"));
    }
}
