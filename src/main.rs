use anyhow::Result;
use clap::Parser;
use dotenv::dotenv;
use std::path::PathBuf;
use std::time::Duration;

use pricewatch::app::{self, RunOptions};
use pricewatch::config::Config;
use pricewatch::infrastructure::{HttpPageFetcher, TelegramNotifier};

#[derive(Parser, Debug)]
#[command(version, about = "Scrape a product price and alert a Telegram chat when it triggers")]
struct Args {
    /// Path of the JSON price history
    #[arg(long, default_value = "prices.json")]
    history_file: PathBuf,

    /// Page load timeout in seconds
    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,

    /// Evaluate the trigger and log the alert without calling Telegram
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();
    dotenv().ok();
    let args = Args::parse();

    // Config failures are fatal before any network call
    let config = Config::from_env()?;

    let fetcher = HttpPageFetcher::new(Duration::from_secs(args.timeout_secs))?;
    let notifier = TelegramNotifier::new(config.bot_token.clone(), config.chat_id);
    let options = RunOptions {
        history_file: args.history_file,
        dry_run: args.dry_run,
    };

    app::run(&config, &options, &fetcher, &notifier).await
}
