use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;

use telegram_ai_assistant::{bot, config::Config, health};

#[tokio::main]
async fn main() -> Result<()> {
    setup();
    let config = Config::from_env().context("Environment configuration error")?;

    log::info!("🚀 Starting the Telegram AI assistant...");

    if let Some(port) = config.health_port {
        tokio::spawn(async move {
            if let Err(e) = health::serve(port).await {
                log::error!("health endpoint failed: {e:#}");
            }
        });
    }

    log::info!("System ready. Waiting for messages...");
    if let Err(e) = bot::run(config).await {
        log::error!("The bot stopped unexpectedly: {e:#}");
        std::process::exit(1);
    }

    Ok(())
}

fn setup() {
    dotenv().ok();
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info,telegram_ai_assistant=info");
    }
    pretty_env_logger::init();
}
