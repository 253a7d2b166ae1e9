use anyhow::{anyhow, Context, Result};
use std::env;

/// Everything the bot needs from the environment, validated once at startup.
/// Components receive the pieces they need by reference; nothing reads the
/// environment after this.
#[derive(Clone)]
pub struct Config {
    pub bot_token: String,
    pub gemini_api_key: String,
    pub email_address: String,
    pub email_password: String,
    pub recipient_email: String,
    pub smtp_host: String,
    pub health_port: Option<u16>,
}

const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";

impl Config {
    pub fn from_env() -> Result<Self> {
        let health_port = match env::var("PORT") {
            Ok(raw) => Some(
                raw.parse::<u16>()
                    .with_context(|| format!("'PORT' is not a valid port number: {raw}"))?,
            ),
            Err(_) => None,
        };

        Ok(Self {
            bot_token: required("TELEGRAM_BOT_TOKEN")?,
            gemini_api_key: required("GEMINI_API_KEY")?,
            email_address: required("EMAIL_ADDRESS")?,
            email_password: required("EMAIL_PASSWORD")?,
            recipient_email: required("RECIPIENT_EMAIL")?,
            smtp_host: env::var("SMTP_HOST").unwrap_or_else(|_| DEFAULT_SMTP_HOST.to_string()),
            health_port,
        })
    }
}

fn required(name: &str) -> Result<String> {
    env::var(name).map_err(|_| {
        anyhow!(
            "Missing environment variable '{name}'.\n\
             👉 Create a '.env' file based on '.env.example' and set it there."
        )
    })
}
