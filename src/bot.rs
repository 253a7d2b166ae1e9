use anyhow::Result;
use std::sync::Arc;
use teloxide::prelude::*;
use teloxide::types::{ChatAction, ParseMode};
use teloxide::utils::command::BotCommands;

use crate::ai::{AIClient, FALLBACK_REPLY};
use crate::config::Config;
use crate::confirm;
use crate::draft::{self, DraftError};
use crate::mailer::{MailTransport, SmtpMailer};
use crate::render;
use crate::store::{DraftStore, InMemoryDraftStore};

/// Shared bot state, built once at startup and injected into every handler.
pub struct BotState {
    pub ai: AIClient,
    pub store: Arc<dyn DraftStore>,
    pub mailer: Arc<dyn MailTransport>,
    pub recipient: String,
}

#[derive(BotCommands, Clone)]
#[command(rename_rule = "lowercase", description = "Supported commands:")]
enum Command {
    #[command(description = "show the welcome message")]
    Start,
    #[command(description = "show this help message")]
    Help,
    #[command(description = "format a snippet as a code block")]
    Code(String),
    #[command(description = "draft an email: /mail Subject ⏎ Body")]
    Mail(String),
}

const MAIL_USAGE: &str = "Usage: /mail Subject Line\nBody of the email...";
const CODE_USAGE: &str = "Please provide some code after the /code command.";

/// Starts the Telegram dispatcher and blocks until shutdown.
pub async fn run(config: Config) -> Result<()> {
    let bot = Bot::new(config.bot_token.clone());

    let state = Arc::new(BotState {
        ai: AIClient::new(&config.gemini_api_key)?,
        store: Arc::new(InMemoryDraftStore::new()),
        mailer: Arc::new(SmtpMailer::new(&config)?),
        recipient: config.recipient_email.clone(),
    });

    log::info!("Starting the Telegram dispatcher...");

    let handler = dptree::entry()
        .branch(
            Update::filter_message()
                .branch(
                    dptree::entry()
                        .filter_command::<Command>()
                        .endpoint(handle_command),
                )
                .branch(dptree::entry().endpoint(handle_text_message)),
        )
        .branch(Update::filter_callback_query().endpoint(handle_callback));

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![state])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}

async fn handle_command(
    bot: Bot,
    msg: Message,
    cmd: Command,
    state: Arc<BotState>,
) -> ResponseResult<()> {
    match cmd {
        Command::Start => handle_start(bot, msg).await,
        Command::Help => {
            bot.send_message(msg.chat.id, Command::descriptions().to_string())
                .await?;
            Ok(())
        }
        Command::Code(snippet) => handle_code(bot, msg, snippet).await,
        Command::Mail(content) => handle_mail(bot, msg, content, state).await,
    }
}

async fn handle_start(bot: Bot, msg: Message) -> ResponseResult<()> {
    let user_name = msg
        .from()
        .map(|u| u.first_name.clone())
        .unwrap_or_else(|| "there".to_string());

    let welcome = format!(
        "👋 Hello, {user_name}! I am an AI assistant.\n\n\
         Here's what I can do:\n\
         - Chat with me normally.\n\
         - /code your code here — format code.\n\
         - /mail Your Subject ⏎ Your body... — draft an email, then confirm to send it."
    );

    bot.send_message(msg.chat.id, welcome).await?;
    Ok(())
}

async fn handle_code(bot: Bot, msg: Message, snippet: String) -> ResponseResult<()> {
    if snippet.trim().is_empty() {
        bot.send_message(msg.chat.id, CODE_USAGE).await?;
        return Ok(());
    }

    let formatted = render::code_block(&snippet);
    let sent = bot
        .send_message(msg.chat.id, formatted)
        .parse_mode(ParseMode::MarkdownV2)
        .await;

    // Telegram rejects some snippets under MarkdownV2; fall back to plain text.
    if let Err(e) = sent {
        log::warn!("formatted code rejected by Telegram: {e}");
        bot.send_message(msg.chat.id, format!("Here is your code:\n\n{snippet}"))
            .await?;
    }

    Ok(())
}

async fn handle_mail(
    bot: Bot,
    msg: Message,
    content: String,
    state: Arc<BotState>,
) -> ResponseResult<()> {
    let Some(user) = msg.from() else {
        return Ok(());
    };

    let draft = match draft::build(&content) {
        Ok(draft) => draft,
        Err(DraftError::EmptyInput) => {
            bot.send_message(msg.chat.id, MAIL_USAGE).await?;
            return Ok(());
        }
    };

    // The draft must be in the store before the message carrying the button
    // goes out, otherwise the control could fire against an empty store.
    let replaced = state.store.put(user.id.0, draft.clone()).await;
    if replaced.is_some() {
        bot.send_message(
            msg.chat.id,
            "♻️ Your previous draft was replaced by this one.",
        )
        .await?;
    }

    let (preview, keyboard) = render::present(&draft, &user.first_name, &state.recipient);
    bot.send_message(msg.chat.id, preview)
        .parse_mode(ParseMode::MarkdownV2)
        .reply_markup(keyboard)
        .await?;

    Ok(())
}

async fn handle_text_message(bot: Bot, msg: Message, state: Arc<BotState>) -> ResponseResult<()> {
    let Some(text) = msg.text() else {
        return Ok(());
    };
    // Unrecognized slash-commands are not chat input.
    if text.starts_with('/') {
        return Ok(());
    }

    bot.send_chat_action(msg.chat.id, ChatAction::Typing)
        .await?;

    let reply = match state.ai.complete(text).await {
        Ok(reply) => reply,
        Err(e) => {
            log::error!("generative API call failed: {e}");
            FALLBACK_REPLY.to_string()
        }
    };

    bot.send_message(msg.chat.id, reply).await?;
    Ok(())
}

async fn handle_callback(bot: Bot, q: CallbackQuery, state: Arc<BotState>) -> ResponseResult<()> {
    // Acknowledge first so the client stops spinning and does not retry the
    // same control while the relay call is in flight.
    bot.answer_callback_query(q.id.clone()).await?;

    if q.data.as_deref() != Some(render::CONFIRM_SEND) {
        return Ok(());
    }

    let outcome =
        confirm::confirm_send(state.store.as_ref(), state.mailer.as_ref(), q.from.id.0).await;

    match q.message {
        Some(message) => {
            bot.edit_message_text(message.chat.id, message.id, outcome.user_text())
                .await?;
        }
        None => {
            bot.send_message(ChatId(q.from.id.0 as i64), outcome.user_text())
                .await?;
        }
    }

    Ok(())
}
