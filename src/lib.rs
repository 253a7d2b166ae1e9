pub mod ai;
pub mod bot;
pub mod config;
pub mod confirm;
pub mod draft;
pub mod health;
pub mod mailer;
pub mod render;
pub mod store;
