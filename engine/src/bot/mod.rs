//! Telegram transport
//!
//! [`webhook`] receives updates over HTTP and hands them to the orchestrator;
//! [`telegram`] sends the replies back.

pub mod telegram;
pub mod webhook;

pub use telegram::TelegramClient;
pub use webhook::{router, serve, WebhookState};
