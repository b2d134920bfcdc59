//! Telegram bot file uploader
//!
//! This library provides the pieces behind the `tgbot` binary:
//! - Environment configuration (bot token, destination chat, proxy)
//! - Proxy URL parsing for HTTP, SOCKS4 and SOCKS5 proxies
//! - Bot session handling over MTProto with a persistent session file
//! - Uploading files to a chat as documents

pub mod chat;
pub mod config;
pub mod error;
pub mod proxy;
pub mod session;

// Re-export common types
pub use chat::ChatTarget;
pub use config::Config;
pub use error::{Error, Result};
pub use proxy::{parse_proxy_url, ProxyDescriptor, ProxyType};
pub use session::{BotClient, SessionLock};

pub mod commands;
