//! Configuration for the bot uploader
//!
//! Everything is read from environment variables. `Config::from_lookup`
//! takes the lookup as a function so tests never touch the process env.

use std::path::{Path, PathBuf};

use crate::chat::ChatTarget;
use crate::error::{Error, Result};
use crate::proxy::{parse_proxy_url, ProxyDescriptor};

/// Session file name, stored next to the executable by default
pub const SESSION_FILE: &str = "tgbot.session";

/// Application credentials used when TELEGRAM_API_ID / TELEGRAM_API_HASH are unset
pub const API_ID: i32 = 611335;
pub const API_HASH: &str = "d524b414d21f4d37f08684c1df41ac9c";

pub const BOT_TOKEN_VAR: &str = "BOT_TOKEN";
pub const CHAT_ID_VAR: &str = "CHAT_ID";

/// Proxy variables in lookup order; the first non-empty one wins.
pub const PROXY_VARS: [&str; 8] = [
    "ALL_PROXY",
    "all_proxy",
    "SOCKS_PROXY",
    "socks_proxy",
    "HTTPS_PROXY",
    "https_proxy",
    "HTTP_PROXY",
    "http_proxy",
];

/// Runtime configuration, built once and passed down the call chain.
#[derive(Clone)]
pub struct Config {
    pub bot_token: String,
    pub chat: ChatTarget,
    pub api_id: i32,
    pub api_hash: String,
    pub proxy: Option<ProxyDescriptor>,
    pub session_path: PathBuf,
    pub use_ipv6: bool,
}

// Hand-written so the token and api hash stay out of logs.
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("chat", &self.chat)
            .field("api_id", &self.api_id)
            .field("proxy", &self.proxy.as_ref().map(ToString::to_string))
            .field("session_path", &self.session_path)
            .field("use_ipv6", &self.use_ipv6)
            .finish_non_exhaustive()
    }
}

impl Config {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// Required variables are checked first so a missing token or chat id
    /// is reported before a broken proxy setting.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bot_token =
            non_empty(&lookup, BOT_TOKEN_VAR).ok_or(Error::MissingConfig(BOT_TOKEN_VAR))?;
        let chat_id = non_empty(&lookup, CHAT_ID_VAR).ok_or(Error::MissingConfig(CHAT_ID_VAR))?;
        let chat = parse_chat_id(&chat_id)?;

        let api_id = match non_empty(&lookup, "TELEGRAM_API_ID") {
            Some(value) => value.trim().parse::<i32>().map_err(|_| {
                Error::InvalidArgument(format!("TELEGRAM_API_ID is not a number: {}", value))
            })?,
            None => API_ID,
        };
        let api_hash = non_empty(&lookup, "TELEGRAM_API_HASH").unwrap_or_else(|| API_HASH.into());

        let proxy = resolve_proxy_url(&lookup)
            .map(|raw| parse_proxy_url(&raw))
            .transpose()?;

        let session_path = match non_empty(&lookup, "TGBOT_SESSION") {
            Some(path) => PathBuf::from(path),
            None => default_session_path(),
        };

        Ok(Self {
            bot_token,
            chat,
            api_id,
            api_hash,
            proxy,
            session_path,
            use_ipv6: true,
        })
    }

    /// Override the session file location.
    pub fn with_session_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.session_path = path.as_ref().to_path_buf();
        self
    }

    pub fn with_ipv6(mut self, use_ipv6: bool) -> Self {
        self.use_ipv6 = use_ipv6;
        self
    }
}

fn non_empty<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).filter(|value| !value.trim().is_empty())
}

/// Return the first non-empty proxy variable, if any.
pub fn resolve_proxy_url<F>(lookup: &F) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    PROXY_VARS.iter().find_map(|key| non_empty(lookup, key))
}

fn parse_chat_id(value: &str) -> Result<ChatTarget> {
    let id = value
        .trim()
        .parse::<i64>()
        .map_err(|_| Error::InvalidChatId(value.to_string()))?;
    ChatTarget::from_marked_id(id)
}

/// `tgbot.session` in the directory of the running executable.
pub fn default_session_path() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
        .join(SESSION_FILE)
}
