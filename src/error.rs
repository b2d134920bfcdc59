//! Error types for the uploader

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid {0}")]
    MissingConfig(&'static str),

    #[error("Invalid CHAT_ID: {0}")]
    InvalidChatId(String),

    #[error("Unsupported proxy scheme: {0}")]
    UnsupportedProxyScheme(String),

    #[error("Invalid proxy URL: {0}")]
    InvalidProxyUrl(String),

    #[error("Proxy type not supported by the transport, use a socks5:// proxy: {0}")]
    UnsupportedProxyType(String),

    #[error("No files to upload")]
    NoFiles,

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Session is locked by another process")]
    SessionLocked,

    #[error("Failed to acquire session lock: {0}")]
    LockError(String),

    #[error("Session error: {0}")]
    SessionError(String),

    #[error("Bot authorization failed: {0}")]
    AuthorizationError(String),

    #[error("Telegram API error: {0}")]
    TelegramError(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Errors caused by the invocation itself rather than by the network
    /// session. These are reported without the generic error prefix.
    pub fn is_usage(&self) -> bool {
        matches!(self, Error::MissingConfig(_) | Error::NoFiles)
    }
}

impl From<grammers_client::InvocationError> for Error {
    fn from(err: grammers_client::InvocationError) -> Self {
        Error::TelegramError(err.to_string())
    }
}
