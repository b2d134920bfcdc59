//! Session management for the bot client
//!
//! Provides:
//! - File-based session locking so two runs never share the session file
//! - Client creation with proxy and IPv6 settings
//! - Bot sign-in that reuses a cached authorization

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use fs2::FileExt;
use grammers_client::client::updates::UpdatesLike;
use grammers_client::Client;
use grammers_mtsender::{ConnectionParams, SenderPool, SenderPoolHandle};
use grammers_session::storages::SqliteSession;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{Error, Result};

/// Lock file path for a given session file (`tgbot.session.lock`).
pub fn lock_path(session_path: &Path) -> PathBuf {
    let mut name = session_path.as_os_str().to_os_string();
    name.push(".lock");
    PathBuf::from(name)
}

/// Session lock guard that ensures exclusive access to the session file.
pub struct SessionLock {
    path: PathBuf,
    lock_file: Option<File>,
}

impl SessionLock {
    /// Acquire an exclusive lock next to `session_path`.
    pub fn acquire(session_path: &Path) -> Result<Self> {
        let path = lock_path(session_path);
        let lock_file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&path)
            .map_err(|e| Error::LockError(format!("Failed to open lock file: {}", e)))?;

        match lock_file.try_lock_exclusive() {
            Ok(()) => {
                debug!(path = %path.display(), "session lock acquired");
                Ok(Self {
                    path,
                    lock_file: Some(lock_file),
                })
            }
            Err(_) => {
                eprintln!(
                    "[-] Session {} is in use by another upload, try again when it finishes",
                    session_path.display()
                );
                Err(Error::SessionLocked)
            }
        }
    }

    /// Release the lock manually
    pub fn release(&mut self) {
        if let Some(file) = self.lock_file.take() {
            let _ = file.unlock();
            let _ = std::fs::remove_file(&self.path);
        }
    }
}

impl Drop for SessionLock {
    fn drop(&mut self) {
        self.release();
    }
}

/// Open (or create) the SQLite session file.
pub fn open_session(path: &Path) -> Result<Arc<SqliteSession>> {
    let session = SqliteSession::open(path).map_err(|e| {
        Error::SessionError(format!("Failed to open {}: {}", path.display(), e))
    })?;
    Ok(Arc::new(session))
}

/// Connection settings handed to the sender pool.
///
/// The transport only tunnels through SOCKS5, so HTTP and SOCKS4 proxies
/// are refused here, before any connection is attempted.
pub fn connection_params(config: &Config) -> Result<ConnectionParams> {
    let proxy_url = match &config.proxy {
        Some(proxy) if !proxy.is_tunnelable() => {
            return Err(Error::UnsupportedProxyType(proxy.to_string()));
        }
        Some(proxy) => Some(proxy.to_url()),
        None => None,
    };

    Ok(ConnectionParams {
        use_ipv6: config.use_ipv6,
        proxy_url,
        ..Default::default()
    })
}

/// Numeric bot id encoded before the colon of a bot token.
pub fn token_bot_id(bot_token: &str) -> Option<i64> {
    bot_token.split_once(':')?.0.parse().ok()
}

/// Connected client plus the pool runner that drives it.
pub struct BotClient {
    client: Client,
    handle: SenderPoolHandle,
    _session: Arc<SqliteSession>,
    _updates: mpsc::UnboundedReceiver<UpdatesLike>,
    runner: JoinHandle<()>,
}

impl BotClient {
    /// Open the session and start the network runner.
    pub async fn connect(config: &Config) -> Result<Self> {
        let params = connection_params(config)?;
        let session = open_session(&config.session_path)?;
        let pool = SenderPool::with_configuration(session.clone(), config.api_id, params);

        let client = Client::new(&pool);

        let SenderPool {
            runner,
            updates,
            handle,
        } = pool;

        let runner = tokio::spawn(async move {
            runner.run().await;
        });

        debug!(session = %config.session_path.display(), "sender pool started");

        Ok(Self {
            client,
            handle,
            _session: session,
            _updates: updates,
            runner,
        })
    }

    /// Sign in with the bot token unless the cached session is already
    /// authorized.
    pub async fn sign_in(&self, bot_token: &str, api_hash: &str) -> Result<()> {
        if self.client.is_authorized().await? {
            let me = self.client.get_me().await?;
            let cached_id = me.raw.id();
            match token_bot_id(bot_token) {
                Some(token_id) if token_id != cached_id => warn!(
                    cached_id,
                    token_id, "session belongs to a different bot than BOT_TOKEN, reusing it anyway"
                ),
                _ => info!(bot = ?me.username(), "reusing cached bot authorization"),
            }
            return Ok(());
        }

        let me = self
            .client
            .bot_sign_in(bot_token, api_hash)
            .await
            .map_err(|e| Error::AuthorizationError(e.to_string()))?;
        info!(bot = ?me.username(), "signed in as bot");
        Ok(())
    }

    /// Ask the pool to quit and wait for the runner to finish.
    /// The SQLite session persists on its own.
    pub async fn disconnect(self) {
        self.handle.quit();
        let _ = self.runner.await;
        debug!("sender pool stopped");
    }
}

impl std::ops::Deref for BotClient {
    type Target = Client;

    fn deref(&self) -> &Self::Target {
        &self.client
    }
}
