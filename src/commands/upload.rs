//! Upload files to the configured chat
//!
//! One session per run: lock, connect, sign in, send the files as photos
//! and documents grouped into albums, disconnect.

use std::path::{Path, PathBuf};

use grammers_client::{Client, InputMedia, InputMessage};
use tracing::{debug, info};

use crate::chat::ChatTarget;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::session::{BotClient, SessionLock};

/// Make sure there is something to send and every path is a readable file.
pub fn check_files(files: &[PathBuf]) -> Result<()> {
    if files.is_empty() {
        return Err(Error::NoFiles);
    }

    for path in files {
        if !path.is_file() {
            return Err(Error::FileNotFound(path.display().to_string()));
        }
    }

    Ok(())
}

/// Human readable file list for the progress output.
pub fn describe_files(files: &[PathBuf]) -> String {
    let names: Vec<String> = files
        .iter()
        .map(|path| format!("'{}'", path.display()))
        .collect();
    format!("[{}]", names.join(", "))
}

/// Telegram caps an album at ten items.
pub const ALBUM_LIMIT: usize = 10;

/// How a file is presented in the chat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    /// Compressed inline image
    Photo,
    /// Sent as-is, with its file name
    Document,
}

impl MediaKind {
    /// JPEG and PNG images go out as photos, everything else as a document.
    pub fn of(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("jpg" | "jpeg" | "png") => MediaKind::Photo,
            _ => MediaKind::Document,
        }
    }
}

/// Files that go out together: one message, or one album when more than one.
#[derive(Debug, PartialEq, Eq)]
pub struct Batch<'a> {
    pub kind: MediaKind,
    pub files: Vec<&'a Path>,
}

/// Group files into albums in command-line order. Photos and documents
/// cannot share an album, so each run of one kind is split into chunks
/// of at most [`ALBUM_LIMIT`].
pub fn plan_batches(files: &[PathBuf]) -> Vec<Batch<'_>> {
    let mut batches: Vec<Batch<'_>> = Vec::new();
    for path in files {
        let kind = MediaKind::of(path);
        match batches.last_mut() {
            Some(batch) if batch.kind == kind && batch.files.len() < ALBUM_LIMIT => {
                batch.files.push(path)
            }
            _ => batches.push(Batch {
                kind,
                files: vec![path.as_path()],
            }),
        }
    }
    batches
}

async fn send_batch(client: &Client, target: &ChatTarget, batch: &Batch<'_>) -> Result<()> {
    let mut uploaded = Vec::with_capacity(batch.files.len());
    for path in &batch.files {
        uploaded.push(client.upload_file(path).await?);
        debug!(file = %path.display(), "uploaded");
    }

    if uploaded.len() == 1 {
        let file = uploaded.remove(0);
        let message = match batch.kind {
            MediaKind::Photo => InputMessage::from("").photo(file),
            MediaKind::Document => InputMessage::from("").document(file),
        };
        client.send_message(target.peer_ref(), message).await?;
    } else {
        let album = uploaded
            .into_iter()
            .map(|file| match batch.kind {
                MediaKind::Photo => InputMedia::new().caption("").photo(file),
                MediaKind::Document => InputMedia::new().caption("").document(file),
            })
            .collect();
        client.send_album(target.peer_ref(), album).await?;
    }
    Ok(())
}

/// Send files in order, grouped into albums. Stops at the first error.
pub async fn send_files(client: &Client, target: &ChatTarget, files: &[PathBuf]) -> Result<usize> {
    let mut sent = 0;
    for batch in plan_batches(files) {
        send_batch(client, target, &batch).await?;
        sent += batch.files.len();
        info!(
            kind = ?batch.kind,
            chat = target.marked_id(),
            "sent {}/{}",
            sent,
            files.len()
        );
    }
    Ok(sent)
}

/// CLI entry point
pub async fn run(config: &Config, files: &[PathBuf]) -> Result<()> {
    println!("[+] Uploading to telegram");
    check_files(files)?;
    println!("[+] Files: {}", describe_files(files));

    match &config.proxy {
        Some(proxy) => println!("[+] Using proxy: {}", proxy),
        None => println!("[+] Using proxy: None"),
    }

    let _lock = SessionLock::acquire(&config.session_path)?;

    println!("[+] Logging in Telegram with bot");
    let client = BotClient::connect(config).await?;

    let result = sign_in_and_send(&client, config, files).await;
    client.disconnect().await;
    result?;

    println!("[+] Done!");
    Ok(())
}

async fn sign_in_and_send(client: &BotClient, config: &Config, files: &[PathBuf]) -> Result<()> {
    client.sign_in(&config.bot_token, &config.api_hash).await?;

    println!("[+] Sending");
    let sent = send_files(client, &config.chat, files).await?;
    debug!(sent, "all files sent");
    Ok(())
}
