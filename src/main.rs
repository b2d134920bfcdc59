//! tgbot CLI - upload files to a Telegram chat as a bot
//!
//! ```sh
//! BOT_TOKEN=123:abc CHAT_ID=-1001234567890 tgbot build.log report.pdf
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::error::ErrorKind;
use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use tgbot::{commands, Config, Error};

#[derive(Parser)]
#[command(name = "tgbot")]
#[command(about = "Upload files to a Telegram chat with a bot account", long_about = None)]
#[command(version)]
struct Cli {
    /// Session file (default: tgbot.session next to the executable)
    #[arg(long)]
    session: Option<PathBuf>,

    /// Connect over IPv4 only
    #[arg(long, default_value_t = false)]
    no_ipv6: bool,

    /// Files to upload
    #[arg(allow_hyphen_values = true)]
    files: Vec<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tgbot=warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    // Usage errors exit 1 like every other failure; help and version exit 0.
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => err.exit(),
            _ => {
                let _ = err.print();
                return ExitCode::FAILURE;
            }
        },
    };

    match execute(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report(&err);
            ExitCode::FAILURE
        }
    }
}

async fn execute(cli: Cli) -> anyhow::Result<()> {
    println!("[+] Checking environment");
    let mut config = Config::from_env()?.with_ipv6(!cli.no_ipv6);
    if let Some(session) = cli.session {
        config = config.with_session_path(session);
    }
    debug!(?config, "configuration loaded");

    commands::upload_run(&config, &cli.files).await?;
    Ok(())
}

fn report(err: &anyhow::Error) {
    match err.downcast_ref::<Error>() {
        Some(inner) if inner.is_usage() => println!("[-] {}", inner),
        _ => println!("[-] An error occurred: {:#}", err),
    }
}
