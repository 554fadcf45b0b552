mod config;
mod render;

use std::io::Write;
use std::sync::Arc;

use chrono::{Local, Utc};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

use tribe_api::HttpChatApi;
use tribe_store::{ChatStore, SqliteBlobStore};
use tribe_sync::{ChatController, Failure, Notifier, SyncError};

use crate::config::Config;

/// Alerts go to stderr so they are not wiped by the next redraw.
struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn alert(&self, failure: &Failure) {
        eprintln!("!! {}", failure.message);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tribe=debug".into()),
        )
        .init();

    let config = Config::from_env()?;
    info!(
        api = %config.api.base_url,
        db = %config.db_path.display(),
        poll_ms = config.sync.poll_interval.as_millis() as u64,
        "starting tribe-chat"
    );

    let blobs = Arc::new(SqliteBlobStore::open(&config.db_path)?);
    let store = ChatStore::load(blobs);
    let api = Arc::new(HttpChatApi::new(config.api.clone())?);
    let controller = Arc::new(
        ChatController::new(api, store.clone(), Arc::new(TerminalNotifier))
            .with_config(config.sync.clone()),
    );

    let screen = tokio::spawn(redraw_on_change(store.clone()));
    let poller = controller.clone().run().await;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            line = lines.next_line() => match line? {
                Some(line) => {
                    if !handle_line(&controller, &line).await {
                        break;
                    }
                }
                None => break,
            },
        }
    }

    info!("shutting down");
    controller.shutdown();
    poller.stop().await;
    screen.abort();
    store.flush()?;
    Ok(())
}

/// Returns false when the user asked to quit.
async fn handle_line(controller: &ChatController<HttpChatApi>, line: &str) -> bool {
    match line.trim() {
        "/quit" => return false,
        "/refresh" => {
            let _ = controller.refresh().await;
        }
        "/older" => {
            if let Ok(added) = controller.load_older().await {
                info!(added, "older messages loaded");
            }
        }
        text => {
            // Service failures were already alerted; blank input is ignored.
            match controller.send_message(text).await {
                Err(SyncError::SendInProgress) => {
                    eprintln!("!! still sending the previous message")
                }
                Err(err @ SyncError::TooLong { .. }) => eprintln!("!! {err}"),
                _ => {}
            }
        }
    }
    true
}

async fn redraw_on_change(store: ChatStore) {
    let mut revisions = store.subscribe();
    loop {
        let state = store.snapshot();
        let screen = render::render_screen(&state, Utc::now().timestamp_millis(), &Local);

        // Clear and home the cursor before each redraw.
        let written = {
            let mut stdout = std::io::stdout().lock();
            write!(stdout, "\x1b[2J\x1b[H{screen}").and_then(|_| stdout.flush())
        };
        if let Err(err) = written {
            warn!(%err, "redraw failed");
        }

        if revisions.changed().await.is_err() {
            break;
        }
    }
}
