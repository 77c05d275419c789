use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::debug;

use crate::args::DownloadOptions;
use ytdlpgui_core::{
    events::SessionEvent,
    session::is_validation,
    title::YtDlpTitleResolver,
    AppState, DownloadSession,
};
use ytdlpgui_launch::TerminalLauncher;

pub async fn run(url: &str, options: &DownloadOptions, state: &mut AppState) -> Result<()> {
    let request = options.to_request(url);
    if request.url != url.trim() {
        println!("Query parameters removed: {}", request.url);
    }
    debug!("Download request: {:?}", request);

    // Create event channel
    let (tx, mut rx) = mpsc::unbounded_channel::<SessionEvent>();

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::with_template("{spinner:.cyan} [{elapsed_precise}] {msg}")?);
    pb.enable_steady_tick(Duration::from_millis(100));

    // Spawn event handler
    let progress_handle = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            match event {
                SessionEvent::ResolvingTitle { .. } => pb.set_message(event.to_string()),
                SessionEvent::Launched => pb.finish_with_message(event.to_string()),
                // reported below from the returned error
                SessionEvent::Rejected { .. } => pb.finish_and_clear(),
                ref e if e.is_warning() => pb.println(format!("Warning: {}", e)),
                e => pb.println(e.to_string()),
            }
        }
        if !pb.is_finished() {
            pb.finish_and_clear();
        }
    });

    let resolver = YtDlpTitleResolver::default();
    let launcher = TerminalLauncher::default();
    let result = DownloadSession::new(&resolver, &launcher, &tx)
        .run(state, &request)
        .await;

    // Close the channel so the handler drains and exits
    drop(tx);
    progress_handle.await?;

    match result {
        Ok(_) => Ok(()),
        Err(e) if is_validation(&e) => {
            eprintln!("Error: {}", e);
            std::process::exit(2);
        }
        Err(e) => {
            eprintln!("\nError: {}", e);
            Err(e.into())
        }
    }
}
