//! Progress events emitted while a download is prepared

use std::fmt;
use std::path::PathBuf;
use tokio::sync::mpsc;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    ResolvingTitle { url: String },
    TitleResolved { title: String },
    TitleUnresolved,
    HistoryUpdated { url: String },
    TagRegistered { tag: String },
    CookieStaged { source: PathBuf },
    CookieLooksEmpty { path: PathBuf },
    DownloadDirectory { path: PathBuf },
    CommandReady { rendered: String },
    Launched,
    Rejected { reason: String },
}

impl SessionEvent {
    pub fn is_warning(&self) -> bool {
        matches!(
            self,
            SessionEvent::TitleUnresolved | SessionEvent::CookieLooksEmpty { .. } | SessionEvent::Rejected { .. }
        )
    }
}

impl fmt::Display for SessionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionEvent::ResolvingTitle { url } => write!(f, "Getting video information for {}", url),
            SessionEvent::TitleResolved { title } => write!(f, "Video title: {}", title),
            SessionEvent::TitleUnresolved => write!(f, "Could not resolve the video title, downloading anyway"),
            SessionEvent::HistoryUpdated { url } => write!(f, "Added to history: {}", url),
            SessionEvent::TagRegistered { tag } => write!(f, "New tag: {}", tag),
            SessionEvent::CookieStaged { source } => write!(
                f,
                "Using cookies from {} (copied to a temp file to prevent modification)",
                source.display()
            ),
            SessionEvent::CookieLooksEmpty { path } => write!(
                f,
                "{} appears to be empty or only contains comments. Please add your cookies",
                path.display()
            ),
            SessionEvent::DownloadDirectory { path } => {
                write!(f, "Files will be downloaded to: {}", path.display())
            }
            SessionEvent::CommandReady { rendered } => write!(f, "Running: {}", rendered),
            SessionEvent::Launched => write!(f, "Download started in a separate terminal window"),
            SessionEvent::Rejected { reason } => write!(f, "Error: {}", reason),
        }
    }
}

/// Receives session events in emission order. Must not block.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: SessionEvent);
}

/// Queue for a front-end that drains events on its own schedule.
impl EventSink for mpsc::UnboundedSender<SessionEvent> {
    fn emit(&self, event: SessionEvent) {
        // receiver gone means nobody is watching any more
        let _ = self.send(event);
    }
}

/// Forwards events to the log: warnings at `warn`, everything else at `info`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&self, event: SessionEvent) {
        if event.is_warning() {
            warn!("{}", event);
        } else {
            info!("{}", event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::{Arc, Mutex};

    #[derive(Clone)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl io::Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_tracing_sink_levels() {
        let buf = SharedBuf(Arc::new(Mutex::new(Vec::new())));
        let writer = buf.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .without_time()
            .with_max_level(tracing::Level::INFO)
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            let sink: &dyn EventSink = &TracingSink;
            sink.emit(SessionEvent::TitleUnresolved);
            sink.emit(SessionEvent::Launched);
        });

        let out = String::from_utf8(buf.0.lock().unwrap().clone()).unwrap();
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("WARN"));
        assert!(lines[0].contains("Could not resolve the video title"));
        assert!(lines[1].contains("INFO"));
        assert!(lines[1].contains("Download started in a separate terminal window"));
    }

    #[test]
    fn test_channel_sink_preserves_order() {
        let (tx, mut rx) = mpsc::unbounded_channel::<SessionEvent>();
        tx.emit(SessionEvent::TitleUnresolved);
        tx.emit(SessionEvent::Launched);

        assert_eq!(rx.try_recv().unwrap(), SessionEvent::TitleUnresolved);
        assert_eq!(rx.try_recv().unwrap(), SessionEvent::Launched);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_closed_channel_does_not_panic() {
        let (tx, rx) = mpsc::unbounded_channel::<SessionEvent>();
        drop(rx);
        tx.emit(SessionEvent::Launched);
    }

    #[test]
    fn test_display() {
        let event = SessionEvent::CommandReady {
            rendered: "yt-dlp U -U".to_string(),
        };
        assert_eq!(event.to_string(), "Running: yt-dlp U -U");
        assert!(SessionEvent::Rejected { reason: "x".into() }.is_warning());
        assert!(!event.is_warning());
    }
}
