//! Video title lookup ahead of a download

use async_trait::async_trait;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// How long yt-dlp gets to print a title.
pub const TITLE_TIMEOUT: Duration = Duration::from_secs(15);

#[async_trait]
pub trait TitleResolver: Send + Sync {
    /// Run a title-resolution argv. `None` means "no title", never an error.
    async fn resolve(&self, argv: &[String]) -> Option<String>;
}

/// Runs `yt-dlp --print %(title)s --no-download` and reads stdout.
#[derive(Debug, Clone)]
pub struct YtDlpTitleResolver {
    timeout: Duration,
}

impl Default for YtDlpTitleResolver {
    fn default() -> Self {
        Self::new(TITLE_TIMEOUT)
    }
}

impl YtDlpTitleResolver {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

#[async_trait]
impl TitleResolver for YtDlpTitleResolver {
    async fn resolve(&self, argv: &[String]) -> Option<String> {
        let (program, args) = argv.split_first()?;
        info!("Getting video information...");

        let mut cmd = Command::new(program);
        cmd.args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        #[cfg(windows)]
        {
            // CREATE_NO_WINDOW
            cmd.creation_flags(0x0800_0000);
        }

        let output = match timeout(self.timeout, cmd.output()).await {
            Err(_) => {
                warn!("Timeout getting video title after {}s", self.timeout.as_secs_f32());
                return None;
            }
            Ok(Err(e)) => {
                warn!("Could not get video title: {}", e);
                return None;
            }
            Ok(Ok(output)) => output,
        };

        if !output.status.success() {
            debug!("yt-dlp stderr: {}", String::from_utf8_lossy(&output.stderr));
            warn!("yt-dlp failed with exit code {:?} while getting the title", output.status.code());
            return None;
        }

        parse_title(&String::from_utf8_lossy(&output.stdout))
    }
}

/// First non-blank line of `--print` output (playlists print one per item).
pub fn parse_title(stdout: &str) -> Option<String> {
    stdout
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .map(str::to_string)
}
