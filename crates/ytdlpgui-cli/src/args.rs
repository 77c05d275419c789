use clap::{Parser, Subcommand};
use std::path::PathBuf;
use ytdlpgui_core::command::DEFAULT_PROXY;
use ytdlpgui_core::history::RECENT_LIMIT;
use ytdlpgui_core::url::strip_query;
use ytdlpgui_core::{DownloadRequest, Rename};

#[derive(Parser)]
#[command(name = "ytdlpgui")]
#[command(author, version, about = "yt-dlp front-end with download history, rename tags and cookie handling")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Media URL to download (shorthand for `download <URL>`)
    #[arg(value_name = "URL")]
    pub url: Option<String>,

    #[command(flatten)]
    pub options: DownloadOptions,

    /// Verbose output (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Directory holding settings.ini, download_history.json, tags.json and cookie.txt
    #[arg(long, global = true, value_name = "DIR", env = "YTDLPGUI_DATA_DIR")]
    pub data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Download a URL in a new terminal window
    Download {
        /// Media URL
        url: String,

        #[command(flatten)]
        options: DownloadOptions,
    },

    /// Recently downloaded URLs
    History {
        #[command(subcommand)]
        action: Option<HistoryAction>,
    },

    /// Tags used when renaming downloads
    Tags {
        #[command(subcommand)]
        action: Option<TagsAction>,
    },

    /// Download directory and yt-dlp location
    Settings {
        #[command(subcommand)]
        action: Option<SettingsAction>,
    },

    /// The cookie.txt handed to yt-dlp with --cookie
    Cookie {
        #[command(subcommand)]
        action: Option<CookieAction>,
    },

    /// Open the download folder
    Open,

    /// Check that yt-dlp and ffmpeg are installed
    Doctor,
}

#[derive(Subcommand)]
pub enum HistoryAction {
    /// Most recent downloads first
    List {
        /// Number of entries to show (at most 50)
        #[arg(short = 'n', long, default_value_t = RECENT_LIMIT)]
        limit: usize,
    },
    /// Print the URL at a position of `history list`
    Get {
        /// 1-based position
        index: usize,
    },
    /// Delete all history
    Clear {
        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum TagsAction {
    /// All tags, oldest first
    List,
    /// Tags starting with PREFIX, as offered while renaming
    Suggest {
        prefix: Option<String>,
    },
    /// Pick a numbered entry of `tags suggest`
    Select {
        /// 1-based position
        index: usize,
        /// Only suggestions starting with this prefix
        #[arg(long)]
        prefix: Option<String>,
        /// Do not ask for confirmation when picking "clear all tags"
        #[arg(short, long)]
        yes: bool,
    },
    /// Delete all tags
    Clear {
        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum SettingsAction {
    /// Print the settings in effect
    Show,
    /// Create settings.ini if needed, open it in an editor, then reload it
    Edit,
    /// Print the location of settings.ini
    Path,
}

#[derive(Subcommand)]
pub enum CookieAction {
    /// Create cookie.txt if needed and open it in an editor
    Edit,
    /// Print the location of cookie.txt
    Path,
}

#[derive(clap::Args, Clone, Debug, Default)]
pub struct DownloadOptions {
    /// Use a proxy; `--proxy` alone means 127.0.0.1:7890
    #[arg(
        short,
        long,
        value_name = "ADDR",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = DEFAULT_PROXY
    )]
    pub proxy: Option<String>,

    /// Pass cookie.txt to yt-dlp
    #[arg(short, long)]
    pub cookie: bool,

    /// Merge the best mp4 video and m4a audio into an mp4
    #[arg(long)]
    pub mp4: bool,

    /// Extract audio as mp3
    #[arg(long)]
    pub mp3: bool,

    /// Output file name without extension (defaults to the video title)
    #[arg(short, long, value_name = "NAME")]
    pub rename: Option<String>,

    /// Tag appended to the file name as `#TAG`
    #[arg(short, long)]
    pub tag: Option<String>,

    /// Keep the query string (`?...`) of the URL
    #[arg(long)]
    pub keep_query: bool,
}

impl DownloadOptions {
    /// Snapshot the flags into a request for `url`.
    pub fn to_request(&self, url: &str) -> DownloadRequest {
        let url = url.trim();
        let url = if self.keep_query { url } else { strip_query(url) };

        let rename = (self.rename.is_some() || self.tag.is_some()).then(|| Rename {
            base_name: self.rename.clone().unwrap_or_default(),
            tag: self.tag.clone().unwrap_or_default(),
        });

        DownloadRequest {
            url: url.to_string(),
            use_proxy: self.proxy.is_some(),
            proxy_address: self.proxy.clone().unwrap_or_default(),
            use_cookie: self.cookie,
            want_mp4: self.mp4,
            want_mp3: self.mp3,
            rename,
        }
    }
}
