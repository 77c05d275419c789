//! Argument vectors for yt-dlp

use crate::cookie::{CookieJar, StagedCookie};
use crate::error::{CookieError, GuiError, ValidationError};
use crate::settings::Settings;
use crate::tags::TagStore;
use tracing::{debug, warn};

/// Prefer mp4 video with m4a audio, then any mp4, then anything.
pub const MP4_FORMAT: &str = "bestvideo[ext=mp4]+bestaudio[ext=m4a]/best[ext=mp4]/best";
pub const DEFAULT_OUTPUT_TEMPLATE: &str = "%(title)s-%(id)s.%(ext)s";
pub const TITLE_FIELD: &str = "%(title)s";
pub const DEFAULT_PROXY: &str = "127.0.0.1:7890";

/// Custom output name: `<base_name>#<tag>.<ext>`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Rename {
    /// Empty means "use the video title"
    pub base_name: String,
    pub tag: String,
}

/// Snapshot of the download form at the moment the download is started.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DownloadRequest {
    pub url: String,
    pub use_proxy: bool,
    pub proxy_address: String,
    pub use_cookie: bool,
    pub want_mp4: bool,
    pub want_mp3: bool,
    /// `None` when renaming is switched off
    pub rename: Option<Rename>,
}

impl DownloadRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn with_proxy(mut self, address: impl Into<String>) -> Self {
        self.use_proxy = true;
        self.proxy_address = address.into();
        self
    }

    pub fn with_cookie(mut self) -> Self {
        self.use_cookie = true;
        self
    }

    pub fn mp4(mut self) -> Self {
        self.want_mp4 = true;
        self
    }

    pub fn mp3(mut self) -> Self {
        self.want_mp3 = true;
        self
    }

    pub fn renamed(mut self, base_name: impl Into<String>, tag: impl Into<String>) -> Self {
        self.rename = Some(Rename {
            base_name: base_name.into(),
            tag: tag.into(),
        });
        self
    }

    fn proxy(&self) -> Option<&str> {
        let address = self.proxy_address.trim();
        (self.use_proxy && !address.is_empty()).then_some(address)
    }
}

/// An argument vector plus the cookie copy it refers to.
#[derive(Debug)]
pub struct BuiltCommand {
    pub argv: Vec<String>,
    /// Removed when dropped; see [`BuiltCommand::detach`]
    pub cookie: Option<StagedCookie>,
    /// Tag registered by this build, if it was new
    pub new_tag: Option<String>,
}

impl BuiltCommand {
    /// Hand over the argv for a process we will not wait for, leaving the
    /// cookie copy on disk.
    pub fn detach(self) -> Result<Vec<String>, CookieError> {
        if let Some(cookie) = self.cookie {
            let kept = cookie.keep()?;
            debug!("Cookie copy kept at {}", kept.display());
        }
        Ok(self.argv)
    }
}

/// Replace characters that are invalid in file names on any platform.
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*' => '_',
            _ => c,
        })
        .collect()
}

/// The `-o` value for a request and the tag it uses, if any.
pub fn output_template(rename: Option<&Rename>) -> (String, Option<&str>) {
    let Some(rename) = rename else {
        return (DEFAULT_OUTPUT_TEMPLATE.to_string(), None);
    };
    let base = rename.base_name.trim();
    let tag = rename.tag.trim();
    if base.is_empty() && tag.is_empty() {
        return (DEFAULT_OUTPUT_TEMPLATE.to_string(), None);
    }

    let mut name = if base.is_empty() { TITLE_FIELD.to_string() } else { base.to_string() };
    let tag = (!tag.is_empty()).then(|| {
        name.push('#');
        name.push_str(tag);
        tag
    });
    (format!("{}.%(ext)s", sanitize_filename(&name)), tag)
}

/// Builds yt-dlp invocations from a request and the current settings.
#[derive(Debug, Clone, Copy)]
pub struct CommandBuilder<'a> {
    settings: &'a Settings,
    cookies: &'a CookieJar,
}

impl<'a> CommandBuilder<'a> {
    pub fn new(settings: &'a Settings, cookies: &'a CookieJar) -> Self {
        Self { settings, cookies }
    }

    /// Everything that would make [`download_command`](Self::download_command)
    /// reject the request, checked without side effects.
    pub fn validate(&self, request: &DownloadRequest) -> Result<(), ValidationError> {
        if request.url.trim().is_empty() {
            return Err(ValidationError::EmptyUrl);
        }
        if request.use_proxy && request.proxy().is_none() {
            return Err(ValidationError::EmptyProxy);
        }
        if request.use_cookie {
            self.cookies.require()?;
        }
        Ok(())
    }

    /// `--print %(title)s --no-download`, decorated like the download.
    ///
    /// Lenient: a missing proxy address or cookie file is skipped, not an
    /// error, since a failed title lookup only costs the history title.
    pub fn title_command(&self, request: &DownloadRequest) -> BuiltCommand {
        let mut argv = vec![
            self.settings.ytdlp_path.clone(),
            request.url.clone(),
            "--print".to_string(),
            TITLE_FIELD.to_string(),
            "--no-download".to_string(),
        ];

        if let Some(proxy) = request.proxy() {
            argv.extend(["--proxy".to_string(), proxy.to_string()]);
        }

        let mut cookie = None;
        if request.use_cookie && self.cookies.exists() {
            match self.cookies.stage() {
                Ok(staged) => {
                    argv.extend(["--cookies".to_string(), staged.path().display().to_string()]);
                    cookie = Some(staged);
                }
                Err(e) => warn!("Title lookup without cookies: {}", e),
            }
        }

        BuiltCommand {
            argv,
            cookie,
            new_tag: None,
        }
    }

    /// The full download invocation. Registers the rename tag in `tags`.
    pub fn download_command(
        &self,
        request: &DownloadRequest,
        tags: &mut TagStore,
    ) -> Result<BuiltCommand, GuiError> {
        if request.url.trim().is_empty() {
            return Err(ValidationError::EmptyUrl.into());
        }
        let mut argv = vec![self.settings.ytdlp_path.clone(), request.url.clone()];

        if request.use_proxy {
            let proxy = request.proxy().ok_or(ValidationError::EmptyProxy)?;
            argv.extend(["--proxy".to_string(), proxy.to_string()]);
        }

        let mut cookie = None;
        if request.use_cookie {
            self.cookies.require()?;
            let staged = self.cookies.stage()?;
            if staged.looks_empty() {
                warn!(
                    "{} appears to be empty or only contains comments. Please add your cookies",
                    self.cookies.path().display()
                );
            }
            argv.extend(["--cookies".to_string(), staged.path().display().to_string()]);
            cookie = Some(staged);
        }

        argv.push("-U".to_string());

        if request.want_mp4 {
            argv.extend([
                "-f".to_string(),
                MP4_FORMAT.to_string(),
                "--merge-output-format".to_string(),
                "mp4".to_string(),
            ]);
        }

        if request.want_mp3 {
            argv.extend([
                "--extract-audio".to_string(),
                "--audio-format".to_string(),
                "mp3".to_string(),
            ]);
        }

        let (template, tag) = output_template(request.rename.as_ref());
        let new_tag = tag
            .filter(|tag| tags.add_if_absent(tag))
            .map(str::to_string);
        argv.extend(["-o".to_string(), template]);

        argv.extend([
            "-P".to_string(),
            self.settings.download_path.display().to_string(),
        ]);

        Ok(BuiltCommand {
            argv,
            cookie,
            new_tag,
        })
    }
}
