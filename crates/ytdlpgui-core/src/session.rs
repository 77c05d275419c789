//! One download attempt, from form snapshot to spawned process

use crate::command::{CommandBuilder, DownloadRequest};
use crate::cookie::CookieJar;
use crate::error::GuiError;
use crate::events::{EventSink, SessionEvent};
use crate::history::HistoryStore;
use crate::paths::AppPaths;
use crate::settings::{Settings, SettingsStore};
use crate::tags::TagStore;
use crate::title::TitleResolver;
use tracing::{debug, info};
use ytdlpgui_launch::ProcessLauncher;

/// Everything the application persists, opened from one data directory.
#[derive(Debug)]
pub struct AppState {
    pub paths: AppPaths,
    pub settings: SettingsStore,
    pub history: HistoryStore,
    pub tags: TagStore,
    pub cookies: CookieJar,
}

impl AppState {
    pub fn open(paths: AppPaths) -> Self {
        debug!("Data directory: {}", paths.root().display());
        Self {
            settings: SettingsStore::open(paths.settings()),
            history: HistoryStore::open(paths.history()),
            tags: TagStore::open(paths.tags()),
            cookies: CookieJar::new(paths.cookie()),
            paths,
        }
    }
}

/// External collaborators of a download attempt.
pub struct DownloadSession<'a> {
    resolver: &'a dyn TitleResolver,
    launcher: &'a dyn ProcessLauncher,
    events: &'a dyn EventSink,
}

impl<'a> DownloadSession<'a> {
    pub fn new(
        resolver: &'a dyn TitleResolver,
        launcher: &'a dyn ProcessLauncher,
        events: &'a dyn EventSink,
    ) -> Self {
        Self {
            resolver,
            launcher,
            events,
        }
    }

    /// Validate, look up the title, record history, build and launch.
    ///
    /// Validation failures happen before any process starts and leave the
    /// history untouched. Once validation passes the history is updated
    /// exactly once, before the downloader is spawned.
    pub async fn run(&self, state: &mut AppState, request: &DownloadRequest) -> Result<Vec<String>, GuiError> {
        let settings = state.settings.current().clone();

        let builder = CommandBuilder::new(&settings, &state.cookies);
        if let Err(e) = builder.validate(request) {
            return Err(self.reject(e.into()));
        }

        self.events.emit(SessionEvent::ResolvingTitle {
            url: request.url.clone(),
        });
        let title_command = builder.title_command(request);
        let title = self.resolver.resolve(&title_command.argv).await;
        drop(title_command);

        match &title {
            Some(title) => self.events.emit(SessionEvent::TitleResolved { title: title.clone() }),
            None => self.events.emit(SessionEvent::TitleUnresolved),
        }
        state.history.add(&request.url, title.as_deref());
        self.events.emit(SessionEvent::HistoryUpdated {
            url: request.url.clone(),
        });

        let effective = Settings {
            download_path: settings.effective_download_dir(),
            ..settings
        };
        self.events.emit(SessionEvent::DownloadDirectory {
            path: effective.download_path.clone(),
        });

        let built = CommandBuilder::new(&effective, &state.cookies)
            .download_command(request, &mut state.tags)
            .map_err(|e| self.reject(e))?;

        if let Some(tag) = &built.new_tag {
            self.events.emit(SessionEvent::TagRegistered { tag: tag.clone() });
        }
        if let Some(cookie) = &built.cookie {
            self.events.emit(SessionEvent::CookieStaged {
                source: state.cookies.path().to_path_buf(),
            });
            if cookie.looks_empty() {
                self.events.emit(SessionEvent::CookieLooksEmpty {
                    path: state.cookies.path().to_path_buf(),
                });
            }
        }

        self.events.emit(SessionEvent::CommandReady {
            rendered: self.launcher.render(&built.argv),
        });

        // the cookie copy is only released to the downloader once it started
        self.launcher
            .launch(&built.argv, true)
            .map_err(|e| self.reject(e.into()))?;
        let argv = built.detach().map_err(|e| self.reject(e.into()))?;
        self.events.emit(SessionEvent::Launched);

        info!("Download launched for {}", request.url);
        Ok(argv)
    }

    fn reject(&self, error: GuiError) -> GuiError {
        self.events.emit(SessionEvent::Rejected {
            reason: error.to_string(),
        });
        error
    }
}

/// Whether an error was a rejected form rather than a failure.
pub fn is_validation(error: &GuiError) -> bool {
    matches!(error, GuiError::Validation(_))
}
