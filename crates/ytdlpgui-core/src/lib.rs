//! ytdlpgui-core: persisted state and command building for the yt-dlp front-end

pub mod command;
pub mod cookie;
pub mod error;
pub mod events;
pub mod history;
mod ini;
pub mod paths;
pub mod session;
pub mod settings;
mod store;
pub mod tags;
pub mod title;
pub mod url;

pub use command::{CommandBuilder, DownloadRequest, Rename};
pub use error::{GuiError, Result, ValidationError};
pub use paths::AppPaths;
pub use session::{AppState, DownloadSession};
pub use settings::{Settings, SettingsStore};
