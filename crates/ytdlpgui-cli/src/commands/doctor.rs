use anyhow::Result;
use std::process::Command;
use which::which;

use ytdlpgui_core::AppState;

const YTDLP_INSTALL: &str = "https://github.com/yt-dlp/yt-dlp/wiki/Installation";
const FFMPEG_INSTALL: &str = "https://github.com/ffbinaries/ffbinaries-prebuilt/releases";

pub async fn run(state: &AppState) -> Result<()> {
    println!("ytdlpgui dependency check\n");

    let settings = state.settings.current();
    let mut all_ok = true;

    // Check yt-dlp
    print!("yt-dlp:          ");
    match which(&settings.ytdlp_path) {
        Ok(path) => match Command::new(&path).arg("--version").output() {
            Ok(out) => {
                let v = String::from_utf8_lossy(&out.stdout);
                println!("OK ({}, {})", v.trim(), path.display());
            }
            Err(_) => {
                println!("FOUND but failed to get version");
                all_ok = false;
            }
        },
        Err(_) => {
            println!("NOT FOUND ({})", settings.ytdlp_path);
            println!("                 Install: {}", YTDLP_INSTALL);
            println!("                 or set ytdlp_path with: ytdlpgui settings edit");
            all_ok = false;
        }
    }

    // Check FFmpeg, needed for --mp4 merging and --mp3 extraction
    print!("ffmpeg:          ");
    match which("ffmpeg") {
        Ok(path) => match Command::new(&path).arg("-version").output() {
            Ok(out) => {
                let first_line = String::from_utf8_lossy(&out.stdout)
                    .lines()
                    .next()
                    .unwrap_or("")
                    .to_string();
                let version_part = first_line.split_whitespace().nth(2).unwrap_or("unknown");
                println!("OK ({})", version_part);
            }
            Err(_) => {
                println!("FOUND but failed to get version");
                all_ok = false;
            }
        },
        Err(_) => {
            println!("NOT FOUND");
            println!("                 Install: {}", FFMPEG_INSTALL);
            all_ok = false;
        }
    }

    print!("download folder: ");
    if settings.download_path.is_dir() {
        println!("OK ({})", settings.download_path.display());
    } else {
        println!("MISSING ({})", settings.download_path.display());
        println!("                 Falls back to {}", settings.effective_download_dir().display());
    }

    print!("cookie.txt:      ");
    if !state.cookies.exists() {
        println!("not created (run: ytdlpgui cookie edit)");
    } else if state.cookies.looks_empty().unwrap_or(true) {
        println!("EMPTY ({})", state.cookies.path().display());
    } else {
        println!("OK ({})", state.cookies.path().display());
    }

    println!();
    if all_ok {
        println!("All dependencies OK!");
    } else {
        println!("Some dependencies are missing. See above for installation instructions.");
    }

    Ok(())
}
