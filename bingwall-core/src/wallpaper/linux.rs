use std::path::Path;

use super::{absolute, CommandRunner, WallpaperSetter};
use crate::error::{Error, Result};

/// One way of setting the background: a command and the desktop it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Strategy {
    pub desktop: &'static str,
    pub program: &'static str,
    pub args: Vec<String>,
    /// Run with the same program once `args` succeeded; its failure is ignored.
    pub follow_up: Option<Vec<String>>,
}

fn owned(args: &[&str]) -> Vec<String> {
    args.iter().map(|arg| arg.to_string()).collect()
}

impl Strategy {
    fn new(desktop: &'static str, program: &'static str, args: &[&str]) -> Self {
        Self {
            desktop,
            program,
            args: owned(args),
            follow_up: None,
        }
    }

    fn then(mut self, args: &[&str]) -> Self {
        self.follow_up = Some(owned(args));
        self
    }
}

/// Every known setter, generic desktop settings first and standalone tools last.
pub fn default_strategies(path: &Path) -> Vec<Strategy> {
    let file = path.to_string_lossy();
    let uri = format!("file://{}", file);

    vec![
        // GNOME 42+ shows picture-uri-dark in dark mode; older releases lack the key.
        Strategy::new("gnome", "gsettings", &["set", "org.gnome.desktop.background", "picture-uri", &uri])
            .then(&["set", "org.gnome.desktop.background", "picture-uri-dark", &uri]),
        Strategy::new("mate", "gsettings", &["set", "org.mate.background", "picture-filename", &file]),
        Strategy::new("kde", "plasma-apply-wallpaperimage", &[&file]),
        Strategy::new(
            "xfce4",
            "xfconf-query",
            &["-c", "xfce4-desktop", "-p", "/backdrop/screen0/monitor0/image-path", "-s", &file],
        ),
        Strategy::new("lxde", "pcmanfm", &["--set-wallpaper", &file, "--wallpaper-mode=scaled"]),
        Strategy::new("any", "feh", &["--bg-fill", &file]),
        Strategy::new("any", "nitrogen", &["--set-zoom-fill", "--save", &file]),
        Strategy::new("fluxbox", "fbsetbg", &[&file]),
        Strategy::new("icewm", "icewmbg", &[&file]),
        Strategy::new("blackbox", "bsetbg", &["-full", &file]),
    ]
}

/// Moves strategies for `desktop` to the front, keeping the rest in order.
fn prefer_desktop(mut strategies: Vec<Strategy>, desktop: Option<&str>) -> Vec<Strategy> {
    if let Some(desktop) = desktop {
        strategies.sort_by_key(|strategy| strategy.desktop != desktop);
    }
    strategies
}

/// Best guess at the running desktop, normalised to the strategy tags.
pub fn desktop_environment() -> Option<String> {
    detect_desktop(|key| std::env::var(key).ok())
}

fn detect_desktop(var: impl Fn(&str) -> Option<String>) -> Option<String> {
    let sessions = [var("XDG_CURRENT_DESKTOP"), var("DESKTOP_SESSION")];
    for session in sessions.into_iter().flatten() {
        // XDG_CURRENT_DESKTOP may be a list such as "ubuntu:GNOME"
        for name in session.to_lowercase().split(':') {
            if let Some(desktop) = normalise_session(name) {
                return Some(desktop.to_string());
            }
        }
    }

    if var("KDE_FULL_SESSION").as_deref() == Some("true") {
        return Some("kde".to_string());
    }
    if var("GNOME_DESKTOP_SESSION_ID").is_some() {
        return Some("gnome".to_string());
    }
    None
}

fn normalise_session(session: &str) -> Option<&'static str> {
    let desktop = match session {
        "gnome" | "unity" | "cinnamon" | "gnome-xorg" | "gnome-classic" => "gnome",
        "mate" => "mate",
        "kde" | "plasma" | "trinity" => "kde",
        "lxde" => "lxde",
        "fluxbox" | "jwm" | "openbox" | "afterstep" => "fluxbox",
        "icewm" => "icewm",
        "blackbox" => "blackbox",
        s if s.contains("xfce") || s.starts_with("xubuntu") => "xfce4",
        s if s.starts_with("ubuntustudio") || s.starts_with("kubuntu") => "kde",
        s if s.starts_with("lubuntu") => "lxde",
        s if s.starts_with("ubuntu") => "gnome",
        _ => return None,
    };
    Some(desktop)
}

/// Tries each strategy in turn and stops at the first command that exits cleanly.
pub fn apply_first_success(runner: &dyn CommandRunner, strategies: &[Strategy]) -> Result<()> {
    for strategy in strategies {
        match runner.run(strategy.program, &strategy.args) {
            Ok(output) if output.success => {
                log::info!("Wallpaper set with {} ({})", strategy.program, strategy.desktop);
                if let Some(args) = &strategy.follow_up {
                    match runner.run(strategy.program, args) {
                        Ok(output) if output.success => {}
                        Ok(output) => log::debug!("{} follow-up failed: {}", strategy.program, output.stderr),
                        Err(e) => log::debug!("{} follow-up unavailable: {}", strategy.program, e),
                    }
                }
                return Ok(());
            }
            Ok(output) => log::debug!("{} failed: {}", strategy.program, output.stderr),
            Err(e) => log::debug!("{} unavailable: {}", strategy.program, e),
        }
    }
    Err(Error::UnsupportedDesktopEnvironment)
}

pub struct LinuxSetter<'r> {
    runner: &'r dyn CommandRunner,
    desktop: Option<String>,
}

impl<'r> LinuxSetter<'r> {
    pub fn new(runner: &'r dyn CommandRunner, desktop: Option<String>) -> Self {
        Self { runner, desktop }
    }
}

impl WallpaperSetter for LinuxSetter<'_> {
    fn apply(&self, path: &Path) -> Result<()> {
        let path = absolute(path)?;
        if let Some(desktop) = &self.desktop {
            log::debug!("Detected desktop environment: {}", desktop);
        }
        let strategies = prefer_desktop(default_strategies(&path), self.desktop.as_deref());
        apply_first_success(self.runner, &strategies)
    }
}
