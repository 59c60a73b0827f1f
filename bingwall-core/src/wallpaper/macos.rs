use std::path::Path;

use super::{absolute, CommandRunner, WallpaperSetter};
use crate::error::{Error, Result};

/// Sets the picture of every desktop through System Events.
pub struct MacSetter<'r> {
    runner: &'r dyn CommandRunner,
}

impl<'r> MacSetter<'r> {
    pub fn new(runner: &'r dyn CommandRunner) -> Self {
        Self { runner }
    }
}

fn apple_script(path: &Path) -> String {
    let escaped = path
        .to_string_lossy()
        .replace('\\', "\\\\")
        .replace('"', "\\\"");
    format!(
        r#"tell application "System Events" to set picture of every desktop to "{}""#,
        escaped
    )
}

impl WallpaperSetter for MacSetter<'_> {
    fn apply(&self, path: &Path) -> Result<()> {
        let path = absolute(path)?;
        let args = vec!["-e".to_string(), apple_script(&path)];
        let output = self.runner.run("osascript", &args)?;
        if output.success {
            Ok(())
        } else {
            Err(Error::Command {
                program: "osascript".to_string(),
                detail: output.stderr,
            })
        }
    }
}
