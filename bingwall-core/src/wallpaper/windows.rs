use std::path::Path;

use super::{absolute, CommandRunner, WallpaperSetter};
use crate::error::{Error, Result};

// SPI_SETDESKWALLPAPER with SPIF_UPDATEINIFILE | SPIF_SENDCHANGE
const SET_WALLPAPER_SCRIPT: &str = r#"
Add-Type -TypeDefinition @"
using System;
using System.Runtime.InteropServices;
public class Wallpaper {
    [DllImport("user32.dll", CharSet=CharSet.Auto)]
    public static extern int SystemParametersInfo(int uAction, int uParam, string lpvParam, int fuWinIni);
}
"@ -Language CSharp
if ([Wallpaper]::SystemParametersInfo(0x0014, 0, '__PATH__', 0x01 -bor 0x02) -eq 0) { exit 1 }
"#;

pub struct WindowsSetter<'r> {
    runner: &'r dyn CommandRunner,
}

impl<'r> WindowsSetter<'r> {
    pub fn new(runner: &'r dyn CommandRunner) -> Self {
        Self { runner }
    }
}

/// The PowerShell script for `path`, quoted as a single-quoted literal.
pub(crate) fn script_for(path: &Path) -> String {
    let quoted = path.to_string_lossy().replace('\'', "''");
    SET_WALLPAPER_SCRIPT.replace("__PATH__", &quoted)
}

impl WallpaperSetter for WindowsSetter<'_> {
    fn apply(&self, path: &Path) -> Result<()> {
        let path = absolute(path)?;
        if !path.is_file() {
            return Err(Error::MissingImage(path));
        }

        let args = vec![
            "-NoProfile".to_string(),
            "-NonInteractive".to_string(),
            "-Command".to_string(),
            script_for(&path),
        ];
        let output = self.runner.run("powershell", &args)?;
        if output.success {
            Ok(())
        } else {
            Err(Error::Command {
                program: "powershell".to_string(),
                detail: output.stderr,
            })
        }
    }
}
