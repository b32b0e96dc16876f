//=========================================================================
// Clipboard
//
// Capability-queryable clipboard access. On X11 the text selection is
// read and written through `xclip`; everywhere else the clipboard
// reports itself unsupported instead of silently doing nothing.
//
//=========================================================================

//=== Standard Library Imports ============================================

use std::env;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};

//=== External Crates =====================================================

use log::{debug, info};

//=== Internal Imports ====================================================

use crate::error::PlatformError;

//=== Clipboard ===========================================================

pub trait Clipboard {
    fn is_supported(&self) -> bool;

    /// Current clipboard text; empty when the clipboard holds no text.
    fn get_string(&mut self) -> Result<String, PlatformError>;

    fn set_string(&mut self, text: &str) -> Result<(), PlatformError>;
}

/// Picks the X11 clipboard when a display and `xclip` are available.
pub fn system_clipboard() -> Box<dyn Clipboard> {
    if env::var_os("DISPLAY").is_some() {
        if let Ok(program) = which::which("xclip") {
            info!(target: "os", "Clipboard: X11 via {}", program.display());
            return Box::new(XClipboard::new(program));
        }
    }
    info!(target: "os", "Clipboard: unsupported");
    Box::new(UnsupportedClipboard)
}

//=== XClipboard ==========================================================

#[derive(Debug, Clone)]
pub struct XClipboard {
    program: PathBuf,
}

impl XClipboard {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self { program: program.into() }
    }

    fn launch_error(&self, source: std::io::Error) -> PlatformError {
        PlatformError::Launch {
            program: self.program.display().to_string(),
            source,
        }
    }
}

impl Clipboard for XClipboard {
    fn is_supported(&self) -> bool {
        true
    }

    fn get_string(&mut self) -> Result<String, PlatformError> {
        let output = Command::new(&self.program)
            .args(["-selection", "clipboard", "-o"])
            .stderr(Stdio::null())
            .output()
            .map_err(|e| self.launch_error(e))?;

        // xclip exits non-zero when the selection holds no text.
        if !output.status.success() {
            debug!(target: "os", "Clipboard has no text ({})", output.status);
            return Ok(String::new());
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn set_string(&mut self, text: &str) -> Result<(), PlatformError> {
        let mut child = Command::new(&self.program)
            .args(["-selection", "clipboard", "-i"])
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| self.launch_error(e))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(text.as_bytes())?;
        }
        let status = child.wait()?;
        if !status.success() {
            return Err(PlatformError::Native(format!("xclip exited with {}", status)));
        }
        Ok(())
    }
}

//=== UnsupportedClipboard ================================================

#[derive(Debug, Clone, Copy, Default)]
pub struct UnsupportedClipboard;

impl Clipboard for UnsupportedClipboard {
    fn is_supported(&self) -> bool {
        false
    }

    fn get_string(&mut self) -> Result<String, PlatformError> {
        Err(PlatformError::Unsupported("clipboard"))
    }

    fn set_string(&mut self, _text: &str) -> Result<(), PlatformError> {
        Err(PlatformError::Unsupported("clipboard"))
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_clipboard_reports_it() {
        let mut clipboard = UnsupportedClipboard;
        assert!(!clipboard.is_supported());
        assert!(matches!(clipboard.get_string(), Err(PlatformError::Unsupported("clipboard"))));
        assert!(matches!(clipboard.set_string("x"), Err(PlatformError::Unsupported(_))));
    }

    #[test]
    fn missing_xclip_is_a_launch_error() {
        let mut clipboard = XClipboard::new("/nonexistent/xclip");
        assert!(clipboard.is_supported());
        assert!(matches!(clipboard.get_string(), Err(PlatformError::Launch { .. })));
        assert!(matches!(clipboard.set_string("x"), Err(PlatformError::Launch { .. })));
    }

    #[test]
    fn system_clipboard_answers_capability() {
        let clipboard = system_clipboard();
        let expected = env::var_os("DISPLAY").is_some() && which::which("xclip").is_ok();
        assert_eq!(clipboard.is_supported(), expected);
    }
}
