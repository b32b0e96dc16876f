//=========================================================================
// OS Shims
//
// Process, filesystem, clipboard and path helpers used by the core.
//
// Responsibilities:
// - Spawn child processes behind an optionally-awaited handle
// - Run shell commands and capture their output
// - Copy / move / remove disk items through the system tools
// - Access the X11 clipboard when one is reachable
// - Resolve the home and working directories at startup
//
//=========================================================================

pub mod clipboard;
pub mod disk;
pub mod paths;
pub mod process;

pub use clipboard::{system_clipboard, Clipboard, UnsupportedClipboard, XClipboard};
pub use disk::{copy_disk_item, create_folder, move_disk_item, remove_disk_item};
pub use paths::SystemPaths;
pub use process::{
    execute_external_command, open_url, open_url_with, spawn_process, CommandOutput, ProcessHandle,
    DEFAULT_URL_OPENER,
};
