//=========================================================================
// System Paths
//=========================================================================

//=== Standard Library Imports ============================================

use std::env;
use std::path::{Path, PathBuf};

//=== External Crates =====================================================

use log::{debug, warn};

//=== SystemPaths =========================================================

/// Home and working directories, resolved once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemPaths {
    home_dir: PathBuf,
    working_dir: PathBuf,
}

impl SystemPaths {
    /// Falls back to the working directory when no home is known, and to
    /// `.` when the working directory is unreadable.
    pub fn resolve() -> Self {
        let working_dir = env::current_dir().unwrap_or_else(|e| {
            warn!(target: "os", "Working directory unavailable: {}", e);
            PathBuf::from(".")
        });
        let home_dir = dirs::home_dir().unwrap_or_else(|| {
            warn!(target: "os", "Home directory unavailable, using working directory");
            working_dir.clone()
        });

        debug!(target: "os", "home={} cwd={}", home_dir.display(), working_dir.display());
        Self { home_dir, working_dir }
    }

    pub fn home_dir(&self) -> &Path {
        &self.home_dir
    }

    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_matches_process_environment() {
        let paths = SystemPaths::resolve();
        assert_eq!(paths.working_dir(), env::current_dir().unwrap());
        if let Some(home) = dirs::home_dir() {
            assert_eq!(paths.home_dir(), home);
        }
    }
}
