//=========================================================================
// Platform Errors
//
// Single error type shared by the window manager, the native backends
// and the OS shims.
//
// Taxonomy:
// - Native call failures (window, GL context, surface)
// - Features the current platform cannot provide (clipboard, adaptive
//   vsync, ...)
// - Child processes that could not be launched at all
// - Filesystem / pipe errors
// - Native subsystem lifecycle misuse (double initialization)
//
//=========================================================================

//=== Standard Library Imports ============================================

use std::io;

//=== External Crates =====================================================

use thiserror::Error;

//=== PlatformError =======================================================

/// Errors produced by the platform layer.
///
/// A failed process launch is always reported as [`PlatformError::Launch`],
/// so it can never be mistaken for output captured from a command that
/// did run.
#[derive(Debug, Error)]
pub enum PlatformError {
    /// A native windowing or OpenGL call failed.
    #[error("native call failed: {0}")]
    Native(String),

    /// The requested feature is not available on this platform.
    #[error("{0} is not supported on this platform")]
    Unsupported(&'static str),

    /// A child process could not be started.
    #[error("failed to launch `{program}`: {source}")]
    Launch {
        program: String,
        #[source]
        source: io::Error,
    },

    /// Filesystem or pipe error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The native windowing subsystem is already owned by another backend.
    #[error("native windowing subsystem is already initialized")]
    AlreadyInitialized,

    /// The native event loop could not be created.
    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
}

impl PlatformError {
    /// Wraps any displayable native error.
    pub(crate) fn native(context: &str, err: impl std::fmt::Display) -> Self {
        Self::Native(format!("{context}: {err}"))
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn launch_error_keeps_source() {
        let err = PlatformError::Launch {
            program: "missing-tool".into(),
            source: io::Error::new(io::ErrorKind::NotFound, "not found"),
        };

        assert!(err.to_string().contains("missing-tool"));
        assert!(err.source().is_some());
    }

    #[test]
    fn unsupported_names_the_feature() {
        let err = PlatformError::Unsupported("clipboard");
        assert_eq!(err.to_string(), "clipboard is not supported on this platform");
    }

    #[test]
    fn native_helper_formats_context() {
        let err = PlatformError::native("surface resize", "bad size");
        assert_eq!(err.to_string(), "native call failed: surface resize: bad size");
    }

    #[test]
    fn io_errors_convert() {
        fn fails() -> Result<(), PlatformError> {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "nope"))?;
            Ok(())
        }
        assert!(matches!(fails(), Err(PlatformError::Io(_))));
    }
}
