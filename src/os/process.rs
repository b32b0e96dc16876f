//=========================================================================
// Child Processes
//
// ```text
//   spawn_process ──> ProcessHandle ──┬─ wait()      blocks for the status
//                                     ├─ try_wait()  polls
//                                     └─ detach()    fire and forget
//
//   execute_external_command ──/bin/sh -c──> CommandOutput { stdout, status }
// ```
//
// A program that cannot be started is always `PlatformError::Launch`;
// output is only ever produced by a command that actually ran.
//
//=========================================================================

//=== Standard Library Imports ============================================

use std::ffi::OsStr;
use std::path::Path;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;

//=== External Crates =====================================================

use log::{debug, info, warn};

//=== Internal Imports ====================================================

use crate::error::PlatformError;

//=== ProcessHandle =======================================================

/// A running child process.
#[derive(Debug)]
pub struct ProcessHandle {
    child: Child,
    program: String,
}

impl ProcessHandle {
    pub fn id(&self) -> u32 {
        self.child.id()
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Blocks until the child exits.
    pub fn wait(mut self) -> Result<ExitStatus, PlatformError> {
        let status = self.child.wait()?;
        debug!(target: "os", "`{}` exited with {}", self.program, status);
        Ok(status)
    }

    /// Returns the exit status if the child already exited.
    pub fn try_wait(&mut self) -> Result<Option<ExitStatus>, PlatformError> {
        Ok(self.child.try_wait()?)
    }

    /// Lets the child run on without observing it. A background thread
    /// reaps it once it exits, so no zombie is left behind.
    pub fn detach(self) {
        let Self { mut child, program } = self;
        let pid = child.id();
        let name = program.clone();

        let reaper = thread::Builder::new()
            .name("process-reaper".into())
            .spawn(move || match child.wait() {
                Ok(status) => debug!(target: "os", "Detached `{}` exited with {}", name, status),
                Err(e) => warn!(target: "os", "Could not wait for `{}`: {}", name, e),
            });

        match reaper {
            Ok(_) => debug!(target: "os", "Detached `{}` (pid {})", program, pid),
            Err(e) => warn!(target: "os", "`{}` (pid {}) will not be reaped: {}", program, pid, e),
        }
    }
}

//=== Spawning ============================================================

/// Starts `program` with `args` without waiting for it.
pub fn spawn_process<I, S>(program: &str, args: I) -> Result<ProcessHandle, PlatformError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let child = Command::new(program)
        .args(args)
        .spawn()
        .map_err(|source| PlatformError::Launch { program: program.to_string(), source })?;

    debug!(target: "os", "Spawned `{}` (pid {})", program, child.id());
    Ok(ProcessHandle { child, program: program.to_string() })
}

/// Launcher used by [`open_url`].
pub const DEFAULT_URL_OPENER: &str = "xdg-open";

/// Opens `url` with the desktop's default handler.
pub fn open_url(url: &str) -> Result<ProcessHandle, PlatformError> {
    open_url_with(DEFAULT_URL_OPENER, url)
}

/// Opens `url` by handing it to `opener` as its only argument.
pub fn open_url_with(opener: &str, url: &str) -> Result<ProcessHandle, PlatformError> {
    info!(target: "os", "Opening {} with `{}`", url, opener);
    spawn_process(opener, [url])
}

//=== External Commands ===================================================

/// Captured result of [`execute_external_command`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// Everything the command wrote to stdout, lossily decoded.
    pub stdout: String,
    pub status: ExitStatus,
}

/// Runs `command args` through `/bin/sh -c` and collects its stdout.
///
/// With `dir`, only the child runs there; the caller's working
/// directory is untouched.
pub fn execute_external_command(
    command: &str,
    args: &str,
    dir: Option<&Path>,
) -> Result<CommandOutput, PlatformError> {
    let line = if args.is_empty() {
        command.to_string()
    } else {
        format!("{} {}", command, args)
    };

    let mut shell = Command::new("/bin/sh");
    shell.arg("-c").arg(&line).stdout(Stdio::piped());
    if let Some(dir) = dir {
        shell.current_dir(dir);
    }

    let child = shell
        .spawn()
        .map_err(|source| PlatformError::Launch { program: line.clone(), source })?;
    let output = child.wait_with_output()?;

    debug!(target: "os", "`{}` exited with {}", line, output.status);
    Ok(CommandOutput {
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        status: output.status,
    })
}

//=========================================================================
// Unit Tests
//=========================================================================
