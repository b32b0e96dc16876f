//=========================================================================
// Disk Items
//
// Copy, move and remove go through the system tools and block until the
// tool exits; the exit status is returned as-is. Folder creation is a
// single non-recursive mkdir with owner-only permissions.
//
//=========================================================================

//=== Standard Library Imports ============================================

use std::ffi::OsStr;
use std::fs::DirBuilder;
use std::path::Path;
use std::process::ExitStatus;

//=== External Crates =====================================================

use log::info;

//=== Internal Imports ====================================================

use super::process::spawn_process;
use crate::error::PlatformError;

//=== Tools ===============================================================

/// Flags, then `--`, then operands: paths starting with `-` are never
/// parsed as options.
fn tool_args<'a>(flags: &'a [&'a str], operands: &[&'a Path]) -> Vec<&'a OsStr> {
    flags
        .iter()
        .map(OsStr::new)
        .chain(std::iter::once(OsStr::new("--")))
        .chain(operands.iter().map(|p| p.as_os_str()))
        .collect()
}

/// Recursive copy; `-T` treats the destination as the target itself.
pub fn copy_disk_item(src: &Path, dest: &Path) -> Result<ExitStatus, PlatformError> {
    info!(target: "os", "Copying {} -> {}", src.display(), dest.display());
    spawn_process("/bin/cp", tool_args(&["-RT"], &[src, dest]))?.wait()
}

pub fn move_disk_item(src: &Path, dest: &Path) -> Result<ExitStatus, PlatformError> {
    info!(target: "os", "Moving {} -> {}", src.display(), dest.display());
    spawn_process("/bin/mv", tool_args(&[], &[src, dest]))?.wait()
}

/// Recursive, forced removal.
pub fn remove_disk_item(path: &Path) -> Result<ExitStatus, PlatformError> {
    info!(target: "os", "Removing {}", path.display());
    spawn_process("/bin/rm", tool_args(&["-rf"], &[path]))?.wait()
}

//=== Folders =============================================================

/// Creates one directory level with mode 0700.
///
/// Fails if `path` exists or its parent is missing.
pub fn create_folder(path: &Path) -> Result<(), PlatformError> {
    let mut builder = DirBuilder::new();
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o700);
    }
    builder.create(path)?;
    info!(target: "os", "Created folder {}", path.display());
    Ok(())
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn copy_blocks_until_done() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("src");
        fs::create_dir(&src).unwrap();
        fs::write(src.join("a.txt"), "alpha").unwrap();

        let dest = dir.path().join("dest");
        let status = copy_disk_item(&src, &dest).unwrap();

        assert!(status.success());
        assert_eq!(fs::read_to_string(dest.join("a.txt")).unwrap(), "alpha");
        assert!(src.join("a.txt").exists());
    }

    #[test]
    fn move_relocates_item() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("a.txt");
        fs::write(&src, "alpha").unwrap();
        let dest = dir.path().join("b.txt");

        assert!(move_disk_item(&src, &dest).unwrap().success());
        assert!(!src.exists());
        assert!(dest.exists());
    }

    #[test]
    fn remove_is_recursive() {
        let dir = tempfile::tempdir().unwrap();
        let tree = dir.path().join("tree");
        fs::create_dir_all(tree.join("nested")).unwrap();
        fs::write(tree.join("nested/file"), "x").unwrap();

        assert!(remove_disk_item(&tree).unwrap().success());
        assert!(!tree.exists());
    }

    #[test]
    fn operands_follow_the_option_terminator() {
        let args = tool_args(&["-RT"], &[Path::new("-src"), Path::new("dest")]);
        assert_eq!(args, ["-RT", "--", "-src", "dest"].map(OsStr::new));
    }

    #[test]
    fn dash_prefixed_item_is_not_an_option() {
        // `rm -rf -aetheric-missing` would reject the unknown options;
        // as an operand it is a missing file, which `-f` accepts.
        let status = remove_disk_item(Path::new("-aetheric-missing")).unwrap();
        assert!(status.success());
    }

    #[test]
    fn failed_copy_reports_status() {
        let dir = tempfile::tempdir().unwrap();
        let status = copy_disk_item(&dir.path().join("missing"), &dir.path().join("out")).unwrap();
        assert!(!status.success());
    }

    #[test]
    fn folder_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let folder = dir.path().join("private");
        create_folder(&folder).unwrap();

        let mode = fs::metadata(&folder).unwrap().permissions().mode();
        assert_eq!(mode & 0o077, 0);
        assert_eq!(mode & 0o700, 0o700);
    }

    #[test]
    fn folder_creation_is_not_recursive_or_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let folder = dir.path().join("once");
        create_folder(&folder).unwrap();

        assert!(matches!(create_folder(&folder), Err(PlatformError::Io(_))));
        assert!(matches!(
            create_folder(&dir.path().join("missing/child")),
            Err(PlatformError::Io(_))
        ));
    }
}
