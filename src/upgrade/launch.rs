use anyhow::{Context, Result};
use std::path::Path;
use std::process::{Command, Stdio};
use tracing::debug;

/// Windows `DETACHED_PROCESS` creation flag.
#[cfg(windows)]
const DETACHED_PROCESS: u32 = 0x0000_0008;

/// Start `program` with `args` without waiting for it.
///
/// The child gets its own process group (a detached console on Windows) and
/// null stdio, so it outlives the installer and is not hit by signals sent to
/// the installer's terminal. The working directory is the program's folder.
pub fn spawn_detached(program: &Path, args: &[String]) -> Result<()> {
    let mut command = Command::new(program);
    command.args(args).stdin(Stdio::null()).stdout(Stdio::null()).stderr(Stdio::null());

    if let Some(dir) = program.parent() {
        command.current_dir(dir);
    }

    #[cfg(windows)]
    {
        use std::os::windows::process::CommandExt;
        command.creation_flags(DETACHED_PROCESS);
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::CommandExt;
        command.process_group(0);
    }

    let child =
        command.spawn().with_context(|| format!("Failed to launch {}", program.display()))?;
    debug!("Launched {} as pid {}", program.display(), child.id());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_program_fails() {
        let temp = TempDir::new().unwrap();
        let err = spawn_detached(&temp.path().join("missing"), &[]).unwrap_err();
        assert!(err.to_string().contains("Failed to launch"));
    }

    #[cfg(unix)]
    #[test]
    fn test_launches_script_with_args() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let script = temp.path().join("app.sh");
        std::fs::write(&script, "#!/bin/sh\necho \"$1\" > launched.txt\n").unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        spawn_detached(&script, &["hello".to_string()]).unwrap();

        let marker = temp.path().join("launched.txt");
        for _ in 0..50 {
            if std::fs::read_to_string(&marker).is_ok_and(|s| s.trim() == "hello") {
                return;
            }
            std::thread::sleep(std::time::Duration::from_millis(100));
        }
        panic!("launched program did not run");
    }
}
