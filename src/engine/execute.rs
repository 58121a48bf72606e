use std::path::Path;
use std::process::Stdio;
use std::time::{Duration, Instant};

use tokio::process::Command;

use crate::engine::AcceptedScript;
use crate::error::RunError;

/// Run an accepted script to completion and return its stdout.
///
/// Equivalent to `chmod +x <script> && <script>` with `root` as the working
/// directory. Any non-zero exit, signal, launch problem or timeout becomes
/// [`RunError::ExecutionFailure`].
pub async fn execute_script(
    accepted: &AcceptedScript,
    root: &Path,
    timeout: Option<Duration>,
) -> Result<String, RunError> {
    make_executable(&accepted.path).await.map_err(|e| {
        RunError::launch(format!(
            "Failed to make {} executable: {}",
            accepted.script, e
        ))
    })?;

    let mut cmd = Command::new(&accepted.path);
    cmd.current_dir(root)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    // Own process group, so a timeout can take down everything the script
    // started, not only the script itself.
    #[cfg(unix)]
    cmd.process_group(0);

    let start = Instant::now();
    let child = cmd
        .spawn()
        .map_err(|e| RunError::launch(format!("Failed to launch {}: {}", accepted.script, e)))?;

    let pid = child.id();
    tracing::debug!(pid, "script spawned");

    let waited = match timeout {
        Some(limit) => {
            let wait = child.wait_with_output();
            tokio::pin!(wait);

            tokio::select! {
                res = &mut wait => res,
                _ = tokio::time::sleep(limit) => {
                    // The group is signalled while the child is still unreaped,
                    // so its id cannot have been reused. Dropping `wait`
                    // afterwards kills and reaps the script itself.
                    if let Some(pid) = pid {
                        kill_process_group(pid);
                    }
                    return Err(RunError::launch(format!(
                        "Script timed out after {}s",
                        limit.as_secs()
                    )));
                }
            }
        }
        None => child.wait_with_output().await,
    };

    let output = waited.map_err(|e| {
        RunError::launch(format!("Failed while waiting for {}: {}", accepted.script, e))
    })?;

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

    tracing::debug!(
        status = %output.status,
        duration_ms = start.elapsed().as_millis(),
        "script exited"
    );

    if output.status.success() {
        Ok(stdout)
    } else {
        Err(RunError::ExecutionFailure { stdout, stderr })
    }
}

/// Add execute permission for user, group and other.
#[cfg(unix)]
async fn make_executable(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let mut perms = tokio::fs::metadata(path).await?.permissions();
    perms.set_mode(perms.mode() | 0o111);
    tokio::fs::set_permissions(path, perms).await
}

/// SIGKILL every process in the group led by `pgid`.
#[cfg(unix)]
fn kill_process_group(pgid: u32) {
    // Safety: killpg only sends a signal and reports failure via errno.
    let ret = unsafe { libc::killpg(pgid as libc::pid_t, libc::SIGKILL) };
    if ret != 0 {
        tracing::warn!(
            pgid,
            error = %std::io::Error::last_os_error(),
            "failed to kill script process group"
        );
    }
}

#[cfg(not(unix))]
fn kill_process_group(_pgid: u32) {}

#[cfg(not(unix))]
async fn make_executable(_path: &Path) -> std::io::Result<()> {
    Ok(())
}
