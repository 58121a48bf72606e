use std::path::PathBuf;

use crate::config::Config;
use crate::engine::{ScriptField, ScriptRequest};
use crate::error::RunError;

/// A script that passed every check and may be handed to the executor.
#[derive(Debug, Clone)]
pub struct AcceptedScript {
    /// The allow-list entry exactly as requested.
    pub script: String,

    /// Absolute location on disk.
    pub path: PathBuf,
}

/// Check a request in order: presence, allow-list, existence.
///
/// The allow-list comparison happens before the supplied value touches the
/// filesystem, so nothing outside the list is ever stat'ed or spawned.
pub async fn validate_request(
    cfg: &Config,
    req: &ScriptRequest,
) -> Result<AcceptedScript, RunError> {
    /* ---------------- presence ---------------- */

    let script = match req.field() {
        ScriptField::Missing => return Err(RunError::MissingInput),
        ScriptField::Other => return Err(RunError::NotAllowed),
        ScriptField::Path(s) => s,
    };

    /* ---------------- allow-list ---------------- */

    if !cfg.allowed_scripts.contains(script) {
        return Err(RunError::NotAllowed);
    }

    /* ---------------- existence ---------------- */

    let location = cfg.script_path(script);

    if !tokio::fs::try_exists(&location).await.unwrap_or(false) {
        return Err(RunError::NotFound {
            script: script.to_string(),
        });
    }

    // Relative program paths are ambiguous once the child gets its own
    // working directory.
    let path = tokio::fs::canonicalize(&location)
        .await
        .map_err(|_| RunError::NotFound {
            script: script.to_string(),
        })?;

    Ok(AcceptedScript {
        script: script.to_string(),
        path,
    })
}
