// src/error.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::engine::ScriptResult;

/// Everything that can stop a `/run-script` request short of a clean run.
///
/// Every variant is recovered locally and rendered as
/// `{ "success": false, "output": ... }`. None of them is fatal to the
/// server.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    /// `script` absent, empty, or the body was not a usable JSON object.
    #[error("No script specified.")]
    MissingInput,

    /// `script` is not an allow-list entry.
    #[error("Script not allowed.")]
    NotAllowed,

    /// Allow-listed, but nothing exists at that path right now.
    #[error("Script {script} not found.")]
    NotFound { script: String },

    /// Overlap policy is `reject` and a run of this script is in flight.
    #[error("Script {script} is already running.")]
    Busy { script: String },

    /// The script could not be run to a zero exit.
    ///
    /// Reported with HTTP 200: the request itself was valid.
    #[error("{stdout}\n\nError: {stderr}")]
    ExecutionFailure { stdout: String, stderr: String },
}

impl RunError {
    /// Failure that happened outside the child (chmod, spawn, timeout).
    pub fn launch(detail: impl std::fmt::Display) -> Self {
        RunError::ExecutionFailure {
            stdout: String::new(),
            stderr: detail.to_string(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            RunError::MissingInput => StatusCode::BAD_REQUEST,
            RunError::NotAllowed => StatusCode::FORBIDDEN,
            RunError::NotFound { .. } => StatusCode::NOT_FOUND,
            RunError::Busy { .. } => StatusCode::CONFLICT,
            RunError::ExecutionFailure { .. } => StatusCode::OK,
        }
    }

    /// Stable machine-readable name, used in logs.
    pub fn code(&self) -> &'static str {
        match self {
            RunError::MissingInput => "MISSING_INPUT",
            RunError::NotAllowed => "NOT_ALLOWED",
            RunError::NotFound { .. } => "NOT_FOUND",
            RunError::Busy { .. } => "BUSY",
            RunError::ExecutionFailure { .. } => "EXECUTION_FAILURE",
        }
    }
}

impl IntoResponse for RunError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ScriptResult::failure(self.to_string());

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_follow_the_taxonomy() {
        assert_eq!(RunError::MissingInput.status(), StatusCode::BAD_REQUEST);
        assert_eq!(RunError::NotAllowed.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            RunError::NotFound { script: "./x.sh".into() }.status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            RunError::Busy { script: "./x.sh".into() }.status(),
            StatusCode::CONFLICT
        );
        assert_eq!(RunError::launch("boom").status(), StatusCode::OK);
    }

    #[test]
    fn messages_are_the_panel_texts() {
        assert_eq!(RunError::MissingInput.to_string(), "No script specified.");
        assert_eq!(RunError::NotAllowed.to_string(), "Script not allowed.");
        assert_eq!(
            RunError::NotFound {
                script: "./github_push.sh".into()
            }
            .to_string(),
            "Script ./github_push.sh not found."
        );
    }

    #[test]
    fn execution_failure_labels_stderr() {
        let err = RunError::ExecutionFailure {
            stdout: "step 1\n".into(),
            stderr: "fatal: no remote\n".into(),
        };
        assert_eq!(err.to_string(), "step 1\n\n\nError: fatal: no remote\n");
    }

    #[test]
    fn launch_failure_has_empty_stdout() {
        assert_eq!(
            RunError::launch("Permission denied").to_string(),
            "\n\nError: Permission denied"
        );
    }
}
