use std::time::Instant;

use tracing::Instrument;

use crate::{
    config::{Config, OverlapPolicy},
    engine::{execute_script, validate_request, InFlight, ScriptRequest},
    error::RunError,
    execution_id::ExecutionId,
};

/// Handle one `/run-script` request end to end: validate, then execute.
///
/// Returns the script's stdout on a clean run. Nothing is cached: every
/// accepted call spawns a new process.
pub async fn run_script(
    cfg: &Config,
    in_flight: &InFlight,
    req: ScriptRequest,
) -> Result<String, RunError> {
    let execution_id = ExecutionId::new();
    let span = tracing::info_span!(
        "script_run",
        execution_id = %execution_id,
        script = req.script_str().unwrap_or(""),
    );

    let result = run_inner(cfg, in_flight, req).instrument(span.clone()).await;

    span.in_scope(|| match &result {
        Ok(_) => {}
        Err(e @ RunError::ExecutionFailure { .. }) => {
            tracing::warn!(code = e.code(), "script failed");
        }
        Err(e) => {
            tracing::warn!(code = e.code(), status = e.status().as_u16(), "request rejected");
        }
    });

    result
}

async fn run_inner(
    cfg: &Config,
    in_flight: &InFlight,
    req: ScriptRequest,
) -> Result<String, RunError> {
    // ---- validation ----
    let accepted = validate_request(cfg, &req).await?;

    // ---- overlap ----
    let _guard = match cfg.execution.overlap {
        OverlapPolicy::Allow => None,
        OverlapPolicy::Reject => Some(in_flight.try_acquire(&accepted.script).ok_or_else(
            || RunError::Busy {
                script: accepted.script.clone(),
            },
        )?),
    };

    // ---- execution ----
    let start = Instant::now();
    let stdout = execute_script(&accepted, &cfg.root, cfg.execution.timeout()).await?;

    tracing::info!(
        duration_ms = start.elapsed().as_millis(),
        "script completed"
    );

    Ok(stdout)
}
