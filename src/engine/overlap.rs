use std::collections::HashSet;
use std::sync::{Arc, Mutex};

/// Registry of scripts that currently have a run in flight.
///
/// Only consulted when the overlap policy is `reject`.
#[derive(Debug, Clone, Default)]
pub struct InFlight {
    running: Arc<Mutex<HashSet<String>>>,
}

impl InFlight {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `script`, or `None` if a run of it is already in flight.
    ///
    /// The claim is released when the returned guard is dropped.
    pub fn try_acquire(&self, script: &str) -> Option<InFlightGuard> {
        let mut running = match self.running.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        if !running.insert(script.to_string()) {
            return None;
        }

        Some(InFlightGuard {
            running: Arc::clone(&self.running),
            script: script.to_string(),
        })
    }

    #[cfg(test)]
    pub fn is_running(&self, script: &str) -> bool {
        match self.running.lock() {
            Ok(guard) => guard.contains(script),
            Err(poisoned) => poisoned.into_inner().contains(script),
        }
    }
}

/// Held for the duration of one run.
#[derive(Debug)]
pub struct InFlightGuard {
    running: Arc<Mutex<HashSet<String>>>,
    script: String,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        let mut running = match self.running.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        running.remove(&self.script);
    }
}
