//! pushpanel
//!
//! A local web control panel: `POST /run-script` validates the requested
//! script against a fixed allow-list and runs it, returning its output as
//! `{ "success": bool, "output": string }`.

pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod execution_id;
pub mod runtime;
pub mod scaffold;
pub mod util;
