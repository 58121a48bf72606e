use serde::{Deserialize, Serialize};
use serde_json::Value;

pub mod execute;
pub mod overlap;
pub mod run;
pub mod validate;

pub use execute::execute_script;
pub use overlap::InFlight;
pub use run::run_script;
pub use validate::{validate_request, AcceptedScript};

/* ---------------- request ---------------- */

/// Body of `POST /run-script`.
///
/// `script` is kept as raw JSON so a non-string value is still a request
/// for *something*: it is refused by the allow-list, not treated as absent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScriptRequest {
    #[serde(default)]
    pub script: Option<Value>,
}

/// What the `script` field amounts to before the allow-list is consulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptField<'a> {
    /// Absent, `null`, `""`, `false` or `0`.
    Missing,
    Path(&'a str),
    /// Any other non-string value; never on the allow-list.
    Other,
}

impl ScriptRequest {
    pub fn new(script: impl Into<String>) -> Self {
        Self {
            script: Some(Value::String(script.into())),
        }
    }

    pub fn field(&self) -> ScriptField<'_> {
        match &self.script {
            None | Some(Value::Null) | Some(Value::Bool(false)) => ScriptField::Missing,
            Some(Value::String(s)) if s.is_empty() => ScriptField::Missing,
            Some(Value::String(s)) => ScriptField::Path(s),
            Some(Value::Number(n)) if n.as_f64() == Some(0.0) => ScriptField::Missing,
            Some(_) => ScriptField::Other,
        }
    }

    /// The requested path, if `script` is a non-empty string.
    pub fn script_str(&self) -> Option<&str> {
        match self.field() {
            ScriptField::Path(s) => Some(s),
            _ => None,
        }
    }
}

/* ---------------- result ---------------- */

/// Body of every `/run-script` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptResult {
    pub success: bool,
    pub output: String,
}

impl ScriptResult {
    pub fn success(output: impl Into<String>) -> Self {
        Self {
            success: true,
            output: output.into(),
        }
    }

    pub fn failure(output: impl Into<String>) -> Self {
        Self {
            success: false,
            output: output.into(),
        }
    }
}
