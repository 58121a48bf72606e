// src/config.rs

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::{
    collections::BTreeSet,
    fs,
    net::{IpAddr, Ipv4Addr, SocketAddr},
    path::{Path, PathBuf},
    time::Duration,
};

/// Default config path used when `--config` is not given.
pub const DEFAULT_CONFIG_PATH: &str = "pushpanel.yaml";

/// Root configuration, built once at startup and shared read-only with
/// every request handler.
///
/// Loaded from `pushpanel.yaml` when present, otherwise built from
/// defaults. CLI flags only override values.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Listener settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Working root.
    ///
    /// Static files are served from here, scripts are resolved against it
    /// and spawned with it as their working directory.
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// Control-panel page served on `GET /`, relative to `root`.
    #[serde(default = "default_index")]
    pub index: String,

    /// Exact script paths that may be executed.
    ///
    /// Example:
    ///
    /// allowed_scripts:
    ///   - ./github_push.sh
    #[serde(default = "default_allowed_scripts")]
    pub allowed_scripts: AllowList,

    /// Subprocess behaviour
    #[serde(default)]
    pub execution: ExecutionConfig,
}

/// Listener section.
///
/// server:
///   bind: 0.0.0.0
///   port: 5000
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: IpAddr,

    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            port: default_port(),
        }
    }
}

/// Execution section.
///
/// execution:
///   timeout_secs: 120
///   overlap: reject
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExecutionConfig {
    /// Kill the script after this many seconds. Unset means wait forever.
    #[serde(default)]
    pub timeout_secs: Option<u64>,

    #[serde(default)]
    pub overlap: OverlapPolicy,
}

impl ExecutionConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

/// What to do when a script is requested while a run of it is in flight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverlapPolicy {
    /// Every request spawns its own run.
    #[default]
    Allow,
    /// Refuse the request until the running one finishes.
    Reject,
}

/// Static set of script paths permitted for execution.
///
/// Membership is an exact string comparison. Nothing is normalised,
/// trimmed or pattern-matched.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct AllowList(BTreeSet<String>);

impl AllowList {
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(entries.into_iter().map(Into::into).collect())
    }

    pub fn contains(&self, script: &str) -> bool {
        self.0.contains(script)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_index() -> String {
    "github-push-ui.html".to_string()
}

fn default_allowed_scripts() -> AllowList {
    AllowList::new(["./github_push.sh"])
}

fn default_bind() -> IpAddr {
    IpAddr::V4(Ipv4Addr::UNSPECIFIED)
}

fn default_port() -> u16 {
    5000
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            root: default_root(),
            index: default_index(),
            allowed_scripts: default_allowed_scripts(),
            execution: ExecutionConfig::default(),
        }
    }
}

/// Values passed on the command line that take precedence over the file.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub port: Option<u16>,
    pub bind: Option<IpAddr>,
    pub root: Option<PathBuf>,
}

impl Config {
    /// Load and parse a YAML config file from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        Self::from_yaml(&raw).with_context(|| format!("Invalid config file: {:?}", path))
    }

    /// Parse and validate a YAML document.
    pub fn from_yaml(raw: &str) -> Result<Self> {
        // An empty document means "all defaults".
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }

        let cfg: Config = serde_yaml::from_str(raw).context("Failed to parse YAML config")?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Resolve the effective configuration for `serve`.
    ///
    /// An explicit `--config` path must exist. The default path is optional
    /// and falls back to built-in defaults when absent.
    pub fn resolve(explicit: Option<&Path>, overrides: Overrides) -> Result<Self> {
        let mut cfg = match explicit {
            Some(path) => Self::load(path)?,
            None => {
                let path = Path::new(DEFAULT_CONFIG_PATH);
                if path.exists() {
                    Self::load(path)?
                } else {
                    tracing::debug!("no {} found, using defaults", DEFAULT_CONFIG_PATH);
                    Self::default()
                }
            }
        };

        cfg.apply(overrides);
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn apply(&mut self, overrides: Overrides) {
        if let Some(port) = overrides.port {
            self.server.port = port;
        }
        if let Some(bind) = overrides.bind {
            self.server.bind = bind;
        }
        if let Some(root) = overrides.root {
            self.root = root;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.allowed_scripts.is_empty() {
            bail!("allowed_scripts must contain at least one script");
        }
        if self.allowed_scripts.iter().any(|s| s.is_empty()) {
            bail!("allowed_scripts must not contain empty entries");
        }
        if self.server.port == 0 {
            bail!("server.port must be greater than zero");
        }
        if self.execution.timeout_secs == Some(0) {
            bail!("execution.timeout_secs must be greater than zero");
        }
        Ok(())
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.server.bind, self.server.port)
    }

    /// Filesystem location of an allow-listed script.
    pub fn script_path(&self, script: &str) -> PathBuf {
        self.root.join(script)
    }

    pub fn index_path(&self) -> PathBuf {
        self.root.join(&self.index)
    }
}
