//! Launch configuration for the process adapter

use super::ContainerKind;
use crate::core::paths;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

/// How to run one container kind as a child process
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandSpec {
    pub program: String,
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default)]
    pub env: BTreeMap<String, String>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>) -> Self { Self { program: program.into(), ..Default::default() } }
    pub fn arg(mut self, arg: impl Into<String>) -> Self { self.args.push(arg.into()); self }
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self { self.env.insert(key.into(), value.into()); self }
}

/// Workspace configuration. Usually loaded from the JSON config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LaunchConfig {
    /// Prefix for container ids
    pub workspace: String,
    /// Root folder for per-container logs
    pub data_dir: PathBuf,
    /// A child that dies within this window counts as a failed start
    #[serde(with = "millis")]
    pub startup_grace: Duration,
    pub containers: BTreeMap<ContainerKind, CommandSpec>,
}

impl Default for LaunchConfig {
    fn default() -> Self {
        Self {
            workspace: paths::DEFAULT_WORKSPACE.into(),
            data_dir: default_data_dir(),
            startup_grace: Duration::from_millis(500),
            containers: BTreeMap::new(),
        }
    }
}

impl LaunchConfig {
    pub fn new(workspace: impl Into<String>) -> Self { Self { workspace: workspace.into(), ..Default::default() } }
    pub fn with_data_dir(mut self, path: impl Into<PathBuf>) -> Self { self.data_dir = path.into(); self }
    pub fn with_startup_grace(mut self, grace: Duration) -> Self { self.startup_grace = grace; self }
    pub fn with_container(mut self, kind: ContainerKind, spec: CommandSpec) -> Self { self.containers.insert(kind, spec); self }

    pub fn command(&self, kind: ContainerKind) -> Option<&CommandSpec> { self.containers.get(&kind) }

    /// `{data_dir}/{container}/log/{container}.log`
    pub fn log_path(&self, kind: ContainerKind) -> PathBuf {
        let name = kind.container_name();
        self.data_dir.join(name).join("log").join(format!("{}.log", name))
    }

    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> { serde_json::from_str(raw) }
}

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir().unwrap_or_else(|| PathBuf::from(".")).join(paths::SERVICE_NAME)
}

mod millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_millis(u64::deserialize(d)?))
    }
}
