//! Typed wrappers for the daemon's API
//!
//! The daemon exposes one method per action and scope (`API.StartProcess`,
//! `API.StopGroup`, `API.RestartAll`, ...) plus a few server-level methods.
//! The wrappers here only pick the operation name and parameters and forward
//! to [`Client::call`].

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::common::Result;

use super::client::Client;
use super::transport::Connector;

/// What to do with a process, group or everything
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Start,
    Stop,
    Restart,
    Monitor,
    Unmonitor,
    Status,
}

impl Action {
    /// Operation name prefix, as used on the command line
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Stop => "stop",
            Self::Restart => "restart",
            Self::Monitor => "monitor",
            Self::Unmonitor => "unmonitor",
            Self::Status => "status",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What an action applies to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// A single process
    Process(String),
    /// A process group
    Group(String),
    /// Every configured process
    All,
}

impl Target {
    /// Interpret a command-line name; `all` means every process
    pub fn from_cli(name: &str, is_group: bool) -> Self {
        if name == "all" {
            Self::All
        } else if is_group {
            Self::Group(name.to_string())
        } else {
            Self::Process(name.to_string())
        }
    }

    fn scope(&self) -> &'static str {
        match self {
            Self::Process(_) => "process",
            Self::Group(_) => "group",
            Self::All => "all",
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Process(name) => write!(f, "process '{}'", name),
            Self::Group(name) => write!(f, "group '{}'", name),
            Self::All => f.write_str("all"),
        }
    }
}

/// Operation name and parameters for an action on a target
///
/// `(Stop, Group("web"))` becomes `("stop_group", ["web"])`; targeting
/// everything sends no parameters.
pub fn rpc_method(action: Action, target: &Target) -> (String, Vec<Value>) {
    let name = format!("{}_{}", action.as_str(), target.scope());
    let params = match target {
        Target::Process(name) | Target::Group(name) => vec![Value::String(name.clone())],
        Target::All => Vec::new(),
    };
    (name, params)
}

/// Outcome of a start/stop/restart/monitor/unmonitor request
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ActionResult {
    /// Number of processes the action was applied to
    #[serde(default)]
    pub total: u64,
    /// Number of processes for which it failed
    #[serde(default)]
    pub errors: u64,
}

impl ActionResult {
    pub fn is_success(&self) -> bool {
        self.errors == 0
    }
}

/// Daemon identification
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct About {
    #[serde(rename = "Version", default)]
    pub version: String,
    #[serde(rename = "Id", default)]
    pub id: String,
    /// How many times the daemon has been (re)started
    #[serde(rename = "Incaration", default)]
    pub incarnation: u64,
}

impl<C: Connector> Client<C> {
    /// Run an action against a target
    pub async fn run(&self, action: Action, target: &Target) -> Result<Value> {
        let (name, params) = rpc_method(action, target);
        self.call(&name, params).await
    }

    async fn act(&self, action: Action, target: Target) -> Result<ActionResult> {
        let (name, params) = rpc_method(action, &target);
        self.call_as(&name, params).await
    }

    // === Single process ===

    pub async fn start_process(&self, name: &str) -> Result<ActionResult> {
        self.act(Action::Start, Target::Process(name.to_string())).await
    }

    pub async fn stop_process(&self, name: &str) -> Result<ActionResult> {
        self.act(Action::Stop, Target::Process(name.to_string())).await
    }

    pub async fn restart_process(&self, name: &str) -> Result<ActionResult> {
        self.act(Action::Restart, Target::Process(name.to_string())).await
    }

    pub async fn monitor_process(&self, name: &str) -> Result<ActionResult> {
        self.act(Action::Monitor, Target::Process(name.to_string())).await
    }

    pub async fn unmonitor_process(&self, name: &str) -> Result<ActionResult> {
        self.act(Action::Unmonitor, Target::Process(name.to_string())).await
    }

    pub async fn status_process(&self, name: &str) -> Result<Value> {
        self.run(Action::Status, &Target::Process(name.to_string())).await
    }

    // === Process group ===

    pub async fn start_group(&self, name: &str) -> Result<ActionResult> {
        self.act(Action::Start, Target::Group(name.to_string())).await
    }

    pub async fn stop_group(&self, name: &str) -> Result<ActionResult> {
        self.act(Action::Stop, Target::Group(name.to_string())).await
    }

    pub async fn restart_group(&self, name: &str) -> Result<ActionResult> {
        self.act(Action::Restart, Target::Group(name.to_string())).await
    }

    pub async fn monitor_group(&self, name: &str) -> Result<ActionResult> {
        self.act(Action::Monitor, Target::Group(name.to_string())).await
    }

    pub async fn unmonitor_group(&self, name: &str) -> Result<ActionResult> {
        self.act(Action::Unmonitor, Target::Group(name.to_string())).await
    }

    pub async fn status_group(&self, name: &str) -> Result<Value> {
        self.run(Action::Status, &Target::Group(name.to_string())).await
    }

    // === All processes ===

    pub async fn start_all(&self) -> Result<ActionResult> {
        self.act(Action::Start, Target::All).await
    }

    pub async fn stop_all(&self) -> Result<ActionResult> {
        self.act(Action::Stop, Target::All).await
    }

    pub async fn restart_all(&self) -> Result<ActionResult> {
        self.act(Action::Restart, Target::All).await
    }

    pub async fn monitor_all(&self) -> Result<ActionResult> {
        self.act(Action::Monitor, Target::All).await
    }

    pub async fn unmonitor_all(&self) -> Result<ActionResult> {
        self.act(Action::Unmonitor, Target::All).await
    }

    pub async fn status_all(&self) -> Result<Value> {
        self.run(Action::Status, &Target::All).await
    }

    // === Daemon ===

    /// Daemon version and identity
    pub async fn about(&self) -> Result<About> {
        self.call_as("about", Vec::new()).await
    }

    /// Ask the daemon to reload its configuration
    pub async fn reload(&self) -> Result<Value> {
        self.call("reload", Vec::new()).await
    }

    /// Ask the daemon to exit
    pub async fn quit(&self) -> Result<Value> {
        self.call("quit", Vec::new()).await
    }
}
