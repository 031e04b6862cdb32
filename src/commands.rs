//! CLI command definitions
//!
//! Defines the clap commands for gonitctl.

use clap::Subcommand;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start a process, a group (with -g), or all
    Start {
        /// Process or group name, or 'all'
        name: String,
    },

    /// Stop a process, a group (with -g), or all
    Stop {
        /// Process or group name, or 'all'
        name: String,
    },

    /// Restart a process, a group (with -g), or all
    Restart {
        /// Process or group name, or 'all'
        name: String,
    },

    /// Enable monitoring of a process, a group (with -g), or all
    Monitor {
        /// Process or group name, or 'all'
        name: String,
    },

    /// Disable monitoring of a process, a group (with -g), or all
    Unmonitor {
        /// Process or group name, or 'all'
        name: String,
    },

    /// Print status info (default: all)
    Status {
        /// Process or group name, or 'all'
        name: Option<String>,
    },

    /// Show daemon version information
    About,

    /// Reload the daemon configuration
    Reload,

    /// Shut the daemon down
    Quit,

    /// Call an arbitrary API method
    Call {
        /// Operation name, e.g. stop_group or StopGroup
        method: String,

        /// Parameters; each is parsed as JSON (so 123, true and null keep
        /// their JSON type), or sent as a string if it isn't
        params: Vec<String>,

        /// Send every parameter as a string, e.g. for a process named "123"
        #[arg(long)]
        raw: bool,
    },
}
