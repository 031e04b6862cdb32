//! gonit client - talk to the gonit process supervisor
//!
//! This library sends line-delimited JSON-RPC requests to a gonit daemon over
//! a local socket or TCP, and provides the `gonitctl` command-line front end.
//!
//! ```rust,ignore
//! use gonit_client::Client;
//! use serde_json::json;
//!
//! let client = Client::default(); // ~/.gonit.sock
//! let status = client.call("status_process", vec![json!("nginx")]).await?;
//! let outcome = client.stop_group("web").await?;
//! ```

pub mod cli;
pub mod commands;
pub mod common;
pub mod rpc;

// Re-export commonly used types
pub use common::{Error, Result, RpcError};
pub use rpc::{Client, Endpoint};
