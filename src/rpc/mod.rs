//! JSON-RPC communication with the gonit daemon
//!
//! One request per connection: the client writes a single JSON line and reads
//! a single JSON line back, over a local socket or TCP.

pub mod api;
pub mod client;
pub mod naming;
pub mod protocol;
pub mod transport;

pub use api::{About, Action, ActionResult, Target};
pub use client::Client;
pub use transport::{Connection, Connector, Endpoint};
