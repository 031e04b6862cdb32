//! RPC transport layer
//!
//! The daemon listens either on a local socket (Unix domain socket, or a named
//! pipe on Windows via the interprocess crate) or on a TCP port. Messages are
//! newline-delimited.

use std::fmt;
use std::io;
use std::path::PathBuf;
use std::pin::Pin;

use async_trait::async_trait;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;
use url::Url;

use crate::common::{paths, Error, Result};

/// Maximum response line size (10 MB), not counting the line terminator
pub const MAX_LINE_SIZE: usize = 10 * 1024 * 1024;

#[cfg(unix)]
mod platform {
    pub use interprocess::local_socket::tokio::{prelude::*, Stream};
    pub use interprocess::local_socket::GenericFilePath;
}

#[cfg(windows)]
mod platform {
    pub use interprocess::local_socket::tokio::{prelude::*, Stream};
    pub use interprocess::local_socket::GenericNamespaced;
}

use platform::*;

/// A bidirectional byte stream to the daemon
pub trait AsyncStream: AsyncRead + AsyncWrite + Send {}

impl<T: AsyncRead + AsyncWrite + Send> AsyncStream for T {}

/// An open connection. Dropping it closes the connection.
pub type Connection = Pin<Box<dyn AsyncStream>>;

/// Opens a fresh connection to the daemon for every call
#[async_trait]
pub trait Connector: Send + Sync {
    /// Open a new connection
    async fn connect(&self) -> io::Result<Connection>;

    /// Human-readable description of where connections go, for errors and logs
    fn describe(&self) -> String {
        "custom transport".to_string()
    }
}

/// Where the daemon listens
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    /// Local socket at a filesystem path
    Local(PathBuf),
    /// TCP host and port
    Tcp { host: String, port: u16 },
}

impl Endpoint {
    /// Parse an endpoint string
    ///
    /// - `tcp://host:port` connects over TCP
    /// - `unix:///path/to/socket` uses the URL's path
    /// - anything else is taken as a socket path as-is
    pub fn parse(endpoint: &str) -> Result<Self> {
        if endpoint.is_empty() {
            return Err(Error::invalid_endpoint(endpoint, "empty endpoint"));
        }

        match Url::parse(endpoint) {
            Ok(url) if url.scheme() == "tcp" => {
                let host = url
                    .host_str()
                    .filter(|h| !h.is_empty())
                    .ok_or_else(|| Error::invalid_endpoint(endpoint, "missing host"))?;
                let port = url
                    .port()
                    .ok_or_else(|| Error::invalid_endpoint(endpoint, "missing port"))?;
                // IPv6 literals come back bracketed
                let host = host.trim_start_matches('[').trim_end_matches(']');
                Ok(Self::Tcp {
                    host: host.to_string(),
                    port,
                })
            }
            Ok(url) if url.scheme() == "unix" => {
                if url.path().is_empty() {
                    return Err(Error::invalid_endpoint(endpoint, "missing socket path"));
                }
                Ok(Self::Local(PathBuf::from(url.path())))
            }
            Err(e) if endpoint.starts_with("tcp:") => {
                Err(Error::invalid_endpoint(endpoint, e.to_string()))
            }
            _ => Ok(Self::Local(PathBuf::from(endpoint))),
        }
    }

    /// Check whether this is a TCP endpoint
    pub fn is_tcp(&self) -> bool {
        matches!(self, Self::Tcp { .. })
    }
}

impl Default for Endpoint {
    /// The daemon's default socket, `~/.gonit.sock`
    fn default() -> Self {
        Self::Local(paths::default_socket_path())
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local(path) => write!(f, "{}", path.display()),
            Self::Tcp { host, port } if host.contains(':') => write!(f, "tcp://[{}]:{}", host, port),
            Self::Tcp { host, port } => write!(f, "tcp://{}:{}", host, port),
        }
    }
}

impl std::str::FromStr for Endpoint {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

#[async_trait]
impl Connector for Endpoint {
    async fn connect(&self) -> io::Result<Connection> {
        match self {
            Self::Local(path) => {
                #[cfg(unix)]
                let name = path.as_path().to_fs_name::<GenericFilePath>()?;

                // Named pipes live in their own namespace; the file name picks the pipe
                #[cfg(windows)]
                let name = path
                    .file_name()
                    .unwrap_or(path.as_os_str())
                    .to_ns_name::<GenericNamespaced>()?;

                let stream = Stream::connect(name).await?;
                Ok(Box::pin(stream))
            }
            Self::Tcp { host, port } => {
                let stream = TcpStream::connect((host.as_str(), *port)).await?;
                stream.set_nodelay(true)?;
                Ok(Box::pin(stream))
            }
        }
    }

    fn describe(&self) -> String {
        self.to_string()
    }
}

/// Send a newline-terminated message
pub async fn write_line<W: AsyncWrite + Unpin + ?Sized>(writer: &mut W, data: &[u8]) -> io::Result<()> {
    writer.write_all(data).await?;
    writer.write_all(b"\n").await?;
    writer.flush().await?;
    Ok(())
}

/// Receive one message line, without its line terminator
///
/// The line is returned as raw bytes; decoding is left to the caller. A
/// connection closed before any byte arrives is `UnexpectedEof`. A final line
/// cut off by EOF is returned as-is.
pub async fn read_line<R: AsyncBufRead + Unpin + ?Sized>(reader: &mut R) -> io::Result<Vec<u8>> {
    let mut line = Vec::new();
    // Room for the longest allowed line plus `\r\n`
    let read = (&mut *reader)
        .take(MAX_LINE_SIZE as u64 + 2)
        .read_until(b'\n', &mut line)
        .await?;

    if read == 0 {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "Connection closed before a response was received",
        ));
    }

    if line.ends_with(b"\n") {
        line.pop();
        if line.ends_with(b"\r") {
            line.pop();
        }
    }

    if line.len() > MAX_LINE_SIZE {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("Response too large: more than {} bytes", MAX_LINE_SIZE),
        ));
    }

    Ok(line)
}
