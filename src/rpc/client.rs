//! RPC client for the gonit daemon
//!
//! Every call opens its own connection, writes one request line, reads one
//! response line and closes the connection again. No state is kept between
//! calls apart from where to connect.

use std::time::Instant;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::io::BufReader;
use tracing::{debug, trace};

use crate::common::{Error, Result};

use super::protocol::{Request, Response};
use super::transport::{self, Connection, Connector, Endpoint};

/// Client for the gonit daemon's JSON-RPC API
///
/// Generic over how connections are opened; the default connects to an
/// [`Endpoint`].
#[derive(Debug, Clone)]
pub struct Client<C = Endpoint> {
    connector: C,
}

impl Client<Endpoint> {
    /// Create a client for an endpoint string (`tcp://host:port` or a socket path)
    pub fn new(endpoint: &str) -> Result<Self> {
        Ok(Self::with_connector(Endpoint::parse(endpoint)?))
    }

    /// Get the endpoint this client connects to
    pub fn endpoint(&self) -> &Endpoint {
        &self.connector
    }
}

impl Default for Client<Endpoint> {
    /// Client for the daemon's default socket, `~/.gonit.sock`
    fn default() -> Self {
        Self::with_connector(Endpoint::default())
    }
}

impl<C: Connector> Client<C> {
    /// Create a client that opens connections through `connector`
    pub fn with_connector(connector: C) -> Self {
        Self { connector }
    }

    /// Get the connector
    pub fn connector(&self) -> &C {
        &self.connector
    }

    /// Call an operation on the daemon
    ///
    /// `name` is an operation name such as `stop_group`; it is sent as
    /// `API.StopGroup`. Returns the response's `result`, which may be null.
    pub async fn call(&self, name: &str, params: Vec<Value>) -> Result<Value> {
        let start = Instant::now();
        let request = Request::new(name, params);

        let conn = self
            .connector
            .connect()
            .await
            .map_err(|source| Error::Connect {
                endpoint: self.connector.describe(),
                source,
            })?;

        let outcome = exchange(conn, &request).await;

        debug!(
            method = %request.method,
            ok = outcome.is_ok(),
            elapsed_ms = start.elapsed().as_micros() as f64 / 1000.0,
            "RPC call finished"
        );

        outcome
    }

    /// Call an operation and decode its result
    pub async fn call_as<T: DeserializeOwned>(&self, name: &str, params: Vec<Value>) -> Result<T> {
        let result = self.call(name, params).await?;
        Ok(serde_json::from_value(result)?)
    }
}

/// Write the request and read the response over a fresh connection
///
/// Takes ownership of `conn`, so it is dropped (and closed) exactly once on
/// every return path.
async fn exchange(mut conn: Connection, request: &Request) -> Result<Value> {
    let payload = serde_json::to_vec(request)?;
    trace!(request = %String::from_utf8_lossy(&payload), "Sending request");

    transport::write_line(&mut conn, &payload).await?;

    let line = {
        let mut reader = BufReader::new(&mut conn);
        transport::read_line(&mut reader).await?
    };
    trace!(response = %String::from_utf8_lossy(&line), "Received response");

    let response = Response::parse(&line)?;
    Ok(response.into_result()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::RpcError;
    use async_trait::async_trait;
    use serde_json::json;
    use std::io::{self, Cursor};
    use std::pin::Pin;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use std::task::{Context, Poll};
    use tokio::io::{AsyncRead, AsyncWrite, ReadBuf};

    /// Counters shared between a scripted connector and the test
    #[derive(Default)]
    struct Tally {
        opened: AtomicUsize,
        closed: AtomicUsize,
        written: Mutex<Vec<u8>>,
    }

    /// Connector that hands out in-memory streams replaying a canned reply
    struct ScriptedConnector {
        reply: &'static [u8],
        fail_writes: bool,
        tally: Arc<Tally>,
    }

    impl ScriptedConnector {
        fn replying(reply: &'static [u8]) -> (Self, Arc<Tally>) {
            let tally = Arc::new(Tally::default());
            let connector = Self {
                reply,
                fail_writes: false,
                tally: Arc::clone(&tally),
            };
            (connector, tally)
        }

        fn written_request(tally: &Tally) -> Value {
            let written = tally.written.lock().unwrap();
            assert_eq!(written.last(), Some(&b'\n'), "request must end with newline");
            serde_json::from_slice(&written[..written.len() - 1]).unwrap()
        }
    }

    #[async_trait]
    impl Connector for ScriptedConnector {
        async fn connect(&self) -> io::Result<Connection> {
            self.tally.opened.fetch_add(1, Ordering::SeqCst);
            Ok(Box::pin(ScriptedStream {
                reply: Cursor::new(self.reply.to_vec()),
                fail_writes: self.fail_writes,
                tally: Arc::clone(&self.tally),
            }))
        }
    }

    struct ScriptedStream {
        reply: Cursor<Vec<u8>>,
        fail_writes: bool,
        tally: Arc<Tally>,
    }

    impl AsyncRead for ScriptedStream {
        fn poll_read(
            self: Pin<&mut Self>,
            cx: &mut Context<'_>,
            buf: &mut ReadBuf<'_>,
        ) -> Poll<io::Result<()>> {
            Pin::new(&mut self.get_mut().reply).poll_read(cx, buf)
        }
    }

    impl AsyncWrite for ScriptedStream {
        fn poll_write(
            self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
            data: &[u8],
        ) -> Poll<io::Result<usize>> {
            if self.fail_writes {
                return Poll::Ready(Err(io::Error::from(io::ErrorKind::BrokenPipe)));
            }
            self.tally.written.lock().unwrap().extend_from_slice(data);
            Poll::Ready(Ok(data.len()))
        }

        fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
            Poll::Ready(Ok(()))
        }

        fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
            Poll::Ready(Ok(()))
        }
    }

    impl Drop for ScriptedStream {
        fn drop(&mut self) {
            self.tally.closed.fetch_add(1, Ordering::SeqCst);
        }
    }

    struct RefusingConnector;

    #[async_trait]
    impl Connector for RefusingConnector {
        async fn connect(&self) -> io::Result<Connection> {
            Err(io::Error::from(io::ErrorKind::ConnectionRefused))
        }

        fn describe(&self) -> String {
            "nowhere".to_string()
        }
    }

    fn assert_closed_once(tally: &Tally) {
        assert_eq!(tally.opened.load(Ordering::SeqCst), 1);
        assert_eq!(tally.closed.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_status_process() {
        let (connector, tally) = ScriptedConnector::replying(b"{\"result\": {\"license\": \"gfl\"}}\n");
        let client = Client::with_connector(connector);

        let result = client.call("status_process", vec![json!("gofy")]).await.unwrap();

        assert_eq!(result, json!({"license": "gfl"}));
        assert_eq!(
            ScriptedConnector::written_request(&tally),
            json!({"method": "API.StatusProcess", "params": ["gofy"]})
        );
        assert_closed_once(&tally);
    }

    #[tokio::test]
    async fn test_stop_group() {
        let (connector, tally) =
            ScriptedConnector::replying(b"{\"result\": {\"location\": \"oleg's trunk\"}}\n");
        let client = Client::with_connector(connector);

        let result = client
            .call("stop_group", vec![json!("bosh_animal_eraser")])
            .await
            .unwrap();

        assert_eq!(result, json!({"location": "oleg's trunk"}));
        assert_eq!(
            ScriptedConnector::written_request(&tally),
            json!({"method": "API.StopGroup", "params": ["bosh_animal_eraser"]})
        );
        assert_closed_once(&tally);
    }

    #[tokio::test]
    async fn test_server_error() {
        let (connector, tally) = ScriptedConnector::replying(b"{\"error\": \"pancakes\"}\n");
        let client = Client::with_connector(connector);

        let err = client
            .call("monitor_group", vec![json!("dogs")])
            .await
            .unwrap_err();

        match err {
            Error::Rpc(RpcError::Server(message)) => assert!(message.contains("pancakes")),
            other => panic!("Expected server error, got {:?}", other),
        }
        assert_eq!(
            ScriptedConnector::written_request(&tally),
            json!({"method": "API.MonitorGroup", "params": ["dogs"]})
        );
        assert_closed_once(&tally);
    }

    #[tokio::test]
    async fn test_unparseable_response() {
        let (connector, tally) = ScriptedConnector::replying(b"nonsense\n");
        let client = Client::with_connector(connector);

        let err = client.call("about", vec![]).await.unwrap_err();

        match err {
            Error::Rpc(e @ RpcError::Parse { .. }) => assert!(e.message().contains("nonsense")),
            other => panic!("Expected parse error, got {:?}", other),
        }
        assert_closed_once(&tally);
    }

    #[tokio::test]
    async fn test_invalid_utf8_response() {
        let (connector, tally) = ScriptedConnector::replying(b"non\xffsense\n");
        let client = Client::with_connector(connector);

        let err = client.call("about", vec![]).await.unwrap_err();

        match err {
            Error::Rpc(e @ RpcError::Parse { .. }) => {
                let message = e.message();
                assert!(message.contains("non"));
                assert!(message.contains("sense"));
            }
            other => panic!("Expected parse error, got {:?}", other),
        }
        assert_closed_once(&tally);
    }

    #[tokio::test]
    async fn test_null_result() {
        let (connector, tally) = ScriptedConnector::replying(b"{\"id\":null,\"result\":null,\"error\":null}\n");
        let client = Client::with_connector(connector);

        assert_eq!(client.call("reload", vec![]).await.unwrap(), Value::Null);
        assert_closed_once(&tally);
    }

    #[tokio::test]
    async fn test_connection_closed_without_reply() {
        let (connector, tally) = ScriptedConnector::replying(b"");
        let client = Client::with_connector(connector);

        let err = client.call("quit", vec![]).await.unwrap_err();

        match err {
            Error::Io(e) => assert_eq!(e.kind(), io::ErrorKind::UnexpectedEof),
            other => panic!("Expected I/O error, got {:?}", other),
        }
        assert_closed_once(&tally);
    }

    #[tokio::test]
    async fn test_write_failure_closes_connection() {
        let (mut connector, tally) = ScriptedConnector::replying(b"{\"result\": 1}\n");
        connector.fail_writes = true;
        let client = Client::with_connector(connector);

        let err = client.call("stop_all", vec![]).await.unwrap_err();

        match err {
            Error::Io(e) => assert_eq!(e.kind(), io::ErrorKind::BrokenPipe),
            other => panic!("Expected I/O error, got {:?}", other),
        }
        assert_closed_once(&tally);
    }

    #[tokio::test]
    async fn test_connect_failure() {
        let client = Client::with_connector(RefusingConnector);

        let err = client.call("about", vec![]).await.unwrap_err();

        match err {
            Error::Connect { endpoint, source } => {
                assert_eq!(endpoint, "nowhere");
                assert_eq!(source.kind(), io::ErrorKind::ConnectionRefused);
            }
            other => panic!("Expected connect error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_each_call_opens_its_own_connection() {
        let (connector, tally) = ScriptedConnector::replying(b"{\"result\": true}\n");
        let client = Client::with_connector(connector);

        client.call("about", vec![]).await.unwrap();
        client.call("about", vec![]).await.unwrap();

        assert_eq!(tally.opened.load(Ordering::SeqCst), 2);
        assert_eq!(tally.closed.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_call_as_decodes_result() {
        let (connector, _tally) = ScriptedConnector::replying(b"{\"result\": [1, 2, 3]}\n");
        let client = Client::with_connector(connector);

        let numbers: Vec<u32> = client.call_as("numbers", vec![]).await.unwrap();
        assert_eq!(numbers, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_call_as_type_mismatch() {
        let (connector, _tally) = ScriptedConnector::replying(b"{\"result\": \"text\"}\n");
        let client = Client::with_connector(connector);

        let err = client.call_as::<u32>("numbers", vec![]).await.unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }

    #[test]
    fn test_client_creation() {
        let client = Client::new("/tmp/test.sock").unwrap();
        assert_eq!(
            client.endpoint(),
            &Endpoint::Local(std::path::PathBuf::from("/tmp/test.sock"))
        );
    }

    #[test]
    fn test_default_client() {
        let client = Client::default();
        assert!(client.endpoint().to_string().ends_with(".gonit.sock"));
    }
}
