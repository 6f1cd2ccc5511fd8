//! Newline-delimited JSON-RPC over plain TCP.
//!
//! Each line a client sends is one request (or batch); each request that
//! expects an answer gets exactly one response line. This is the framing
//! older farm-monitoring tools use.

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use futures::SinkExt;
use tokio::net::{TcpListener, TcpStream};
use tokio_stream::StreamExt;
use tokio_util::codec::{Framed, LinesCodec};
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

use super::server::ApiServer;
use crate::tracing::prelude::*;

/// Longest request line accepted before the connection is dropped.
pub const MAX_LINE_LENGTH: usize = 64 * 1024;

/// Accept connections on `listener` until `shutdown` is cancelled, then
/// wait for open connections to finish.
pub async fn serve(
    listener: TcpListener,
    server: Arc<ApiServer>,
    shutdown: CancellationToken,
) -> io::Result<()> {
    info!(addr = %listener.local_addr()?, "TCP JSON-RPC listening");
    let connections = TaskTracker::new();

    loop {
        tokio::select! {
            accepted = listener.accept() => {
                match accepted {
                    Ok((stream, peer)) => {
                        debug!(%peer, "API connection opened");
                        connections.spawn(connection(stream, peer, server.clone(), shutdown.clone()));
                    }
                    Err(e) => {
                        warn!(error = %e, "Failed to accept API connection");
                    }
                }
            }

            _ = shutdown.cancelled() => {
                break;
            }
        }
    }

    connections.close();
    connections.wait().await;
    debug!("TCP JSON-RPC stopped");
    Ok(())
}

async fn connection(
    stream: TcpStream,
    peer: SocketAddr,
    server: Arc<ApiServer>,
    shutdown: CancellationToken,
) {
    let mut framed = Framed::new(stream, LinesCodec::new_with_max_length(MAX_LINE_LENGTH));

    loop {
        let line = tokio::select! {
            line = framed.next() => line,
            _ = shutdown.cancelled() => break,
        };

        match line {
            Some(Ok(line)) => {
                if line.trim().is_empty() {
                    continue;
                }
                if let Some(response) = server.handle(&line) {
                    if let Err(e) = framed.send(response).await {
                        debug!(%peer, error = %e, "Failed to write API response");
                        break;
                    }
                }
            }
            Some(Err(e)) => {
                warn!(%peer, error = %e, "Dropping API connection");
                break;
            }
            None => break,
        }
    }

    debug!(%peer, "API connection closed");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::farm::{Farm, FarmError, ProgressDetail, SolutionStats, WorkingProgress};
    use crate::rpc::ProtocolVersion;
    use serde_json::{Value, json};
    use std::time::Instant;
    use std::time::Duration;
    use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};

    struct EmptyFarm(Instant);

    impl Farm for EmptyFarm {
        fn solution_stats(&self) -> Result<SolutionStats, FarmError> {
            Ok(SolutionStats::default())
        }

        fn progress(&self, _detail: ProgressDetail) -> Result<WorkingProgress, FarmError> {
            Err(FarmError::NoDevices)
        }

        fn launch_time(&self) -> Instant {
            self.0
        }

        fn pool_addresses(&self) -> Result<String, FarmError> {
            Ok("pool.example:4444".into())
        }

        fn restart(&self) -> Result<(), FarmError> {
            Ok(())
        }
    }

    fn empty_server() -> Arc<ApiServer> {
        Arc::new(
            ApiServer::new(ProtocolVersion::V1V2, Arc::new(EmptyFarm(Instant::now())), false)
                .unwrap(),
        )
    }

    #[tokio::test]
    async fn test_oversized_line_drops_connection() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let shutdown = CancellationToken::new();
        let task = tokio::spawn(serve(listener, empty_server(), shutdown.clone()));

        let mut stream = TcpStream::connect(addr).await.unwrap();
        let mut payload = vec![b'a'; MAX_LINE_LENGTH + 6 * 1024];
        payload.push(b'\n');
        payload.extend_from_slice(b"{\"jsonrpc\":\"2.0\",\"method\":\"viner_getstat1\",\"id\":1}\n");
        // The server may close before reading everything, so a failed write
        // is acceptable here.
        let _ = stream.write_all(&payload).await;

        let mut received = Vec::new();
        let closed = tokio::time::timeout(Duration::from_secs(5), stream.read_to_end(&mut received))
            .await
            .expect("connection was not closed");
        // A reset is as good as a clean close; either way nothing was answered.
        if let Err(e) = closed {
            assert_eq!(e.kind(), io::ErrorKind::ConnectionReset);
        }
        assert!(received.is_empty());

        shutdown.cancel();
        task.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_line_protocol() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let shutdown = CancellationToken::new();
        let task = tokio::spawn(serve(listener, empty_server(), shutdown.clone()));

        let stream = TcpStream::connect(addr).await.unwrap();
        let (reader, mut writer) = stream.into_split();
        let mut lines = BufReader::new(reader).lines();

        // Notification first: must produce no line.
        writer
            .write_all(b"{\"jsonrpc\":\"2.0\",\"method\":\"viner_reboot\"}\n")
            .await
            .unwrap();
        writer
            .write_all(b"{\"method\":\"viner_reboot\",\"params\":[],\"id\":1}\n")
            .await
            .unwrap();
        let response: Value = serde_json::from_str(&lines.next_line().await.unwrap().unwrap()).unwrap();
        assert_eq!(response, json!({"result": {}, "error": null, "id": 1}));

        writer
            .write_all(b"{\"jsonrpc\":\"2.0\",\"method\":\"viner_getstathr\",\"id\":2}\n")
            .await
            .unwrap();
        let response: Value = serde_json::from_str(&lines.next_line().await.unwrap().unwrap()).unwrap();
        assert_eq!(response["error"]["code"], json!(-32603));
        assert_eq!(response["error"]["message"], json!("no mining devices"));
        assert!(response.get("result").is_none());

        shutdown.cancel();
        task.await.unwrap().unwrap();
    }
}
