//! One-shot TCP server emulating a parser backend.
//!
//! Accepts exactly one connection, accumulates input until the terminator
//! arrives (or the peer closes its side), writes the fixed JSON reply, and
//! closes both the connection and the listening socket. Lifecycle is linear:
//! LISTENING -> ACCEPTED -> READING -> RESPONDING -> CLOSED.

use crate::protocol::{self, ScanOutcome, CHUNK_SIZE};
use bytes::BytesMut;
use std::io;
use std::net::SocketAddr;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;
use tracing::{debug, trace};

/// A listener that serves exactly one connection, then stops listening.
pub struct OneShotServer {
    listener: TcpListener,
}

impl OneShotServer {
    /// Bind the listening socket without accepting yet.
    pub async fn bind(addr: &str) -> io::Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        debug!(address = %listener.local_addr()?, "Listening");
        Ok(OneShotServer { listener })
    }

    /// The actual bound address (useful when binding port 0).
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accept one connection, answer it, and shut down.
    ///
    /// Returns the bytes the peer sent, with the terminator stripped.
    /// The listening socket is released on return, so a second connection
    /// attempt will be refused.
    pub async fn serve(self) -> io::Result<Vec<u8>> {
        let (stream, addr) = self.listener.accept().await?;
        debug!(peer = %addr, "Connection accepted");
        handle_connection(stream).await
    }

    /// Like [`serve`](Self::serve), but the accept is raced against a
    /// shutdown signal so a test can stop a server nobody connected to.
    ///
    /// Returns `None` when shut down before a client arrived.
    pub async fn serve_until(
        self,
        shutdown: oneshot::Receiver<()>,
    ) -> io::Result<Option<Vec<u8>>> {
        tokio::select! {
            accepted = self.listener.accept() => {
                let (stream, addr) = accepted?;
                debug!(peer = %addr, "Connection accepted");
                Ok(Some(handle_connection(stream).await?))
            }
            _ = shutdown => {
                debug!("Shutdown requested before any connection arrived");
                Ok(None)
            }
        }
    }
}

/// Serve the single accepted connection.
async fn handle_connection(mut stream: TcpStream) -> io::Result<Vec<u8>> {
    let mut buffer = BytesMut::with_capacity(CHUNK_SIZE);

    loop {
        let n = stream.read_buf(&mut buffer).await?;
        if n == 0 {
            // Peer closed without a terminator; respond anyway
            trace!("Connection closed by client");
            break;
        }
        if protocol::scan(&buffer) == ScanOutcome::Complete {
            trace!(bytes = buffer.len(), "Terminator received");
            break;
        }
    }

    stream.write_all(protocol::RESPONSE).await?;
    stream.shutdown().await?;

    Ok(protocol::strip_terminator(&buffer).to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn bind_ephemeral() -> (OneShotServer, SocketAddr) {
        let server = OneShotServer::bind("127.0.0.1:0").await.unwrap();
        let addr = server.local_addr().unwrap();
        (server, addr)
    }

    #[tokio::test]
    async fn test_serve_responds_to_terminated_input() {
        let (server, addr) = bind_ephemeral().await;
        let handle = tokio::spawn(server.serve());

        let mut client = TcpStream::connect(addr).await.unwrap();
        client.write_all(b"hello\n<<END>>\n").await.unwrap();

        let mut reply = Vec::new();
        client.read_to_end(&mut reply).await.unwrap();
        assert_eq!(reply, protocol::RESPONSE);

        let received = handle.await.unwrap().unwrap();
        assert_eq!(received, b"hello");
    }

    #[tokio::test]
    async fn test_serve_responds_on_peer_close_without_terminator() {
        let (server, addr) = bind_ephemeral().await;
        let handle = tokio::spawn(server.serve());

        let mut client = TcpStream::connect(addr).await.unwrap();
        client.write_all(b"no terminator here").await.unwrap();
        client.shutdown().await.unwrap();

        let mut reply = Vec::new();
        client.read_to_end(&mut reply).await.unwrap();
        assert_eq!(reply, protocol::RESPONSE);

        let received = handle.await.unwrap().unwrap();
        assert_eq!(received, b"no terminator here");
    }

    #[tokio::test]
    async fn test_serve_handles_terminator_split_across_reads() {
        let (server, addr) = bind_ephemeral().await;
        let handle = tokio::spawn(server.serve());

        let mut client = TcpStream::connect(addr).await.unwrap();
        client.write_all(b"payload\n<<EN").await.unwrap();
        client.flush().await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        client.write_all(b"D>>\n").await.unwrap();

        let mut reply = Vec::new();
        client.read_to_end(&mut reply).await.unwrap();
        assert_eq!(reply, protocol::RESPONSE);

        let received = handle.await.unwrap().unwrap();
        assert_eq!(received, b"payload");
    }

    #[tokio::test]
    async fn test_serve_accepts_terminator_alone() {
        let (server, addr) = bind_ephemeral().await;
        let handle = tokio::spawn(server.serve());

        let mut client = TcpStream::connect(addr).await.unwrap();
        client.write_all(protocol::TERMINATOR).await.unwrap();

        let mut reply = Vec::new();
        client.read_to_end(&mut reply).await.unwrap();
        assert_eq!(reply, protocol::RESPONSE);

        let received = handle.await.unwrap().unwrap();
        assert!(received.is_empty());
    }

    #[tokio::test]
    async fn test_second_connection_is_refused() {
        let (server, addr) = bind_ephemeral().await;
        let handle = tokio::spawn(server.serve());

        let mut client = TcpStream::connect(addr).await.unwrap();
        client.write_all(b"only\n<<END>>\n").await.unwrap();
        let mut reply = Vec::new();
        client.read_to_end(&mut reply).await.unwrap();
        handle.await.unwrap().unwrap();

        // Listener is gone; nothing is accepting on that port anymore
        assert!(TcpStream::connect(addr).await.is_err());
    }

    #[tokio::test]
    async fn test_serve_until_shutdown_before_connect() {
        let (server, _addr) = bind_ephemeral().await;
        let (stop_tx, stop_rx) = oneshot::channel();
        let handle = tokio::spawn(server.serve_until(stop_rx));

        stop_tx.send(()).unwrap();
        let outcome = handle.await.unwrap().unwrap();
        assert!(outcome.is_none());
    }

    #[tokio::test]
    async fn test_serve_until_still_serves_a_client() {
        let (server, addr) = bind_ephemeral().await;
        let (_stop_tx, stop_rx) = oneshot::channel();
        let handle = tokio::spawn(server.serve_until(stop_rx));

        let mut client = TcpStream::connect(addr).await.unwrap();
        client.write_all(b"data\n<<END>>\n").await.unwrap();
        let mut reply = Vec::new();
        client.read_to_end(&mut reply).await.unwrap();
        assert_eq!(reply, protocol::RESPONSE);

        let received = handle.await.unwrap().unwrap();
        assert_eq!(received.as_deref(), Some(&b"data"[..]));
    }
}
