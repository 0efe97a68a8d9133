//! Thin client for the mock parser backend.
//!
//! Frames a payload with the protocol terminator, ships it over TCP, and
//! reads the backend's reply until the connection closes. Also fetches
//! remote source files into a temp file so they can be sent the same way.

use crate::protocol;
use std::io;
use std::path::Path;
use tempfile::NamedTempFile;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::debug;

/// Send a payload to the backend and return its reply.
///
/// The payload is framed with the terminator; the write half is shut down
/// afterwards so a backend waiting on end-of-stream also completes. The
/// reply is whatever the backend sends before closing.
pub async fn send_to_server(addr: &str, payload: &[u8]) -> io::Result<Vec<u8>> {
    let mut stream = TcpStream::connect(addr).await?;
    debug!(%addr, bytes = payload.len(), "Sending payload");

    stream.write_all(&protocol::frame(payload)).await?;
    stream.shutdown().await?;

    let mut reply = Vec::new();
    stream.read_to_end(&mut reply).await?;
    debug!(bytes = reply.len(), "Reply received");
    Ok(reply)
}

/// Read a source file and send its contents to the backend.
pub async fn send_file(addr: &str, path: &Path) -> io::Result<Vec<u8>> {
    let contents = tokio::fs::read(path).await?;
    send_to_server(addr, &contents).await
}

/// Errors from fetching a remote source file.
#[derive(Debug)]
pub enum FetchError {
    /// The URL scheme is not file, http, or https.
    UnsupportedScheme(String),
    /// Local file access failed.
    Io(io::Error),
    /// HTTP request failed or returned a non-success status.
    Http(reqwest::Error),
}

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchError::UnsupportedScheme(url) => {
                write!(f, "Unsupported URL scheme: {}", url)
            }
            FetchError::Io(e) => write!(f, "Failed to read source: {}", e),
            FetchError::Http(e) => write!(f, "Failed to download source: {}", e),
        }
    }
}

impl std::error::Error for FetchError {}

impl From<io::Error> for FetchError {
    fn from(e: io::Error) -> Self {
        FetchError::Io(e)
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        FetchError::Http(e)
    }
}

/// Fetch a source file into a named temp file.
///
/// `file://` URLs are copied straight from disk; `http(s)://` URLs are
/// downloaded. The temp file is removed when the returned handle drops.
pub async fn fetch_source(url: &str) -> Result<NamedTempFile, FetchError> {
    let contents = if let Some(path) = url.strip_prefix("file://") {
        tokio::fs::read(path).await?
    } else if url.starts_with("http://") || url.starts_with("https://") {
        let response = reqwest::get(url).await?.error_for_status()?;
        response.bytes().await?.to_vec()
    } else {
        return Err(FetchError::UnsupportedScheme(url.to_string()));
    };

    debug!(%url, bytes = contents.len(), "Source fetched");

    let file = NamedTempFile::new()?;
    std::fs::write(file.path(), &contents)?;
    Ok(file)
}
