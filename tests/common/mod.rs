//! Shared fixtures for integration tests
//!
//! `TestServer` is a minimal HTTP/1.1 server on a local port. It records the
//! headers of every request and answers each one with the same canned
//! response, always closing the connection afterwards.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tempfile::TempDir;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

/// What the server sends back
#[derive(Debug, Clone, Copy)]
pub enum Reply {
    /// 200 with `len` pattern bytes, with or without a Content-Length header
    Body { len: usize, declare_length: bool },
    /// An empty response with the given status
    Status(u16),
    /// Declares `declared` bytes but sends only `sent` before closing
    Truncated { declared: usize, sent: usize },
    /// Declares `declared` bytes, sends `sent`, then hangs
    Stall { declared: usize, sent: usize },
}

impl Reply {
    pub fn body(len: usize) -> Self {
        Reply::Body {
            len,
            declare_length: true,
        }
    }
}

/// A request as seen by the server
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub request_line: String,
    pub headers: Vec<(String, String)>,
}

impl RecordedRequest {
    /// Header value by case-insensitive name
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

pub struct TestServer {
    addr: SocketAddr,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    handle: JoinHandle<()>,
}

impl TestServer {
    pub async fn start(reply: Reply) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let requests = Arc::new(Mutex::new(Vec::new()));

        let recorded = Arc::clone(&requests);
        let handle = tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let recorded = Arc::clone(&recorded);
                tokio::spawn(async move {
                    let _ = serve(stream, reply, recorded).await;
                });
            }
        });

        Self {
            addr,
            requests,
            handle,
        }
    }

    /// URL of a file on this server
    pub fn url(&self, path: &str) -> String {
        format!("http://{}/{}", self.addr, path.trim_start_matches('/'))
    }

    /// Requests received so far
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn serve(
    stream: TcpStream,
    reply: Reply,
    recorded: Arc<Mutex<Vec<RecordedRequest>>>,
) -> std::io::Result<()> {
    let mut reader = BufReader::new(stream);

    let mut request_line = String::new();
    reader.read_line(&mut request_line).await?;

    let mut headers = Vec::new();
    loop {
        let mut line = String::new();
        if reader.read_line(&mut line).await? == 0 {
            break;
        }
        let line = line.trim_end();
        if line.is_empty() {
            break;
        }
        if let Some((key, value)) = line.split_once(':') {
            headers.push((key.trim().to_string(), value.trim().to_string()));
        }
    }

    recorded.lock().unwrap().push(RecordedRequest {
        request_line: request_line.trim_end().to_string(),
        headers,
    });

    let mut stream = reader.into_inner();
    match reply {
        Reply::Body {
            len,
            declare_length,
        } => {
            let length_header = if declare_length {
                format!("Content-Length: {}\r\n", len)
            } else {
                String::new()
            };
            stream
                .write_all(
                    format!(
                        "HTTP/1.1 200 OK\r\nContent-Type: application/octet-stream\r\n{}Connection: close\r\n\r\n",
                        length_header
                    )
                    .as_bytes(),
                )
                .await?;
            write_pattern(&mut stream, len).await?;
        }
        Reply::Status(status) => {
            stream
                .write_all(
                    format!(
                        "HTTP/1.1 {} Error\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
                        status
                    )
                    .as_bytes(),
                )
                .await?;
        }
        Reply::Truncated { declared, sent } => {
            write_length_header(&mut stream, declared).await?;
            write_pattern(&mut stream, sent).await?;
        }
        Reply::Stall { declared, sent } => {
            write_length_header(&mut stream, declared).await?;
            write_pattern(&mut stream, sent).await?;
            stream.flush().await?;
            tokio::time::sleep(Duration::from_secs(60)).await;
        }
    }

    stream.flush().await?;
    stream.shutdown().await
}

async fn write_length_header(stream: &mut TcpStream, declared: usize) -> std::io::Result<()> {
    stream
        .write_all(
            format!(
                "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                declared
            )
            .as_bytes(),
        )
        .await
}

async fn write_pattern(stream: &mut TcpStream, len: usize) -> std::io::Result<()> {
    const BLOCK: usize = 64 * 1024;
    let mut written = 0;
    while written < len {
        let n = BLOCK.min(len - written);
        let block: Vec<u8> = (written..written + n).map(pattern_byte).collect();
        stream.write_all(&block).await?;
        written += n;
    }
    Ok(())
}

/// Byte served at `offset`
pub fn pattern_byte(offset: usize) -> u8 {
    (offset % 251) as u8
}

/// Whether `data` is exactly the served pattern
pub fn matches_pattern(data: &[u8]) -> bool {
    data.iter()
        .enumerate()
        .all(|(offset, byte)| *byte == pattern_byte(offset))
}

/// Write a shell script used as the downstream application
pub fn write_script(dir: &TempDir, name: &str, body: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, body).unwrap();
    path
}

/// Script that records it ran by touching `marker`, then exits with `code`
pub fn marker_script(dir: &TempDir, marker: &Path, code: i32) -> PathBuf {
    write_script(
        dir,
        "launch.sh",
        &format!("touch '{}'\nexit {}\n", marker.display(), code),
    )
}
