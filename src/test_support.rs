//! Minimal scripted HTTP/1.1 server for tests.
//!
//! Each request is answered by a handler closure that sees the method, path,
//! query and how many times that method+path was requested before. Responses
//! always carry `Connection: close`, so every request arrives on a fresh
//! connection.

use std::collections::HashMap;
use std::io::Write;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// How long a stalled response keeps its connection open without sending.
const STALL_HOLD: Duration = Duration::from_secs(60);

/// A request as seen by the handler.
#[derive(Debug, Clone)]
pub struct Request {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    /// 0-based count of earlier requests with the same method and path.
    pub index: usize,
}

/// What the server sends back.
#[derive(Debug, Clone)]
pub enum Reply {
    /// 200 with the full body.
    Body(Vec<u8>),
    /// The given status with an empty body.
    Status(u16),
    /// 200 advertising `content_length`, sending `prefix`, then going silent.
    Stall {
        content_length: usize,
        prefix: Vec<u8>,
    },
}

type Handler = dyn Fn(&Request) -> Reply + Send + Sync;

pub struct TestServer {
    base: String,
    hits: Arc<Mutex<HashMap<(String, String), usize>>>,
}

impl TestServer {
    /// Bind an ephemeral port and serve requests with `handler`.
    pub async fn start<F>(handler: F) -> Self
    where
        F: Fn(&Request) -> Reply + Send + Sync + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let port = listener.local_addr().expect("local addr").port();
        let hits = Arc::new(Mutex::new(HashMap::new()));
        let handler: Arc<Handler> = Arc::new(handler);

        let server_hits = Arc::clone(&hits);
        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let handler = Arc::clone(&handler);
                let hits = Arc::clone(&server_hits);
                tokio::spawn(async move { handle(stream, handler, hits).await });
            }
        });

        Self {
            base: format!("http://127.0.0.1:{}", port),
            hits,
        }
    }

    /// Absolute URL for a path on this server.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    /// Requests seen for a method and path.
    pub fn hits(&self, method: &str, path: &str) -> usize {
        let hits = self.hits.lock().unwrap();
        hits.get(&(method.to_string(), path.to_string()))
            .copied()
            .unwrap_or(0)
    }

    /// Requests seen for a path, any method.
    pub fn total_hits(&self, path: &str) -> usize {
        let hits = self.hits.lock().unwrap();
        hits.iter()
            .filter(|((_, p), _)| p == path)
            .map(|(_, count)| *count)
            .sum()
    }
}

async fn handle(
    mut stream: TcpStream,
    handler: Arc<Handler>,
    hits: Arc<Mutex<HashMap<(String, String), usize>>>,
) {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        let n = match stream.read(&mut chunk).await {
            Ok(0) | Err(_) => return,
            Ok(n) => n,
        };
        buf.extend_from_slice(&chunk[..n]);
        if buf.windows(4).any(|w| w == b"\r\n\r\n") {
            break;
        }
    }

    let head = String::from_utf8_lossy(&buf);
    let mut parts = head.lines().next().unwrap_or_default().split_whitespace();
    let method = parts.next().unwrap_or_default().to_string();
    let target = parts.next().unwrap_or("/");
    let (path, query) = match target.split_once('?') {
        Some((path, query)) => (path.to_string(), Some(query.to_string())),
        None => (target.to_string(), None),
    };

    let index = {
        let mut hits = hits.lock().unwrap();
        let count = hits.entry((method.clone(), path.clone())).or_insert(0);
        let index = *count;
        *count += 1;
        index
    };

    let request = Request {
        method,
        path,
        query,
        index,
    };
    let head_only = request.method == "HEAD";

    match handler(&request) {
        Reply::Body(body) => {
            let _ = write_response(&mut stream, 200, body.len(), &body, head_only).await;
        }
        Reply::Status(code) => {
            let _ = write_response(&mut stream, code, 0, b"", head_only).await;
        }
        Reply::Stall {
            content_length,
            prefix,
        } => {
            let _ = write_response(&mut stream, 200, content_length, &prefix, head_only).await;
            if !head_only {
                tokio::time::sleep(STALL_HOLD).await;
            }
        }
    }

    let _ = stream.shutdown().await;
}

async fn write_response(
    stream: &mut TcpStream,
    status: u16,
    content_length: usize,
    body: &[u8],
    head_only: bool,
) -> std::io::Result<()> {
    let mut response = Vec::new();
    write!(
        response,
        "HTTP/1.1 {} Scripted\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        status, content_length
    )?;
    if !head_only {
        response.extend_from_slice(body);
    }
    stream.write_all(&response).await?;
    stream.flush().await
}

/// Build an in-memory ZIP archive from `(name, contents)` pairs.
pub fn zip_archive(members: &[(&str, &str)]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(std::io::Cursor::new(Vec::new()));
    let options = zip::write::SimpleFileOptions::default()
        .compression_method(zip::CompressionMethod::Deflated);

    for (name, contents) in members {
        writer.start_file(*name, options).expect("start zip member");
        writer.write_all(contents.as_bytes()).expect("write zip member");
    }

    writer.finish().expect("finish zip").into_inner()
}
