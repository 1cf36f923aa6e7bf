//! Loopback HTTP server serving canned JSON bodies to the source clients.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::runtime::Runtime;
use url::Url;

/// One canned response.
#[derive(Debug, Clone)]
pub struct CannedRoute {
    path: String,
    offset: Option<usize>,
    status: u16,
    body: String,
}

impl CannedRoute {
    /// Answer `GET {path}` with a 200 JSON body.
    pub fn json(path: &str, body: serde_json::Value) -> Self {
        Self {
            path: path.to_owned(),
            offset: None,
            status: 200,
            body: body.to_string(),
        }
    }

    /// Answer `GET {path}` with a raw body and status.
    pub fn raw(path: &str, status: u16, body: &str) -> Self {
        Self {
            path: path.to_owned(),
            offset: None,
            status,
            body: body.to_owned(),
        }
    }

    /// Match only requests carrying `resultOffset={offset}`.
    pub fn at_offset(mut self, offset: usize) -> Self {
        self.offset = Some(offset);
        self
    }

    fn matches(&self, path: &str, offset: Option<usize>) -> bool {
        self.path == path && self.offset.is_none_or(|wanted| offset == Some(wanted))
    }
}

/// Running fake server; stops with its runtime.
pub struct FakeServer {
    addr: SocketAddr,
    requests: Arc<Mutex<Vec<Url>>>,
}

impl FakeServer {
    /// Bind to an ephemeral loopback port and serve `routes` on `runtime`.
    pub fn start(runtime: &Runtime, routes: Vec<CannedRoute>) -> Self {
        let listener = runtime
            .block_on(TcpListener::bind("127.0.0.1:0"))
            .expect("bind loopback listener");
        let addr = listener.local_addr().expect("listener address");
        let requests = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&requests);
        let shared = Arc::new(routes);
        runtime.spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let table = Arc::clone(&shared);
                let seen = Arc::clone(&log);
                tokio::spawn(async move {
                    serve(stream, &table, &seen).await;
                });
            }
        });
        Self { addr, requests }
    }

    /// Absolute URL for `path` on this server.
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    /// Requests received so far, in arrival order.
    pub fn requests(&self) -> Vec<Url> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

/// Read a query parameter from a recorded request.
pub fn query_param(url: &Url, name: &str) -> Option<String> {
    url.query_pairs()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
}

async fn serve(mut stream: TcpStream, routes: &[CannedRoute], seen: &Mutex<Vec<Url>>) {
    let mut head = Vec::new();
    let mut buf = [0_u8; 1024];
    while !head.windows(4).any(|window| window == b"\r\n\r\n") {
        match stream.read(&mut buf).await {
            Ok(0) | Err(_) => return,
            Ok(read) => head.extend_from_slice(buf.get(..read).unwrap_or_default()),
        }
    }
    let text = String::from_utf8_lossy(&head);
    let target = text
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .unwrap_or("/");
    let Ok(url) = Url::parse(&format!("http://loopback{target}")) else {
        return;
    };
    seen.lock()
        .unwrap_or_else(PoisonError::into_inner)
        .push(url.clone());

    let offset = query_param(&url, "resultOffset").and_then(|raw| raw.parse().ok());
    let (status, body) = routes
        .iter()
        .find(|route| route.matches(url.path(), offset))
        .map_or((404, r#"{"message":"not found"}"#), |route| {
            (route.status, route.body.as_str())
        });
    let response = format!(
        "HTTP/1.1 {status} Canned\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );
    if stream.write_all(response.as_bytes()).await.is_ok() {
        stream.shutdown().await.ok();
    }
}
