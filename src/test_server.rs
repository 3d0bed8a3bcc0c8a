//! Scripted HTTP/1.1 server for exercising probes against real sockets.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use url::Url;

pub(crate) struct TestServer {
    pub url: Url,
    hits: Arc<AtomicUsize>,
}

impl TestServer {
    /// Answer the n-th request with `statuses[n]`; the last status repeats.
    pub async fn start(statuses: Vec<u16>) -> Self {
        Self::start_with_delay(statuses, Duration::ZERO).await
    }

    /// Like [`TestServer::start`], holding every response back for `delay`.
    pub async fn start_with_delay(statuses: Vec<u16>, delay: Duration) -> Self {
        assert!(!statuses.is_empty());
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let hits = Arc::new(AtomicUsize::new(0));

        let counter = hits.clone();
        tokio::spawn(async move {
            loop {
                let Ok((stream, _)) = listener.accept().await else {
                    break;
                };
                let n = counter.fetch_add(1, Ordering::SeqCst);
                let status = statuses[n.min(statuses.len() - 1)];
                tokio::spawn(respond(stream, status, delay));
            }
        });

        TestServer {
            url: Url::parse(&format!("http://{addr}/")).unwrap(),
            hits,
        }
    }

    /// Number of requests accepted so far.
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

async fn respond(mut stream: TcpStream, status: u16, delay: Duration) {
    let mut request = Vec::new();
    let mut buf = [0u8; 1024];
    while !request.windows(4).any(|w| w == b"\r\n\r\n") {
        match stream.read(&mut buf).await {
            Ok(0) | Err(_) => return,
            Ok(n) => request.extend_from_slice(&buf[..n]),
        }
    }

    tokio::time::sleep(delay).await;

    let response =
        format!("HTTP/1.1 {status} Scripted\r\ncontent-length: 2\r\nconnection: close\r\n\r\nok");
    let _ = stream.write_all(response.as_bytes()).await;
    let _ = stream.shutdown().await;
}

/// URL of a local port nothing listens on.
pub(crate) async fn refused_url() -> Url {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    Url::parse(&format!("http://{addr}/")).unwrap()
}
