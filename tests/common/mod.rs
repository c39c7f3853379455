//! Minimal stand-in for the BTT webserver.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

#[derive(Clone, Copy)]
struct Behaviour {
    status: u16,
    body: &'static str,
    delay: Option<Duration>,
    keep_alive: bool,
}

/// A local HTTP server answering every request with one canned response.
pub struct MockBtt {
    pub port: u16,
    requests: Arc<Mutex<Vec<String>>>,
    connections: Arc<AtomicUsize>,
    handle: JoinHandle<()>,
}

impl MockBtt {
    /// Reply with `status` and `body`, closing the connection afterwards.
    pub async fn start(status: u16, body: &'static str) -> Self {
        Self::spawn(Behaviour {
            status,
            body,
            delay: None,
            keep_alive: false,
        })
        .await
    }

    /// Reply with `200` and `body`, keeping connections open for reuse.
    pub async fn keep_alive(body: &'static str) -> Self {
        Self::spawn(Behaviour {
            status: 200,
            body,
            delay: None,
            keep_alive: true,
        })
        .await
    }

    /// Accept connections but wait `delay` before answering.
    pub async fn stalled(delay: Duration) -> Self {
        Self::spawn(Behaviour {
            status: 200,
            body: "",
            delay: Some(delay),
            keep_alive: false,
        })
        .await
    }

    async fn spawn(behaviour: Behaviour) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let connections = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&requests);
        let accepted = Arc::clone(&connections);

        let handle = tokio::spawn(async move {
            loop {
                let Ok((socket, _)) = listener.accept().await else {
                    return;
                };
                accepted.fetch_add(1, Ordering::SeqCst);
                tokio::spawn(serve(socket, behaviour, Arc::clone(&seen)));
            }
        });

        Self {
            port,
            requests,
            connections,
            handle,
        }
    }

    /// Request lines received so far, e.g. `GET /get_trigger/?uuid=... HTTP/1.1`.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    /// TCP connections accepted so far.
    pub fn connections(&self) -> usize {
        self.connections.load(Ordering::SeqCst)
    }
}

async fn serve(
    mut socket: tokio::net::TcpStream,
    behaviour: Behaviour,
    seen: Arc<Mutex<Vec<String>>>,
) {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];

    loop {
        let end = loop {
            if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                break pos + 4;
            }
            match socket.read(&mut chunk).await {
                Ok(0) | Err(_) => return,
                Ok(n) => buf.extend_from_slice(&chunk[..n]),
            }
        };
        let head: Vec<u8> = buf.drain(..end).collect();
        let head = String::from_utf8_lossy(&head).into_owned();
        let line = head.lines().next().unwrap_or_default().to_string();
        seen.lock().unwrap().push(line);

        if let Some(delay) = behaviour.delay {
            tokio::time::sleep(delay).await;
        }

        let connection = if behaviour.keep_alive { "keep-alive" } else { "close" };
        let response = format!(
            "HTTP/1.1 {} Mock\r\nContent-Type: text/plain\r\nContent-Length: {}\r\nConnection: {}\r\n\r\n{}",
            behaviour.status,
            behaviour.body.len(),
            connection,
            behaviour.body
        );
        if socket.write_all(response.as_bytes()).await.is_err() {
            return;
        }
        if !behaviour.keep_alive {
            let _ = socket.shutdown().await;
            return;
        }
    }
}

impl Drop for MockBtt {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// A port nothing listens on.
pub async fn closed_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap().port()
}
