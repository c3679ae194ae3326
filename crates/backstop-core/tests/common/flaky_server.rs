//! Minimal HTTP/1.1 server with scriptable failures for integration tests.
//!
//! Serves a scripted sequence of status codes (one per request, last one
//! repeating), or hangs without responding to exercise attempt timeouts.

use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Handle to a running test server.
pub struct FlakyServer {
    /// Base URL, e.g. "http://127.0.0.1:12345/".
    pub url: String,
    hits: Arc<AtomicUsize>,
}

impl FlakyServer {
    /// Number of requests the server has received.
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

/// Starts a server in a background thread answering request N with
/// `statuses[N]` (the last status repeats once the script runs out).
/// The server runs until the process exits.
pub fn start(statuses: Vec<u16>) -> FlakyServer {
    assert!(!statuses.is_empty(), "need at least one status");
    start_inner(Behavior::Statuses(statuses))
}

/// Starts a server that accepts connections, reads the request, and never
/// responds. Used to make client-side timeouts fire.
pub fn start_hanging() -> FlakyServer {
    start_inner(Behavior::Hang)
}

enum Behavior {
    Statuses(Vec<u16>),
    Hang,
}

fn start_inner(behavior: Behavior) -> FlakyServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let hits = Arc::new(AtomicUsize::new(0));
    let hits_srv = Arc::clone(&hits);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let n = hits_srv.fetch_add(1, Ordering::SeqCst);
            match &behavior {
                Behavior::Statuses(statuses) => {
                    let status = *statuses.get(n).unwrap_or(statuses.last().unwrap());
                    handle(stream, status);
                }
                Behavior::Hang => {
                    thread::spawn(move || hang(stream));
                }
            }
        }
    });
    FlakyServer {
        url: format!("http://127.0.0.1:{}/", port),
        hits,
    }
}

fn handle(mut stream: std::net::TcpStream, status: u16) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(2)));
    let mut buf = [0u8; 4096];
    if stream.read(&mut buf).unwrap_or(0) == 0 {
        return;
    }
    let reason = match status {
        200 => "OK",
        204 => "No Content",
        401 => "Unauthorized",
        404 => "Not Found",
        500 => "Internal Server Error",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        _ => "Status",
    };
    let response = format!(
        "HTTP/1.1 {} {}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
        status, reason
    );
    let _ = stream.write_all(response.as_bytes());
}

fn hang(mut stream: std::net::TcpStream) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let mut buf = [0u8; 4096];
    let _ = stream.read(&mut buf);
    // Hold the connection open without answering.
    thread::sleep(Duration::from_secs(60));
}
