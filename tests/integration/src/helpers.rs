//! Test helpers for spawning a hive-server and sending commands.

use std::net::TcpListener as StdTcpListener;
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

/// A hive-server subprocess managed by the test harness.
pub struct TestServer {
    child: Child,
    pub port: u16,
}

impl TestServer {
    /// Starts a new hive-server on a random free port.
    ///
    /// Blocks until the server is accepting connections (up to 5 seconds).
    pub fn start() -> Self {
        let binary = server_binary();
        let port = find_free_port();

        let child = Command::new(&binary)
            .arg("--host")
            .arg("127.0.0.1")
            .arg("--port")
            .arg(port.to_string())
            // suppress tracing output in tests
            .env("RUST_LOG", "error")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .unwrap_or_else(|e| {
                panic!("failed to spawn hive-server at {}: {e}", binary.display())
            });

        // wait for the server to be ready
        let deadline = std::time::Instant::now() + Duration::from_secs(5);
        loop {
            if std::time::Instant::now() > deadline {
                panic!("hive-server failed to start within 5 seconds on port {port}");
            }
            if std::net::TcpStream::connect(format!("127.0.0.1:{port}")).is_ok() {
                break;
            }
            std::thread::sleep(Duration::from_millis(50));
        }

        Self { child, port }
    }

    /// Connects a test client to this server.
    pub async fn connect(&self) -> TestClient {
        TestClient::connect(self.port).await
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

/// A line-protocol client. The protocol has no reply framing — a
/// multi-element reply is just elements joined by newlines — so the
/// caller states how many lines it expects.
pub struct TestClient {
    stream: TcpStream,
    buf: Vec<u8>,
}

impl TestClient {
    pub async fn connect(port: u16) -> Self {
        let stream = TcpStream::connect(format!("127.0.0.1:{port}"))
            .await
            .expect("failed to connect to test server");
        Self {
            stream,
            buf: Vec::new(),
        }
    }

    /// Sends one command and reads its single-line reply.
    pub async fn cmd(&mut self, line: &str) -> String {
        self.cmd_lines(line, 1).await.remove(0)
    }

    /// Sends one command and reads a reply of exactly `lines` lines.
    pub async fn cmd_lines(&mut self, line: &str, lines: usize) -> Vec<String> {
        self.stream
            .write_all(format!("{line}\n").as_bytes())
            .await
            .expect("write failed");
        self.read_lines(lines).await
    }

    /// Sends a command expected to reply `OK`.
    pub async fn ok(&mut self, line: &str) {
        let reply = self.cmd(line).await;
        assert_eq!(reply, "OK", "expected OK from '{line}', got '{reply}'");
    }

    /// Writes raw bytes without reading anything back. Used by the
    /// pipelining tests.
    pub async fn send_raw(&mut self, bytes: &[u8]) {
        self.stream.write_all(bytes).await.expect("write failed");
    }

    /// Reads exactly `lines` newline-terminated lines.
    pub async fn read_lines(&mut self, lines: usize) -> Vec<String> {
        while self.buf.iter().filter(|&&b| b == b'\n').count() < lines {
            let mut chunk = [0u8; 4096];
            let read = tokio::time::timeout(
                Duration::from_secs(5),
                self.stream.read(&mut chunk),
            )
            .await
            .expect("timed out waiting for reply")
            .expect("read failed");
            assert!(read > 0, "server closed the connection");
            self.buf.extend_from_slice(&chunk[..read]);
        }

        let mut result = Vec::with_capacity(lines);
        for _ in 0..lines {
            let pos = self.buf.iter().position(|&b| b == b'\n').unwrap();
            let line: Vec<u8> = self.buf.drain(..=pos).collect();
            result.push(String::from_utf8_lossy(&line[..pos]).into_owned());
        }
        result
    }
}

/// Locates the hive-server binary next to the test executable.
fn server_binary() -> PathBuf {
    let mut path = std::env::current_exe().expect("test executable path");
    path.pop(); // deps/
    path.pop(); // debug/ (or release/)
    path.push("hive-server");
    path
}

/// Asks the OS for a free port by binding to port 0 and releasing it.
fn find_free_port() -> u16 {
    StdTcpListener::bind("127.0.0.1:0")
        .expect("failed to bind probe socket")
        .local_addr()
        .expect("probe socket has no local addr")
        .port()
}
