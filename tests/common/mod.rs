//! Shared utilities for integration tests.

use std::io::Write;
use std::net::SocketAddr;
use std::time::Duration;

use importbounce::config::ServiceConfig;
use importbounce::lifecycle::{startup, Shutdown};
use tempfile::NamedTempFile;
use tokio::net::TcpListener;

/// One package under go.example.com/foo.
pub const FOO_DOCUMENT: &str = r#"
[[packages]]
prefix = "go.example.com/foo"
import = "git https://github.com/x/foo"
redirect = "https://github.com/x/foo"
"#;

/// A running bouncer bound to an ephemeral port.
#[allow(dead_code)]
pub struct TestServer {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
    // Keeps the routing document alive for the server's lifetime.
    pub document: NamedTempFile,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Replace the routing document on disk.
    #[allow(dead_code)]
    pub fn rewrite_document(&self, contents: &str) {
        std::fs::write(self.document.path(), contents).unwrap();
    }
}

/// Write `contents` to a temp file and serve it through a `file://` source.
pub async fn start_server(contents: &str) -> TestServer {
    let mut document = NamedTempFile::new().unwrap();
    document.write_all(contents.as_bytes()).unwrap();

    let mut config = ServiceConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.source.url = format!("file://{}", document.path().display());

    let server = startup::build_server(&config).await.unwrap();
    let listener = TcpListener::bind(&config.listener.bind_address).await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    tokio::time::sleep(Duration::from_millis(50)).await;

    TestServer {
        addr,
        shutdown,
        document,
    }
}

/// Client that reports redirects instead of following them.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .no_proxy()
        .build()
        .unwrap()
}
