//! Test server management.
//!
//! Spawns and manages telchatd instances for integration testing. Every
//! instance uses the offline echo backend, so no model endpoint is needed.

use std::path::{Path, PathBuf};
use std::process::{Child, Command, Output};
use std::time::Duration;
use tempfile::TempDir;
use tokio::time::sleep;

/// Path of the daemon binary built by cargo for this test run.
pub fn binary_path() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_telchatd"))
}

/// Minimal configuration for `port`, followed by `extra` TOML.
pub fn config_for(port: u16, extra: &str) -> String {
    format!(
        r#"
[server]
name = "test.telchatd"
metrics_port = 0

[listen]
address = "127.0.0.1:{port}"

[generator]
backend = "echo"

{extra}
"#
    )
}

/// A test server instance.
pub struct TestServer {
    child: Child,
    port: u16,
    _dir: TempDir,
}

impl TestServer {
    /// Spawn a server with the default session settings and a `> ` prompt.
    pub async fn spawn(port: u16) -> anyhow::Result<Self> {
        Self::spawn_with(port, "[session]\nprompt = \"> \"\n").await
    }

    /// Spawn a server with extra TOML appended to the base configuration.
    pub async fn spawn_with(port: u16, extra: &str) -> anyhow::Result<Self> {
        let dir = tempfile::tempdir()?;
        let config_path = dir.path().join("config.toml");
        std::fs::write(&config_path, config_for(port, extra))?;

        let child = Command::new(binary_path()).arg(&config_path).spawn()?;

        let server = Self {
            child,
            port,
            _dir: dir,
        };
        server.wait_until_ready().await?;
        Ok(server)
    }

    /// Wait until the server is accepting connections.
    async fn wait_until_ready(&self) -> anyhow::Result<()> {
        for _ in 0..30 {
            if tokio::net::TcpStream::connect(("127.0.0.1", self.port))
                .await
                .is_ok()
            {
                return Ok(());
            }
            sleep(Duration::from_millis(100)).await;
        }
        anyhow::bail!("Server failed to start within 3 seconds")
    }

    /// Get the server address.
    pub fn address(&self) -> String {
        format!("127.0.0.1:{}", self.port)
    }

    /// Create a new test client connected to this server.
    pub async fn connect(&self) -> anyhow::Result<super::client::TestClient> {
        super::client::TestClient::connect(&self.address()).await
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

/// Run the daemon against `config_path` to completion.
#[allow(dead_code)]
pub fn run_to_exit(config_path: &Path) -> std::io::Result<Output> {
    Command::new(binary_path()).arg(config_path).output()
}
