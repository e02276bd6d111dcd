//! Test terminal client.
//!
//! Sends raw bytes and collects raw output, since the server's responses are
//! unframed terminal text rather than protocol messages.

use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::time::timeout;

/// A test terminal client.
pub struct TestClient {
    reader: OwnedReadHalf,
    writer: OwnedWriteHalf,
    pending: Vec<u8>,
}

impl TestClient {
    /// Connect to a test server.
    pub async fn connect(address: &str) -> anyhow::Result<Self> {
        let stream = TcpStream::connect(address).await?;
        let (reader, writer) = stream.into_split();
        Ok(Self {
            reader,
            writer,
            pending: Vec::new(),
        })
    }

    /// Send raw bytes exactly as given.
    pub async fn send_raw(&mut self, bytes: &[u8]) -> anyhow::Result<()> {
        self.writer.write_all(bytes).await?;
        self.writer.flush().await?;
        Ok(())
    }

    /// Send a line, appending `\r\n`.
    pub async fn send_line(&mut self, line: &str) -> anyhow::Result<()> {
        self.send_raw(format!("{line}\r\n").as_bytes()).await
    }

    /// Read until the output so far contains `marker`; return everything up
    /// to and including it.
    pub async fn recv_until(&mut self, marker: &str) -> anyhow::Result<String> {
        self.recv_until_timeout(marker, Duration::from_secs(5)).await
    }

    pub async fn recv_until_timeout(
        &mut self,
        marker: &str,
        dur: Duration,
    ) -> anyhow::Result<String> {
        let marker = marker.as_bytes();
        timeout(dur, async {
            loop {
                if let Some(pos) = find(&self.pending, marker) {
                    let rest = self.pending.split_off(pos + marker.len());
                    let out = std::mem::replace(&mut self.pending, rest);
                    return Ok(String::from_utf8_lossy(&out).into_owned());
                }
                let mut buf = [0u8; 1024];
                let n = self.reader.read(&mut buf).await?;
                if n == 0 {
                    anyhow::bail!(
                        "connection closed before {:?}; got {:?}",
                        String::from_utf8_lossy(marker),
                        String::from_utf8_lossy(&self.pending)
                    );
                }
                self.pending.extend_from_slice(&buf[..n]);
            }
        })
        .await?
    }

    /// Read until the server closes the connection.
    pub async fn recv_to_close(&mut self) -> anyhow::Result<String> {
        let mut out = std::mem::take(&mut self.pending);
        timeout(Duration::from_secs(5), self.reader.read_to_end(&mut out)).await??;
        Ok(String::from_utf8_lossy(&out).into_owned())
    }
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}
