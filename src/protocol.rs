//! Line-oriented wire protocol spoken with the parent package manager.
//!
//! The daemon never sends anything on stdout except the sentinel lines
//! defined here, and never writes to its own stderr in normal operation —
//! diagnostics travel over `DEBUG`/`ERROR` so the client can log them.

use std::path::Path;
use tokio::io::{AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, Lines};

/// Writes sentinel-prefixed response lines to the client.
pub struct ResponseWriter<W> {
    inner: W,
}

impl<W: AsyncWrite + Unpin> ResponseWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    async fn send(&mut self, line: &str) -> std::io::Result<()> {
        self.inner.write_all(line.as_bytes()).await?;
        self.inner.write_all(b"\n").await?;
        self.inner.flush().await
    }

    pub async fn ready(&mut self) -> std::io::Result<()> {
        self.send("READY").await
    }

    pub async fn expect(&mut self, field: &str) -> std::io::Result<()> {
        self.send(&format!("EXPECT {field}")).await
    }

    pub async fn debug(&mut self, message: &str) -> std::io::Result<()> {
        tracing::debug!("{message}");
        self.send(&format!("DEBUG {message}")).await
    }

    pub async fn stdout_path(&mut self, path: &Path) -> std::io::Result<()> {
        self.send(&format!("STDOUT {}", path.display())).await
    }

    pub async fn stderr_path(&mut self, path: &Path) -> std::io::Result<()> {
        self.send(&format!("STDERR {}", path.display())).await
    }

    pub async fn ok(&mut self, value: &str) -> std::io::Result<()> {
        self.send(&format!("OK {value}")).await
    }

    pub async fn error(&mut self, kind: &str, message: &str) -> std::io::Result<()> {
        self.send(&format!("ERROR {kind} {message}")).await
    }

    pub async fn traceback(&mut self, path: Option<&Path>) -> std::io::Result<()> {
        match path {
            Some(path) => self.send(&format!("TRACEBACK {}", path.display())).await,
            None => self.send("TRACEBACK <none>").await,
        }
    }

    pub async fn shutdown(&mut self) -> std::io::Result<()> {
        self.send("SHUTDOWN").await
    }
}

/// Reads one raw reply line at a time from the client.
///
/// Unlike the response side, client replies carry no sentinel: whatever the
/// client sends in answer to an `EXPECT <field>` prompt is the literal value
/// (an empty line means "unspecified").
pub struct RequestReader<R> {
    lines: Lines<BufReader<R>>,
}

impl<R: tokio::io::AsyncRead + Unpin> RequestReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            lines: AsyncBufReadExt::lines(BufReader::new(inner)),
        }
    }

    /// Reads one line. `Ok(None)` means EOF, which the session loop treats
    /// the same as an explicit `shutdown`.
    pub async fn read_line(&mut self) -> std::io::Result<Option<String>> {
        self.lines.next_line().await
    }
}
