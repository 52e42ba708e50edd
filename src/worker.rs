//! Supervises the single, persistent Python worker subprocess that performs
//! the module import, attribute walk, and hook call (§4.J).
//!
//! The worker is spawned lazily on the first `run` request and reused for
//! the remainder of the session, which is what actually amortizes
//! interpreter startup — the thing this whole daemon exists for.

use crate::Error;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};

static WORKER_SOURCE: &str = include_str!("worker.py");

#[derive(Debug, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
enum WorkerRequest<'a> {
    Call {
        module: &'a str,
        attrs: &'a [String],
        hook: &'a str,
        kwargs: BTreeMap<&'a str, Value>,
        stdout_path: String,
        stderr_path: String,
        backend_path: Option<&'a str>,
        dotted_path: Option<&'a str>,
    },
    Shutdown,
}

/// The raw facts the worker reports back. Translating these into the
/// client-visible [`crate::error::HookError`] taxonomy is the daemon's job,
/// not the worker's.
#[derive(Debug, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum WorkerResponse {
    Ok {
        value: Value,
    },
    Error {
        kind: String,
        message: String,
        traceback: Option<String>,
        #[serde(default)]
        supported: Vec<String>,
    },
}

pub struct WorkerHandle {
    python: PathBuf,
    script_path: PathBuf,
    tree_root: PathBuf,
    child: Option<Child>,
    stdin: Option<ChildStdin>,
    stdout: Option<Lines<BufReader<ChildStdout>>>,
}

impl WorkerHandle {
    pub async fn new(python: PathBuf, tree_root: PathBuf) -> Result<Self, Error> {
        let script_path = std::env::temp_dir().join(format!("hookd-worker-{}.py", std::process::id()));
        fs_err::tokio::write(&script_path, WORKER_SOURCE).await?;

        Ok(Self {
            python,
            script_path,
            tree_root,
            child: None,
            stdin: None,
            stdout: None,
        })
    }

    async fn ensure_started(&mut self) -> Result<(), Error> {
        let alive = match self.child.as_mut() {
            Some(child) => child.try_wait()?.is_none(),
            None => false,
        };
        if alive {
            return Ok(());
        }

        let mut child = Command::new(&self.python)
            .arg(&self.script_path)
            .current_dir(&self.tree_root)
            .stdin(std::process::Stdio::piped())
            .stdout(std::process::Stdio::piped())
            .stderr(std::process::Stdio::null())
            .spawn()?;

        let stdout = child.stdout.take().expect("stdout is piped");
        self.stdout = Some(AsyncBufReadExt::lines(BufReader::new(stdout)));
        self.stdin = Some(child.stdin.take().expect("stdin is piped"));
        self.child = Some(child);
        Ok(())
    }

    /// Sends one `call` request and waits for the matching response.
    #[allow(clippy::too_many_arguments)]
    pub async fn call_hook(
        &mut self,
        module: &str,
        attrs: &[String],
        hook: &str,
        kwargs: BTreeMap<&str, Value>,
        stdout_path: &Path,
        stderr_path: &Path,
        backend_path: Option<&str>,
        dotted_path: Option<&str>,
    ) -> Result<WorkerResponse, Error> {
        self.ensure_started().await?;

        let request = WorkerRequest::Call {
            module,
            attrs,
            hook,
            kwargs,
            stdout_path: stdout_path.display().to_string(),
            stderr_path: stderr_path.display().to_string(),
            backend_path,
            dotted_path,
        };
        self.send(&request).await?;
        self.receive().await
    }

    async fn send(&mut self, request: &WorkerRequest<'_>) -> Result<(), Error> {
        let stdin = self.stdin.as_mut().expect("worker is started");
        let mut line = serde_json::to_string(request)
            .map_err(|err| Error::WorkerProtocol(err.to_string()))?;
        line.push('\n');
        stdin.write_all(line.as_bytes()).await?;
        stdin.flush().await?;
        Ok(())
    }

    async fn receive(&mut self) -> Result<WorkerResponse, Error> {
        let stdout = self.stdout.as_mut().expect("worker is started");
        match stdout.next_line().await? {
            Some(line) => serde_json::from_str(&line)
                .map_err(|err| Error::WorkerProtocol(format!("{err}: {line}"))),
            None => Err(Error::WorkerDied),
        }
    }

    /// Best-effort clean shutdown; used by the session loop's `shutdown`
    /// handler and as a `Drop` fallback.
    pub async fn shutdown(&mut self) {
        let still_running = match self.child.as_mut() {
            Some(child) => child.try_wait().ok().flatten().is_none(),
            None => return,
        };
        if still_running {
            if let Some(stdin) = self.stdin.as_mut() {
                if let Ok(mut line) = serde_json::to_string(&WorkerRequest::Shutdown) {
                    line.push('\n');
                    let _ = stdin.write_all(line.as_bytes()).await;
                    let _ = stdin.flush().await;
                }
            }
        }
        if let Some(child) = self.child.as_mut() {
            let _ = child.wait().await;
        }
    }
}

impl Drop for WorkerHandle {
    fn drop(&mut self) {
        let _ = fs_err::remove_file(&self.script_path);
    }
}
