//! The top-level state machine (§4.B): emit `READY`, prompt for an action,
//! dispatch, loop. Strictly sequential — there is no request pipelining.

use crate::backend::BackendSpec;
use crate::capture;
use crate::dispatch;
use crate::error::HookError;
use crate::hook::{ArgKind, HookKind};
use crate::protocol::{RequestReader, ResponseWriter};
use crate::request::{decode_backend_path, decode_config_settings, decode_directory};
use crate::value::{format_py_path, format_py_value, format_return_value};
use crate::worker::WorkerHandle;
use crate::Error;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tokio::io::{AsyncRead, AsyncWrite};

/// Why the session loop stopped; the caller maps this to a process exit
/// code (§6: 0 for both, since a signal-encoded exit happens outside this
/// loop entirely).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    Shutdown,
    Eof,
}

pub struct Session<R, W> {
    reader: RequestReader<R>,
    writer: ResponseWriter<W>,
    tree_root: PathBuf,
    worker: WorkerHandle,
}

impl<R: AsyncRead + Unpin, W: AsyncWrite + Unpin> Session<R, W> {
    pub fn new(reader: R, writer: W, tree_root: PathBuf, worker: WorkerHandle) -> Self {
        Self {
            reader: RequestReader::new(reader),
            writer: ResponseWriter::new(writer),
            tree_root,
            worker,
        }
    }

    pub async fn run(mut self) -> Result<ExitReason, Error> {
        self.writer
            .debug(&format!("Changed working directory to {}", self.tree_root.display()))
            .await?;

        loop {
            self.writer.ready().await?;
            self.writer.expect("action").await?;

            let Some(action) = self.reader.read_line().await? else {
                self.worker.shutdown().await;
                return Ok(ExitReason::Eof);
            };

            match action.as_str() {
                "shutdown" => {
                    self.worker.shutdown().await;
                    self.writer.shutdown().await?;
                    return Ok(ExitReason::Shutdown);
                }
                "run" => {
                    if self.handle_run().await?.is_none() {
                        self.worker.shutdown().await;
                        return Ok(ExitReason::Eof);
                    }
                }
                other => {
                    self.report_error(&HookError::unknown_action(other)).await?;
                }
            }
        }
    }

    /// Runs one `run` request end to end. `Ok(None)` signals the client
    /// disconnected mid-request (treated like EOF at the action prompt).
    async fn handle_run(&mut self) -> Result<Option<()>, Error> {
        self.writer.expect("build-backend").await?;
        let Some(backend_raw) = self.reader.read_line().await? else {
            return Ok(None);
        };
        self.writer.expect("backend-path").await?;
        let Some(backend_path_raw) = self.reader.read_line().await? else {
            return Ok(None);
        };
        self.writer.expect("hook-name").await?;
        let Some(hook_name_raw) = self.reader.read_line().await? else {
            return Ok(None);
        };

        let spec = BackendSpec::parse(&backend_raw);
        let backend_path = decode_backend_path(&backend_path_raw);

        let Some(hook) = HookKind::from_wire_name(&hook_name_raw) else {
            self.report_error(&HookError::invalid_hook_name(&hook_name_raw)).await?;
            return Ok(Some(()));
        };

        let parse_start = Instant::now();
        let mut debug_parts = Vec::new();
        let mut kwargs: BTreeMap<&str, Value> = BTreeMap::new();

        for arg in hook.arg_schema() {
            self.writer.expect(arg.name).await?;
            let Some(raw) = self.reader.read_line().await? else {
                return Ok(None);
            };

            match arg.kind {
                ArgKind::Directory => {
                    let path = decode_directory(&raw, &self.tree_root);
                    let path_str = path.as_ref().map(|p| p.to_string_lossy().into_owned());
                    debug_parts.push(format!("{}={}", arg.name, format_py_path(path_str.as_deref())));
                    kwargs.insert(arg.name, path_str.map(Value::String).unwrap_or(Value::Null));
                }
                ArgKind::ConfigSettings => match decode_config_settings(&raw) {
                    Ok(value) => {
                        let value = value.unwrap_or(Value::Null);
                        debug_parts.push(format!("{}={}", arg.name, format_py_value(&value)));
                        kwargs.insert(arg.name, value);
                    }
                    Err(err) => {
                        self.report_error(&err).await?;
                        return Ok(Some(()));
                    }
                },
            }
        }

        self.writer
            .debug(&format!("Calling {}.{}({})", spec.raw, hook.wire_name(), debug_parts.join(", ")))
            .await?;
        self.writer
            .debug(&format!("Parsed hook inputs in {}", format_elapsed(parse_start.elapsed())))
            .await?;

        let captured = capture::create(std::process::id())?;
        self.writer.stdout_path(&captured.stdout).await?;
        self.writer.stderr_path(&captured.stderr).await?;

        let hook_start = Instant::now();
        match dispatch::dispatch(&mut self.worker, &spec, backend_path.as_deref(), hook, kwargs, &captured).await? {
            Ok(value) => {
                self.writer.ok(&format_return_value(hook, &value)).await?;
                self.writer
                    .debug(&format!("Ran hook in {}", format_elapsed(hook_start.elapsed())))
                    .await?;
            }
            Err(hook_err) => self.report_error(&hook_err).await?,
        }

        Ok(Some(()))
    }

    async fn report_error(&mut self, err: &HookError) -> std::io::Result<()> {
        let traceback_path = capture::write_traceback(std::process::id(), err.traceback.as_deref()).unwrap_or_else(|io_err| {
            tracing::warn!("Failed to write traceback file: {io_err}");
            None
        });
        self.writer.error(err.kind.wire_name(), &err.message).await?;
        self.writer.traceback(traceback_path.as_deref()).await
    }
}

fn format_elapsed(elapsed: Duration) -> String {
    if elapsed < Duration::from_secs(1) {
        format!("{}ms", elapsed.as_millis())
    } else {
        format!("{:.2}s", elapsed.as_secs_f64())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elapsed_under_a_second_is_milliseconds() {
        assert_eq!(format_elapsed(Duration::from_millis(12)), "12ms");
    }

    #[test]
    fn elapsed_over_a_second_is_seconds() {
        assert_eq!(format_elapsed(Duration::from_millis(1500)), "1.50s");
    }
}
