//! Maps a resolved backend + hook name to a worker call, and translates the
//! worker's raw facts back into the client-visible error taxonomy (§4.E).

use crate::backend::BackendSpec;
use crate::capture::CapturedStreams;
use crate::error::HookError;
use crate::hook::HookKind;
use crate::worker::{WorkerHandle, WorkerResponse};
use crate::Error;
use serde_json::Value;
use std::collections::BTreeMap;

/// Calls `hook` on the backend named by `spec`, with `kwargs` forwarded
/// verbatim. The outer `Result` is the fatal/non-fatal split: an `Err`
/// here means the worker itself died and the daemon cannot continue; an
/// `Ok(Err(HookError))` is a normal, reportable failure.
pub async fn dispatch(
    worker: &mut WorkerHandle,
    spec: &BackendSpec,
    backend_path: Option<&str>,
    hook: HookKind,
    kwargs: BTreeMap<&str, Value>,
    captured: &CapturedStreams,
) -> Result<Result<Value, HookError>, Error> {
    let attrs = spec.attr_hops();
    let dotted_path = spec.is_dotted_path().then_some(spec.raw.as_str());
    let response = worker
        .call_hook(
            &spec.module,
            &attrs,
            hook.wire_name(),
            kwargs,
            &captured.stdout,
            &captured.stderr,
            backend_path,
            dotted_path,
        )
        .await?;

    Ok(match response {
        WorkerResponse::Ok { value } => Ok(value),
        WorkerResponse::Error {
            kind,
            message,
            traceback,
            supported,
        } => Err(classify(spec, hook, &kind, &message, supported).with_traceback(traceback)),
    })
}

fn classify(spec: &BackendSpec, hook: HookKind, kind: &str, message: &str, supported: Vec<String>) -> HookError {
    match kind {
        "module_not_found" => HookError::missing_backend_module(&spec.module),
        "import_error" => HookError::backend_import_error(message),
        "attribute_error" => HookError::missing_backend_attribute(&spec.raw, &spec.module),
        "unsupported_hook" => HookError::unsupported_hook(hook, &supported),
        // "runtime_error" and any other worker-reported kind: the daemon
        // must survive arbitrary backend misbehavior, so an unrecognized
        // kind degrades to the broadest category rather than panicking.
        _ => HookError::hook_runtime_error(message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_worker_kind_degrades_to_runtime_error() {
        let spec = BackendSpec::parse("ok_backend");
        let err = classify(&spec, HookKind::BuildWheel, "something_new", "boom", vec![]);
        assert_eq!(err.kind, crate::error::ErrorKind::HookRuntimeError);
        assert_eq!(err.message, "boom");
    }

    #[test]
    fn attribute_error_reports_full_original_spec() {
        let spec = BackendSpec::parse("submodule_backend:submodule");
        let err = classify(&spec, HookKind::BuildWheel, "attribute_error", "irrelevant", vec![]);
        assert_eq!(
            err.message,
            "Failed to find attribute 'submodule_backend:submodule' in the backend module 'submodule_backend'"
        );
    }
}
