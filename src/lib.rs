//! `hookd`: a long-lived daemon that executes PEP 517 build-backend hooks
//! on behalf of a parent package manager, reusing one Python interpreter
//! across many hook invocations.
//!
//! See `SPEC_FULL.md` for the protocol this crate implements. The module
//! layout mirrors the components of that design: [`protocol`] is the line
//! I/O, [`session`] the top-level state machine, [`request`]/[`hook`] the
//! per-hook argument schema and decoding, [`backend`] the backend-spec
//! parser, [`dispatch`] the hook dispatcher, [`capture`] the output-capture
//! file lifecycle, [`error`] the client-visible error taxonomy, and
//! [`worker`] the persistent Python worker this daemon drives.

pub mod backend;
pub mod capture;
pub mod dispatch;
pub mod error;
pub mod hook;
pub mod protocol;
pub mod request;
pub mod session;
pub mod value;
pub mod worker;

pub use error::Error;
