//! Calling commands on the host process.
//!
//! The shell does not talk to the backend directly: every request is a named
//! command with a JSON argument map, answered by a JSON value or rejected with
//! an error payload. [`Host`] is that boundary. [`HostClient`] wraps it so a
//! failed command both queues an error popup for the user and hands the same
//! error back to the caller.

pub mod client;
pub mod commands;
pub mod popup;

pub use client::{CommandError, HostClient};
pub use popup::{PopupQueue, PopupRequest};

use serde_json::Value;
use std::fmt;
use std::future::Future;
use std::rc::Rc;

/// Named arguments sent along with a command
pub type Args = serde_json::Map<String, Value>;

/// Rejection payload returned by the host for a failed command.
#[derive(Debug, Clone, PartialEq)]
pub struct HostError {
    pub payload: Value,
}

impl HostError {
    pub fn new(payload: impl Into<Value>) -> Self {
        Self {
            payload: payload.into(),
        }
    }

    /// The payload as text; string payloads are shown without quotes
    pub fn message(&self) -> String {
        match &self.payload {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for HostError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for HostError {}

/// The privileged process that executes commands by name.
pub trait Host {
    fn invoke(&self, command: &str, args: Args) -> impl Future<Output = Result<Value, HostError>>;
}

impl<H: Host + ?Sized> Host for &H {
    fn invoke(&self, command: &str, args: Args) -> impl Future<Output = Result<Value, HostError>> {
        (**self).invoke(command, args)
    }
}

impl<H: Host + ?Sized> Host for Rc<H> {
    fn invoke(&self, command: &str, args: Args) -> impl Future<Output = Result<Value, HostError>> {
        (**self).invoke(command, args)
    }
}
