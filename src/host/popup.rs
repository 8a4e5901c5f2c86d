use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::host::commands::{self, args};
use crate::host::{Args, Host};

/// Request for the host to show an error dialog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopupRequest {
    pub msg: String,
}

impl PopupRequest {
    pub fn new(msg: impl Into<String>) -> Self {
        Self { msg: msg.into() }
    }

    fn to_args(&self) -> Args {
        let mut map = Args::new();
        map.insert(args::MSG.to_string(), Value::String(self.msg.clone()));
        map
    }
}

pub(crate) fn channel() -> (UnboundedSender<PopupRequest>, PopupQueue) {
    let (tx, rx) = mpsc::unbounded_channel();
    (tx, PopupQueue { rx })
}

/// Popups queued by a [`HostClient`](crate::host::HostClient), waiting to be
/// handed to the host.
pub struct PopupQueue {
    rx: UnboundedReceiver<PopupRequest>,
}

impl PopupQueue {
    /// Next queued popup without delivering it
    pub fn try_next(&mut self) -> Option<PopupRequest> {
        self.rx.try_recv().ok()
    }

    /// Deliver whatever is queued right now and return how many were sent.
    pub async fn flush<H: Host>(&mut self, host: &H) -> usize {
        let mut delivered = 0;
        while let Ok(request) = self.rx.try_recv() {
            deliver(host, &request).await;
            delivered += 1;
        }
        delivered
    }

    /// Deliver popups as they arrive until every client is dropped.
    pub async fn run<H: Host>(mut self, host: H) {
        while let Some(request) = self.rx.recv().await {
            deliver(&host, &request).await;
        }
        tracing::debug!("popup queue closed");
    }
}

/// Show one popup. The host's answer is not waited on by the original caller,
/// so a failure here is only logged.
pub async fn deliver<H: Host>(host: &H, request: &PopupRequest) {
    if let Err(e) = host.invoke(commands::ERROR_POPUP, request.to_args()).await {
        tracing::warn!(error = %e, msg = %request.msg, "host could not show error popup");
    }
}
