use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tokio::sync::mpsc::UnboundedSender;

use crate::host::commands;
use crate::host::popup::{self, PopupQueue, PopupRequest};
use crate::host::{Args, Host, HostError};
use crate::models::Group;

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("{0}")]
    Host(#[from] HostError),
    #[error("Unexpected response from '{command}': {source}")]
    Decode {
        command: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Could not encode arguments for '{command}': {source}")]
    Encode {
        command: String,
        #[source]
        source: serde_json::Error,
    },
}

impl CommandError {
    /// Text shown to the user for this failure
    pub fn popup_message(&self) -> String {
        match self {
            CommandError::Host(e) => e.message(),
            other => other.to_string(),
        }
    }
}

/// Issues commands to a [`Host`], surfacing failures as popups.
pub struct HostClient<H> {
    host: H,
    popups: UnboundedSender<PopupRequest>,
}

impl<H: Host> HostClient<H> {
    /// Create a client plus the queue its popups are sent to
    pub fn new(host: H) -> (Self, PopupQueue) {
        let (popups, queue) = popup::channel();
        (Self { host, popups }, queue)
    }

    /// Ask the host to show an error dialog. Returns immediately.
    pub fn popup(&self, message: impl Into<String>) {
        let request = PopupRequest::new(message);
        if let Err(e) = self.popups.send(request) {
            tracing::warn!(msg = %e.0.msg, "popup queue is closed, dropping error popup");
        }
    }

    /// Run `command` and decode its response as `T`.
    ///
    /// On failure the error is first queued as a popup and then returned, so
    /// callers still get to react (stop a spinner, restore a form).
    pub async fn run_cmd<T: DeserializeOwned>(
        &self,
        command: &str,
        args: Args,
    ) -> Result<T, CommandError> {
        tracing::debug!(command, "invoking host command");
        let result = match self.host.invoke(command, args).await {
            Ok(value) => serde_json::from_value(value).map_err(|source| CommandError::Decode {
                command: command.to_string(),
                source,
            }),
            Err(e) => Err(CommandError::Host(e)),
        };
        result.map_err(|e| self.report(command, e))
    }

    fn report(&self, command: &str, error: CommandError) -> CommandError {
        tracing::error!(command, error = %error, "host command failed");
        self.popup(error.popup_message());
        error
    }

    fn encode<T: Serialize>(
        &self,
        command: &str,
        pairs: Vec<(&str, &T)>,
    ) -> Result<Args, CommandError> {
        let mut map = Args::new();
        for (key, value) in pairs {
            let value = serde_json::to_value(value).map_err(|source| {
                self.report(
                    command,
                    CommandError::Encode {
                        command: command.to_string(),
                        source,
                    },
                )
            })?;
            map.insert(key.to_string(), value);
        }
        Ok(map)
    }

    pub async fn get_groups(&self) -> Result<Vec<Group>, CommandError> {
        self.run_cmd(commands::GET_GROUPS, Args::new()).await
    }

    /// Create a group; the host assigns its id and returns the full list
    pub async fn new_group(&self, group: &Group) -> Result<Vec<Group>, CommandError> {
        let args = self.encode(commands::NEW_GROUP, vec![(commands::args::GROUP, group)])?;
        self.run_cmd(commands::NEW_GROUP, args).await
    }

    pub async fn update_group(
        &self,
        index: usize,
        group: &Group,
    ) -> Result<Vec<Group>, CommandError> {
        let mut args = self.encode(commands::UPDATE_GROUP, vec![(commands::args::GROUP, group)])?;
        args.insert(commands::args::INDEX.to_string(), Value::from(index));
        self.run_cmd(commands::UPDATE_GROUP, args).await
    }

    pub async fn delete_group(&self, index: usize) -> Result<Vec<Group>, CommandError> {
        let mut args = Args::new();
        args.insert(commands::args::INDEX.to_string(), Value::from(index));
        self.run_cmd(commands::DELETE_GROUP, args).await
    }
}
