//! Inbound task message carried on the queue.

use super::{MessageDecodeError, TaskId, TaskStatus};
use serde::Deserialize;
use serde_json::Value;

/// Request to evaluate one document.
///
/// `param` is forwarded verbatim to the conversion service. `status` is the
/// task status observed when the message was enqueued.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TaskMessage {
    task_id: TaskId,
    onlyoffice_url: String,
    param: Value,
    #[serde(default)]
    status: Option<String>,
}

impl TaskMessage {
    /// Creates a task message.
    #[must_use]
    pub fn new(task_id: TaskId, onlyoffice_url: impl Into<String>, param: Value) -> Self {
        Self {
            task_id,
            onlyoffice_url: onlyoffice_url.into(),
            param,
            status: None,
        }
    }

    /// Sets the enqueue-time status snapshot.
    #[must_use]
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    /// Decodes a raw queue payload.
    ///
    /// # Errors
    ///
    /// Returns [`MessageDecodeError`] when the payload is not UTF-8 or not a
    /// JSON object with the task message fields.
    pub fn decode(payload: &[u8]) -> Result<Self, MessageDecodeError> {
        let text = std::str::from_utf8(payload)?;
        Ok(serde_json::from_str(text)?)
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn task_id(&self) -> &TaskId {
        &self.task_id
    }

    /// Returns the conversion endpoint URL.
    #[must_use]
    pub fn onlyoffice_url(&self) -> &str {
        &self.onlyoffice_url
    }

    /// Returns the opaque conversion parameters.
    #[must_use]
    pub const fn param(&self) -> &Value {
        &self.param
    }

    /// Returns the enqueue-time status snapshot, if any.
    #[must_use]
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// Returns `true` when the snapshot says the task already completed.
    #[must_use]
    pub fn is_already_completed(&self) -> bool {
        self.status() == Some(TaskStatus::Completed.as_str())
    }
}
