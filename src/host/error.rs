//! Failures reported by a [`HostSurface`](super::HostSurface).

use thiserror::Error;

/// Everything a host primitive can report back to its caller.
#[derive(Debug, Error)]
pub enum HostError {
    /// The user dismissed a dialog or chooser through its cancel action.
    #[error("User canceled")]
    Cancelled,

    /// The child process could not be started at all.
    #[error("Failed to start `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The child process ran but exited unsuccessfully.
    #[error("`{program}` exited with {}: {stderr}", describe_exit(.code))]
    ProcessFailed {
        program: String,
        /// `None` when the process was killed by a signal.
        code: Option<i32>,
        stderr: String,
    },

    /// The request cannot be shown by any host (e.g. too many buttons).
    #[error("Invalid dialog: {0}")]
    InvalidRequest(String),

    /// The automation script itself failed for a reason other than cancel.
    #[error("Script error: {0}")]
    Script(String),

    /// Terminal setup, drawing or input failed.
    #[error("Terminal error: {0}")]
    Terminal(#[from] std::io::Error),
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(c) => format!("status {c}"),
        None => "a signal".to_string(),
    }
}

impl HostError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, HostError::Cancelled)
    }
}
