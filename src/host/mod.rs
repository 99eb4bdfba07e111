//! Host automation surface — the UI and process primitives the tool drives.
//!
//! Everything interactive goes through [`HostSurface`].  The core never talks
//! to a GUI or a terminal directly; it receives a `&mut dyn HostSurface` and
//! calls the primitive it needs.  Two real hosts exist:
//!
//! * [`osa::OsaHost`]: macOS Standard Additions via `osascript`.
//! * [`terminal::TerminalHost`]: ratatui popups on the alternate screen.

pub mod error;
pub mod osa;
pub mod process;
pub mod terminal;

use std::ffi::OsString;
use std::path::PathBuf;

#[cfg(test)]
use mockall::automock;

pub use error::HostError;

// ───────────────────────────────────────── dialog ────────────

/// Standard icons a dialog can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum DialogIcon {
    Note,
    Stop,
    Caution,
}

impl DialogIcon {
    /// Name understood by `display dialog … with icon`.
    pub fn as_str(self) -> &'static str {
        match self {
            DialogIcon::Note => "note",
            DialogIcon::Stop => "stop",
            DialogIcon::Caution => "caution",
        }
    }
}

/// A modal dialog request.
///
/// An empty `buttons` list means "host defaults": `Cancel` and `OK`, with
/// `OK` as the default button and `Cancel` as the cancel button.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dialog {
    pub text: String,
    pub title: Option<String>,
    /// Between one and three labels, left to right.
    pub buttons: Vec<String>,
    pub default_button: Option<String>,
    /// Pressing this button (or Esc) fails the call with
    /// [`HostError::Cancelled`].
    pub cancel_button: Option<String>,
    pub icon: Option<DialogIcon>,
    /// When set, the dialog grows a text field prefilled with this value.
    pub default_answer: Option<String>,
}

/// Maximum number of buttons a dialog may show.
pub const MAX_DIALOG_BUTTONS: usize = 3;

impl Dialog {
    /// A dialog with default options.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn with_buttons<I, S>(mut self, buttons: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.buttons = buttons.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Buttons as the host will actually render them, with the host
    /// defaults filled in.
    pub fn effective_buttons(&self) -> Vec<String> {
        if self.buttons.is_empty() {
            vec!["Cancel".to_string(), "OK".to_string()]
        } else {
            self.buttons.clone()
        }
    }

    /// Check the request against what every host can render: at most
    /// [`MAX_DIALOG_BUTTONS`] buttons, and default/cancel buttons that name
    /// one of them.
    pub fn validate(&self) -> Result<(), HostError> {
        if self.buttons.len() > MAX_DIALOG_BUTTONS {
            return Err(HostError::InvalidRequest(format!(
                "a dialog shows at most {MAX_DIALOG_BUTTONS} buttons, got {}",
                self.buttons.len()
            )));
        }
        let buttons = self.effective_buttons();
        for (role, label) in [
            ("default", &self.default_button),
            ("cancel", &self.cancel_button),
        ] {
            if let Some(label) = label {
                if !buttons.contains(label) {
                    return Err(HostError::InvalidRequest(format!(
                        "{role} button {label:?} is not one of {buttons:?}"
                    )));
                }
            }
        }
        Ok(())
    }

    pub fn effective_default_button(&self) -> Option<String> {
        match (&self.default_button, self.buttons.is_empty()) {
            (Some(b), _) => Some(b.clone()),
            (None, true) => Some("OK".to_string()),
            (None, false) => None,
        }
    }

    pub fn effective_cancel_button(&self) -> Option<String> {
        match (&self.cancel_button, self.buttons.is_empty()) {
            (Some(b), _) => Some(b.clone()),
            (None, true) => Some("Cancel".to_string()),
            (None, false) => None,
        }
    }
}

/// What the user did with a [`Dialog`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogReply {
    pub button_returned: String,
    /// Present only when the dialog had a default answer.
    pub text_returned: Option<String>,
}

// ───────────────────────────────────────── notification ──────

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub title: Option<String>,
    pub subtitle: Option<String>,
}

// ───────────────────────────────────────── progress ──────────

/// Progress report in completed/total units.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Progress {
    pub description: String,
    pub additional_description: String,
    pub total: u64,
    pub completed: u64,
}

impl Progress {
    /// Completed share in `0.0..=1.0`.  A zero total reads as empty.
    pub fn ratio(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        (self.completed.min(self.total) as f64) / (self.total as f64)
    }
}

// ───────────────────────────────────────── surface ───────────

/// The primitives a host environment offers.
///
/// Calls are synchronous: each one blocks until the user answers or the
/// child process exits.
#[cfg_attr(test, automock)]
pub trait HostSurface {
    /// Show a modal dialog and wait for a button.
    fn display_dialog(&mut self, dialog: &Dialog) -> Result<DialogReply, HostError>;

    /// Let the user pick one of `items`.  `Ok(None)` is the host's
    /// "nothing chosen" sentinel.
    fn choose_from_list(
        &mut self,
        prompt: &str,
        items: &[String],
    ) -> Result<Option<String>, HostError>;

    /// Ask for a folder.
    fn choose_folder(&mut self, prompt: &str) -> Result<PathBuf, HostError>;

    /// Run `program` with `args` (no shell) and return its captured stdout.
    fn run_process(&mut self, program: &str, args: &[OsString]) -> Result<String, HostError>;

    /// Post a non-modal notification.
    fn display_notification(&mut self, notification: &Notification) -> Result<(), HostError> {
        tracing::info!(
            title = notification.title.as_deref().unwrap_or(""),
            "{}",
            notification.message
        );
        Ok(())
    }

    /// Update the progress indicator.
    fn report_progress(&mut self, progress: &Progress) -> Result<(), HostError> {
        tracing::info!(
            completed = progress.completed,
            total = progress.total,
            "{}",
            progress.description
        );
        Ok(())
    }
}

/// Which host implementation to drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum HostKind {
    /// OSA on macOS, terminal everywhere else.
    #[default]
    Auto,
    Osa,
    Terminal,
}

impl HostKind {
    pub fn as_str(self) -> &'static str {
        match self {
            HostKind::Auto => "auto",
            HostKind::Osa => "osa",
            HostKind::Terminal => "terminal",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "auto" => Some(HostKind::Auto),
            "osa" | "osascript" => Some(HostKind::Osa),
            "terminal" | "tui" => Some(HostKind::Terminal),
            _ => None,
        }
    }

    /// Resolve `Auto` for the current platform.
    pub fn resolve(self) -> Self {
        match self {
            HostKind::Auto if cfg!(target_os = "macos") => HostKind::Osa,
            HostKind::Auto => HostKind::Terminal,
            other => other,
        }
    }
}

/// Construct the host for `kind`.
pub fn open(kind: HostKind) -> Box<dyn HostSurface> {
    match kind.resolve() {
        HostKind::Osa => Box::new(osa::OsaHost::new()),
        _ => Box::new(terminal::TerminalHost::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_dialog_uses_host_buttons() {
        let dialog = Dialog::new("hello");
        assert_eq!(dialog.effective_buttons(), vec!["Cancel", "OK"]);
        assert_eq!(dialog.effective_default_button().as_deref(), Some("OK"));
        assert_eq!(dialog.effective_cancel_button().as_deref(), Some("Cancel"));
    }

    #[test]
    fn custom_buttons_have_no_implicit_cancel() {
        let dialog = Dialog::new("pick").with_buttons(["First", "Second"]);
        assert_eq!(dialog.effective_buttons(), vec!["First", "Second"]);
        assert_eq!(dialog.effective_default_button(), None);
        assert_eq!(dialog.effective_cancel_button(), None);
    }

    #[test]
    fn more_than_three_buttons_are_rejected() {
        let dialog = Dialog::new("x").with_buttons(["a", "b", "c", "d"]);
        assert_eq!(dialog.effective_buttons().len(), 4);
        assert!(matches!(dialog.validate(), Err(HostError::InvalidRequest(_))));

        let dialog = Dialog::new("x").with_buttons(["a", "b", "c"]);
        assert!(dialog.validate().is_ok());
    }

    #[test]
    fn default_and_cancel_must_name_a_button() {
        let mut dialog = Dialog::new("x").with_buttons(["Yes", "No"]);
        dialog.default_button = Some("Yes".into());
        dialog.cancel_button = Some("No".into());
        assert!(dialog.validate().is_ok());

        dialog.cancel_button = Some("Cancel".into());
        let err = dialog.validate().unwrap_err();
        assert!(err.to_string().contains("cancel button"));

        // Host defaults count as buttons.
        let mut plain = Dialog::new("x");
        plain.cancel_button = Some("Cancel".into());
        assert!(plain.validate().is_ok());
    }

    #[test]
    fn progress_ratio_is_clamped() {
        let mut p = Progress {
            total: 4,
            completed: 1,
            ..Progress::default()
        };
        assert!((p.ratio() - 0.25).abs() < f64::EPSILON);
        p.completed = 10;
        assert!((p.ratio() - 1.0).abs() < f64::EPSILON);
        p.total = 0;
        assert_eq!(p.ratio(), 0.0);
    }

    #[test]
    fn host_kind_parses_aliases() {
        assert_eq!(HostKind::parse("OSA"), Some(HostKind::Osa));
        assert_eq!(HostKind::parse("tui"), Some(HostKind::Terminal));
        assert_eq!(HostKind::parse("gtk"), None);
        assert_ne!(HostKind::Auto.resolve(), HostKind::Auto);
    }
}
