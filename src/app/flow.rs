//! Interactive flows: each is a linear sequence of host calls.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};

use crate::config::AppConfig;
use crate::core::{listing::ListError, relay};
use crate::host::{Dialog, DialogReply, HostError, HostSurface, Notification, Progress};

/// Does `err` stem from the user cancelling a prompt?
pub fn is_cancelled(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| {
        cause.downcast_ref::<HostError>().is_some_and(HostError::is_cancelled)
            || matches!(
                cause.downcast_ref::<ListError>(),
                Some(ListError::Host(HostError::Cancelled))
            )
    })
}

// ───────────────────────────────────────── pick ──────────────

/// Folder → listing → list picker → relay dialog.
///
/// Starts from `start` when given, otherwise asks the host for a folder.
/// Returns the chosen entry, or `None` when the picker was dismissed.
pub fn pick(
    host: &mut dyn HostSurface,
    config: &AppConfig,
    start: Option<&Path>,
) -> Result<Option<String>> {
    let folder: PathBuf = match start {
        Some(path) => path.to_path_buf(),
        None => host.choose_folder(&config.folder_prompt)?,
    };
    tracing::info!(folder = %folder.display(), "listing folder");

    let entries = config
        .lister
        .list(host, &folder)
        .with_context(|| format!("Failed to list {}", folder.display()))?;

    let Some(selection) = host.choose_from_list(&config.list_prompt, &entries)? else {
        tracing::info!("nothing selected");
        return Ok(None);
    };

    relay::display(host, &selection)?;
    Ok(Some(selection))
}

// ───────────────────────────────────────── buttons ───────────

/// Show `dialog`, then echo the pressed button (and any typed answer) back.
///
/// Requests no host can render are refused before anything is shown.
pub fn buttons(host: &mut dyn HostSurface, dialog: &Dialog) -> Result<DialogReply> {
    dialog.validate()?;
    let reply = host.display_dialog(dialog)?;
    tracing::info!(button = %reply.button_returned, "button pressed");

    relay::display(host, &echo_text(&reply))?;
    Ok(reply)
}

fn echo_text(reply: &DialogReply) -> String {
    match &reply.text_returned {
        Some(text) => format!(
            "You pressed \"{}\" and entered \"{text}\"",
            reply.button_returned
        ),
        None => format!("You pressed \"{}\"", reply.button_returned),
    }
}

// ───────────────────────────────────────── progress ──────────

/// Parameters of the progress demo.
#[derive(Debug, Clone)]
pub struct ProgressRun {
    pub description: String,
    pub steps: u64,
    pub delay: Duration,
}

impl Default for ProgressRun {
    fn default() -> Self {
        Self {
            description: "Progress bar".to_string(),
            steps: 100,
            delay: Duration::from_millis(100),
        }
    }
}

/// Report `0..=steps` completed units, pausing `delay` between updates, and
/// post a notification at the end.
pub fn progress(
    host: &mut dyn HostSurface,
    run: &ProgressRun,
    mut sleep: impl FnMut(Duration),
) -> Result<()> {
    for completed in 0..=run.steps {
        host.report_progress(&Progress {
            description: run.description.clone(),
            additional_description: format!("{completed} of {}", run.steps),
            total: run.steps,
            completed,
        })?;
        if completed < run.steps {
            sleep(run.delay);
        }
    }

    host.display_notification(&Notification {
        message: "Done".to_string(),
        title: Some(run.description.clone()),
        subtitle: Some(format!("{0} of {0}", run.steps)),
    })?;
    Ok(())
}
