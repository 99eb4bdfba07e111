//! Pick an entry from a folder listing.
//!
//! Run the binary to choose a folder, list it, and pick one of its entries.
//! The chosen entry is printed on stdout; prompts and logs use stderr (or
//! native macOS dialogs).

mod app;
mod config;
mod core;
mod host;
mod ui;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::{error::ErrorKind, CommandFactory, Parser, Subcommand};

use crate::app::flow::{self, ProgressRun};
use crate::core::listing::SplitMode;
use crate::host::{Dialog, DialogIcon, HostKind, MAX_DIALOG_BUTTONS};

// ───────────────────────────────────────── CLI ───────────────

#[derive(Parser, Debug)]
#[command(name = env!("CARGO_PKG_NAME"), version, about = "Pick an entry from a folder listing")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Folder to list (asks with a folder chooser when omitted).
    path: Option<PathBuf>,

    /// Host used for prompts.
    #[arg(long, value_enum, global = true)]
    host: Option<HostKind>,

    /// How listing output is split into entries.
    #[arg(long, value_enum)]
    split: Option<SplitMode>,

    /// Write the effective configuration to the config file and exit.
    #[arg(long = "write-config")]
    write_config: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show a dialog with custom buttons and echo the one pressed.
    Buttons {
        /// Dialog text.
        #[arg(long, default_value = "Press one of the buttons")]
        prompt: String,

        /// Button label (repeat for up to three buttons).
        #[arg(long = "button", default_values_t = ["First".to_string(), "Second".to_string()])]
        buttons: Vec<String>,

        /// Dialog title.
        #[arg(long)]
        title: Option<String>,

        /// Icon shown next to the text.
        #[arg(long, value_enum)]
        icon: Option<DialogIcon>,

        /// Add a text field prefilled with this value; the typed text is
        /// printed on a second line.
        #[arg(long = "default-answer")]
        default_answer: Option<String>,

        /// Button pressed by Enter.
        #[arg(long = "default-button")]
        default_button: Option<String>,

        /// Button that cancels the dialog.
        #[arg(long = "cancel-button")]
        cancel_button: Option<String>,
    },

    /// Run a timed progress bar.
    Progress {
        /// Text shown above the bar.
        #[arg(long, default_value = "Progress bar")]
        description: String,

        /// Total number of units.
        #[arg(long, default_value_t = 100)]
        steps: u64,

        /// Pause between units, in milliseconds.
        #[arg(long = "delay-ms", default_value_t = 100)]
        delay_ms: u64,
    },
}

impl Cli {
    /// Constraints clap cannot express on its own.
    fn validate(&self) -> Result<(), clap::Error> {
        if let Some(Command::Buttons { buttons, .. }) = &self.command {
            if buttons.len() > MAX_DIALOG_BUTTONS {
                return Err(Cli::command().error(
                    ErrorKind::TooManyValues,
                    format!(
                        "`--button` may be given at most {MAX_DIALOG_BUTTONS} times, got {}",
                        buttons.len()
                    ),
                ));
            }
        }
        Ok(())
    }
}

impl Command {
    /// The dialog a `buttons` invocation asks for.
    fn dialog(self) -> Option<Dialog> {
        let Command::Buttons {
            prompt,
            buttons,
            title,
            icon,
            default_answer,
            default_button,
            cancel_button,
        } = self
        else {
            return None;
        };
        Some(Dialog {
            title,
            default_button,
            cancel_button,
            icon,
            default_answer,
            ..Dialog::new(prompt).with_buttons(buttons)
        })
    }
}

// ───────────────────────────────────────── main ─────────────

fn main() -> Result<()> {
    // Initialise tracing (only when RUST_LOG is set).
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr) // never pollute stdout
        .init();

    let cli = Cli::parse();
    if let Err(err) = cli.validate() {
        err.exit();
    }

    let mut config = config::AppConfig::load();
    if let Some(kind) = cli.host {
        config.host = kind;
    }
    if let Some(split) = cli.split {
        config.lister.split = split;
    }

    if cli.write_config {
        let path = config.save()?;
        eprintln!("Wrote {}", path.display());
        return Ok(());
    }

    tracing::debug!(host = config.host.resolve().as_str(), "opening host");
    let mut host = host::open(config.host);

    let result = match cli.command {
        None => flow::pick(host.as_mut(), &config, cli.path.as_deref()),
        Some(command @ Command::Buttons { .. }) => match command.dialog() {
            Some(dialog) => flow::buttons(host.as_mut(), &dialog).map(|reply| {
                Some(match reply.text_returned {
                    Some(text) => format!("{}\n{text}", reply.button_returned),
                    None => reply.button_returned,
                })
            }),
            None => Ok(None),
        },
        Some(Command::Progress {
            description,
            steps,
            delay_ms,
        }) => {
            let run = ProgressRun {
                description,
                steps,
                delay: Duration::from_millis(delay_ms),
            };
            flow::progress(host.as_mut(), &run, std::thread::sleep).map(|()| None)
        }
    };

    // ── teardown ──────────────────────────────────────────────
    // Restore the terminal before anything reaches stdout.
    drop(host);

    match result {
        Ok(Some(selection)) => {
            println!("{selection}");
            Ok(())
        }
        Ok(None) => Ok(()),
        Err(err) if flow::is_cancelled(&err) => {
            tracing::info!("cancelled by user");
            std::process::exit(1);
        }
        Err(err) => Err(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn bare_invocation_is_the_pick_flow() {
        let cli = Cli::try_parse_from(["dir-pick", "/tmp", "--host", "terminal"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.path, Some(PathBuf::from("/tmp")));
        assert_eq!(cli.host, Some(HostKind::Terminal));
    }

    #[test]
    fn buttons_default_labels() {
        let cli = Cli::try_parse_from(["dir-pick", "buttons"]).unwrap();
        match cli.command {
            Some(Command::Buttons { prompt, buttons, .. }) => {
                assert_eq!(prompt, "Press one of the buttons");
                assert_eq!(buttons, vec!["First", "Second"]);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn buttons_options_build_the_dialog() {
        let cli = Cli::try_parse_from([
            "dir-pick",
            "buttons",
            "--prompt",
            "New name?",
            "--button",
            "Cancel",
            "--button",
            "OK",
            "--title",
            "Rename",
            "--icon",
            "caution",
            "--default-answer",
            "draft",
            "--default-button",
            "OK",
            "--cancel-button",
            "Cancel",
        ])
        .unwrap();
        cli.validate().unwrap();

        let dialog = cli.command.and_then(Command::dialog).unwrap();
        assert_eq!(dialog.text, "New name?");
        assert_eq!(dialog.buttons, vec!["Cancel", "OK"]);
        assert_eq!(dialog.title.as_deref(), Some("Rename"));
        assert_eq!(dialog.icon, Some(DialogIcon::Caution));
        assert_eq!(dialog.default_answer.as_deref(), Some("draft"));
        assert_eq!(dialog.default_button.as_deref(), Some("OK"));
        assert_eq!(dialog.cancel_button.as_deref(), Some("Cancel"));
    }

    #[test]
    fn more_than_three_buttons_is_a_usage_error() {
        let cli = Cli::try_parse_from([
            "dir-pick", "buttons", "--button", "a", "--button", "b", "--button", "c", "--button",
            "d",
        ])
        .unwrap();
        let err = cli.validate().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TooManyValues);

        let cli = Cli::try_parse_from([
            "dir-pick", "buttons", "--button", "a", "--button", "b", "--button", "c",
        ])
        .unwrap();
        assert!(cli.validate().is_ok());
    }

    #[test]
    fn progress_options_parse() {
        let cli = Cli::try_parse_from(["dir-pick", "progress", "--steps", "5", "--delay-ms", "0"])
            .unwrap();
        match cli.command {
            Some(Command::Progress { steps, delay_ms, .. }) => {
                assert_eq!(steps, 5);
                assert_eq!(delay_ms, 0);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn split_mode_flag() {
        let cli = Cli::try_parse_from(["dir-pick", "--split", "lines"]).unwrap();
        assert_eq!(cli.split, Some(SplitMode::Lines));
    }
}
