//! macOS host backed by Standard Additions through `osascript`.
//!
//! Each primitive is a fixed JavaScript-for-Automation script.  User strings
//! never become script text: they are handed to the script's `run(argv)`
//! as separate process arguments.

use std::ffi::OsString;
use std::path::PathBuf;

use super::{process, Dialog, DialogReply, HostError, HostSurface, Notification};

/// First script argument.  `osascript` stops option parsing at the first
/// operand, so a user string that starts with `-` can never be read as a flag.
const ARGV_MARKER: &str = "dir-pick";

/// `osascript` error number for "User canceled."
const USER_CANCELED: &str = "(-128)";

const DIALOG_SCRIPT: &str = r#"
function run(argv) {
    const app = Application.currentApplication();
    app.includeStandardAdditions = true;
    const [, text, title, defaultButton, cancelButton, icon, hasAnswer, answer, ...buttons] = argv;
    const opts = {};
    if (buttons.length) opts.buttons = buttons;
    if (title) opts.withTitle = title;
    if (defaultButton) opts.defaultButton = defaultButton;
    if (cancelButton) opts.cancelButton = cancelButton;
    if (icon) opts.withIcon = icon;
    if (hasAnswer === "1") opts.defaultAnswer = answer;
    const r = app.displayDialog(text, opts);
    return hasAnswer === "1" ? r.buttonReturned + "\n" + r.textReturned : r.buttonReturned;
}
"#;

const LIST_SCRIPT: &str = r#"
function run(argv) {
    const app = Application.currentApplication();
    app.includeStandardAdditions = true;
    const [, prompt, ...items] = argv;
    const r = app.chooseFromList(items, prompt ? { withPrompt: prompt } : {});
    return r === false ? "" : "=" + r[0];
}
"#;

const FOLDER_SCRIPT: &str = r#"
function run(argv) {
    const app = Application.currentApplication();
    app.includeStandardAdditions = true;
    const [, prompt] = argv;
    return app.chooseFolder(prompt ? { withPrompt: prompt } : {}).toString();
}
"#;

const NOTIFICATION_SCRIPT: &str = r#"
function run(argv) {
    const app = Application.currentApplication();
    app.includeStandardAdditions = true;
    const [, message, title, subtitle] = argv;
    const opts = {};
    if (title) opts.withTitle = title;
    if (subtitle) opts.subtitle = subtitle;
    app.displayNotification(message, opts);
}
"#;

/// Host that talks to the macOS scripting bridge.
#[derive(Debug, Default)]
pub struct OsaHost;

impl OsaHost {
    pub fn new() -> Self {
        Self
    }
}

impl HostSurface for OsaHost {
    fn display_dialog(&mut self, dialog: &Dialog) -> Result<DialogReply, HostError> {
        dialog.validate()?;
        let raw = osascript(DIALOG_SCRIPT, dialog_args(dialog))?;
        Ok(decode_dialog_reply(&raw, dialog.default_answer.is_some()))
    }

    fn choose_from_list(
        &mut self,
        prompt: &str,
        items: &[String],
    ) -> Result<Option<String>, HostError> {
        if items.is_empty() {
            // Standard Additions rejects an empty choice list outright.
            tracing::debug!("empty list, nothing to choose");
            return Ok(None);
        }
        let mut args = vec![prompt.to_string()];
        args.extend(items.iter().cloned());
        let raw = osascript(LIST_SCRIPT, args)?;
        Ok(decode_list_choice(&raw))
    }

    fn choose_folder(&mut self, prompt: &str) -> Result<PathBuf, HostError> {
        let raw = osascript(FOLDER_SCRIPT, vec![prompt.to_string()])?;
        Ok(PathBuf::from(strip_result_newline(&raw)))
    }

    fn run_process(&mut self, program: &str, args: &[OsString]) -> Result<String, HostError> {
        process::run(program, args)
    }

    fn display_notification(&mut self, notification: &Notification) -> Result<(), HostError> {
        let args = vec![
            notification.message.clone(),
            notification.title.clone().unwrap_or_default(),
            notification.subtitle.clone().unwrap_or_default(),
        ];
        osascript(NOTIFICATION_SCRIPT, args).map(|_| ())
    }
}

/// Positional arguments for [`DIALOG_SCRIPT`]; empty strings mean "unset".
fn dialog_args(dialog: &Dialog) -> Vec<String> {
    let mut args = vec![
        dialog.text.clone(),
        dialog.title.clone().unwrap_or_default(),
        dialog.default_button.clone().unwrap_or_default(),
        dialog.cancel_button.clone().unwrap_or_default(),
        dialog.icon.map(|i| i.as_str().to_string()).unwrap_or_default(),
        (if dialog.default_answer.is_some() { "1" } else { "0" }).to_string(),
        dialog.default_answer.clone().unwrap_or_default(),
    ];
    args.extend(dialog.buttons.iter().cloned());
    args
}

/// Run a JXA script with `args` reaching it as `argv[1..]`.
fn osascript(script: &str, args: Vec<String>) -> Result<String, HostError> {
    let mut argv: Vec<OsString> = vec![
        "-l".into(),
        "JavaScript".into(),
        "-e".into(),
        script.into(),
        ARGV_MARKER.into(),
    ];
    argv.extend(args.into_iter().map(OsString::from));
    process::run("osascript", &argv).map_err(classify_failure)
}

/// Turn `osascript`'s exit failures into cancel or script errors.
fn classify_failure(err: HostError) -> HostError {
    match err {
        HostError::ProcessFailed { stderr, .. } if stderr.contains(USER_CANCELED) => {
            HostError::Cancelled
        }
        HostError::ProcessFailed { stderr, .. } => HostError::Script(stderr),
        other => other,
    }
}

/// `osascript` terminates the printed result with one newline.
fn strip_result_newline(raw: &str) -> &str {
    raw.strip_suffix('\n').unwrap_or(raw)
}

fn decode_dialog_reply(raw: &str, has_answer: bool) -> DialogReply {
    let raw = strip_result_newline(raw);
    if has_answer {
        let (button, text) = raw.split_once('\n').unwrap_or((raw, ""));
        DialogReply {
            button_returned: button.to_string(),
            text_returned: Some(text.to_string()),
        }
    } else {
        DialogReply {
            button_returned: raw.to_string(),
            text_returned: None,
        }
    }
}

/// Chosen items come back prefixed with `=`; anything else is the `false`
/// sentinel.
fn decode_list_choice(raw: &str) -> Option<String> {
    strip_result_newline(raw)
        .strip_prefix('=')
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::DialogIcon;

    #[test]
    fn dialog_args_keep_user_text_as_separate_arguments() {
        let dialog = Dialog {
            text: "it's \"quoted\"; $(whoami)".into(),
            icon: Some(DialogIcon::Caution),
            ..Dialog::new("")
        }
        .with_buttons(["First", "Second"]);

        let args = dialog_args(&dialog);
        assert_eq!(args[0], "it's \"quoted\"; $(whoami)");
        assert_eq!(args[4], "caution");
        assert_eq!(args[5], "0");
        assert_eq!(&args[7..], &["First".to_string(), "Second".to_string()]);
    }

    #[test]
    fn dialog_reply_without_answer() {
        let reply = decode_dialog_reply("Second\n", false);
        assert_eq!(reply.button_returned, "Second");
        assert_eq!(reply.text_returned, None);
    }

    #[test]
    fn dialog_reply_with_answer_keeps_newlines_in_text() {
        let reply = decode_dialog_reply("OK\nline one\nline two\n", true);
        assert_eq!(reply.button_returned, "OK");
        assert_eq!(reply.text_returned.as_deref(), Some("line one\nline two"));
    }

    #[test]
    fn list_choice_sentinel() {
        assert_eq!(decode_list_choice("=notes.md\n").as_deref(), Some("notes.md"));
        assert_eq!(decode_list_choice("=\n").as_deref(), Some(""));
        assert_eq!(decode_list_choice("\n"), None);
    }

    #[test]
    fn cancel_is_recognised_from_stderr() {
        let err = classify_failure(HostError::ProcessFailed {
            program: "osascript".into(),
            code: Some(1),
            stderr: "execution error: User canceled. (-128)".into(),
        });
        assert!(err.is_cancelled());

        let err = classify_failure(HostError::ProcessFailed {
            program: "osascript".into(),
            code: Some(1),
            stderr: "execution error: Error: boom (-2700)".into(),
        });
        assert!(matches!(err, HostError::Script(ref s) if s.contains("boom")));
    }

    #[test]
    fn oversized_dialog_is_refused_before_spawning() {
        let mut host = OsaHost::new();
        let dialog = Dialog::new("x").with_buttons(["a", "b", "c", "d"]);
        let err = host.display_dialog(&dialog).unwrap_err();
        assert!(matches!(err, HostError::InvalidRequest(_)));
    }

    #[test]
    fn empty_list_skips_the_host() {
        let mut host = OsaHost::new();
        assert_eq!(host.choose_from_list("Pick", &[]).unwrap(), None);
    }
}
