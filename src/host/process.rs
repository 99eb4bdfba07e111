//! Synchronous child-process execution shared by every host.
//!
//! Programs are spawned directly with an argument vector; no shell ever sees
//! the arguments.

use std::ffi::OsString;
use std::process::{Command, Stdio};

use super::HostError;

/// Run `program args…`, wait for it, and return stdout as (lossy) UTF-8.
///
/// A non-zero exit becomes [`HostError::ProcessFailed`] carrying the trimmed
/// stderr text.
pub fn run(program: &str, args: &[OsString]) -> Result<String, HostError> {
    tracing::debug!(program, ?args, "spawning");

    let output = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .map_err(|source| HostError::Spawn {
            program: program.to_string(),
            source,
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        tracing::debug!(program, code = ?output.status.code(), %stderr, "process failed");
        return Err(HostError::ProcessFailed {
            program: program.to_string(),
            code: output.status.code(),
            stderr,
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn captures_stdout() {
        let out = run("echo", &["hello".into(), "world".into()]).unwrap();
        assert_eq!(out, "hello world\n");
    }

    #[test]
    fn arguments_are_not_shell_interpreted() {
        let out = run("echo", &["a; echo injected".into()]).unwrap();
        assert_eq!(out, "a; echo injected\n");
    }

    #[test]
    fn non_zero_exit_is_process_failed() {
        let err = run("sh", &["-c".into(), "echo oops >&2; exit 3".into()]).unwrap_err();
        match err {
            HostError::ProcessFailed { code, stderr, .. } => {
                assert_eq!(code, Some(3));
                assert_eq!(stderr, "oops");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn non_utf8_arguments_reach_the_child() {
        use std::os::unix::ffi::OsStringExt;

        let raw = OsString::from_vec(b"caf\xe9".to_vec());
        let out = run("printf", &["%s".into(), raw]).unwrap();
        assert_eq!(out, "caf\u{fffd}");
    }

    #[test]
    fn missing_program_is_spawn_error() {
        let err = run("dir-pick-no-such-program", &[]).unwrap_err();
        assert!(matches!(err, HostError::Spawn { .. }));
    }
}
