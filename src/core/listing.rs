//! Directory listing — run the host's listing command and tokenize its output.
//!
//! The path is handed to the listing program as one argument behind `--`, so
//! shell metacharacters and leading dashes in a name are inert.

use std::ffi::OsString;
use std::path::Path;

use thiserror::Error;

use crate::host::{HostError, HostSurface};

/// How raw listing output is cut into entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum SplitMode {
    /// Any run of whitespace separates entries.
    #[default]
    Whitespace,
    /// Only newlines separate entries, so names with spaces survive.
    Lines,
}

impl SplitMode {
    pub fn as_str(self) -> &'static str {
        match self {
            SplitMode::Whitespace => "whitespace",
            SplitMode::Lines => "lines",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "whitespace" | "ws" => Some(SplitMode::Whitespace),
            "lines" | "newline" => Some(SplitMode::Lines),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum ListError {
    /// The path cannot be passed to a process as a single argument.
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error(transparent)]
    Host(#[from] HostError),
}

/// Settings for the listing command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lister {
    /// Program to run (default `ls`).
    pub program: String,
    /// Flags placed before the `--` separator.
    pub flags: Vec<String>,
    pub split: SplitMode,
}

impl Default for Lister {
    fn default() -> Self {
        Self {
            program: "ls".to_string(),
            flags: Vec::new(),
            split: SplitMode::default(),
        }
    }
}

impl Lister {
    /// The full argument vector for listing `path`.
    ///
    /// The path is passed through as raw OS bytes, so names that are not
    /// valid UTF-8 are listed too.
    pub fn command_args(&self, path: &Path) -> Result<Vec<OsString>, ListError> {
        validate_path(path)?;
        let mut args: Vec<OsString> = self.flags.iter().map(OsString::from).collect();
        args.push("--".into());
        args.push(path.as_os_str().to_os_string());
        Ok(args)
    }

    /// List the entries of `path` through `host`.
    ///
    /// Host failures are returned as they were reported; no output parsing
    /// happens when the listing program fails.
    pub fn list(&self, host: &mut dyn HostSurface, path: &Path) -> Result<Vec<String>, ListError> {
        let args = self.command_args(path)?;
        let output = host.run_process(&self.program, &args)?;
        let entries = split_entries(&output, self.split);
        tracing::debug!(path = %path.display(), count = entries.len(), "listed");
        Ok(entries)
    }
}

/// Cut `output` into entries.  Empty tokens are never produced.
pub fn split_entries(output: &str, mode: SplitMode) -> Vec<String> {
    match mode {
        SplitMode::Whitespace => output.split_whitespace().map(str::to_string).collect(),
        SplitMode::Lines => output
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(str::to_string)
            .collect(),
    }
}

fn validate_path(path: &Path) -> Result<(), ListError> {
    let raw = path.as_os_str();
    if raw.is_empty() {
        return Err(ListError::InvalidPath("path is empty".to_string()));
    }
    if raw.as_encoded_bytes().contains(&0) {
        return Err(ListError::InvalidPath(format!("contains NUL: {raw:?}")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::MockHostSurface;

    fn list_directory(host: &mut MockHostSurface, path: &Path) -> Result<Vec<String>, ListError> {
        Lister::default().list(host, path)
    }

    fn os(args: &[&str]) -> Vec<OsString> {
        args.iter().map(OsString::from).collect()
    }

    fn ws(s: &str) -> Vec<String> {
        split_entries(s, SplitMode::Whitespace)
    }

    #[test]
    fn empty_output_yields_no_entries() {
        assert!(ws("").is_empty());
        assert!(split_entries("", SplitMode::Lines).is_empty());
    }

    #[test]
    fn whitespace_only_output_yields_no_entries() {
        assert!(ws("  \t\n \n").is_empty());
        assert!(split_entries("\n  \n\t\n", SplitMode::Lines).is_empty());
    }

    #[test]
    fn mixed_delimiters_collapse() {
        assert_eq!(ws("a b  c\nd"), vec!["a", "b", "c", "d"]);
        assert_eq!(ws("\n a\t\tb \n"), vec!["a", "b"]);
    }

    #[test]
    fn splitting_is_idempotent() {
        for blob in ["a b  c\nd", "", "   ", "\tx\n\ny z\t", "one"] {
            let once = ws(blob);
            let twice = ws(&once.join(" "));
            assert_eq!(once, twice, "blob {blob:?}");
        }
    }

    #[test]
    fn line_mode_keeps_spaces_inside_names() {
        assert_eq!(
            split_entries("My Report.txt\nnotes.md\n\n", SplitMode::Lines),
            vec!["My Report.txt", "notes.md"]
        );
    }

    #[test]
    fn path_is_one_argument_after_separator() {
        let lister = Lister {
            flags: vec!["-A".into()],
            ..Lister::default()
        };
        let args = lister.command_args(Path::new("-rf")).unwrap();
        assert_eq!(args, os(&["-A", "--", "-rf"]));
    }

    #[test]
    fn shell_metacharacters_are_not_interpreted() {
        let mut host = MockHostSurface::new();
        host.expect_run_process()
            .withf(|program, args| {
                program == "ls" && args == os(&["--", "dir; rm -rf /"])
            })
            .times(1)
            .returning(|_, _| Ok(String::new()));

        let entries = list_directory(&mut host, Path::new("dir; rm -rf /")).unwrap();
        assert!(entries.is_empty());
    }

    #[test]
    fn empty_path_is_rejected_before_running_anything() {
        let mut host = MockHostSurface::new();
        host.expect_run_process().never();

        let err = list_directory(&mut host, Path::new("")).unwrap_err();
        assert!(matches!(err, ListError::InvalidPath(_)));
    }

    #[test]
    fn nul_in_path_is_rejected() {
        let mut host = MockHostSurface::new();
        host.expect_run_process().never();

        let err = list_directory(&mut host, Path::new("a\0b")).unwrap_err();
        assert!(matches!(err, ListError::InvalidPath(_)));
    }

    #[test]
    fn entries_keep_listing_order() {
        let mut host = MockHostSurface::new();
        host.expect_run_process()
            .returning(|_, _| Ok("report.txt\nnotes.md\n".to_string()));

        let entries = list_directory(&mut host, Path::new("/chosen")).unwrap();
        assert_eq!(entries, vec!["report.txt", "notes.md"]);
    }

    #[test]
    fn host_failure_propagates() {
        let mut host = MockHostSurface::new();
        host.expect_run_process().returning(|program, _| {
            Err(HostError::ProcessFailed {
                program: program.to_string(),
                code: Some(1),
                stderr: "No such file or directory".into(),
            })
        });

        let err = list_directory(&mut host, Path::new("/missing")).unwrap_err();
        assert!(matches!(
            err,
            ListError::Host(HostError::ProcessFailed { code: Some(1), .. })
        ));
    }

    #[test]
    fn custom_program_is_used() {
        let mut host = MockHostSurface::new();
        host.expect_run_process()
            .withf(|program, args| program == "gls" && args[0] == *"-1")
            .returning(|_, _| Ok("x\n".into()));

        let lister = Lister {
            program: "gls".into(),
            flags: vec!["-1".into()],
            split: SplitMode::Lines,
        };
        assert_eq!(lister.list(&mut host, Path::new(".")).unwrap(), vec!["x"]);
    }

    #[cfg(unix)]
    #[test]
    fn lists_a_real_directory_with_ls() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("report.txt"), "").unwrap();
        std::fs::write(dir.path().join("notes.md"), "").unwrap();

        let mut host = MockHostSurface::new();
        host.expect_run_process()
            .returning(|program, args| crate::host::process::run(program, args));

        let mut entries = list_directory(&mut host, dir.path()).unwrap();
        entries.sort();
        assert_eq!(entries, vec!["notes.md", "report.txt"]);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn lists_a_directory_whose_name_is_not_utf8() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = tempfile::tempdir().unwrap();
        let odd = dir.path().join(OsStr::from_bytes(b"caf\xe9"));
        std::fs::create_dir(&odd).unwrap();
        std::fs::write(odd.join("inside.txt"), "").unwrap();

        let mut host = MockHostSurface::new();
        host.expect_run_process()
            .withf(|_, args| args.last().is_some_and(|a| a.as_encoded_bytes().ends_with(b"caf\xe9")))
            .returning(|program, args| crate::host::process::run(program, args));

        let entries = list_directory(&mut host, &odd).unwrap();
        assert_eq!(entries, vec!["inside.txt"]);
    }

    #[cfg(unix)]
    #[test]
    fn missing_directory_reports_ls_failure() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");

        let mut host = MockHostSurface::new();
        host.expect_run_process()
            .returning(|program, args| crate::host::process::run(program, args));

        let err = list_directory(&mut host, &missing).unwrap_err();
        assert!(matches!(err, ListError::Host(HostError::ProcessFailed { .. })));
    }
}
