//! User configuration — host choice, listing command, prompt texts.
//!
//! Settings are stored as a simple key-value text file at
//! `$XDG_CONFIG_HOME/dir-pick/config.toml` (default `~/.config/dir-pick/config.toml`).

use std::path::{Path, PathBuf};

use crate::core::listing::{Lister, SplitMode};
use crate::host::HostKind;

// ───────────────────────────────────────── config ────────────

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Which host to drive.
    pub host: HostKind,
    /// Listing command and how its output is split.
    pub lister: Lister,
    /// Prompt shown by the folder chooser.
    pub folder_prompt: String,
    /// Prompt shown above the entry list.
    pub list_prompt: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: HostKind::Auto,
            lister: Lister::default(),
            folder_prompt: "Choose a folder to list".to_string(),
            list_prompt: "Pick an entry".to_string(),
        }
    }
}

impl AppConfig {
    // ── persistence ─────────────────────────────────────────────

    /// Load config from disk, falling back to defaults.
    pub fn load() -> Self {
        Self::load_from(&config_path())
    }

    pub fn load_from(path: &Path) -> Self {
        if path.exists() {
            match std::fs::read_to_string(path) {
                Ok(contents) => return Self::parse(&contents),
                Err(e) => tracing::warn!(path = %path.display(), "cannot read config: {e}"),
            }
        }
        Self::default()
    }

    /// Persist current config to disk.
    pub fn save(&self) -> anyhow::Result<PathBuf> {
        let path = config_path();
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.serialise())?;
        Ok(())
    }

    /// Parse the config-file format.  Unknown keys and bad values are
    /// skipped with a warning; everything missing keeps its default.
    pub fn parse(s: &str) -> Self {
        let mut config = Self::default();

        for line in s.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with('[') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let key = key.trim();
            let raw = value.trim();
            let value = parse_value(raw);

            match key {
                "host" => match HostKind::parse(&value) {
                    Some(kind) => config.host = kind,
                    None => tracing::warn!(value = %value, "unknown host in config"),
                },
                "list_program" => {
                    if !value.is_empty() {
                        config.lister.program = value;
                    }
                }
                "list_flags" => config.lister.flags = parse_list(raw),
                "split" => match SplitMode::parse(&value) {
                    Some(mode) => config.lister.split = mode,
                    None => tracing::warn!(value = %value, "unknown split mode in config"),
                },
                "folder_prompt" => config.folder_prompt = value,
                "list_prompt" => config.list_prompt = value,
                _ => tracing::warn!(key, "unknown config key"),
            }
        }

        config
    }

    fn serialise(&self) -> String {
        let flags: Vec<String> = self.lister.flags.iter().map(|f| quote(f)).collect();
        let lines = vec![
            "# dir-pick configuration".to_string(),
            String::new(),
            "# Host: auto, osa, terminal".to_string(),
            format!("host = {}", self.host.as_str()),
            String::new(),
            "# Listing command; the folder is passed after `--`".to_string(),
            format!("list_program = {}", quote(&self.lister.program)),
            format!("list_flags = {}", flags.join(", ")),
            "# Split: whitespace, lines".to_string(),
            format!("split = {}", self.lister.split.as_str()),
            String::new(),
            "# Prompts".to_string(),
            format!("folder_prompt = {}", quote(&self.folder_prompt)),
            format!("list_prompt = {}", quote(&self.list_prompt)),
            String::new(),
        ];
        lines.join("\n")
    }
}

// ───────────────────────────────────────── values ────────────

/// Write `s` as a double-quoted value that stays on one line.
fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// A quoted string (escapes resolved) or a bare word.
fn parse_value(raw: &str) -> String {
    match raw.strip_prefix('"') {
        Some(rest) => read_quoted(&mut rest.chars()),
        None => raw.to_string(),
    }
}

/// Comma-separated bare or quoted items.  A comma inside quotes belongs to
/// its item; empty items are dropped.
fn parse_list(raw: &str) -> Vec<String> {
    let mut items = Vec::new();
    let mut chars = raw.chars().peekable();
    loop {
        while chars.next_if(|c| c.is_whitespace()).is_some() {}
        if chars.peek().is_none() {
            break;
        }
        let item = if chars.next_if_eq(&'"').is_some() {
            let item = read_quoted(&mut chars);
            while chars.next_if(|&c| c != ',').is_some() {}
            item
        } else {
            let mut item = String::new();
            while let Some(c) = chars.next_if(|&c| c != ',') {
                item.push(c);
            }
            item.trim_end().to_string()
        };
        if !item.is_empty() {
            items.push(item);
        }
        // Separator.
        if chars.next().is_none() {
            break;
        }
    }
    items
}

/// Consume a quoted body up to and including the closing quote.
fn read_quoted(chars: &mut impl Iterator<Item = char>) -> String {
    let mut out = String::new();
    while let Some(c) = chars.next() {
        match c {
            '"' => break,
            '\\' => match chars.next() {
                Some('n') => out.push('\n'),
                Some('r') => out.push('\r'),
                Some('t') => out.push('\t'),
                Some(other) => out.push(other),
                None => out.push('\\'),
            },
            c => out.push(c),
        }
    }
    out
}

/// Return the config file path (`$XDG_CONFIG_HOME/dir-pick/config.toml`).
fn config_path() -> PathBuf {
    let config_dir = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
            PathBuf::from(home).join(".config")
        });
    config_dir.join(env!("CARGO_PKG_NAME")).join("config.toml")
}
