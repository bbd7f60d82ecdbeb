//! Env file parsing and upserting.
//!
//! An env file is kept as a sequence of typed lines so that rewriting a few
//! keys leaves every other line byte-for-byte intact.

use std::collections::HashSet;
#[cfg(unix)]
use std::io::Write;
use std::path::Path;

use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

use crate::error::Result;

lazy_static! {
    static ref ASSIGNMENT: Regex =
        Regex::new(r"^\s*([A-Za-z_][A-Za-z0-9_]*)=").expect("assignment pattern is valid");
}

/// One line of an env file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    /// `KEY=value`, possibly indented.
    Assignment { key: String, raw: String },
    /// Comment, blank line, or anything else.
    Opaque(String),
}

impl Line {
    fn classify(raw: &str) -> Self {
        match ASSIGNMENT.captures(raw) {
            Some(caps) => Line::Assignment {
                key: caps[1].to_string(),
                raw: raw.to_string(),
            },
            None => Line::Opaque(raw.to_string()),
        }
    }

    fn raw(&self) -> &str {
        match self {
            Line::Assignment { raw, .. } | Line::Opaque(raw) => raw,
        }
    }

    fn is_empty(&self) -> bool {
        matches!(self, Line::Opaque(raw) if raw.is_empty())
    }
}

/// What an upsert changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpsertSummary {
    /// Keys rewritten in place.
    pub replaced: usize,
    /// Keys added at the end.
    pub appended: usize,
    /// Continuation lines removed after rewritten keys.
    pub dropped: usize,
}

/// A parsed env file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvFile {
    lines: Vec<Line>,
}

impl EnvFile {
    /// Parse env file content. Never fails; unknown lines are kept opaque.
    pub fn parse(content: &str) -> Self {
        let body = content.strip_suffix('\n').unwrap_or(content);
        let lines = if content.is_empty() {
            Vec::new()
        } else {
            body.split('\n').map(Line::classify).collect()
        };
        Self { lines }
    }

    /// Load an env file from disk.
    ///
    /// A missing file is treated as empty.
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be read.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::parse(&read_content(path)?))
    }

    /// Write the rendered file to disk, replacing it entirely.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be written.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let content = self.render();

        #[cfg(unix)]
        {
            use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

            let mut file = std::fs::OpenOptions::new()
                .create(true)
                .truncate(true)
                .write(true)
                .mode(0o600)
                .open(path)?;
            file.write_all(content.as_bytes())?;
            file.flush()?;

            // Existing files keep their old mode on open; tighten it.
            std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))?;
        }

        #[cfg(not(unix))]
        {
            std::fs::write(path, &content)?;
        }

        debug!(path = %path.display(), bytes = content.len(), "saved env file");
        Ok(())
    }

    /// Replace or append each key in `updates`.
    ///
    /// The first assignment of a tracked key is rewritten as `KEY=value` in
    /// place and any non-assignment lines directly after it are dropped as
    /// leftovers of an old multi-line value. Keys not present are appended,
    /// in order, after a single blank line.
    pub fn upsert<K, V>(&mut self, updates: &[(K, V)]) -> UpsertSummary
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let value_of = |key: &str| {
            updates
                .iter()
                .find(|(k, _)| k.as_ref() == key)
                .map(|(_, v)| v.as_ref())
        };

        let mut summary = UpsertSummary::default();
        let mut seen: HashSet<String> = HashSet::new();
        let mut out = Vec::with_capacity(self.lines.len() + updates.len() + 1);
        let mut in_continuation = false;

        for line in self.lines.drain(..) {
            match line {
                Line::Assignment { key, raw } => {
                    let value = if seen.contains(&key) {
                        None
                    } else {
                        value_of(&key)
                    };
                    match value {
                        Some(value) => {
                            out.push(Line::Assignment {
                                raw: format!("{}={}", key, value),
                                key: key.clone(),
                            });
                            seen.insert(key);
                            summary.replaced += 1;
                            in_continuation = true;
                        }
                        None => {
                            out.push(Line::Assignment { key, raw });
                            in_continuation = false;
                        }
                    }
                }
                Line::Opaque(_) if in_continuation => summary.dropped += 1,
                opaque => out.push(opaque),
            }
        }

        let missing: Vec<(&str, &str)> = updates
            .iter()
            .map(|(k, v)| (k.as_ref(), v.as_ref()))
            .filter(|(k, _)| !seen.contains(*k))
            .collect();

        if !missing.is_empty() {
            while out.last().is_some_and(Line::is_empty) {
                out.pop();
            }
            // A blank line right after a rewritten key would be dropped as a
            // continuation on the next run.
            if !out.is_empty() && !in_continuation {
                out.push(Line::Opaque(String::new()));
            }
            for (key, value) in missing {
                if !seen.insert(key.to_string()) {
                    continue;
                }
                out.push(Line::Assignment {
                    key: key.to_string(),
                    raw: format!("{}={}", key, value),
                });
                summary.appended += 1;
            }
        }

        self.lines = out;
        debug!(
            replaced = summary.replaced,
            appended = summary.appended,
            dropped = summary.dropped,
            "upserted env entries"
        );
        summary
    }

    /// Serialize, ending with exactly one newline.
    ///
    /// Trailing empty lines collapse into the final newline; lines holding
    /// only whitespace are kept as written.
    pub fn render(&self) -> String {
        let end = self
            .lines
            .iter()
            .rposition(|line| !line.is_empty())
            .map_or(0, |i| i + 1);

        let mut output = self.lines[..end]
            .iter()
            .map(Line::raw)
            .collect::<Vec<_>>()
            .join("\n");
        output.push('\n');
        output
    }

    /// Parsed lines in file order.
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }
}

/// Read raw env content, treating a missing file as empty.
///
/// # Errors
///
/// Returns error if the file exists but cannot be read.
pub fn read_content(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    match std::fs::read_to_string(path) {
        Ok(content) => {
            debug!(path = %path.display(), bytes = content.len(), "read env file");
            Ok(content)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "env file missing, treating as empty");
            Ok(String::new())
        }
        Err(e) => Err(e.into()),
    }
}

/// Upsert `updates` into raw env content.
pub fn upsert_content<K, V>(content: &str, updates: &[(K, V)]) -> String
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut file = EnvFile::parse(content);
    file.upsert(updates);
    file.render()
}

/// Find the value of `key` in env content.
///
/// Lines are classified exactly as [`EnvFile::parse`] does, so a line the
/// upserter would not rewrite is never read back either. Only single-line
/// values are recognised. Double-quoted values are decoded as JSON strings;
/// single-quoted and bare values only get `\n` expanded.
pub fn lookup(content: &str, key: &str) -> Option<String> {
    EnvFile::parse(content).lines.iter().find_map(|line| match line {
        Line::Assignment { key: k, raw } if k == key => raw
            .split_once('=')
            .map(|(_, value)| parse_value(value.trim())),
        _ => None,
    })
}

/// JSON-quote a value for embedding as `KEY="..."`.
pub fn quote(value: &str) -> String {
    serde_json::Value::String(value.to_string()).to_string()
}

fn parse_value(raw: &str) -> String {
    if raw.starts_with('"') {
        if let Ok(decoded) = serde_json::from_str::<String>(raw) {
            return decoded;
        }
    }

    let unquoted = ['"', '\'']
        .into_iter()
        .find_map(|q| raw.strip_prefix(q)?.strip_suffix(q))
        .unwrap_or(raw);

    unquoted.replace("\\n", "\n")
}
