use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// A dotenv-style environment file: one `KEY=VALUE` per line, `#` comments,
/// an optional `export ` prefix, and single- or double-quoted values.
///
/// Applying the file never overrides variables that are already set in the
/// process environment, so the surrounding shell always wins.
#[derive(Debug, Clone)]
pub struct EnvFile {
    pub path: PathBuf,
    entries: Vec<(String, String)>,
}

impl EnvFile {
    /// Reads and parses the file at `path`. A missing file is not an error:
    /// it reads as an empty file.
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let entries = match fs::read_to_string(&path) {
            Ok(input) => Self::parse(&input),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => vec![],
            Err(e) => return Err(e.into()),
        };

        Ok(EnvFile { path, entries })
    }

    pub fn parse(input: &str) -> Vec<(String, String)> {
        let mut entries = vec![];
        for line in input.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let line = line.strip_prefix("export ").unwrap_or(line).trim_start();
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };

            let key = key.trim();
            if key.is_empty() {
                continue;
            }

            entries.push((key.to_string(), unquote(value.trim()).to_string()));
        }

        entries
    }

    /// Sets every entry whose key is not already present in the process
    /// environment.
    pub fn apply(&self) {
        for (key, value) in &self.entries {
            if std::env::var_os(key).is_none() {
                std::env::set_var(key, value);
            }
        }
    }

    pub fn entries(&self) -> &[(String, String)] {
        &self.entries
    }
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }

    value
}
