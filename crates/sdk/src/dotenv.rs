//! Read-only `.env` support for [`ClientOptions::from_dotenv`].
//!
//! [`ClientOptions::from_dotenv`]: crate::ClientOptions::from_dotenv

use std::collections::{HashMap, HashSet};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// A dotenv file could not be loaded.
#[derive(Debug, Error)]
pub enum DotenvError {
    /// The file exists but could not be read.
    #[error("failed to read dotenv file {}: {source}", .path.display())]
    Read {
        /// File path.
        path: PathBuf,
        /// I/O failure.
        #[source]
        source: io::Error,
    },

    /// A line is not `KEY=value`.
    #[error("failed to parse dotenv file {} at line {line}: {message}", .path.display())]
    Parse {
        /// File path.
        path: PathBuf,
        /// 1-based line number.
        line: usize,
        /// What is wrong with the line.
        message: String,
    },

    /// A key appears more than once.
    #[error("duplicate variable '{key}' in dotenv file {}", .path.display())]
    Duplicate {
        /// File path.
        path: PathBuf,
        /// The repeated key.
        key: String,
    },
}

/// Variables parsed from a dotenv file, in file order.
#[derive(Debug, Clone, Default)]
pub struct DotenvFile {
    path: PathBuf,
    vars: Vec<(String, String)>,
}

impl DotenvFile {
    /// Parse `path`. A file that does not exist reads as empty.
    pub fn read(path: &Path) -> Result<Self, DotenvError> {
        if !path.exists() {
            return Ok(Self {
                path: path.to_path_buf(),
                vars: Vec::new(),
            });
        }

        let contents = fs::read_to_string(path).map_err(|source| DotenvError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut seen_keys = HashSet::new();
        let mut vars = Vec::new();

        for (index, line) in contents.lines().enumerate() {
            let parsed = parse_line(line).map_err(|message| DotenvError::Parse {
                path: path.to_path_buf(),
                line: index + 1,
                message,
            })?;

            if let Some((key, value)) = parsed {
                if !seen_keys.insert(key.clone()) {
                    return Err(DotenvError::Duplicate {
                        path: path.to_path_buf(),
                        key,
                    });
                }
                vars.push((key, value));
            }
        }

        Ok(Self {
            path: path.to_path_buf(),
            vars,
        })
    }

    /// Path the variables were read from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Value of `key`, if the file sets it.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, value)| value.as_str())
    }

    /// All variables as a map.
    pub fn get_vars(&self) -> HashMap<String, String> {
        self.vars.iter().cloned().collect()
    }
}

/// `Ok(None)` for blank lines and comments.
fn parse_line(line: &str) -> Result<Option<(String, String)>, String> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }

    let (export_stripped, has_export) = match trimmed.strip_prefix("export ") {
        Some(stripped) => (stripped, true),
        None => (trimmed, false),
    };

    let eq_index = export_stripped.find('=').ok_or_else(|| {
        if has_export {
            "invalid line after export prefix".to_string()
        } else {
            "invalid line, missing '='".to_string()
        }
    })?;

    if eq_index == 0 {
        return Err("invalid line, missing key".to_string());
    }

    let (key, rest) = export_stripped.split_at(eq_index);
    let value = &rest[1..];
    if key.ends_with(char::is_whitespace) || value.starts_with(char::is_whitespace) {
        return Err("whitespace around '=' is not allowed".to_string());
    }

    if !is_valid_key(key) {
        return Err(format!("invalid variable name '{key}'"));
    }

    let value = match value.chars().next() {
        Some(quote @ ('"' | '\'')) => {
            if value.len() == 1 || !value.ends_with(quote) {
                return Err("invalid quoted value".to_string());
            }
            &value[1..value.len() - 1]
        }
        _ => value,
    };

    Ok(Some((key.to_string(), value.to_string())))
}

fn is_valid_key(key: &str) -> bool {
    !key.is_empty()
        && key
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '_' || ch == '-')
}
