//! Locator list loading: one absolute URL per line.

use super::InputError;
use std::path::Path;

/// Schemes the transfer pipeline speaks; anything else never yields a response head.
const SUPPORTED_SCHEMES: [&str; 2] = ["http", "https"];

/// Parses locator lines: trims each line, skips blanks, and requires every
/// remaining line to be an absolute `http` or `https` URL.
pub fn parse_locators(contents: &str) -> Result<Vec<String>, InputError> {
    let mut locators = Vec::new();
    for (i, line) in contents.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let parsed = url::Url::parse(line).map_err(|e| InputError::InvalidLocator {
            line: i + 1,
            url: line.to_string(),
            reason: e.to_string(),
        })?;
        if parsed.cannot_be_a_base() {
            return Err(InputError::InvalidLocator {
                line: i + 1,
                url: line.to_string(),
                reason: "not a hierarchical url".to_string(),
            });
        }
        if !SUPPORTED_SCHEMES.contains(&parsed.scheme()) {
            return Err(InputError::InvalidLocator {
                line: i + 1,
                url: line.to_string(),
                reason: format!("unsupported scheme {:?}", parsed.scheme()),
            });
        }
        locators.push(line.to_string());
    }
    Ok(locators)
}

/// Reads and validates the locator file at `path`.
pub fn load_locators(path: &Path) -> Result<Vec<String>, InputError> {
    let meta = match std::fs::metadata(path) {
        Ok(meta) => meta,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(InputError::MissingUrlFile(path.to_path_buf()))
        }
        Err(source) => {
            return Err(InputError::ReadUrlFile {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    if !meta.is_file() {
        return Err(InputError::NotARegularFile(path.to_path_buf()));
    }
    let contents = std::fs::read_to_string(path).map_err(|source| InputError::ReadUrlFile {
        path: path.to_path_buf(),
        source,
    })?;
    parse_locators(&contents)
}
