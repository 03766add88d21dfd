//! Run inputs: request headers, cookies, and the locator list.
//!
//! Everything here is validated once, before any task starts; a failure is a
//! setup error for the whole run, never a per-task outcome.

mod cookies;
mod headers;
mod locators;

pub use cookies::{cookie_header_value, harvest_cookies};
pub use headers::{capitalise_header_name, harvest_headers};
pub use locators::{load_locators, parse_locators};

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InputError {
    #[error("invalid header: {0:?} (expected key=value)")]
    InvalidHeader(String),

    #[error("invalid cookie: {0:?} (expected name=value)")]
    InvalidCookie(String),

    #[error("url file does not exist: {}", .0.display())]
    MissingUrlFile(PathBuf),

    #[error("url file is not a regular file: {}", .0.display())]
    NotARegularFile(PathBuf),

    #[error("failed to read url file {}: {source}", path.display())]
    ReadUrlFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("line {line}: invalid url {url:?}: {reason}")]
    InvalidLocator {
        line: usize,
        url: String,
        reason: String,
    },
}

/// Splits `key=value` on the first `=`; `None` when there is no `=` or the value is empty.
pub(crate) fn split_pair(raw: &str) -> Option<(&str, &str)> {
    let (key, value) = raw.split_once('=')?;
    let key = key.trim();
    if key.is_empty() || value.is_empty() {
        return None;
    }
    Some((key, value))
}
