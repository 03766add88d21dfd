//! Custom request headers given as `key=value`.

use super::{split_pair, InputError};

/// Canonical header casing: each dash-separated word capitalised (`x-api-key` → `X-Api-Key`).
pub fn capitalise_header_name(name: &str) -> String {
    name.split('-')
        .map(|word| {
            let lower = word.to_ascii_lowercase();
            let mut chars = lower.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join("-")
}

/// Validates `key=value` pairs and returns them with canonical key casing.
/// A later pair with the same key replaces the earlier one in place.
pub fn harvest_headers<S: AsRef<str>>(raw: &[S]) -> Result<Vec<(String, String)>, InputError> {
    let mut headers: Vec<(String, String)> = Vec::with_capacity(raw.len());
    for item in raw {
        let item = item.as_ref();
        let (key, value) =
            split_pair(item).ok_or_else(|| InputError::InvalidHeader(item.to_string()))?;
        let key = capitalise_header_name(key);
        match headers.iter_mut().find(|(k, _)| *k == key) {
            Some(existing) => existing.1 = value.to_string(),
            None => headers.push((key, value.to_string())),
        }
    }
    Ok(headers)
}
