//! Cookies given as `name=value`, sent as one `Cookie` header.

use super::{split_pair, InputError};

/// Validates `name=value` pairs. Names keep their case; a later duplicate replaces the earlier value.
pub fn harvest_cookies<S: AsRef<str>>(raw: &[S]) -> Result<Vec<(String, String)>, InputError> {
    let mut cookies: Vec<(String, String)> = Vec::with_capacity(raw.len());
    for item in raw {
        let item = item.as_ref();
        let (name, value) =
            split_pair(item).ok_or_else(|| InputError::InvalidCookie(item.to_string()))?;
        match cookies.iter_mut().find(|(n, _)| n == name) {
            Some(existing) => existing.1 = value.to_string(),
            None => cookies.push((name.to_string(), value.to_string())),
        }
    }
    Ok(cookies)
}

/// Renders cookies as a `Cookie` header value (`a=1; b=2`), or `None` when empty.
pub fn cookie_header_value(cookies: &[(String, String)]) -> Option<String> {
    if cookies.is_empty() {
        return None;
    }
    Some(
        cookies
            .iter()
            .map(|(name, value)| format!("{}={}", name, value))
            .collect::<Vec<_>>()
            .join("; "),
    )
}
