//! Destination resolution: derives a local file name from a locator.
//!
//! The name is the percent-decoded final path segment. Locators whose final
//! segment is empty (trailing `/`, no path) or unusable get a synthesized
//! `file_<n>` name, where `n` is the 1-based position in the batch.
//!
//! Synthesized names are only unique among themselves: a locator that decodes
//! to a literal `file_2` collides with the synthesized name of the second
//! task. Callers must not pass colliding locators; a colliding write silently
//! replaces or resumes the other file.

mod decode;
mod path;

pub use decode::percent_decode;
pub use path::last_path_segment;

/// Name used when the locator yields no usable file name.
pub fn synthesized_name(index: usize) -> String {
    format!("file_{}", index + 1)
}

/// Resolves the local file name for the locator at `index` (0-based) in the batch.
/// Never fails.
///
/// # Examples
///
/// - `resolve_destination("https://host/a.bin", 0)` → `"a.bin"`
/// - `resolve_destination("https://host/", 1)` → `"file_2"`
/// - `resolve_destination("https://host/my%20file.iso", 0)` → `"my file.iso"`
pub fn resolve_destination(locator: &str, index: usize) -> String {
    let decoded = last_path_segment(locator)
        .map(|segment| percent_decode(&segment))
        .unwrap_or_default();

    // A decoded `%2F` must not turn the name into a path.
    let name: String = decoded
        .chars()
        .map(|c| if c == '/' || c == '\0' { '_' } else { c })
        .collect();

    if name.is_empty() || name == "." || name == ".." {
        synthesized_name(index)
    } else {
        name
    }
}
