//! Final path segment extraction from a locator.

/// Returns the raw (still percent-encoded) final path segment of `url`.
///
/// Returns `None` when the URL cannot be parsed or has no hierarchical path.
/// A path ending in `/` yields `Some("")`; the caller decides the fallback.
pub fn last_path_segment(url: &str) -> Option<String> {
    let parsed = url::Url::parse(url).ok()?;
    if parsed.cannot_be_a_base() {
        return None;
    }
    parsed.path().rsplit('/').next().map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normal() {
        assert_eq!(
            last_path_segment("https://example.com/a/b/file.deb").as_deref(),
            Some("file.deb")
        );
        assert_eq!(
            last_path_segment("https://example.com/single").as_deref(),
            Some("single")
        );
    }

    #[test]
    fn trailing_slash_or_no_path_is_empty() {
        assert_eq!(last_path_segment("https://example.com/").as_deref(), Some(""));
        assert_eq!(last_path_segment("https://example.com").as_deref(), Some(""));
        assert_eq!(last_path_segment("https://example.com/dir/").as_deref(), Some(""));
    }

    #[test]
    fn query_and_fragment_ignored() {
        assert_eq!(
            last_path_segment("https://example.com/file.zip?token=abc#top").as_deref(),
            Some("file.zip")
        );
    }

    #[test]
    fn stays_encoded() {
        assert_eq!(
            last_path_segment("https://example.com/my%20file.iso").as_deref(),
            Some("my%20file.iso")
        );
    }

    #[test]
    fn unparseable_or_opaque() {
        assert_eq!(last_path_segment("not a url"), None);
        assert_eq!(last_path_segment("mailto:someone@example.com"), None);
    }
}
