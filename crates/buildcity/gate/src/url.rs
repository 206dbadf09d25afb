//! URL comparison used for every gate decision.

/// Canonical form for comparisons: trimmed, one trailing `/` stripped,
/// lowercased. `None` and empty input normalize to `""`.
pub fn normalize_url(raw: Option<&str>) -> String {
    match raw {
        Some(raw) => {
            let trimmed = raw.trim();
            trimmed
                .strip_suffix('/')
                .unwrap_or(trimmed)
                .to_lowercase()
        }
        None => String::new(),
    }
}

/// Whether two URLs are equal after [`normalize_url`].
pub fn is_same_url(a: Option<&str>, b: Option<&str>) -> bool {
    normalize_url(a) == normalize_url(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_case_whitespace_and_trailing_slash() {
        assert_eq!(normalize_url(Some("  HTTP://EMPTY/ ")), "http://empty");
        assert_eq!(normalize_url(Some("http://empty")), "http://empty");
        assert_eq!(normalize_url(None), "");
    }

    #[test]
    fn only_one_trailing_slash_is_stripped() {
        assert_eq!(normalize_url(Some("https://a.example//")), "https://a.example/");
    }

    #[test]
    fn same_url_ignores_presentation_differences() {
        assert!(is_same_url(
            Some("https://Insanecrockslux.com/buildcityapp/"),
            Some("https://insanecrockslux.com/buildcityapp")
        ));
        assert!(!is_same_url(Some("https://example.com/offer"), Some("http://empty")));
        assert!(is_same_url(None, Some("   ")));
    }
}
