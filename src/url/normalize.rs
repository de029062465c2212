/// Fragment suffixes that only steer in-page scrolling and never change which
/// document the server returns
pub const NON_SEMANTIC_FRAGMENTS: &[&str] = &["#ir-list"];

/// Normalizes a URL for identity, cache-key, and pagination purposes
///
/// # Normalization Steps
///
/// 1. Trim surrounding whitespace
/// 2. Strip every trailing occurrence of a known non-semantic fragment
///    suffix (see [`NON_SEMANTIC_FRAGMENTS`])
///
/// Stripping repeats until no known suffix remains, so normalizing an
/// already-normalized URL returns it unchanged.
///
/// # Examples
///
/// ```
/// use catalog_walker::url::normalize_url;
///
/// let url = normalize_url("https://example.com/2024ironman/ai#ir-list");
/// assert_eq!(url, "https://example.com/2024ironman/ai");
/// assert_eq!(normalize_url(&url), url);
/// ```
pub fn normalize_url(url_str: &str) -> String {
    let mut normalized = url_str.trim();

    loop {
        let stripped = NON_SEMANTIC_FRAGMENTS
            .iter()
            .find_map(|suffix| normalized.strip_suffix(suffix));

        match stripped {
            Some(rest) => normalized = rest.trim_end(),
            None => break,
        }
    }

    normalized.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_fragment_suffix() {
        assert_eq!(
            normalize_url("https://example.com/cat/ai#ir-list"),
            "https://example.com/cat/ai"
        );
    }

    #[test]
    fn test_leaves_plain_url_unchanged() {
        assert_eq!(
            normalize_url("https://example.com/cat/ai"),
            "https://example.com/cat/ai"
        );
    }

    #[test]
    fn test_keeps_other_fragments() {
        assert_eq!(
            normalize_url("https://example.com/cat/ai#comments"),
            "https://example.com/cat/ai#comments"
        );
    }

    #[test]
    fn test_suffix_only_stripped_at_end() {
        assert_eq!(
            normalize_url("https://example.com/#ir-list/next"),
            "https://example.com/#ir-list/next"
        );
    }

    #[test]
    fn test_repeated_suffix() {
        assert_eq!(
            normalize_url("https://example.com/cat#ir-list#ir-list"),
            "https://example.com/cat"
        );
    }

    #[test]
    fn test_trims_whitespace() {
        assert_eq!(
            normalize_url("  https://example.com/cat#ir-list \n"),
            "https://example.com/cat"
        );
    }

    #[test]
    fn test_normalization_is_idempotent() {
        let inputs = [
            "https://example.com/cat#ir-list",
            "https://example.com/cat#ir-list#ir-list",
            "https://example.com/cat #ir-list",
            "https://example.com/cat?page=2",
            " https://example.com/cat#top ",
            "",
        ];

        for input in inputs {
            let once = normalize_url(input);
            let twice = normalize_url(&once);
            assert_eq!(once, twice, "normalization not idempotent for {:?}", input);
        }
    }
}
