use crate::url::normalize::normalize_url;
use crate::{UrlError, UrlResult};
use url::Url;

/// Builds the URL of one listing page of a category
///
/// The base URL is normalized first. Any existing `page_param` pair is
/// removed from the query and `page_param=page` is appended after the
/// remaining pairs, so the result is the same no matter how many times the
/// function is applied to its own output. The fragment is dropped because it
/// is never sent to the server.
///
/// # Arguments
///
/// * `base` - The category's listing URL
/// * `page_param` - Name of the page-number query parameter
/// * `page` - 1-based page number
///
/// # Examples
///
/// ```
/// use catalog_walker::url::page_url;
///
/// let url = page_url("https://example.com/cat/ai#ir-list", "page", 3).unwrap();
/// assert_eq!(url.as_str(), "https://example.com/cat/ai?page=3");
/// ```
pub fn page_url(base: &str, page_param: &str, page: u32) -> UrlResult<Url> {
    let normalized = normalize_url(base);
    let mut url = Url::parse(&normalized).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    let retained: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| key != page_param)
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    url.set_fragment(None);
    url.set_query(None);
    url.query_pairs_mut()
        .extend_pairs(retained)
        .append_pair(page_param, &page.to_string());

    Ok(url)
}
