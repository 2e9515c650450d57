//! Gateway URL construction.

use super::FetchError;

/// Build the gateway URL for a content identifier.
///
/// The identifier is appended to the base URL as-is: no escaping, no CID
/// validation. The result only has to parse as a URL.
pub fn resolve(base_url: &str, identifier: &str) -> Result<url::Url, FetchError> {
    let raw = format!("{base_url}{identifier}");
    url::Url::parse(&raw).map_err(|e| FetchError::InvalidUrl(format!("{raw}: {e}")))
}
