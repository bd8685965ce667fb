//! `Vary` header patching.
//!
//! Caches and reverse proxies key responses on the request headers listed in
//! `Vary`. A response that depends on who is asking must list the header that
//! carries the credential, or a cached response for one caller can be served
//! to another.

use axum::http::{HeaderMap, HeaderName, HeaderValue, header};

/// Add `names` to the response's `Vary` header.
///
/// - existing entries keep their order and exact bytes; several `Vary` lines
///   are folded into one
/// - comparison is case-insensitive, so nothing is added twice
/// - `Vary: *` already covers every header and is left as `*`
pub fn patch_vary_headers(headers: &mut HeaderMap, names: &[HeaderName]) {
    // Work on raw bytes: entries with obs-text (e.g. `X-Caf\xe9`) must survive.
    let mut vary: Vec<Vec<u8>> = headers
        .get_all(header::VARY)
        .iter()
        .flat_map(|v| v.as_bytes().split(|b| *b == b','))
        .map(<[u8]>::trim_ascii)
        .filter(|v| !v.is_empty())
        .map(<[u8]>::to_vec)
        .collect();

    if vary.iter().any(|v| v.as_slice() == b"*") {
        headers.insert(header::VARY, HeaderValue::from_static("*"));
        return;
    }

    for name in names {
        if !vary
            .iter()
            .any(|v| v.eq_ignore_ascii_case(name.as_str().as_bytes()))
        {
            vary.push(canonical_name(name).into_bytes());
        }
    }

    // Every piece came from a valid header value, so the join is valid too.
    if let Ok(value) = HeaderValue::from_bytes(&vary.join(&b", "[..])) {
        headers.insert(header::VARY, value);
    }
}

/// `authorization` -> `Authorization`, `accept-encoding` -> `Accept-Encoding`.
fn canonical_name(name: &HeaderName) -> String {
    name.as_str()
        .split('-')
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join("-")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vary(headers: &HeaderMap) -> Vec<&str> {
        headers
            .get_all(header::VARY)
            .iter()
            .map(|v| v.to_str().unwrap())
            .collect()
    }

    #[test]
    fn adds_header_when_absent() {
        let mut headers = HeaderMap::new();
        patch_vary_headers(&mut headers, &[header::AUTHORIZATION]);
        assert_eq!(vary(&headers), vec!["Authorization"]);
    }

    #[test]
    fn merges_with_existing_entries() {
        let mut headers = HeaderMap::new();
        headers.insert(header::VARY, HeaderValue::from_static("Accept-Encoding"));

        patch_vary_headers(&mut headers, &[header::AUTHORIZATION]);
        assert_eq!(vary(&headers), vec!["Accept-Encoding, Authorization"]);
    }

    #[test]
    fn folds_multiple_lines() {
        let mut headers = HeaderMap::new();
        headers.append(header::VARY, HeaderValue::from_static("Accept-Encoding"));
        headers.append(header::VARY, HeaderValue::from_static("Origin, Cookie"));

        patch_vary_headers(&mut headers, &[header::AUTHORIZATION]);
        assert_eq!(
            vary(&headers),
            vec!["Accept-Encoding, Origin, Cookie, Authorization"]
        );
    }

    #[test]
    fn does_not_duplicate_existing_entry() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::VARY,
            HeaderValue::from_static("authorization, Accept-Language"),
        );

        patch_vary_headers(&mut headers, &[header::AUTHORIZATION]);
        assert_eq!(vary(&headers), vec!["authorization, Accept-Language"]);
    }

    #[test]
    fn keeps_entries_that_are_not_visible_ascii() {
        let mut headers = HeaderMap::new();
        headers.insert(header::VARY, HeaderValue::from_bytes(b"X-Caf\xe9").unwrap());

        patch_vary_headers(&mut headers, &[header::AUTHORIZATION]);

        let values: Vec<&[u8]> = headers
            .get_all(header::VARY)
            .iter()
            .map(HeaderValue::as_bytes)
            .collect();
        assert_eq!(values, vec![&b"X-Caf\xe9, Authorization"[..]]);
    }

    #[test]
    fn wildcard_is_kept() {
        let mut headers = HeaderMap::new();
        headers.insert(header::VARY, HeaderValue::from_static("Accept, *"));

        patch_vary_headers(&mut headers, &[header::AUTHORIZATION]);
        assert_eq!(vary(&headers), vec!["*"]);
    }

    #[test]
    fn patching_twice_is_idempotent() {
        let mut once = HeaderMap::new();
        once.insert(header::VARY, HeaderValue::from_static("Accept-Encoding"));
        patch_vary_headers(&mut once, &[header::AUTHORIZATION]);

        let mut twice = once.clone();
        patch_vary_headers(&mut twice, &[header::AUTHORIZATION]);

        assert_eq!(vary(&once), vary(&twice));
    }

    #[test]
    fn canonicalizes_names() {
        assert_eq!(canonical_name(&header::AUTHORIZATION), "Authorization");
        assert_eq!(canonical_name(&header::ACCEPT_ENCODING), "Accept-Encoding");
    }
}
