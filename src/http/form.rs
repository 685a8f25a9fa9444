//! Form value lookup
//!
//! Reads fields from `application/x-www-form-urlencoded` request bodies and
//! from the URL query string. Body fields take precedence over query fields.
//! Values are returned as raw decoded bytes; they are not required to be UTF-8.

use percent_encoding::percent_decode;

pub const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";

/// Whether a request body with this Content-Type carries form fields
///
/// A missing Content-Type means an opaque body, which is ignored.
pub fn is_urlencoded(content_type: Option<&str>) -> bool {
    content_type.is_some_and(|ct| {
        ct.split(';')
            .next()
            .is_some_and(|mime| mime.trim().eq_ignore_ascii_case(FORM_URLENCODED))
    })
}

/// First value of `key`, looking in the form body and then in the query
pub fn form_value(form: &[u8], query: Option<&str>, key: &str) -> Option<Vec<u8>> {
    first_value(form, key).or_else(|| query.and_then(|q| first_value(q.as_bytes(), key)))
}

fn first_value(encoded: &[u8], key: &str) -> Option<Vec<u8>> {
    encoded
        .split(|&b| b == b'&')
        .filter(|pair| !pair.is_empty())
        .find_map(|pair| {
            let (name, value) = match pair.iter().position(|&b| b == b'=') {
                Some(eq) => (&pair[..eq], &pair[eq + 1..]),
                None => (pair, &pair[pair.len()..]),
            };
            (decode_component(name) == key.as_bytes()).then(|| decode_component(value))
        })
}

/// `+` is a space, then `%XX` escapes become raw bytes
fn decode_component(component: &[u8]) -> Vec<u8> {
    let spaced: Vec<u8> = component
        .iter()
        .map(|&b| if b == b'+' { b' ' } else { b })
        .collect();
    percent_decode(&spaced).collect()
}
