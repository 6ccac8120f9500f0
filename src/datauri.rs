//! Recovery of SVG markup from data-URI module exports
//!
//! Some toolchains run their own asset plugin before ours and hand over a
//! module like `export default "data:image/svg+xml,%3Csvg..."` instead of
//! the raw file. These helpers turn it back into markup.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use percent_encoding::percent_decode_str;
use thiserror::Error;

const EXPORT_MARKER: &str = "export default";
const PERCENT_PREFIX: &str = r#"export default "data:image/svg+xml,"#;
const BASE64_PREFIX: &str = r#"export default "data:image/svg+xml;base64,"#;
const QUOTE_SUFFIX: &str = "\"";

/// Errors that can occur while decoding a data-URI export
#[derive(Debug, Error)]
pub enum DataUriError {
    #[error("malformed percent escape at byte {offset} of the data URI")]
    MalformedEscape { offset: usize },

    #[error("decoded data URI is not valid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    #[error("invalid base64 payload in data URI: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("base64 payload in data URI is not valid UTF-8: {0}")]
    Base64Utf8(#[from] std::string::FromUtf8Error),
}

/// Whether the source looks like a module re-exporting the file as a data URI
pub fn is_data_uri_export(source: &str) -> bool {
    source.starts_with(EXPORT_MARKER)
}

/// Strip the export wrapper and decode the data URI payload
///
/// The `export default "data:image/svg+xml,` prefix and the closing quote are
/// removed only where present, then the rest is percent-decoded. A `%` not
/// followed by two hex digits is an error, as is a payload that does not
/// decode to UTF-8.
///
/// # Example
///
/// ```rust
/// use svelte_svg::datauri::unwrap_data_uri_export;
///
/// let source = r#"export default "data:image/svg+xml,%3Csvg%3E%3C%2Fsvg%3E""#;
/// assert_eq!(unwrap_data_uri_export(source).unwrap(), "<svg></svg>");
/// ```
pub fn unwrap_data_uri_export(source: &str) -> Result<String, DataUriError> {
    if let Some(payload) = source.strip_prefix(BASE64_PREFIX) {
        let payload = strip_closing_quote(payload);
        let bytes = STANDARD.decode(payload)?;
        return Ok(String::from_utf8(bytes)?);
    }

    let payload = source.strip_prefix(PERCENT_PREFIX).unwrap_or(source);
    let payload = strip_closing_quote(payload);
    check_escapes(payload)?;
    let decoded = percent_decode_str(payload).decode_utf8()?;
    Ok(decoded.into_owned())
}

/// `percent_decode_str` keeps bad escapes as-is; reject them instead
fn check_escapes(payload: &str) -> Result<(), DataUriError> {
    let bytes = payload.as_bytes();
    for (offset, _) in payload.match_indices('%') {
        let valid = bytes
            .get(offset + 1..offset + 3)
            .is_some_and(|hex| hex.iter().all(u8::is_ascii_hexdigit));
        if !valid {
            return Err(DataUriError::MalformedEscape { offset });
        }
    }
    Ok(())
}

fn strip_closing_quote(payload: &str) -> &str {
    payload.strip_suffix(QUOTE_SUFFIX).unwrap_or(payload)
}
