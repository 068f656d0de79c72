//! ASCII armor for keys and challenge messages.
//!
//! Stored key bodies carry no armor: [`strip`] removes the fixed
//! three-line header block and the footer line from a submitted block, and
//! [`wrap`] is its exact inverse. Keys and produced ciphertext use the
//! same convention, so external tooling can round-trip both.

use crate::challenge::error::Error;
use base64ct::{Base64, Encoding};

/// Armor label for public-key blocks.
pub const PUBLIC_KEY_LABEL: &str = "KUNCI PUBLIC KEY BLOCK";
/// Armor label for encrypted challenge messages.
pub const MESSAGE_LABEL: &str = "KUNCI MESSAGE";

const HEADER_LINES: usize = 3;
const WRAP_COLUMNS: usize = 64;
const VERSION_LINE: &str = concat!("Version: kunci ", env!("CARGO_PKG_VERSION"));

/// Strips the armor from a submitted block, returning the bare body.
///
/// Drops the three-line header and the final footer line; the body in
/// between is returned unmodified. Trailing whitespace on the submission
/// is ignored so pasted blocks with a final newline survive.
///
/// # Errors
///
/// Returns [`Error::InvalidKey`] if the input has fewer lines than the
/// fixed header/footer skip requires.
pub fn strip(raw: &str) -> Result<String, Error> {
    let lines: Vec<&str> = raw.trim_end().split('\n').collect();
    if lines.len() < HEADER_LINES + 2 {
        return Err(Error::InvalidKey);
    }
    Ok(lines[HEADER_LINES..lines.len() - 1].join("\n"))
}

/// Wraps a bare body with the standard armor header and footer.
#[must_use]
pub fn wrap(body: &str, label: &str) -> String {
    format!("-----BEGIN {label}-----\n{VERSION_LINE}\n\n{body}\n-----END {label}-----")
}

/// Encodes raw bytes as a base64 body folded at 64 columns.
#[must_use]
pub fn encode_body(bytes: &[u8]) -> String {
    let encoded = Base64::encode_string(bytes);
    let mut folded = String::with_capacity(encoded.len() + encoded.len() / WRAP_COLUMNS + 1);
    for (idx, ch) in encoded.chars().enumerate() {
        if idx > 0 && idx % WRAP_COLUMNS == 0 {
            folded.push('\n');
        }
        folded.push(ch);
    }
    folded
}

/// Decodes a base64 body, tolerating line folds and stray whitespace.
///
/// # Errors
///
/// Returns an error if the remaining content is not valid base64.
pub fn decode_body(body: &str) -> Result<Vec<u8>, base64ct::Error> {
    let compact: String = body.split_whitespace().collect();
    Base64::decode_vec(&compact)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_is_inverse_of_wrap() {
        let body = "mQENBGJxGBABCADd\nqxNcqbRiQvhL";
        let armored = wrap(body, PUBLIC_KEY_LABEL);
        assert_eq!(strip(&armored).unwrap(), body);
    }

    #[test]
    fn strip_tolerates_trailing_newline() {
        let body = "c2luZ2xlLWxpbmU=";
        let armored = format!("{}\n", wrap(body, PUBLIC_KEY_LABEL));
        assert_eq!(strip(&armored).unwrap(), body);
    }

    #[test]
    fn strip_rejects_short_input() {
        assert!(matches!(strip(""), Err(Error::InvalidKey)));
        assert!(matches!(strip("just one line"), Err(Error::InvalidKey)));
        // Header and footer with no body line at all.
        let headers_only = "-----BEGIN X-----\nVersion: x\n\n-----END X-----";
        assert!(matches!(strip(headers_only), Err(Error::InvalidKey)));
    }

    #[test]
    fn wrap_layout_matches_convention() {
        let armored = wrap("Ym9keQ==", MESSAGE_LABEL);
        let lines: Vec<&str> = armored.split('\n').collect();
        assert_eq!(lines.first().copied(), Some("-----BEGIN KUNCI MESSAGE-----"));
        assert!(lines.get(1).is_some_and(|l| l.starts_with("Version: ")));
        assert_eq!(lines.get(2).copied(), Some(""));
        assert_eq!(lines.get(3).copied(), Some("Ym9keQ=="));
        assert_eq!(lines.last().copied(), Some("-----END KUNCI MESSAGE-----"));
    }

    #[test]
    fn encode_body_folds_and_decodes() {
        let bytes: Vec<u8> = (0u8..=255).collect();
        let body = encode_body(&bytes);
        assert!(body.lines().all(|line| line.len() <= 64));
        assert!(body.lines().count() > 1);
        assert_eq!(decode_body(&body).unwrap(), bytes);
    }

    #[test]
    fn decode_body_rejects_invalid_base64() {
        assert!(decode_body("not*base64*at*all").is_err());
    }
}
