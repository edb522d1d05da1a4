//! Autolink encoding utilities.
//!
//! Fast-path optimized: scans for the first byte needing work, returns the
//! input borrowed when nothing does.

use std::borrow::Cow;

/// Lookup table for ASCII bytes that are percent-encoded in autolink hrefs.
const URI_ENCODE_TABLE: [bool; 128] = {
    let mut table = [false; 128];
    table[b'"' as usize] = true;
    table[b'%' as usize] = true;
    table[b'[' as usize] = true;
    table[b'\\' as usize] = true;
    table[b']' as usize] = true;
    table[b'^' as usize] = true;
    table[b'`' as usize] = true;
    table[b'{' as usize] = true;
    table[b'|' as usize] = true;
    table[b'}' as usize] = true;
    table
};

#[inline]
fn needs_percent_encoding(byte: u8) -> bool {
    byte >= 0x80 || URI_ENCODE_TABLE[byte as usize]
}

/// Percent-encode an autolink URI for embedding in `href="..."`.
///
/// ASCII bytes in ``" % [ \ ] ^ ` { | }`` become `%XX` (uppercase hex);
/// non-ASCII characters are UTF-8 encoded and each byte becomes `%XX`.
/// Everything else passes through unchanged. Re-encoding already-encoded
/// input double-encodes by design (`%` is itself in the table).
pub fn percent_encode_uri(uri: &str) -> Cow<'_, str> {
    const HEX: &[u8; 16] = b"0123456789ABCDEF";

    let bytes = uri.as_bytes();
    let Some(first) = bytes.iter().position(|&b| needs_percent_encoding(b)) else {
        return Cow::Borrowed(uri);
    };

    let mut encoded = String::with_capacity(uri.len() + 8);
    encoded.push_str(&uri[..first]);
    for &byte in &bytes[first..] {
        if needs_percent_encoding(byte) {
            encoded.push('%');
            encoded.push(HEX[(byte >> 4) as usize] as char);
            encoded.push(HEX[(byte & 0xF) as usize] as char);
        } else {
            encoded.push(byte as char);
        }
    }
    Cow::Owned(encoded)
}

/// Escape the display-text copy of an autolink: `<`, `>`, `&` only.
#[inline]
pub fn escape_display_text(text: &str) -> Cow<'_, str> {
    html_escape::encode_text(text)
}
