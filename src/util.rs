//! Text decoding helpers.

use std::borrow::Cow;

/// Decode fragment or manifest bytes to a string.
///
/// UTF-8 is tried first (a byte order mark is stripped). Bytes that are not
/// valid UTF-8 are decoded as Windows-1252, which older desktop exports used.
pub fn decode_text(bytes: &[u8]) -> Cow<'_, str> {
    let (result, _encoding, malformed) = encoding_rs::UTF_8.decode(bytes);

    if !malformed {
        return result;
    }

    let (result, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
    result
}
