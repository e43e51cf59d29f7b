//! Header file reading.
//!
//! Headers are expected to be UTF-8. Files that are not valid UTF-8 are
//! decoded as ISO-8859-1, one byte per character, so every byte sequence
//! yields a buffer.

use crate::error::{HeaderError, HeaderResult};
use std::borrow::Cow;
use std::path::Path;
use tracing::debug;

/// Decode raw header bytes, falling back to ISO-8859-1
pub fn decode_header_bytes(bytes: &[u8]) -> Cow<'_, str> {
    match std::str::from_utf8(bytes) {
        Ok(text) => Cow::Borrowed(text),
        Err(_) => Cow::Owned(bytes.iter().map(|&byte| char::from(byte)).collect()),
    }
}

/// Read a header file into a string buffer
pub fn read_header_source(path: &Path) -> HeaderResult<String> {
    let bytes = std::fs::read(path).map_err(|source| HeaderError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;

    let text = decode_header_bytes(&bytes);
    if let Cow::Owned(_) = text {
        debug!("{} is not UTF-8, decoded as ISO-8859-1", path.display());
    }
    Ok(text.into_owned())
}
