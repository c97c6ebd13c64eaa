//! Argument token splitting for the `/key=value1=value2` mini-language.
//!
//! A token is split on `=` only; value segments are opaque and may contain
//! colons, backslashes, and commas (Windows paths, `server,port` names).

use crate::error::Dir2DacError;

/// Split one raw CLI token into its key and ordered value segments.
///
/// The key comparison is the caller's concern; this function preserves the
/// original casing of both key and values.
pub fn split_token(raw: &str) -> Result<(String, Vec<String>), Dir2DacError> {
    let body = raw
        .strip_prefix('/')
        .ok_or_else(|| Dir2DacError::TokenFormatError {
            token: raw.to_string(),
        })?;

    let mut segments = body.split('=');
    let key = segments.next().unwrap_or_default();
    let values: Vec<String> = segments.map(str::to_string).collect();

    if key.is_empty() || values.is_empty() {
        return Err(Dir2DacError::TokenFormatError {
            token: raw.to_string(),
        });
    }

    Ok((key.to_string(), values))
}
