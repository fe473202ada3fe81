//! PGP armor decoding — the release-file parser's crypto collaborator.
//!
//! Full signature verification of fetched archives is explicitly out of
//! scope; this module only decodes a public key's armor and
//! derives its fingerprint, so the release-file parser can check it
//! against the declared `id`.

use std::io::Cursor;

use pgp::types::KeyTrait;
use pgp::SignedPublicKey;

use crate::error::Error;

/// Decode an ASCII-armored PGP public key and return its fingerprint as a
/// lowercase hex string.
///
/// # Errors
///
/// Returns `Error::Crypto` if the armor cannot be parsed.
pub fn decode_public_key_fingerprint(armor: &str) -> Result<String, Error> {
    let (key, _headers) = SignedPublicKey::from_armor_single(Cursor::new(armor.as_bytes()))
        .map_err(|e| Error::Crypto(format!("failed to decode PGP armor: {e}")))?;
    Ok(hex::encode(key.fingerprint()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_garbage_armor() {
        let result = decode_public_key_fingerprint("not a pgp key");
        assert!(result.is_err());
    }
}
