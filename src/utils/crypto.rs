//! crypto utils

use crate::utils::Also;

use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};

/// convert bytes to lowercase hex string
pub fn to_hex_string(src: impl AsRef<[u8]>) -> String {
    faster_hex::hex_string(src.as_ref())
}

/// verify sha256 checksum string
pub fn is_sha256_checksum(s: &str) -> bool {
    let is_lowercase_hex = |&c: &u8| c.is_ascii_digit() || (b'a'..=b'f').contains(&c);
    s.len() == 64 && s.as_bytes().iter().all(is_lowercase_hex)
}

/// `hex(sha256(data))`
pub fn hex_sha256(data: &[u8]) -> String {
    to_hex_string(Sha256::digest(data))
}

/// `hmac_sha256(key, data)`
pub fn hmac_sha256(key: &[u8], data: &[u8]) -> impl AsRef<[u8]> {
    let m = <Hmac<Sha256>>::new_from_slice(key)
        .unwrap_or_else(|_| panic!("HMAC can take key of any size"));
    m.also(|m| m.update(data)).finalize().into_bytes()
}

/// `hex(hmac_sha256(key, data))`
pub fn hex_hmac_sha256(key: &[u8], data: &[u8]) -> String {
    to_hex_string(hmac_sha256(key, data))
}
