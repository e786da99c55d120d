//! Hex and base64 conversions with strict input validation

use base64::{engine::general_purpose::STANDARD, Engine};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CryptoError {
    #[error("Invalid hex string")]
    InvalidHex,

    #[error("Invalid hex string length")]
    InvalidHexLength,

    #[error("Invalid base64 string")]
    InvalidBase64,
}

pub type Result<T> = std::result::Result<T, CryptoError>;

/// Decode a hex string. Both cases are accepted; every byte takes two
/// characters.
pub fn buffer_from_hex(hex: &str) -> Result<Vec<u8>> {
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(CryptoError::InvalidHex);
    }

    if hex.len() % 2 != 0 {
        return Err(CryptoError::InvalidHexLength);
    }

    hex::decode(hex).map_err(|_| CryptoError::InvalidHex)
}

/// Decode a padded standard-alphabet base64 string.
pub fn buffer_from_base64(base64: &str) -> Result<Vec<u8>> {
    STANDARD
        .decode(base64)
        .map_err(|_| CryptoError::InvalidBase64)
}

pub fn to_hex(data: &[u8]) -> String {
    hex::encode(data)
}

pub fn to_base64(data: &[u8]) -> String {
    STANDARD.encode(data)
}
