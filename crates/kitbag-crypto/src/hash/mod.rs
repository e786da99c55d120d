//! Hash utilities

use crate::encoding::{buffer_from_hex, Result};
use digest::Digest;
use hmac::{Hmac, Mac};
use sha2::{Sha256, Sha512};

type HmacSha256 = Hmac<Sha256>;
type HmacSha512 = Hmac<Sha512>;

pub fn hash_sha256(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    hex::encode(hasher.finalize())
}

pub fn hash_sha512(input: &str) -> String {
    let mut hasher = Sha512::new();
    hasher.update(input.as_bytes());
    hex::encode(hasher.finalize())
}

/// HMAC key material: raw bytes, or a hex string decoded before use.
#[derive(Debug, Clone, Copy)]
pub enum HmacKey<'a> {
    Bytes(&'a [u8]),
    Hex(&'a str),
}

impl<'a> HmacKey<'a> {
    fn to_bytes(self) -> Result<Vec<u8>> {
        match self {
            HmacKey::Bytes(bytes) => Ok(bytes.to_vec()),
            HmacKey::Hex(hex) => buffer_from_hex(hex),
        }
    }
}

impl<'a> From<&'a str> for HmacKey<'a> {
    fn from(hex: &'a str) -> Self {
        HmacKey::Hex(hex)
    }
}

impl<'a> From<&'a [u8]> for HmacKey<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        HmacKey::Bytes(bytes)
    }
}

impl<'a> From<&'a Vec<u8>> for HmacKey<'a> {
    fn from(bytes: &'a Vec<u8>) -> Self {
        HmacKey::Bytes(bytes)
    }
}

pub fn hmac_sha256_bytes(input: impl AsRef<[u8]>, key: HmacKey<'_>) -> Result<Vec<u8>> {
    let key = key.to_bytes()?;
    let mut mac = HmacSha256::new_from_slice(&key).expect("HMAC can take key of any size");
    mac.update(input.as_ref());
    Ok(mac.finalize().into_bytes().to_vec())
}

pub fn hmac_sha512_bytes(input: impl AsRef<[u8]>, key: HmacKey<'_>) -> Result<Vec<u8>> {
    let key = key.to_bytes()?;
    let mut mac = HmacSha512::new_from_slice(&key).expect("HMAC can take key of any size");
    mac.update(input.as_ref());
    Ok(mac.finalize().into_bytes().to_vec())
}

pub fn hmac_sha256(input: impl AsRef<[u8]>, key: HmacKey<'_>) -> Result<String> {
    hmac_sha256_bytes(input, key).map(hex::encode)
}

pub fn hmac_sha512(input: impl AsRef<[u8]>, key: HmacKey<'_>) -> Result<String> {
    hmac_sha512_bytes(input, key).map(hex::encode)
}
