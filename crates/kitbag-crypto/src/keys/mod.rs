//! Random key generation

use crate::encoding::{to_base64, to_hex};
use rand::RngCore;

pub const DEFAULT_KEY_BYTES: usize = 32;

/// Sizes printed by the `kitbag keys` command
pub const DEFAULT_KEY_SIZES: [usize; 3] = [32, 64, 128];

/// Freshly generated key material with its encodings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedKey {
    pub bytes: Vec<u8>,
    pub base64: String,
    pub hex: String,
}

/// Generate `bytes` bytes from the thread-local CSPRNG (seeded from the OS).
pub fn generate_key(bytes: usize) -> GeneratedKey {
    let mut buffer = vec![0u8; bytes];
    rand::rng().fill_bytes(&mut buffer);

    GeneratedKey {
        base64: to_base64(&buffer),
        hex: to_hex(&buffer),
        bytes: buffer,
    }
}

impl Default for GeneratedKey {
    fn default() -> Self {
        generate_key(DEFAULT_KEY_BYTES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::{buffer_from_base64, buffer_from_hex};
    use std::collections::HashSet;

    #[test]
    fn test_key_lengths() {
        for bytes in [16, 32, 64, 128] {
            let key = generate_key(bytes);
            assert_eq!(key.bytes.len(), bytes);
            assert_eq!(key.hex.len(), bytes * 2);
        }
    }

    #[test]
    fn test_keys_are_unique() {
        let keys: HashSet<String> = (0..100).map(|_| generate_key(32).hex).collect();
        assert_eq!(keys.len(), 100);
        assert!(keys.iter().all(|k| k.len() == 64));
    }

    #[test]
    fn test_consistent_encodings() {
        let key = generate_key(32);
        assert_eq!(buffer_from_base64(&key.base64).unwrap(), key.bytes);
        assert_eq!(buffer_from_hex(&key.hex).unwrap(), key.bytes);
    }

    #[test]
    fn test_default_length() {
        assert_eq!(GeneratedKey::default().bytes.len(), DEFAULT_KEY_BYTES);
    }
}
