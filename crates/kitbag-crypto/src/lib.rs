//! Cryptography utilities for Kitbag

pub mod encoding;
pub mod hash;
pub mod keys;

pub use encoding::*;
pub use hash::*;
pub use keys::*;
