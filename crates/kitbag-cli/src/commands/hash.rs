//! hash and hmac commands

use super::CommandContext;
use anyhow::Result;
use clap::ValueEnum;
use kitbag_crypto::{hash_sha256, hash_sha512, hmac_sha256, hmac_sha512, HmacKey};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    Sha256,
    Sha512,
}

#[derive(Serialize)]
struct DigestOutput<'a> {
    algorithm: Algorithm,
    hmac: bool,
    input: &'a str,
    hex: String,
}

fn print(ctx: &CommandContext, output: DigestOutput<'_>) -> Result<()> {
    if ctx.is_json() {
        ctx.print_json(&output)
    } else {
        println!("{}", output.hex);
        Ok(())
    }
}

pub fn hash(ctx: &CommandContext, algorithm: Algorithm, input: &str) -> Result<()> {
    let hex = match algorithm {
        Algorithm::Sha256 => hash_sha256(input),
        Algorithm::Sha512 => hash_sha512(input),
    };

    print(
        ctx,
        DigestOutput {
            algorithm,
            hmac: false,
            input,
            hex,
        },
    )
}

pub fn hmac(ctx: &CommandContext, algorithm: Algorithm, input: &str, key: &str) -> Result<()> {
    ctx.debug(&format!("HMAC key: {} hex chars", key.len()));

    let key = HmacKey::Hex(key);
    let hex = match algorithm {
        Algorithm::Sha256 => hmac_sha256(input, key)?,
        Algorithm::Sha512 => hmac_sha512(input, key)?,
    };

    print(
        ctx,
        DigestOutput {
            algorithm,
            hmac: true,
            input,
            hex,
        },
    )
}
