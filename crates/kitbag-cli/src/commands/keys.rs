//! keys command - generate random key material

use super::CommandContext;
use anyhow::{bail, Result};
use colored::Colorize;
use kitbag_crypto::{generate_key, DEFAULT_KEY_SIZES};
use serde::Serialize;

#[derive(Serialize)]
struct KeyOutput {
    bytes: usize,
    base64: String,
    hex: String,
}

pub fn execute(ctx: &CommandContext, sizes: &[usize]) -> Result<()> {
    let sizes = if sizes.is_empty() {
        DEFAULT_KEY_SIZES.to_vec()
    } else {
        sizes.to_vec()
    };

    if sizes.contains(&0) {
        bail!("Key size must be at least 1 byte");
    }

    let keys: Vec<KeyOutput> = sizes
        .into_iter()
        .map(|bytes| {
            let key = generate_key(bytes);
            KeyOutput {
                bytes,
                base64: key.base64,
                hex: key.hex,
            }
        })
        .collect();

    if ctx.is_json() {
        return ctx.print_json(&keys);
    }

    for (i, key) in keys.iter().enumerate() {
        if i > 0 {
            ctx.info("");
        }
        ctx.info(&format!("{} bytes", key.bytes).blue().bold().to_string());
        println!("  {}: {}", "base64".cyan(), key.base64);
        println!("  {}: {}", "hex".cyan(), key.hex);
    }

    Ok(())
}
