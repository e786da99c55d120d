//! s3 commands - object storage through the store helpers

use super::CommandContext;
use crate::object_path::ObjectPath;
use crate::S3Commands;
use anyhow::{bail, Context, Result};
use colored::Colorize;
use kitbag_dates::get_iso;
use kitbag_env::EnvGuard;
use kitbag_storage::{BucketItem, EnvNames, GetOptions, ListOptions, ObjectBody, ObjectStore, UploadData};
use serde::Serialize;
use std::io::Write;

pub async fn execute(ctx: &CommandContext, command: S3Commands, env_prefix: &str) -> Result<()> {
    let guard = EnvGuard::new(ctx.logger.clone());
    let store = ObjectStore::from_env(&guard, &EnvNames::with_prefix(env_prefix))?;

    match command {
        S3Commands::Get {
            path,
            json,
            allow_missing,
        } => get(ctx, &store, &path, json, allow_missing).await,
        S3Commands::Put {
            path,
            file,
            data,
            json,
        } => {
            let payload = match (file, data) {
                (Some(file), _) => std::fs::read(&file)
                    .with_context(|| format!("Failed to read {}", file.display()))?,
                (None, Some(data)) => data.into_bytes(),
                (None, None) => bail!("Nothing to upload: pass --file or --data"),
            };
            put(ctx, &store, &path, payload, json).await
        }
        S3Commands::Stat { path } => stat(ctx, &store, &path).await,
        S3Commands::Ls { path, recursive } => ls(ctx, &store, &path, recursive).await,
        S3Commands::Rm { path } => rm(ctx, &store, &path).await,
    }
}

async fn get(
    ctx: &CommandContext,
    store: &ObjectStore,
    path: &str,
    json: bool,
    allow_missing: bool,
) -> Result<()> {
    let path = ObjectPath::parse_object(path)?;
    ctx.debug(&format!("Fetching {}", path));

    let options = GetOptions {
        parse_json: json,
        throw_error: !allow_missing,
    };

    match store.get_object(&path.bucket, &path.key, options).await? {
        Some(ObjectBody::Json(value)) => ctx.print_json(&value)?,
        Some(ObjectBody::Bytes(bytes)) => {
            let mut stdout = std::io::stdout();
            stdout.write_all(&bytes)?;
            stdout.flush()?;
        }
        None => ctx.debug(&format!("{} not found", path)),
    }

    Ok(())
}

async fn put(
    ctx: &CommandContext,
    store: &ObjectStore,
    path: &str,
    payload: Vec<u8>,
    json: bool,
) -> Result<()> {
    let path = ObjectPath::parse_object(path)?;

    let data = if json {
        UploadData::Json(serde_json::from_slice(&payload).context("Data is not valid JSON")?)
    } else {
        UploadData::from(payload)
    };

    store.upload_object(&path.bucket, &path.key, data).await?;
    ctx.info(&format!("{} {}", "upload:".green(), path));
    Ok(())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StatOutput {
    bucket: String,
    key: String,
    exists: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    stat: Option<kitbag_storage::ObjectStat>,
}

async fn stat(ctx: &CommandContext, store: &ObjectStore, path: &str) -> Result<()> {
    let path = ObjectPath::parse_object(path)?;
    let stat = store.object_exists(&path.bucket, &path.key).await;

    if ctx.is_json() {
        return ctx.print_json(&StatOutput {
            bucket: path.bucket.clone(),
            key: path.key.clone(),
            exists: stat.is_some(),
            stat,
        });
    }

    let Some(stat) = stat else {
        println!("{} {}", path, "does not exist".red());
        return Ok(());
    };

    println!("{}", path.to_string().blue().bold());
    println!();
    println!("  {}: {}", "Size".cyan(), stat.size);
    if let Some(ct) = &stat.content_type {
        println!("  {}: {}", "Content-Type".cyan(), ct);
    }
    if let Some(lm) = &stat.last_modified {
        println!("  {}: {}", "Last-Modified".cyan(), get_iso(Some(lm)));
    }
    if let Some(etag) = &stat.etag {
        println!("  {}: {}", "ETag".cyan(), etag);
    }
    for (k, v) in &stat.metadata {
        println!("  {}: {}", k.cyan(), v);
    }

    Ok(())
}

async fn ls(ctx: &CommandContext, store: &ObjectStore, path: &str, recursive: bool) -> Result<()> {
    let path = ObjectPath::parse(path)?;
    ctx.debug(&format!(
        "Listing objects in bucket '{}' with prefix '{}'",
        path.bucket, path.key
    ));

    let items = store
        .list_objects(&path.bucket, &path.key, ListOptions { recursive })
        .await?;

    if ctx.is_json() {
        return ctx.print_json(&items);
    }

    for item in &items {
        match item {
            BucketItem::Prefix { prefix } => {
                println!("{:>24} {:>12} {}", "", "PRE", prefix.blue().bold());
            }
            BucketItem::Object {
                name,
                size,
                last_modified,
                ..
            } => {
                let date = last_modified
                    .as_ref()
                    .map(|d| get_iso(Some(d)))
                    .unwrap_or_default();
                println!("{:>24} {:>12} {}", date, size, name);
            }
        }
    }

    let total: u64 = items.iter().map(BucketItem::size).sum();
    ctx.info(&format!("\nTotal: {} item(s), {} bytes", items.len(), total));
    Ok(())
}

async fn rm(ctx: &CommandContext, store: &ObjectStore, path: &str) -> Result<()> {
    let path = ObjectPath::parse_object(path)?;
    store.remove_object(&path.bucket, &path.key).await?;
    ctx.info(&format!("{} {}", "delete:".red(), path));
    Ok(())
}
