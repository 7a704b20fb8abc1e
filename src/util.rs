use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use sha2::{Digest, Sha256};

pub fn now_utc_string() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

pub fn utc_compact_string(ts: DateTime<Utc>) -> String {
    ts.format("%Y%m%dT%H%M%SZ").to_string()
}

pub fn ensure_directory(path: &Path) -> Result<()> {
    fs::create_dir_all(path)
        .with_context(|| format!("failed to create directory: {}", path.display()))
}

pub fn sha256_file(path: &Path) -> Result<String> {
    let mut file = File::open(path)
        .with_context(|| format!("failed to open file for hashing: {}", path.display()))?;

    let mut hasher = Sha256::new();
    let mut buf = [0_u8; 8192];

    loop {
        let count = file
            .read(&mut buf)
            .with_context(|| format!("failed to read file for hashing: {}", path.display()))?;
        if count == 0 {
            break;
        }
        hasher.update(&buf[..count]);
    }

    Ok(format!("{:x}", hasher.finalize()))
}

pub fn render_json_pretty<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>> {
    let mut data = serde_json::to_vec_pretty(value).context("failed to serialize json")?;
    data.push(b'\n');
    Ok(data)
}

pub fn write_json_pretty<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let data = render_json_pretty(value)
        .with_context(|| format!("failed to render json for {}", path.display()))?;
    write_file_atomic(path, &data)
}

/// Path used to stage `path` before it is renamed into place.
pub fn staging_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

pub fn write_staged(path: &Path, data: &[u8]) -> Result<PathBuf> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            ensure_directory(parent)?;
        }
    }

    let staged = staging_path(path);
    let result = File::create(&staged)
        .with_context(|| format!("failed to create {}", staged.display()))
        .and_then(|mut file| {
            file.write_all(data)
                .with_context(|| format!("failed to write {}", staged.display()))?;
            file.sync_all()
                .with_context(|| format!("failed to flush {}", staged.display()))
        });

    if let Err(err) = result {
        let _ = fs::remove_file(&staged);
        return Err(err);
    }

    Ok(staged)
}

pub fn commit_staged(staged: &Path, path: &Path) -> Result<()> {
    fs::rename(staged, path).with_context(|| {
        format!(
            "failed to move {} into place at {}",
            staged.display(),
            path.display()
        )
    })
}

pub fn write_file_atomic(path: &Path, data: &[u8]) -> Result<()> {
    let staged = write_staged(path, data)?;
    commit_staged(&staged, path)
}
