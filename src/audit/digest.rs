// src/audit/digest.rs

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::Context;
use blake3::Hasher;
use globset::{Glob, GlobSet, GlobSetBuilder};
use tracing::debug;

use crate::errors::Result;

/// Hex BLAKE3 digest of one file's contents.
pub fn compute_file_digest(path: &Path) -> Result<String> {
    let mut hasher = Hasher::new();
    let mut file =
        File::open(path).with_context(|| format!("opening file for hashing: {:?}", path))?;
    let mut buf = [0u8; 8192];
    loop {
        let n = file
            .read(&mut buf)
            .with_context(|| format!("reading {:?}", path))?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hasher.finalize().to_hex().to_string())
}

/// Compile exclude patterns into a single glob set.
pub fn build_excludes(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pat in patterns {
        let glob = Glob::new(pat).with_context(|| format!("invalid glob pattern: {pat}"))?;
        builder.add(glob);
    }
    let set = builder
        .build()
        .with_context(|| "building exclude pattern set".to_string())?;
    Ok(set)
}

/// Every file under `root` (or `root` itself if it is a file), skipping
/// paths matched by `excludes`. Results are sorted.
pub fn collect_files(root: &Path, excludes: &GlobSet) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    if root.is_file() {
        if !is_excluded(root, excludes) {
            files.push(root.to_path_buf());
        }
        return Ok(files);
    }

    let mut stack = vec![root.to_path_buf()];
    while let Some(dir) = stack.pop() {
        let entries = fs::read_dir(&dir).with_context(|| format!("reading dir {:?}", dir))?;
        for entry in entries {
            let path = entry
                .with_context(|| format!("reading entry in {:?}", dir))?
                .path();
            if is_excluded(&path, excludes) {
                debug!(path = %path.display(), "excluded from audit");
                continue;
            }
            if path.is_dir() {
                stack.push(path);
            } else if path.is_file() {
                files.push(path);
            }
        }
    }

    files.sort();
    Ok(files)
}

fn is_excluded(path: &Path, excludes: &GlobSet) -> bool {
    let normalised = path.to_string_lossy().replace('\\', "/");
    excludes.is_match(normalised.as_str())
}

/// Digest every file reachable from `paths`, keyed by path.
pub fn digest_paths<P: AsRef<Path>>(
    paths: &[P],
    excludes: &GlobSet,
) -> Result<BTreeMap<String, String>> {
    let mut digests = BTreeMap::new();
    for root in paths {
        let root = root.as_ref();
        if !root.exists() {
            return Err(anyhow::anyhow!("audit path {:?} does not exist", root).into());
        }
        for file in collect_files(root, excludes)? {
            let digest = compute_file_digest(&file)?;
            digests.insert(file.to_string_lossy().replace('\\', "/"), digest);
        }
    }
    Ok(digests)
}
