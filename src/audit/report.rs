// src/audit/report.rs

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::{FleetError, Result};

const SIGNING_CONTEXT: &str = "fleetsim 2026-10 audit report signature";

/// Checksum report over a set of artifacts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditReport {
    pub files: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
}

impl AuditReport {
    pub fn new(files: BTreeMap<String, String>) -> Self {
        Self {
            files,
            signature: None,
        }
    }

    /// Sign with a keyed BLAKE3 hash over the compact JSON of `files`
    /// (keys sorted). The hashing key is derived from `secret`.
    pub fn sign(&mut self, secret: &[u8]) -> Result<()> {
        self.signature = Some(self.signature_for(secret)?.to_hex().to_string());
        Ok(())
    }

    /// True if the report carries a signature matching `secret`.
    pub fn verify(&self, secret: &[u8]) -> Result<bool> {
        let Some(signature) = &self.signature else {
            return Ok(false);
        };
        let claimed = blake3::Hash::from_hex(signature)
            .map_err(|e| FleetError::Config(format!("malformed audit signature: {e}")))?;
        // blake3::Hash compares in constant time.
        Ok(claimed == self.signature_for(secret)?)
    }

    fn signature_for(&self, secret: &[u8]) -> Result<blake3::Hash> {
        let payload = serde_json::to_vec(&self.files)?;
        let key = blake3::derive_key(SIGNING_CONTEXT, secret);
        Ok(blake3::keyed_hash(&key, &payload))
    }

    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("creating report directory {:?}", parent))?;
            }
        }
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');
        fs::write(path, json).with_context(|| format!("writing audit report to {:?}", path))?;

        info!(
            path = %path.display(),
            entries = self.files.len(),
            signed = self.signature.is_some(),
            "audit report written"
        );
        Ok(())
    }
}

/// Read a signing secret, ignoring surrounding whitespace.
pub fn load_signing_key(path: impl AsRef<Path>) -> Result<Vec<u8>> {
    let path = path.as_ref();
    let raw = fs::read(path).with_context(|| format!("reading signing key {:?}", path))?;
    let secret = raw.trim_ascii().to_vec();
    if secret.is_empty() {
        return Err(FleetError::Config(format!("signing key {:?} is empty", path)));
    }
    Ok(secret)
}
