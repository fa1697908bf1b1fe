// src/audit/mod.rs

//! Artifact audit: per-file BLAKE3 digests and an optionally signed JSON
//! report.
//!
//! - [`digest`] walks the given paths and hashes every file.
//! - [`report`] builds, signs, verifies and writes the report.

pub mod digest;
pub mod report;

pub use digest::{build_excludes, collect_files, compute_file_digest, digest_paths};
pub use report::{load_signing_key, AuditReport};
