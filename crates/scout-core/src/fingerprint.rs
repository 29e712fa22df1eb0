//! Content fingerprints used as cache keys.
//!
//! The reflection hash must be a function of reflected structure and
//! profiling parameters alone. Sampled values and build timestamps never
//! participate, so rebuilding against an unchanged database yields the same
//! hash.

use crate::config::ExplorerConfig;
use crate::raw::RawSchema;
use sha2::{Digest, Sha256};

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex_prefix(&hasher.finalize(), 64)
}

fn hex_prefix(digest: &[u8], chars: usize) -> String {
    let mut out = String::with_capacity(chars);
    for byte in digest {
        out.push_str(&format!("{byte:02x}"));
        if out.len() >= chars {
            break;
        }
    }
    out.truncate(chars);
    out
}

/// Short fingerprint of a connection target. Used to key the card cache on
/// disk and to identify the database in the card without leaking the URL.
pub fn connection_fingerprint(url: &str) -> String {
    sha256_hex(url.as_bytes())[..10].to_string()
}

/// Hash of reflected structure plus the profiling parameters that shape
/// derived content. `RawSchema` serializes through ordered maps, so the
/// JSON form is deterministic.
pub fn reflection_hash(raw: &RawSchema, config: &ExplorerConfig) -> String {
    let payload = serde_json::json!({
        "reflection": raw,
        "profiling": config.profiling_params(),
    });
    let json = serde_json::to_string(&payload).expect("raw schema serializes");
    sha256_hex(json.as_bytes())[..16].to_string()
}

/// Stable id for a subject area: hash of its sorted member table keys.
pub fn subject_area_id(sorted_members: &[String]) -> String {
    sha256_hex(sorted_members.join("\n").as_bytes())[..8].to_string()
}

#[cfg(test)]
#[path = "fingerprint_test.rs"]
mod tests;
