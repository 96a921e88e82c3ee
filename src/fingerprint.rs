//! Deterministic project fingerprints.
//!
//! A fingerprint identifies the *content* of a bundled project: name,
//! modules and references. Module and reference order do not affect it,
//! so two runs that merge the same inputs in a different order agree.
//!
//! - Modules hash by (name, kind, code), sorted by name
//! - References hash by lowercased (identifier, name), sorted
//! - Hash: xxh64 over canonical JSON, rendered as 16 hex digits

use std::collections::BTreeMap;

use serde::Serialize;
use sha2::{Digest, Sha256};
use xxhash_rust::xxh64::xxh64;

use crate::types::{ModuleKind, Project};

#[derive(Serialize)]
struct FingerprintInput<'a> {
    name: &'a str,
    modules: BTreeMap<&'a str, (ModuleKind, &'a str)>,
    references: Vec<(String, String)>,
}

/// Compute the fingerprint of a project as a hex string.
pub fn project_fingerprint(project: &Project) -> String {
    let modules = project
        .modules()
        .iter()
        .map(|m| (m.name.as_str(), (m.kind, m.code.as_str())))
        .collect();

    let mut references: Vec<(String, String)> = project
        .references()
        .iter()
        .map(|r| (r.identifier.to_lowercase(), r.name.to_lowercase()))
        .collect();
    references.sort();

    let input = FingerprintInput {
        name: &project.name,
        modules,
        references,
    };

    // Serializing string maps and tuples cannot fail.
    let bytes = serde_json::to_vec(&input).unwrap_or_default();
    format!("{:016x}", xxh64(&bytes, 0))
}

/// SHA-256 digest of a module's code, hex encoded.
pub fn code_digest(code: &str) -> String {
    hex::encode(Sha256::digest(code.as_bytes()))
}
