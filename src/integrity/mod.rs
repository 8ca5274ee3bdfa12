//! Artifact integrity manifests
//!
//! Computes and verifies SHA-256 manifests over a named set of artifact
//! files. The serialized form is the classic `sha256sum` text layout,
//! `"<hexdigest>  <filename>"` one file per line sorted by filename, so
//! independent tooling can re-verify a version without this crate:
//!
//! ```text
//! cd versions/v1 && sha256sum -c manifest.sha256
//! ```
//!
//! The manifest file itself is never hashed, avoiding a self-referential
//! mismatch.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// File name of the integrity manifest inside a version directory.
pub const MANIFEST_FILE: &str = "manifest.sha256";

/// A named set of files as in-memory byte buffers, ordered by name.
pub type FileSet = BTreeMap<String, Vec<u8>>;

/// A manifest: file name to lowercase hex SHA-256 digest, ordered by name.
pub type Manifest = BTreeMap<String, String>;

/// One discrepancy found while verifying a file set against its manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mismatch {
    /// File the discrepancy concerns
    pub file: String,
    /// What kind of discrepancy
    pub kind: MismatchKind,
}

/// Kind of integrity discrepancy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum MismatchKind {
    /// Listed in the manifest but absent from the file set
    Missing,
    /// Present in the file set but not listed in the manifest
    Unexpected,
    /// Present on both sides with differing content
    DigestMismatch { expected: String, actual: String },
    /// Present but not parseable (manifest corruption)
    Malformed { detail: String },
}

impl std::fmt::Display for Mismatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            MismatchKind::Missing => write!(f, "{}: listed in manifest but missing", self.file),
            MismatchKind::Unexpected => write!(f, "{}: not listed in manifest", self.file),
            MismatchKind::DigestMismatch { expected, actual } => {
                write!(f, "{}: sha256 mismatch (expected {expected}, got {actual})", self.file)
            }
            MismatchKind::Malformed { detail } => write!(f, "{}: {detail}", self.file),
        }
    }
}

/// Compute the lowercase hex SHA-256 digest of a byte buffer.
pub fn sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Compute the manifest for a file set.
///
/// The manifest file itself is skipped if present in the set.
pub fn compute_manifest(files: &FileSet) -> Manifest {
    files
        .iter()
        .filter(|(name, _)| name.as_str() != MANIFEST_FILE)
        .map(|(name, data)| (name.clone(), sha256_hex(data)))
        .collect()
}

/// Render a manifest in the stable `"<hexdigest>  <filename>"` line format.
pub fn render_manifest(manifest: &Manifest) -> String {
    let mut out = String::new();
    for (name, digest) in manifest {
        out.push_str(digest);
        out.push_str("  ");
        out.push_str(name);
        out.push('\n');
    }
    out
}

/// Parse a rendered manifest back into a name-to-digest mapping.
///
/// Blank lines are ignored; a line without both fields is an error rather
/// than being skipped, since a truncated manifest must not verify.
pub fn parse_manifest(text: &str) -> Result<Manifest, String> {
    let mut manifest = Manifest::new();
    for (idx, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let (digest, name) = line
            .split_once(char::is_whitespace)
            .ok_or_else(|| format!("malformed manifest line {}: {line:?}", idx + 1))?;
        let name = name.trim();
        if digest.len() != 64 || !digest.chars().all(|c| c.is_ascii_hexdigit()) || name.is_empty() {
            return Err(format!("malformed manifest line {}: {line:?}", idx + 1));
        }
        manifest.insert(name.to_string(), digest.to_ascii_lowercase());
    }
    Ok(manifest)
}

/// Verify a file set against a manifest.
///
/// Returns every discrepancy found: files the manifest lists that are
/// absent, files present but unlisted, and digest mismatches. An empty
/// result means the set is intact.
pub fn verify_manifest(files: &FileSet, manifest: &Manifest) -> Vec<Mismatch> {
    let mut mismatches = Vec::new();

    for (name, expected) in manifest {
        match files.get(name) {
            None => mismatches.push(Mismatch { file: name.clone(), kind: MismatchKind::Missing }),
            Some(data) => {
                let actual = sha256_hex(data);
                if &actual != expected {
                    mismatches.push(Mismatch {
                        file: name.clone(),
                        kind: MismatchKind::DigestMismatch {
                            expected: expected.clone(),
                            actual,
                        },
                    });
                }
            }
        }
    }

    for name in files.keys() {
        if name != MANIFEST_FILE && !manifest.contains_key(name) {
            mismatches
                .push(Mismatch { file: name.clone(), kind: MismatchKind::Unexpected });
        }
    }

    mismatches.sort_by(|a, b| a.file.cmp(&b.file));
    mismatches
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file_set(entries: &[(&str, &[u8])]) -> FileSet {
        entries.iter().map(|(n, d)| (n.to_string(), d.to_vec())).collect()
    }

    #[test]
    fn test_sha256_hex_known_vector() {
        assert_eq!(
            sha256_hex(b"hello world"),
            "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9"
        );
    }

    #[test]
    fn test_compute_manifest_skips_manifest_file() {
        let files = file_set(&[("model.bin", b"A"), (MANIFEST_FILE, b"stale")]);
        let manifest = compute_manifest(&files);
        assert_eq!(manifest.len(), 1);
        assert!(manifest.contains_key("model.bin"));
    }

    #[test]
    fn test_render_is_sorted_by_filename() {
        let files = file_set(&[("zeta.bin", b"z"), ("alpha.bin", b"a")]);
        let rendered = render_manifest(&compute_manifest(&files));
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("  alpha.bin"));
        assert!(lines[1].ends_with("  zeta.bin"));
    }

    #[test]
    fn test_parse_render_roundtrip() {
        let files = file_set(&[("a.bin", b"1"), ("b.bin", b"2")]);
        let manifest = compute_manifest(&files);
        let parsed = parse_manifest(&render_manifest(&manifest)).expect("parse");
        assert_eq!(parsed, manifest);
    }

    #[test]
    fn test_parse_rejects_truncated_line() {
        assert!(parse_manifest("deadbeef\n").is_err());
        assert!(parse_manifest("not-a-digest  file.bin\n").is_err());
    }

    #[test]
    fn test_verify_clean_set() {
        let files = file_set(&[("model.bin", b"A"), ("metadata.json", b"{}")]);
        let manifest = compute_manifest(&files);
        assert!(verify_manifest(&files, &manifest).is_empty());
    }

    #[test]
    fn test_verify_reports_digest_mismatch() {
        let files = file_set(&[("model.bin", b"A")]);
        let manifest = compute_manifest(&files);
        let tampered = file_set(&[("model.bin", b"B")]);
        let mismatches = verify_manifest(&tampered, &manifest);
        assert_eq!(mismatches.len(), 1);
        assert_eq!(mismatches[0].file, "model.bin");
        assert!(matches!(mismatches[0].kind, MismatchKind::DigestMismatch { .. }));
    }

    #[test]
    fn test_verify_reports_missing_and_unexpected() {
        let manifest = compute_manifest(&file_set(&[("model.bin", b"A")]));
        let on_disk = file_set(&[("rogue.bin", b"?")]);
        let mismatches = verify_manifest(&on_disk, &manifest);
        assert_eq!(mismatches.len(), 2);
        assert_eq!(mismatches[0].file, "model.bin");
        assert_eq!(mismatches[0].kind, MismatchKind::Missing);
        assert_eq!(mismatches[1].file, "rogue.bin");
        assert_eq!(mismatches[1].kind, MismatchKind::Unexpected);
    }

    #[test]
    fn test_verify_ignores_manifest_file_in_set() {
        let files = file_set(&[("model.bin", b"A")]);
        let manifest = compute_manifest(&files);
        let mut with_manifest = files.clone();
        with_manifest.insert(MANIFEST_FILE.to_string(), render_manifest(&manifest).into_bytes());
        assert!(verify_manifest(&with_manifest, &manifest).is_empty());
    }
}
