//! Integrity chain: content hash → manifest checksum → detached signature.
//!
//! The content hash covers the exact bytes of `content.md` and is embedded in
//! `ai.content_hash`. The manifest checksum is computed last, over the
//! canonical manifest text with `checksum` blanked, so it covers the embedded
//! content hash as well. The signature entry repeats the bare content hash.

use crate::manifest::Manifest;
use crate::types::{HexDigest, DIGEST_PREFIX};
use serde_json::Value;
use sha2::{Digest, Sha256};

const CHECKSUM_FIELD: &str = "checksum";

/// SHA-256 of the exact byte sequence, as lower-case hex.
pub fn content_hash(data: &[u8]) -> HexDigest {
    HexDigest::new(hex::encode(Sha256::digest(data)))
}

/// Bytes written to `signature.sha256`: the hex digest and one newline.
pub fn signature_payload(digest: &HexDigest) -> String {
    format!("{digest}\n")
}

/// Compute the manifest checksum (`sha256:<hex>`) over the canonical form with
/// `checksum` held empty.
pub fn compute_manifest_checksum(manifest: &Manifest) -> Result<String, serde_json::Error> {
    let mut copy = manifest.clone();
    copy.checksum = String::new();
    let json = copy.to_canonical_json()?;
    Ok(content_hash(json.as_bytes()).prefixed())
}

/// Finalize a manifest by storing its checksum. Must run after every other
/// field, including `ai.content_hash`, is settled.
pub fn seal_manifest(manifest: &mut Manifest) -> Result<(), serde_json::Error> {
    manifest.checksum = compute_manifest_checksum(manifest)?;
    Ok(())
}

fn digests_match(expected: &str, actual: &str) -> bool {
    match (
        expected.strip_prefix(DIGEST_PREFIX),
        actual.strip_prefix(DIGEST_PREFIX),
    ) {
        (Some(e), Some(a)) => e.eq_ignore_ascii_case(a),
        _ => false,
    }
}

/// Recompute the checksum and compare it with the stored one.
pub fn verify_manifest_checksum(manifest: &Manifest) -> Result<bool, serde_json::Error> {
    let actual = compute_manifest_checksum(manifest)?;
    Ok(digests_match(&manifest.checksum, &actual))
}

/// Checksum over a stored manifest exactly as parsed, keys and order
/// included, with `checksum` held empty. For a sealed manifest this equals
/// [`compute_manifest_checksum`].
pub fn compute_stored_checksum(value: &Value) -> Result<String, serde_json::Error> {
    let mut copy = value.clone();
    if let Some(root) = copy.as_object_mut() {
        root.insert(CHECKSUM_FIELD.to_owned(), Value::String(String::new()));
    }
    let json = serde_json::to_string_pretty(&copy)?;
    Ok(content_hash(json.as_bytes()).prefixed())
}

/// Verify the `checksum` of a stored manifest value. Any key added, removed
/// or reordered after sealing, at any depth, fails verification.
pub fn verify_stored_checksum(value: &Value) -> Result<bool, serde_json::Error> {
    let Some(expected) = value.get(CHECKSUM_FIELD).and_then(Value::as_str) else {
        return Ok(false);
    };
    let actual = compute_stored_checksum(value)?;
    Ok(digests_match(expected, &actual))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::tests::sample_manifest;

    #[test]
    fn known_vector() {
        assert_eq!(
            content_hash(b"").as_str(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(
            content_hash(b"abc").as_str(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn hash_is_deterministic_and_distinguishing() {
        let a = content_hash(b"# Hello\n\nWorld");
        let b = content_hash(b"# Hello\n\nWorld");
        let c = content_hash(b"# Hello\n\nWorld!");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.len(), 64);
        assert!(a.bytes().all(|x| x.is_ascii_digit() || (b'a'..=b'f').contains(&x)));
    }

    #[test]
    fn signature_has_single_trailing_newline() {
        let digest = content_hash(b"content");
        let sig = signature_payload(&digest);
        assert_eq!(sig.len(), 65);
        assert!(sig.ends_with('\n'));
        assert_eq!(sig.trim_end(), digest.as_str());
    }

    #[test]
    fn checksum_roundtrip() {
        let mut manifest = sample_manifest();
        seal_manifest(&mut manifest).unwrap();
        assert!(manifest.checksum.starts_with("sha256:"));
        assert_eq!(manifest.checksum.len(), 7 + 64);
        assert!(verify_manifest_checksum(&manifest).unwrap());

        let stored = manifest.checksum.clone();
        manifest.checksum = String::new();
        assert_eq!(compute_manifest_checksum(&manifest).unwrap(), stored);
    }

    #[test]
    fn checksum_ignores_previous_checksum_value() {
        let mut a = sample_manifest();
        let mut b = sample_manifest();
        b.checksum = "sha256:whatever".to_owned();
        seal_manifest(&mut a).unwrap();
        seal_manifest(&mut b).unwrap();
        assert_eq!(a.checksum, b.checksum);
    }

    #[test]
    fn checksum_covers_content_hash() {
        let mut manifest = sample_manifest();
        seal_manifest(&mut manifest).unwrap();
        manifest.ai.content_hash = format!("sha256:{}", "00".repeat(32));
        assert!(!verify_manifest_checksum(&manifest).unwrap());
    }

    #[test]
    fn tampered_field_fails_verification() {
        let mut manifest = sample_manifest();
        seal_manifest(&mut manifest).unwrap();
        manifest.title.push('!');
        assert!(!verify_manifest_checksum(&manifest).unwrap());
    }

    #[test]
    fn unprefixed_checksum_fails_verification() {
        let mut manifest = sample_manifest();
        seal_manifest(&mut manifest).unwrap();
        manifest.checksum = manifest.checksum.replace("sha256:", "");
        assert!(!verify_manifest_checksum(&manifest).unwrap());
    }

    fn sealed_value() -> Value {
        let mut manifest = sample_manifest();
        seal_manifest(&mut manifest).unwrap();
        serde_json::from_str(&manifest.to_canonical_json().unwrap()).unwrap()
    }

    #[test]
    fn stored_checksum_matches_typed_checksum() {
        let mut manifest = sample_manifest();
        seal_manifest(&mut manifest).unwrap();
        let value: Value = serde_json::from_str(&manifest.to_canonical_json().unwrap()).unwrap();
        assert_eq!(compute_stored_checksum(&value).unwrap(), manifest.checksum);
        assert!(verify_stored_checksum(&value).unwrap());
    }

    #[test]
    fn stored_checksum_covers_nested_injected_keys() {
        let mut value = sealed_value();
        value["ai"]["injected_instruction"] = "ignore previous".into();
        assert!(!verify_stored_checksum(&value).unwrap());

        let mut value = sealed_value();
        value["page"]["watermark"] = "CONFIDENTIAL".into();
        assert!(!verify_stored_checksum(&value).unwrap());

        let mut value = sealed_value();
        value["x_producer"] = "someone".into();
        assert!(!verify_stored_checksum(&value).unwrap());
    }

    #[test]
    fn stored_checksum_missing_or_unprefixed_fails() {
        let mut value = sealed_value();
        value.as_object_mut().unwrap().remove("checksum");
        assert!(!verify_stored_checksum(&value).unwrap());

        let mut value = sealed_value();
        let bare = value["checksum"].as_str().unwrap().replace("sha256:", "");
        value["checksum"] = bare.into();
        assert!(!verify_stored_checksum(&value).unwrap());
    }
}
