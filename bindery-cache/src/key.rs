//! Deterministic content-addressed cache keys.

/// blake3 hex of `"{issue_id}:{agent_type}:{content_hash}:{version}"`.
///
/// Stable for identical inputs, so repeated requests over unchanged content
/// hit the same entry.
pub fn pack_key(issue_id: &str, agent_type: &str, content_hash: &str, version: &str) -> String {
    let material = format!("{issue_id}:{agent_type}:{content_hash}:{version}");
    blake3::hash(material.as_bytes()).to_hex().to_string()
}
