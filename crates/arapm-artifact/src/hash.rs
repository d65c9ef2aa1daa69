//! Keccak hashing and ENS name derivation for app ids and role hashes

use sha3::{Digest, Keccak256};

/// Default aragonPM registry suffix for bare app names
pub const DEFAULT_REGISTRY: &str = "aragonpm.eth";

pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// `0x`-prefixed hex keccak of a UTF-8 string, as used for role hashes
pub fn keccak_hex(data: &str) -> String {
    format!("0x{}", hex::encode(keccak256(data.as_bytes())))
}

/// `"finance"` becomes `"finance.aragonpm.eth"`; names that already carry
/// a registry pass through unchanged
pub fn full_app_name(name: &str) -> String {
    if name.contains('.') {
        name.to_string()
    } else {
        format!("{}.{}", name, DEFAULT_REGISTRY)
    }
}

/// ENS namehash of the full app name, `0x`-prefixed
pub fn app_id(app_name: &str) -> String {
    format!("0x{}", hex::encode(namehash(&full_app_name(app_name))))
}

/// EIP-137 recursive name hash
pub fn namehash(name: &str) -> [u8; 32] {
    let mut node = [0u8; 32];
    if name.is_empty() {
        return node;
    }
    for label in name.split('.').rev() {
        let label_hash = keccak256(label.as_bytes());
        let mut buf = [0u8; 64];
        buf[..32].copy_from_slice(&node);
        buf[32..].copy_from_slice(&label_hash);
        node = keccak256(&buf);
    }
    node
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keccak_of_empty_input() {
        assert_eq!(
            keccak_hex(""),
            "0xc5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
        );
    }

    #[test]
    fn namehash_of_empty_name_is_zero() {
        assert_eq!(namehash(""), [0u8; 32]);
    }

    #[test]
    fn namehash_of_eth_matches_eip137_vector() {
        assert_eq!(
            hex::encode(namehash("eth")),
            "93cdeb708b7545dc668eb9280176169d1c33cfd8ed6f04690a0bcc88a93fc4ae"
        );
    }

    #[test]
    fn app_id_appends_default_registry() {
        assert_eq!(app_id("voting"), app_id("voting.aragonpm.eth"));
        assert_ne!(app_id("voting"), app_id("finance"));
    }

    #[test]
    fn full_name_keeps_custom_registry() {
        assert_eq!(full_app_name("voting.open.aragonpm.eth"), "voting.open.aragonpm.eth");
        assert_eq!(full_app_name("voting"), "voting.aragonpm.eth");
    }
}
