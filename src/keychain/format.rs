//! Durable keychain representation and checksum verification.
//!
//! The serialized form is a canonical JSON object:
//!
//! ```text
//! {"salt":"<hex>","kvs":{"<domain index hex>":{"iv":"<base64>","ciphertext":"<base64>"},...}}
//! ```
//!
//! - **salt**: the 16-byte PBKDF2 salt, lowercase hex.
//! - **kvs**: entries keyed by the 64-char HMAC-SHA256 domain index,
//!   kept in a `BTreeMap` so key order (and therefore the checksum) is
//!   reproducible.
//!
//! The checksum is the lowercase hex SHA-256 of the exact serialized
//! string.  It detects modification of that string.  It only proves
//! freshness when the caller compares it against a value it trusts from
//! somewhere else (for example a checksum pinned after its last write);
//! a stale file shipped together with its own checksum passes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;

use super::entry::Entry;
use crate::crypto::kdf::SALT_LEN;
use crate::crypto::primitives;
use crate::errors::{KeychainError, Result};

/// Length of a hex-encoded domain index (HMAC-SHA256 = 32 bytes).
const INDEX_HEX_LEN: usize = 64;

// ---------------------------------------------------------------------------
// KeychainState
// ---------------------------------------------------------------------------

/// Everything that is persisted: the salt and the encrypted entries.
///
/// Keys are never part of this struct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KeychainState {
    /// PBKDF2 salt (hex in JSON).
    #[serde(serialize_with = "hex_encode", deserialize_with = "hex_decode")]
    pub salt: Vec<u8>,

    /// Domain index -> encrypted entry.
    pub kvs: BTreeMap<String, Entry>,
}

impl KeychainState {
    /// An empty state with the given salt.
    pub fn new(salt: Vec<u8>) -> Self {
        Self {
            salt,
            kvs: BTreeMap::new(),
        }
    }

    /// Structural checks applied to untrusted input after parsing.
    fn validate(&self) -> Result<()> {
        if self.salt.len() != SALT_LEN {
            return Err(KeychainError::MalformedState(format!(
                "salt must be {SALT_LEN} bytes, got {}",
                self.salt.len()
            )));
        }

        for (index, entry) in &self.kvs {
            if !is_domain_index(index) {
                return Err(KeychainError::MalformedState(format!(
                    "invalid domain index '{index}'"
                )));
            }
            entry.validate()?;
        }

        Ok(())
    }
}

fn is_domain_index(s: &str) -> bool {
    s.len() == INDEX_HEX_LEN && s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Serialize a state into its canonical JSON string.
pub fn serialize(state: &KeychainState) -> Result<String> {
    serde_json::to_string(state)
        .map_err(|e| KeychainError::SerializationError(format!("keychain state: {e}")))
}

/// Parse and validate an untrusted serialized state.
///
/// Missing fields, unknown fields, bad encodings and wrong lengths are
/// all reported as `MalformedState`.
pub fn parse(serialized: &str) -> Result<KeychainState> {
    let state: KeychainState = serde_json::from_str(serialized)
        .map_err(|e| KeychainError::MalformedState(format!("keychain JSON: {e}")))?;
    state.validate()?;
    Ok(state)
}

/// Compute the lowercase hex SHA-256 checksum of a serialized state.
pub fn checksum(serialized: &str) -> String {
    hex::encode(primitives::sha256(serialized.as_bytes()))
}

/// Verify `serialized` against an expected checksum in constant time.
///
/// Hex case in `expected` is ignored.
pub fn verify_checksum(serialized: &str, expected: &str) -> Result<()> {
    let actual = checksum(serialized);
    let expected = expected.trim().to_ascii_lowercase();

    if actual.as_bytes().ct_eq(expected.as_bytes()).into() {
        Ok(())
    } else {
        Err(KeychainError::IntegrityMismatch)
    }
}

// ---------------------------------------------------------------------------
// Serde helpers for encoded Vec<u8> fields
// ---------------------------------------------------------------------------

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

pub(crate) fn base64_encode<S>(data: &[u8], serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    let encoded = BASE64.encode(data);
    serializer.serialize_str(&encoded)
}

pub(crate) fn base64_decode<'de, D>(deserializer: D) -> std::result::Result<Vec<u8>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    BASE64.decode(&s).map_err(serde::de::Error::custom)
}

fn hex_encode<S>(data: &[u8], serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_str(&hex::encode(data))
}

fn hex_decode<'de, D>(deserializer: D) -> std::result::Result<Vec<u8>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    hex::decode(&s).map_err(serde::de::Error::custom)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_state() -> KeychainState {
        let mut state = KeychainState::new(vec![0x11; SALT_LEN]);
        state.kvs.insert(
            "b".repeat(INDEX_HEX_LEN),
            Entry {
                iv: vec![2; 12],
                ciphertext: vec![3; 20],
            },
        );
        state.kvs.insert(
            "a".repeat(INDEX_HEX_LEN),
            Entry {
                iv: vec![4; 12],
                ciphertext: vec![5; 16],
            },
        );
        state
    }

    #[test]
    fn serialization_is_canonical() {
        let s = serialize(&sample_state()).unwrap();
        assert!(s.starts_with(r#"{"salt":"11111111111111111111111111111111","kvs":{"aaaa"#));
        // Same state -> same bytes -> same checksum.
        assert_eq!(s, serialize(&sample_state()).unwrap());
        assert_eq!(checksum(&s), checksum(&serialize(&sample_state()).unwrap()));
    }

    #[test]
    fn parse_roundtrip() {
        let s = serialize(&sample_state()).unwrap();
        assert_eq!(parse(&s).unwrap(), sample_state());
    }

    #[test]
    fn checksum_is_lowercase_hex_sha256() {
        let c = checksum("{}");
        assert_eq!(c.len(), 64);
        assert_eq!(
            c,
            "44136fa355b3678a1146ad16f7e8649e94fb4fc21fe77e8310c060f61caaff8a"
        );
    }

    #[test]
    fn verify_checksum_accepts_uppercase() {
        let s = serialize(&sample_state()).unwrap();
        let c = checksum(&s).to_ascii_uppercase();
        assert!(verify_checksum(&s, &c).is_ok());
    }

    #[test]
    fn verify_checksum_rejects_mismatch() {
        let s = serialize(&sample_state()).unwrap();
        assert!(matches!(
            verify_checksum(&s, "3GB6WSm+j+jl8pm4Vo9b9CkO2tZJzChu34VeitrwxXM="),
            Err(KeychainError::IntegrityMismatch)
        ));
        assert!(matches!(
            verify_checksum(&s, ""),
            Err(KeychainError::IntegrityMismatch)
        ));
    }

    #[test]
    fn parse_rejects_empty_input() {
        assert!(matches!(parse(""), Err(KeychainError::MalformedState(_))));
    }

    #[test]
    fn parse_rejects_unknown_top_level_key() {
        let s = r#"{"salt":"11111111111111111111111111111111","kvs":{},"extra":1}"#;
        assert!(matches!(parse(s), Err(KeychainError::MalformedState(_))));
    }

    #[test]
    fn parse_rejects_missing_fields() {
        assert!(matches!(
            parse(r#"{"kvs":{}}"#),
            Err(KeychainError::MalformedState(_))
        ));
        assert!(matches!(
            parse(r#"{"salt":"11111111111111111111111111111111"}"#),
            Err(KeychainError::MalformedState(_))
        ));
    }

    #[test]
    fn parse_rejects_unknown_entry_field() {
        let s = format!(
            r#"{{"salt":"{}","kvs":{{"{}":{{"iv":"AAAAAAAAAAAAAAAA","ciphertext":"AAAAAAAAAAAAAAAAAAAAAA==","tag":"x"}}}}}}"#,
            "11".repeat(SALT_LEN),
            "a".repeat(INDEX_HEX_LEN)
        );
        assert!(matches!(parse(&s), Err(KeychainError::MalformedState(_))));
    }

    #[test]
    fn parse_rejects_bad_salt() {
        let not_hex = r#"{"salt":"zz","kvs":{}}"#;
        assert!(matches!(parse(not_hex), Err(KeychainError::MalformedState(_))));

        let too_short = r#"{"salt":"1111","kvs":{}}"#;
        assert!(matches!(
            parse(too_short),
            Err(KeychainError::MalformedState(_))
        ));
    }

    #[test]
    fn parse_rejects_plaintext_domain_keys() {
        let s = format!(
            r#"{{"salt":"{}","kvs":{{"example.com":{{"iv":"AAAAAAAAAAAAAAAA","ciphertext":"AAAAAAAAAAAAAAAAAAAAAA=="}}}}}}"#,
            "11".repeat(SALT_LEN)
        );
        assert!(matches!(parse(&s), Err(KeychainError::MalformedState(_))));
    }

    #[test]
    fn parse_rejects_short_iv() {
        // "AAAA" decodes to 3 bytes.
        let s = format!(
            r#"{{"salt":"{}","kvs":{{"{}":{{"iv":"AAAA","ciphertext":"AAAAAAAAAAAAAAAAAAAAAA=="}}}}}}"#,
            "11".repeat(SALT_LEN),
            "a".repeat(INDEX_HEX_LEN)
        );
        assert!(matches!(parse(&s), Err(KeychainError::MalformedState(_))));
    }
}
