//! Content and peer identifiers.
//!
//! An [`Identifier`] is either a validated self-describing digest or the
//! explicit null sentinel. Identifiers are immutable; cloning shares the
//! underlying bytes.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use bytes::Bytes;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::digest::{self, HashCode, HashSpec};
use crate::error::{CoreError, Result};

/// Byte view of the null identifier.
static NULL_BYTES: [u8; 1] = [0];

/// A content address or peer address.
///
/// Peer identities and content hashes share this format, so any identifier
/// can be measured against any other of the same length.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Identifier(Repr);

#[derive(Clone, PartialEq, Eq, Hash)]
enum Repr {
    Null,
    Digest(Bytes),
}

impl Identifier {
    /// The null identifier (an explicit absent value).
    pub const fn null() -> Self {
        Self(Repr::Null)
    }

    /// Check whether this is the null identifier.
    pub fn is_null(&self) -> bool {
        matches!(self.0, Repr::Null)
    }

    /// Validate raw bytes as an encoded digest.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        digest::parse(bytes)?;
        Ok(Self(Repr::Digest(Bytes::copy_from_slice(bytes))))
    }

    /// Hash `data` according to `spec`.
    pub fn sum(spec: HashSpec, data: &[u8]) -> Result<Self> {
        let encoded = spec.sum(data)?;
        Ok(Self(Repr::Digest(Bytes::from(encoded))))
    }

    /// Derive the identifier of a peer from its public key.
    pub fn from_peer_key(public_key: &[u8]) -> Self {
        Self(Repr::Digest(Bytes::from(digest::sha2_256(public_key))))
    }

    /// Parse the canonical base58 form. The empty string is the null identifier.
    pub fn parse(s: &str) -> Result<Self> {
        if s.is_empty() {
            return Ok(Self::null());
        }

        let bytes = bs58::decode(s)
            .into_vec()
            .map_err(|e| CoreError::InvalidEncoding(e.to_string()))?;

        Self::from_bytes(&bytes).map_err(|e| CoreError::InvalidEncoding(e.to_string()))
    }

    /// Get the raw encoded bytes. The null identifier is a single zero byte.
    pub fn as_bytes(&self) -> &[u8] {
        match &self.0 {
            Repr::Null => &NULL_BYTES,
            Repr::Digest(bytes) => bytes,
        }
    }

    /// Length of the encoded bytes.
    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    /// Always false: even the null identifier occupies one byte.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// The algorithm that produced this digest, `None` for null.
    pub fn code(&self) -> Option<HashCode> {
        self.header().map(|h| h.code)
    }

    /// The digest bytes without the header. Empty for null.
    pub fn digest(&self) -> &[u8] {
        match (&self.0, self.header()) {
            (Repr::Digest(bytes), Some(header)) => &bytes[header.offset..],
            _ => &[],
        }
    }

    /// Convert to hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.as_bytes())
    }

    fn header(&self) -> Option<digest::Header> {
        match &self.0 {
            Repr::Null => None,
            Repr::Digest(bytes) => digest::parse(bytes).ok(),
        }
    }
}

impl Default for Identifier {
    fn default() -> Self {
        Self::null()
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Repr::Null => Ok(()),
            Repr::Digest(bytes) => f.write_str(&bs58::encode(bytes).into_string()),
        }
    }
}

impl fmt::Debug for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Repr::Null => write!(f, "Identifier(null)"),
            Repr::Digest(_) => write!(f, "Identifier({})", self),
        }
    }
}

impl FromStr for Identifier {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl AsRef<[u8]> for Identifier {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl TryFrom<&[u8]> for Identifier {
    type Error = CoreError;

    fn try_from(bytes: &[u8]) -> Result<Self> {
        Self::from_bytes(bytes)
    }
}

/// Lexicographic byte order, for ordered collections. Distance ordering lives
/// in [`crate::metric`].
impl Ord for Identifier {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_bytes().cmp(other.as_bytes())
    }
}

impl PartialOrd for Identifier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Serialize for Identifier {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Identifier {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_DATA_B58: &str = "QmY8Mzg9F69e5P9AoQPYat655HEhc1TVGs11tmfNSzkqh2";

    #[test]
    fn test_parse_known_string() {
        let id = Identifier::parse(TEST_DATA_B58).unwrap();
        assert_eq!(
            id.to_hex(),
            "1220916f0027a575074ce72a331777c3478d6513f786a591bd892da1a577bf2335f9"
        );
        assert_eq!(id.to_string(), TEST_DATA_B58);
        assert_eq!(format!("{}", id), TEST_DATA_B58);
    }

    #[test]
    fn test_sum_matches_parse() {
        let summed = Identifier::sum(HashSpec::sha2_256(), b"test data").unwrap();
        let parsed = Identifier::parse(TEST_DATA_B58).unwrap();
        assert_eq!(summed, parsed);
        assert_eq!(summed.code(), Some(HashCode::Sha2_256));
        assert_eq!(summed.digest().len(), 32);
    }

    #[test]
    fn test_parse_rejects_bad_alphabet() {
        // '0' is not in the base58 alphabet
        let err = Identifier::parse("Qm0000").unwrap_err();
        assert!(matches!(err, CoreError::InvalidEncoding(_)));
    }

    #[test]
    fn test_parse_rejects_non_digest() {
        // valid base58, but decodes to bytes that are not a digest
        let err = Identifier::parse("abc").unwrap_err();
        assert!(matches!(err, CoreError::InvalidEncoding(_)));
    }

    #[test]
    fn test_from_bytes_rejects_malformed() {
        let err = Identifier::from_bytes(&[0x12, 0x20, 0x01]).unwrap_err();
        assert!(matches!(err, CoreError::MalformedDigest(_)));
    }

    #[test]
    fn test_null_identifier() {
        let null = Identifier::null();
        assert!(null.is_null());
        assert_eq!(null.as_bytes(), &[0]);
        assert_eq!(null.code(), None);
        assert!(null.digest().is_empty());
        assert_eq!(null.to_string(), "");
        assert_eq!(Identifier::parse("").unwrap(), null);
        assert_eq!(format!("{:?}", null), "Identifier(null)");
    }

    #[test]
    fn test_null_distinct_from_zero_digest() {
        let mut bytes = vec![0x12, 0x20];
        bytes.extend_from_slice(&[0u8; 32]);
        let zeros = Identifier::from_bytes(&bytes).unwrap();
        assert!(!zeros.is_null());
        assert_ne!(zeros, Identifier::null());
    }

    #[test]
    fn test_equality() {
        let a = Identifier::parse(TEST_DATA_B58).unwrap();
        let b = Identifier::parse(TEST_DATA_B58).unwrap();
        let c = Identifier::parse("QmY8Mzg9F69e5P9AoQPYat655HEhc1TVGs11tmfNSzkqh3").unwrap();

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, Identifier::null());
        assert_eq!(Identifier::null(), Identifier::null());
    }

    #[test]
    fn test_clone_shares_value() {
        let a = Identifier::parse(TEST_DATA_B58).unwrap();
        let b = a.clone();
        assert_eq!(a, b);
        assert_eq!(a.as_bytes().as_ptr(), b.as_bytes().as_ptr());
    }

    #[test]
    fn test_peer_key_identity() {
        let key = [0x42u8; 32];
        let a = Identifier::from_peer_key(&key);
        let b = Identifier::sum(HashSpec::sha2_256(), &key).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_serde_uses_canonical_string() {
        let id = Identifier::parse(TEST_DATA_B58).unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", TEST_DATA_B58));

        let back: Identifier = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);

        let bad: std::result::Result<Identifier, _> = serde_json::from_str("\"Qm0\"");
        assert!(bad.is_err());
    }

    #[test]
    fn test_lexicographic_ord() {
        let low = Identifier::parse("QmY8Mzg9F69e5P9AoQPYat655HEhc1TVGs11tmfNSzkqh1").unwrap();
        let high = Identifier::parse("QmY8Mzg9F69e5P9AoQPYat655HEhc1TVGs11tmfNSzkqh4").unwrap();
        assert!(low < high);
        assert_eq!(low.cmp(&low.clone()), Ordering::Equal);
    }
}
