//! Self-describing digests (multihash).
//!
//! An encoded digest is `varint(code) || varint(length) || digest`. The code
//! names the algorithm, the length is the number of digest bytes that follow.
//! Digests may be truncated below the algorithm's natural width, never
//! extended past it.

use sha2::{Digest, Sha256, Sha512};

use crate::error::{CoreError, Result};

/// Longest varint accepted in a digest header.
const MAX_VARINT_LEN: usize = 9;

/// Hash algorithms recognised in a digest header.
///
/// Only a subset can be computed locally (see [`HashSpec::sum`]); the rest are
/// accepted when decoding identifiers produced elsewhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HashCode {
    Identity,
    Sha1,
    Sha2_256,
    Sha2_512,
    Sha3_512,
    Sha3_384,
    Sha3_256,
    Sha3_224,
    Keccak256,
    Blake3,
    Blake2b256,
}

impl HashCode {
    /// Look up an algorithm by its multicodec value.
    pub fn from_code(code: u64) -> Option<Self> {
        let hc = match code {
            0x00 => Self::Identity,
            0x11 => Self::Sha1,
            0x12 => Self::Sha2_256,
            0x13 => Self::Sha2_512,
            0x14 => Self::Sha3_512,
            0x15 => Self::Sha3_384,
            0x16 => Self::Sha3_256,
            0x17 => Self::Sha3_224,
            0x1b => Self::Keccak256,
            0x1e => Self::Blake3,
            0xb220 => Self::Blake2b256,
            _ => return None,
        };
        Some(hc)
    }

    /// The multicodec value written into the digest header.
    pub const fn code(self) -> u64 {
        match self {
            Self::Identity => 0x00,
            Self::Sha1 => 0x11,
            Self::Sha2_256 => 0x12,
            Self::Sha2_512 => 0x13,
            Self::Sha3_512 => 0x14,
            Self::Sha3_384 => 0x15,
            Self::Sha3_256 => 0x16,
            Self::Sha3_224 => 0x17,
            Self::Keccak256 => 0x1b,
            Self::Blake3 => 0x1e,
            Self::Blake2b256 => 0xb220,
        }
    }

    /// Natural digest width in bytes. `None` for the identity "hash", whose
    /// digest is the input itself.
    pub const fn max_length(self) -> Option<usize> {
        match self {
            Self::Identity => None,
            Self::Sha1 => Some(20),
            Self::Sha3_224 => Some(28),
            Self::Sha2_256 | Self::Sha3_256 | Self::Keccak256 | Self::Blake3 | Self::Blake2b256 => {
                Some(32)
            }
            Self::Sha3_384 => Some(48),
            Self::Sha2_512 | Self::Sha3_512 => Some(64),
        }
    }
}

/// Which algorithm, and how many digest bytes, to use when hashing content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HashSpec {
    pub code: HashCode,
    pub length: usize,
}

impl HashSpec {
    /// Create a spec for an explicit algorithm and digest length.
    pub const fn new(code: HashCode, length: usize) -> Self {
        Self { code, length }
    }

    /// Full-width SHA2-256, the platform's standard digest.
    pub const fn sha2_256() -> Self {
        Self::new(HashCode::Sha2_256, 32)
    }

    /// Full-width SHA2-512.
    pub const fn sha2_512() -> Self {
        Self::new(HashCode::Sha2_512, 64)
    }

    /// Full-width BLAKE3.
    pub const fn blake3() -> Self {
        Self::new(HashCode::Blake3, 32)
    }

    /// Hash `data` and return the encoded digest (header included).
    pub fn sum(&self, data: &[u8]) -> Result<Vec<u8>> {
        let full: Vec<u8> = match self.code {
            HashCode::Sha2_256 => Sha256::digest(data).to_vec(),
            HashCode::Sha2_512 => Sha512::digest(data).to_vec(),
            HashCode::Blake3 => blake3::hash(data).as_bytes().to_vec(),
            other => return Err(CoreError::UnsupportedAlgorithm(other.code())),
        };

        if self.length > full.len() {
            return Err(CoreError::MalformedDigest(format!(
                "requested {} bytes from a {}-byte {:?} digest",
                self.length,
                full.len(),
                self.code
            )));
        }

        Ok(encode(self.code, &full[..self.length]))
    }
}

impl Default for HashSpec {
    fn default() -> Self {
        Self::sha2_256()
    }
}

/// Encoded full-width SHA2-256 digest of `data`.
pub(crate) fn sha2_256(data: &[u8]) -> Vec<u8> {
    encode(HashCode::Sha2_256, &Sha256::digest(data))
}

/// Decoded digest header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Header {
    pub code: HashCode,
    pub length: usize,
    /// Offset of the first digest byte.
    pub offset: usize,
}

/// Encode a digest with its header.
pub(crate) fn encode(code: HashCode, digest: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(digest.len() + 4);
    encode_varint(code.code(), &mut out);
    encode_varint(digest.len() as u64, &mut out);
    out.extend_from_slice(digest);
    out
}

/// Validate an encoded digest and return its header.
pub(crate) fn parse(bytes: &[u8]) -> Result<Header> {
    if bytes.is_empty() {
        return Err(CoreError::MalformedDigest("empty input".into()));
    }

    let (raw_code, code_len) = decode_varint(bytes)
        .ok_or_else(|| CoreError::MalformedDigest("bad algorithm varint".into()))?;
    let code = HashCode::from_code(raw_code).ok_or_else(|| {
        CoreError::MalformedDigest(format!("unknown algorithm code {raw_code:#x}"))
    })?;

    let (raw_length, length_len) = decode_varint(&bytes[code_len..])
        .ok_or_else(|| CoreError::MalformedDigest("bad length varint".into()))?;
    let length = usize::try_from(raw_length)
        .map_err(|_| CoreError::MalformedDigest(format!("length {raw_length} overflows")))?;

    let offset = code_len + length_len;
    let remaining = bytes.len() - offset;
    if remaining != length {
        return Err(CoreError::MalformedDigest(format!(
            "declared {length} digest bytes, found {remaining}"
        )));
    }

    if let Some(max) = code.max_length() {
        if length > max {
            return Err(CoreError::MalformedDigest(format!(
                "{length} bytes exceeds the {max}-byte {code:?} digest"
            )));
        }
    }

    Ok(Header {
        code,
        length,
        offset,
    })
}

fn encode_varint(mut value: u64, out: &mut Vec<u8>) {
    loop {
        let byte = (value & 0x7f) as u8;
        value >>= 7;
        if value == 0 {
            out.push(byte);
            return;
        }
        out.push(byte | 0x80);
    }
}

fn decode_varint(bytes: &[u8]) -> Option<(u64, usize)> {
    let mut value = 0u64;
    for (i, byte) in bytes.iter().take(MAX_VARINT_LEN).enumerate() {
        value |= u64::from(byte & 0x7f) << (7 * i);
        if byte & 0x80 == 0 {
            // a trailing zero group means the value had a shorter encoding
            if i > 0 && *byte == 0 {
                return None;
            }
            return Some((value, i + 1));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identifier::Identifier;

    #[test]
    fn test_sha2_256_sum_matches_known_digest() {
        let encoded = HashSpec::sha2_256().sum(b"test data").unwrap();
        assert_eq!(
            hex::encode(&encoded),
            "1220916f0027a575074ce72a331777c3478d6513f786a591bd892da1a577bf2335f9"
        );
    }

    #[test]
    fn test_truncated_sum() {
        let encoded = HashSpec::new(HashCode::Sha2_256, 8).sum(b"test data").unwrap();
        assert_eq!(hex::encode(&encoded), "1208916f0027a575074c");
    }

    #[test]
    fn test_blake3_header() {
        let encoded = HashSpec::blake3().sum(b"hello").unwrap();
        assert_eq!(encoded.len(), 34);
        assert_eq!(&encoded[..2], &[0x1e, 0x20]);
        assert_eq!(&encoded[2..], blake3::hash(b"hello").as_bytes());
    }

    #[test]
    fn test_sum_rejects_overlong_request() {
        let err = HashSpec::new(HashCode::Sha2_256, 33).sum(b"x").unwrap_err();
        assert!(matches!(err, CoreError::MalformedDigest(_)));
    }

    #[test]
    fn test_sum_rejects_unsupported_algorithm() {
        let err = HashSpec::new(HashCode::Sha1, 20).sum(b"x").unwrap_err();
        assert!(matches!(err, CoreError::UnsupportedAlgorithm(0x11)));
    }

    #[test]
    fn test_parse_header() {
        let encoded = HashSpec::sha2_512().sum(b"abc").unwrap();
        let header = parse(&encoded).unwrap();
        assert_eq!(header.code, HashCode::Sha2_512);
        assert_eq!(header.length, 64);
        assert_eq!(header.offset, 2);
    }

    #[test]
    fn test_parse_multibyte_code() {
        let encoded = encode(HashCode::Blake2b256, &[0xaa; 32]);
        assert_eq!(&encoded[..3], &[0xa0, 0xe4, 0x02]);
        let header = parse(&encoded).unwrap();
        assert_eq!(header.code, HashCode::Blake2b256);
        assert_eq!(header.offset, 4);
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(parse(&[]).is_err());
        // unknown code
        assert!(parse(&[0x7f, 0x01, 0x00]).is_err());
        // declared length longer than the payload
        assert!(parse(&[0x12, 0x20, 0x01, 0x02]).is_err());
        // trailing bytes
        let mut encoded = HashSpec::sha2_256().sum(b"x").unwrap();
        encoded.push(0);
        assert!(parse(&encoded).is_err());
        // unterminated varint
        assert!(parse(&[0xff; 12]).is_err());
    }

    #[test]
    fn test_identity_has_no_width_limit() {
        let data = vec![7u8; 100];
        let encoded = encode(HashCode::Identity, &data);
        let header = parse(&encoded).unwrap();
        assert_eq!(header.length, 100);
    }

    #[test]
    fn test_parse_rejects_non_minimal_varints() {
        let canonical = HashSpec::sha2_256().sum(b"test data").unwrap();

        // 0x12 padded to two bytes
        let mut padded_code = vec![0x92, 0x00];
        padded_code.extend_from_slice(&canonical[1..]);
        let err = parse(&padded_code).unwrap_err();
        assert!(matches!(err, CoreError::MalformedDigest(_)));

        // 0x20 padded to two bytes
        let mut padded_length = vec![0x12, 0xa0, 0x00];
        padded_length.extend_from_slice(&canonical[2..]);
        assert!(parse(&padded_length).is_err());

        assert!(Identifier::from_bytes(&padded_code).is_err());
        assert!(parse(&canonical).is_ok());
    }

    #[test]
    fn test_multi_byte_code_is_minimal() {
        let encoded = encode(HashCode::Blake2b256, &[1u8; 32]);
        assert_eq!(&encoded[..3], &[0xa0, 0xe4, 0x02]);
        assert_eq!(parse(&encoded).unwrap().code, HashCode::Blake2b256);
    }
}
