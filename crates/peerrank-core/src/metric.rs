//! The XOR metric over identifiers.
//!
//! The distance between two identifiers is the bitwise XOR of their encoded
//! bytes, read as a big-endian unsigned integer. Identifiers of different
//! lengths are never compared.
//!
//! ## Ordering helpers
//!
//! - [`sort_by_distance`] is stable: equal distances keep input order.
//! - [`lexicographic_less`] is a center-free total order for routing
//!   policies that need one. It is not a distance ordering.

use std::fmt;

use num_bigint::BigUint;

use crate::error::{CoreError, Result};
use crate::identifier::Identifier;

/// XOR distance between two identifiers.
///
/// Arbitrary precision: a 34-byte digest yields a 272-bit distance.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Distance(BigUint);

impl Distance {
    /// Interpret big-endian bytes as a distance.
    pub fn from_bytes_be(bytes: &[u8]) -> Self {
        Self(BigUint::from_bytes_be(bytes))
    }

    /// Minimal big-endian encoding (`[0]` for zero).
    pub fn to_bytes_be(&self) -> Vec<u8> {
        self.0.to_bytes_be()
    }

    /// The zero distance.
    pub fn zero() -> Self {
        Self::default()
    }

    /// Check if this is the zero distance.
    pub fn is_zero(&self) -> bool {
        self.0 == BigUint::default()
    }

    /// Number of significant bits.
    pub fn bits(&self) -> u64 {
        self.0.bits()
    }

    /// Borrow the underlying integer.
    pub fn as_biguint(&self) -> &BigUint {
        &self.0
    }
}

impl From<u64> for Distance {
    fn from(value: u64) -> Self {
        Self(BigUint::from(value))
    }
}

impl From<BigUint> for Distance {
    fn from(value: BigUint) -> Self {
        Self(value)
    }
}

impl fmt::Display for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// XOR two identifiers byte by byte.
pub fn xor(a: &Identifier, b: &Identifier) -> Result<Vec<u8>> {
    let (left, right) = (a.as_bytes(), b.as_bytes());
    if left.len() != right.len() {
        return Err(CoreError::LengthMismatch {
            left: left.len(),
            right: right.len(),
        });
    }

    Ok(left.iter().zip(right).map(|(x, y)| x ^ y).collect())
}

/// XOR distance between two identifiers of equal length.
pub fn distance(a: &Identifier, b: &Identifier) -> Result<Distance> {
    Ok(Distance::from_bytes_be(&xor(a, b)?))
}

/// Count leading zero bits, most significant byte and bit first.
///
/// Returns `8 * bytes.len()` for an all-zero input.
pub fn zero_prefix_len(bytes: &[u8]) -> usize {
    for (i, byte) in bytes.iter().enumerate() {
        if *byte != 0 {
            return i * 8 + byte.leading_zeros() as usize;
        }
    }
    bytes.len() * 8
}

/// Number of leading bits two identifiers share.
///
/// This is the routing-table bucket index of `b` as seen from `a`.
pub fn common_prefix_len(a: &Identifier, b: &Identifier) -> Result<usize> {
    Ok(zero_prefix_len(&xor(a, b)?))
}

/// Strict byte-wise lexicographic comparison.
pub fn lexicographic_less(a: &Identifier, b: &Identifier) -> bool {
    a.as_bytes() < b.as_bytes()
}

/// Return `items` ordered by ascending distance to `center`.
///
/// The sort is stable, and each distance is computed once.
pub fn sort_by_distance(center: &Identifier, items: &[Identifier]) -> Result<Vec<Identifier>> {
    let mut keyed = items
        .iter()
        .map(|id| Ok((distance(id, center)?, id)))
        .collect::<Result<Vec<_>>>()?;

    keyed.sort_by(|a, b| a.0.cmp(&b.0));

    Ok(keyed.into_iter().map(|(_, id)| id.clone()).collect())
}

/// The `count` identifiers closest to `center`.
pub fn nearest(center: &Identifier, items: &[Identifier], count: usize) -> Result<Vec<Identifier>> {
    let mut sorted = sort_by_distance(center, items)?;
    sorted.truncate(count);
    Ok(sorted)
}
