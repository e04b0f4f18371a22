//! Proptest generators for property-based testing.

use proptest::prelude::*;

use peerrank_core::{sort_by_distance, HashSpec, Identifier};

/// Generate a random 32-byte digest.
pub fn digest() -> impl Strategy<Value = [u8; 32]> {
    any::<[u8; 32]>()
}

/// Generate a random sha2-256 identifier.
pub fn identifier() -> impl Strategy<Value = Identifier> {
    digest().prop_map(|d| {
        let mut bytes = vec![0x12, 0x20];
        bytes.extend_from_slice(&d);
        Identifier::from_bytes(&bytes).expect("sha2-256 layout is valid")
    })
}

/// Generate a peer identifier from a random ed25519 seed.
pub fn peer_identifier() -> impl Strategy<Value = Identifier> {
    any::<[u8; 32]>().prop_map(crate::fixtures::peer_identifier)
}

/// Generate a supported hashing algorithm.
pub fn hash_spec() -> impl Strategy<Value = HashSpec> {
    prop_oneof![
        Just(HashSpec::sha2_256()),
        Just(HashSpec::sha2_512()),
        Just(HashSpec::blake3()),
    ]
}

/// Generate an identifier under any supported algorithm.
pub fn any_identifier() -> impl Strategy<Value = Identifier> {
    (hash_spec(), prop::collection::vec(any::<u8>(), 0..256))
        .prop_map(|(spec, data)| Identifier::sum(spec, &data).expect("supported algorithm"))
}

/// Generate up to `max_len` sha2-256 identifiers, possibly with repeats.
pub fn identifier_set(max_len: usize) -> impl Strategy<Value = Vec<Identifier>> {
    prop::collection::vec(
        prop_oneof![
            4 => identifier(),
            1 => Just(crate::fixtures::scenario()[0].clone()),
        ],
        0..=max_len,
    )
}

/// A lookup target and the peers offered to it.
#[derive(Debug, Clone)]
pub struct LookupParams {
    pub center: Identifier,
    pub peers: Vec<Identifier>,
}

impl LookupParams {
    /// The peers sorted by distance to the center.
    pub fn ranked(&self) -> Vec<Identifier> {
        sort_by_distance(&self.center, &self.peers).expect("generated identifiers share a length")
    }
}

impl Arbitrary for LookupParams {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (identifier(), identifier_set(64))
            .prop_map(|(center, peers)| LookupParams { center, peers })
            .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use peerrank_core::distance;

    proptest! {
        #[test]
        fn identifiers_are_sha2_256(id in identifier()) {
            prop_assert_eq!(id.len(), 34);
            prop_assert_eq!(id.as_bytes()[0], 0x12);
        }

        #[test]
        fn canonical_string_is_stable(id in any_identifier()) {
            let parsed = Identifier::parse(&id.to_string()).unwrap();
            prop_assert_eq!(parsed, id);
        }

        #[test]
        fn ranked_is_closest_first(params: LookupParams) {
            let ranked = params.ranked();
            prop_assert_eq!(ranked.len(), params.peers.len());
            for pair in ranked.windows(2) {
                let a = distance(&pair[0], &params.center).unwrap();
                let b = distance(&pair[1], &params.center).unwrap();
                prop_assert!(a <= b);
            }
        }
    }
}
