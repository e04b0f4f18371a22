//! Test fixtures and helpers.
//!
//! Named identifiers for scenario tests and peer identities derived from
//! ed25519 keys.

use ed25519_dalek::SigningKey;
use rand::Rng;

use peerrank_core::Identifier;

/// Canonical strings of the five-identifier queue scenario.
///
/// The first four are sha2-256 digests that differ only in their final byte;
/// the fifth repeats the first.
pub const SCENARIO: [&str; 5] = [
    "QmY8Mzg9F69e5P9AoQPYat655HEhc1TVGs11tmfNSzkqh1",
    "QmY8Mzg9F69e5P9AoQPYat655HEhc1TVGs11tmfNSzkqh2",
    "QmY8Mzg9F69e5P9AoQPYat655HEhc1TVGs11tmfNSzkqh3",
    "QmY8Mzg9F69e5P9AoQPYat655HEhc1TVGs11tmfNSzkqh4",
    "QmY8Mzg9F69e5P9AoQPYat655HEhc1TVGs11tmfNSzkqh1",
];

/// Parse [`SCENARIO`] into identifiers `[h1, h2, h3, h4, h5]`.
pub fn scenario() -> [Identifier; 5] {
    SCENARIO.map(|s| Identifier::parse(s).expect("scenario strings are valid"))
}

const SORT_SET: [[u8; 34]; 6] = [
    [
        0x12, 0x20, 173, 149, 19, 27, 192, 183, 153, 192, 177, 175, 71, 127, 177, 79, 207, 38,
        166, 169, 247, 96, 121, 228, 139, 240, 144, 172, 183, 232, 54, 123, 253, 14,
    ],
    [
        0x12, 0x20, 223, 63, 97, 152, 4, 169, 47, 219, 64, 87, 25, 45, 196, 61, 215, 72, 234,
        119, 138, 220, 82, 188, 73, 140, 232, 5, 36, 192, 20, 184, 17, 25,
    ],
    [
        0x12, 0x20, 73, 176, 221, 176, 149, 143, 22, 42, 129, 124, 213, 114, 232, 95, 189, 154,
        18, 3, 122, 132, 32, 199, 53, 185, 58, 157, 117, 78, 52, 146, 157, 127,
    ],
    [
        0x12, 0x20, 73, 176, 221, 176, 149, 143, 22, 42, 129, 124, 213, 114, 232, 95, 189, 154,
        18, 3, 122, 132, 32, 199, 53, 185, 58, 157, 117, 78, 52, 146, 157, 127,
    ],
    [
        0x12, 0x20, 73, 176, 221, 176, 149, 143, 22, 42, 129, 124, 213, 114, 232, 95, 189, 154,
        18, 3, 122, 132, 32, 199, 53, 185, 58, 157, 117, 78, 52, 146, 157, 126,
    ],
    [
        0x12, 0x20, 73, 0, 221, 176, 149, 143, 22, 42, 129, 124, 213, 114, 232, 95, 189, 154,
        18, 3, 122, 132, 32, 199, 53, 185, 58, 157, 117, 78, 52, 146, 157, 127,
    ],
];

/// Expected order of [`sort_set`] when sorted around its third element.
pub const SORT_SET_ORDER: [usize; 6] = [2, 3, 4, 5, 1, 0];

/// Six sha2-256 identifiers for sort tests. Entries 2 and 3 are identical.
pub fn sort_set() -> Vec<Identifier> {
    SORT_SET
        .iter()
        .map(|bytes| Identifier::from_bytes(bytes).expect("sort set bytes are valid"))
        .collect()
}

/// Identifier of the ed25519 peer whose secret key is `seed`.
pub fn peer_identifier(seed: [u8; 32]) -> Identifier {
    PeerFixture::with_seed(seed).id
}

/// A random sha2-256 identifier.
pub fn random_identifier() -> Identifier {
    let digest: [u8; 32] = rand::thread_rng().gen();
    let mut bytes = Vec::with_capacity(34);
    bytes.extend_from_slice(&[0x12, 0x20]);
    bytes.extend_from_slice(&digest);
    Identifier::from_bytes(&bytes).expect("sha2-256 layout is valid")
}

/// `count` random sha2-256 identifiers.
pub fn random_identifiers(count: usize) -> Vec<Identifier> {
    (0..count).map(|_| random_identifier()).collect()
}

/// A peer with a signing key and the identifier derived from it.
#[derive(Clone)]
pub struct PeerFixture {
    pub signing_key: SigningKey,
    pub id: Identifier,
}

impl PeerFixture {
    /// Create a peer with a random key.
    pub fn new() -> Self {
        let mut rng = rand::thread_rng();
        Self::from_key(SigningKey::generate(&mut rng))
    }

    /// Create with a deterministic key from seed.
    pub fn with_seed(seed: [u8; 32]) -> Self {
        Self::from_key(SigningKey::from_bytes(&seed))
    }

    fn from_key(signing_key: SigningKey) -> Self {
        let id = Identifier::from_peer_key(signing_key.verifying_key().as_bytes());
        Self { signing_key, id }
    }

    /// Get the peer's public key.
    pub fn public_key(&self) -> [u8; 32] {
        self.signing_key.verifying_key().to_bytes()
    }
}

impl Default for PeerFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Create `count` deterministic peers for multi-peer tests.
pub fn swarm(count: usize) -> Vec<PeerFixture> {
    (0..count)
        .map(|i| {
            let mut seed = [0u8; 32];
            seed[..8].copy_from_slice(&(i as u64).to_le_bytes());
            PeerFixture::with_seed(seed)
        })
        .collect()
}
