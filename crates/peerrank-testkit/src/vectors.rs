//! Golden test vectors for deterministic verification.
//!
//! These vectors pin the binary layout and canonical string of identifiers so
//! every implementation hashes and prints the same bytes.

use serde::Serialize;

use peerrank_core::{HashSpec, Identifier, Result};

/// A golden test vector.
#[derive(Debug, Clone, Serialize)]
pub struct GoldenVector {
    /// Human-readable name for the vector.
    pub name: &'static str,
    /// Algorithm used to hash the input.
    #[serde(skip)]
    pub spec: HashSpec,
    /// Input bytes.
    #[serde(serialize_with = "as_hex")]
    pub input: &'static [u8],
    /// Expected encoded identifier (hex).
    pub expected_hex: &'static str,
    /// Expected canonical string.
    pub expected_b58: &'static str,
}

fn as_hex<S: serde::Serializer>(bytes: &&'static [u8], s: S) -> std::result::Result<S::Ok, S::Error> {
    s.serialize_str(&hex::encode(bytes))
}

impl GoldenVector {
    /// Hash the input under the vector's algorithm.
    pub fn compute(&self) -> Result<Identifier> {
        Identifier::sum(self.spec, self.input)
    }
}

/// Get all golden test vectors.
pub fn all_vectors() -> Vec<GoldenVector> {
    vec![
        GoldenVector {
            name: "sha2-256 of 'test data'",
            spec: HashSpec::sha2_256(),
            input: b"test data",
            expected_hex: "1220916f0027a575074ce72a331777c3478d6513f786a591bd892da1a577bf2335f9",
            expected_b58: "QmY8Mzg9F69e5P9AoQPYat655HEhc1TVGs11tmfNSzkqh2",
        },
        GoldenVector {
            name: "sha2-256 of empty input",
            spec: HashSpec::sha2_256(),
            input: b"",
            expected_hex: "1220e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855",
            expected_b58: "QmdfTbBqBPQ7VNxZEYEj14VmRuZBkqFbiwReogJgS1zR1n",
        },
        GoldenVector {
            name: "sha2-256 of 'hello'",
            spec: HashSpec::sha2_256(),
            input: b"hello",
            expected_hex: "12202cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824",
            expected_b58: "QmRN6wdp1S2A5EtjW9A3M1vKSBuQQGcgvuhoMUoEz4iiT5",
        },
        GoldenVector {
            name: "sha2-256 of 'peerrank'",
            spec: HashSpec::sha2_256(),
            input: b"peerrank",
            expected_hex: "122063966624800fe171502d08089c0f5afea425b84c650413648b4e2b7a5d2c1b45",
            expected_b58: "QmV3Q5u2p2Lrc8TQN2i23H91w9KXsmcUYKgTM4nrdFCije",
        },
        GoldenVector {
            name: "sha2-512 of 'hello'",
            spec: HashSpec::sha2_512(),
            input: b"hello",
            expected_hex: "13409b71d224bd62f3785d96d46ad3ea3d73319bfbc2890caadae2dff72519673ca72323c3d99ba5c11d7c7acc6e14b8c5da0c4663475c2e5c3adef46f73bcdec043",
            expected_b58: "8VvtnjJxjVhuoxVbuUsucwewoxPUu974mvuEhGWgrSEvJrASGkpwRYsTfuX3hWEoaC8YMaCcdKosq6wqEYoE7LNdD4",
        },
    ]
}

/// Check every vector. Returns `(name, passed, detail)` per vector.
pub fn verify_all_vectors() -> Vec<(String, bool, String)> {
    all_vectors()
        .into_iter()
        .map(|vector| match vector.compute() {
            Ok(id) => {
                let hex = id.to_hex();
                let b58 = id.to_string();
                let passed = hex == vector.expected_hex && b58 == vector.expected_b58;
                (vector.name.to_string(), passed, format!("{hex} {b58}"))
            }
            Err(e) => (vector.name.to_string(), false, e.to_string()),
        })
        .collect()
}

/// Serialize all vectors as pretty JSON for other implementations.
pub fn vectors_json() -> serde_json::Result<String> {
    serde_json::to_string_pretty(&all_vectors())
}
