//! Ledger state and its canonical digest.

use crate::types::hash::Hash;
use serde_json::json;

/// In-memory ledger state produced by executing a program.
///
/// Initialized to zero and mutated only by the execution engine, one
/// instruction at a time in program order. The state itself is never
/// persisted or shipped anywhere; only its [`digest`](LedgerState::digest)
/// is externally visible, as the root validators must agree on.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct LedgerState {
    /// Net pool balance. May go negative; selling is not balance-checked.
    pub balance: i64,
    /// Liquidity reserve.
    pub liquidity: i64,
    /// Whether the pool has been migrated to an AMM.
    pub migrated: bool,
    /// Operand recorded by the migration instruction.
    pub migrate_value: i64,
}

impl LedgerState {
    /// Creates a zero-initialized state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Computes the canonical digest of this state.
    ///
    /// The state is encoded as a compact JSON object with lexicographically
    /// ordered keys, then hashed. The encoding is fixed so that every
    /// validator derives byte-identical input for the same state.
    pub fn digest(&self) -> Hash {
        // serde_json maps are BTreeMap-backed, so keys serialize sorted.
        let encoded = json!({
            "balance": self.balance,
            "liquidity": self.liquidity,
            "migrated": self.migrated,
            "migrate_value": self.migrate_value,
        })
        .to_string();
        Hash::sha3().chain(encoded.as_bytes()).finalize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_is_deterministic() {
        let state = LedgerState {
            balance: 3,
            liquidity: 3,
            migrated: true,
            migrate_value: 1,
        };
        assert_eq!(state.digest(), state.digest());
    }

    #[test]
    fn digest_covers_every_field() {
        let base = LedgerState::new();
        let variants = [
            LedgerState {
                balance: 1,
                ..base
            },
            LedgerState {
                liquidity: 1,
                ..base
            },
            LedgerState {
                migrated: true,
                ..base
            },
            LedgerState {
                migrate_value: 1,
                ..base
            },
        ];

        let digests: Vec<_> = variants.iter().map(|s| s.digest()).collect();
        for (i, digest) in digests.iter().enumerate() {
            assert_ne!(*digest, base.digest(), "field {i} not covered");
            for (j, other) in digests.iter().enumerate().skip(i + 1) {
                assert_ne!(digest, other, "states {i} and {j} collide");
            }
        }
    }

    #[test]
    fn digest_matches_canonical_encoding() {
        let state = LedgerState {
            balance: 5,
            liquidity: 0,
            migrated: false,
            migrate_value: 0,
        };
        let expected = Hash::sha3()
            .chain(br#"{"balance":5,"liquidity":0,"migrate_value":0,"migrated":false}"#)
            .finalize();
        assert_eq!(state.digest(), expected);
    }
}
