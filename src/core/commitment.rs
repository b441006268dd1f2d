//! Canonical commitment encoding and downstream submission.
//!
//! A committed block is published as a single JSON payload:
//!
//! ```text
//! {"program":[{"arg":5,"op":"BUY"}, ...],"root":"<hex digest>"}
//! ```
//!
//! Key order within every object is lexicographic and the encoding is
//! compact, so the serialization is byte-identical across runs and
//! implementations. `root` is the digest of the exact serialization of the
//! `program` value, which lets any third party holding only the payload
//! recompute and verify it.

use crate::network::settlement::{SettlementClient, SettlementError};
use crate::types::hash::Hash;
use crate::virtual_machine::program::Program;
use serde_json::{json, Value};

/// Serializes a program as its canonical JSON list.
///
/// One `{"arg": operand, "op": "MNEMONIC"}` object per instruction, in
/// program order. serde_json maps are BTreeMap-backed, so the keys come out
/// lexicographically ordered without further ceremony.
pub fn canonical_program(program: &Program) -> Value {
    let list: Vec<Value> = program
        .into_iter()
        .map(|instruction| {
            json!({
                "op": instruction.opcode.mnemonic(),
                "arg": instruction.operand,
            })
        })
        .collect();
    Value::Array(list)
}

/// Computes the content digest of a program's canonical serialization.
pub fn program_root(program: &Program) -> Hash {
    Hash::sha3()
        .chain(canonical_program(program).to_string().as_bytes())
        .finalize()
}

/// Encodes agreed block programs and submits them to the settlement layer.
pub struct CommitmentEncoder<C: SettlementClient> {
    client: C,
}

impl<C: SettlementClient> CommitmentEncoder<C> {
    /// Creates an encoder submitting through the given client.
    pub fn new(client: C) -> Self {
        Self { client }
    }

    /// Returns the underlying settlement client.
    pub fn client(&self) -> &C {
        &self.client
    }

    /// Canonically encodes `program` and submits the payload downstream.
    ///
    /// Returns the settlement layer's receipt unchanged. Downstream errors
    /// propagate unchanged as well; there is no retry here.
    pub fn commit(&self, program: &Program) -> Result<String, SettlementError> {
        let list = canonical_program(program);
        let root = Hash::sha3()
            .chain(list.to_string().as_bytes())
            .finalize();
        let payload = json!({
            "root": root.to_string(),
            "program": list,
        });
        self.client.send(payload.to_string().as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::settlement::LoopbackClient;
    use crate::virtual_machine::assembler::assemble;
    use base64::engine::general_purpose::STANDARD as BASE64;
    use base64::Engine as _;

    fn program(script: &str) -> Program {
        assemble(script).expect("script should assemble")
    }

    #[test]
    fn canonical_list_bytes_are_fixed() {
        let encoded = canonical_program(&program("BUY 5")).to_string();
        assert_eq!(encoded, r#"[{"arg":5,"op":"BUY"}]"#);

        let empty = canonical_program(&Program::new()).to_string();
        assert_eq!(empty, "[]");
    }

    #[test]
    fn payload_keys_sorted_and_root_verifiable() {
        let encoder = CommitmentEncoder::new(LoopbackClient::new());
        let receipt = encoder.commit(&program("BUY 5")).expect("commit succeeds");

        let payload = BASE64.decode(&receipt).expect("receipt is base64");
        let text = String::from_utf8(payload).expect("payload is utf8");

        // Lexicographic key order puts the program before the root.
        assert!(text.starts_with(r#"{"program":"#));

        let value: Value = serde_json::from_str(&text).expect("payload is json");
        let reencoded = value["program"].to_string();
        let expected_root = Hash::sha3().chain(reencoded.as_bytes()).finalize();
        assert_eq!(value["root"], expected_root.to_string());
    }

    #[test]
    fn identical_programs_identical_roots() {
        assert_eq!(
            program_root(&program("BUY 5\nSELL 2")),
            program_root(&program("BUY 5\nSELL 2"))
        );
        assert_ne!(
            program_root(&program("BUY 5")),
            program_root(&program("BUY 6"))
        );
    }

    #[test]
    fn empty_program_root_is_digest_of_empty_list() {
        let expected = Hash::sha3().chain(b"[]").finalize();
        assert_eq!(program_root(&Program::new()), expected);
    }

    #[test]
    fn commit_journals_payload() {
        let encoder = CommitmentEncoder::new(LoopbackClient::new());
        let receipt = encoder.commit(&program("SELL 1")).expect("commit succeeds");
        assert_eq!(encoder.client().last_sent(), Some(receipt));
    }
}
