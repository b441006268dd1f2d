//! Instruction Set Architecture (ISA) definitions.
//!
//! Defines the sequencer's instruction set. The
//! [`for_each_opcode!`](crate::for_each_opcode) macro holds the canonical
//! opcode definitions and invokes a callback macro for code generation, so
//! multiple modules can generate opcode-related code without duplicating the
//! definitions.
//!
//! This module generates:
//! - The [`Opcode`] enum
//! - Mnemonic lookups in both directions
//!
//! See [`assembler`](super::assembler) for the textual front end that
//! resolves source mnemonics against this list.

/// Invokes a callback macro with the complete opcode definition list.
///
/// Each entry is `Name = code, "MNEMONIC"`. The mnemonic is the canonical
/// upper-case text form used in scripts and in the commitment payload.
#[macro_export]
macro_rules! for_each_opcode {
    ($callback:ident) => {
        $callback! {
            /// BUY n ; credits n units to the pool balance
            Buy = 0x01, "BUY",
            /// SELL n ; debits n units from the pool balance
            Sell = 0x02, "SELL",
            /// ADD_LIQUIDITY n ; credits n units to the liquidity reserve
            AddLiquidity = 0x03, "ADD_LIQUIDITY",
            /// MIGRATE_TO_AMM n ; marks the pool migrated, recording n
            MigrateToAmm = 0x04, "MIGRATE_TO_AMM",
        }
    };
}

#[macro_export]
macro_rules! define_opcodes {
    (
        $(
            $(#[$doc:meta])*
            $name:ident = $code:expr, $mnemonic:literal
        ),* $(,)?
    ) => {
        /// A recognized instruction kind.
        #[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
        pub enum Opcode {
            $(
                $(#[$doc])*
                $name = $code,
            )*
        }

        impl Opcode {
            /// Returns the canonical upper-case mnemonic for this opcode.
            pub const fn mnemonic(&self) -> &'static str {
                match self {
                    $( Opcode::$name => $mnemonic, )*
                }
            }

            /// Resolves a canonical mnemonic back to its opcode.
            ///
            /// The input must already be upper-case; callers normalize first.
            pub fn from_mnemonic(mnemonic: &str) -> Option<Opcode> {
                match mnemonic {
                    $( $mnemonic => Some(Opcode::$name), )*
                    _ => None,
                }
            }

            /// All opcodes in definition order.
            pub fn all() -> &'static [Opcode] {
                &[ $( Opcode::$name, )* ]
            }
        }
    };
}

for_each_opcode!(define_opcodes);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mnemonic_roundtrip() {
        for op in Opcode::all() {
            assert_eq!(Opcode::from_mnemonic(op.mnemonic()), Some(*op));
        }
    }

    #[test]
    fn unknown_mnemonic_rejected() {
        assert_eq!(Opcode::from_mnemonic("HODL"), None);
        // Lower-case is not canonical; normalization is the caller's job.
        assert_eq!(Opcode::from_mnemonic("buy"), None);
    }

    #[test]
    fn four_opcodes_defined() {
        assert_eq!(Opcode::all().len(), 4);
    }
}
