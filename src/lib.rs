//! Asset-trading sequencer library.
//!
//! Sequences user-submitted trading instructions into blocks, replicates
//! their execution across a validator set, and commits the agreed result to
//! an external settlement layer.
//!
//! The pipeline: scripts are assembled into programs
//! ([`virtual_machine::assembler`]), submitted transactions wait in a
//! dual-queue pool ([`storage::txpool`]), a miner drains them into blocks
//! ([`core::miner`]), every validator re-executes each block
//! ([`virtual_machine::vm`], [`core::consensus`]), and unanimous rounds are
//! canonically encoded and submitted downstream ([`core::commitment`],
//! [`network::settlement`]).

pub mod core;
pub mod network;
pub mod storage;
pub mod types;
pub mod utils;
pub mod virtual_machine;
