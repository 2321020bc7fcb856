//! Hegemon decision engine library.
//!
//! Exposes the board graph, combat and utility evaluation, the what-if
//! simulator, move generation, search, and protocol modules for use by
//! integration tests and the binary entry point.

pub mod board;
pub mod config;
pub mod engine;
pub mod eval;
pub mod movegen;
pub mod protocol;
pub mod resolve;
pub mod search;
