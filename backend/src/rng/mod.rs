//! Deterministic random number generation
//!
//! Uses xorshift64* for the generator and Fisher–Yates for permutations.
//! All randomness in the draw (reveal order, spin decoys, spin length)
//! goes through this module so a seed reproduces a whole session.

mod permutation;
mod xorshift;

pub use permutation::{generate_permutation, is_permutation, Permutation};
pub use xorshift::RngManager;
