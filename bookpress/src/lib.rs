//! Library side of the `bookpress` binary, exposed for integration tests,
//! benchmarks and the xtask crate.
pub mod cli;
pub mod migrate;
pub mod utils;
