//! Host crate for cross-crate integration tests.
//!
//! The library is empty; the tests live under `tests/`.
