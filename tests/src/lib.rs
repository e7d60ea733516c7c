//! # lnbridge Test Suite
//!
//! Unified test crate for flows that cross crate boundaries:
//! wire decoding (`ln-wire`) through normalization (`ln-responses`) to
//! subscription delivery (`ln-events`).
//!
//! ```bash
//! cargo test -p ln-tests
//! ```

pub mod integration;
