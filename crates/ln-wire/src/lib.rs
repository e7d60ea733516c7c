//! # ln-wire - Wire-Format Record Bags
//!
//! The record shapes a Lightning node pushes over its RPC streams, before
//! any validation. A wire record is an optional bag of named fields of
//! unknown shape:
//!
//! - numeric 64-bit quantities arrive as decimal strings (text encodings
//!   cannot carry them as numbers without losing precision)
//! - byte fields arrive as raw byte buffers
//! - enums arrive as their string names
//!
//! Every field here is therefore `Option` and nothing is checked. Presence
//! and consistency checks belong to the normalizers in `ln-responses`,
//! which reject malformed records with named error kinds instead of
//! coercing them.

// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod payment;
pub mod peer;

// Re-export main types
pub use payment::{
    HopRecord, HtlcRecord, MppRecord, PaymentRecord, RouteRecord, PAYMENT_FAILED,
    PAYMENT_IN_FLIGHT, PAYMENT_SUCCEEDED,
};
pub use peer::{PeerEventRecord, PEER_OFFLINE, PEER_ONLINE};
