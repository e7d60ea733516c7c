//! # ln-responses - Record Normalizers
//!
//! Pure functions that turn the loosely-typed wire records of `ln-wire`
//! into strictly validated domain value objects.
//!
//! Each normalizer is total over a declared set of named validation
//! failures: a malformed record is rejected with a specific error kind that
//! callers can branch on, never silently coerced. Normalized objects are
//! plain values with no identity or lifecycle beyond their fields.
//!
//! Two record kinds are handled here:
//!
//! - peer presence events ([`peer_event_from_rpc`])
//! - pending payments, including nested route/hop normalization
//!   ([`pending_payment_from_rpc`])

// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod payments;
pub mod peers;

// Re-export main types
pub use payments::{
    pending_payment_from_rpc, PaymentHop, PaymentPath, PendingPayment, PendingPaymentError,
};
pub use peers::{peer_event_from_rpc, PeerEventError, PeerEventKind, PeerPresenceEvent};
