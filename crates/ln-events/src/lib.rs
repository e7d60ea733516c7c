//! # ln-events - Stream Subscription Adapter
//!
//! Wraps a node's raw server-push event streams and republishes each
//! validated record as a typed domain event on a cancellable subscription
//! handle.
//!
//! ## Error Model
//!
//! Two error categories flow through a subscription, and they stay
//! distinct:
//!
//! - **Transport errors** arrive already-formed from the remote side and
//!   pass through unchanged as in-band events
//!   ([`PeerEvent::Error`](peers::PeerEvent::Error)). Only the transport
//!   understands their meaning; nothing here reinterprets them.
//! - **Validation errors** come from the record normalizers and surface as
//!   `Err` from `recv`, fatal to the single record only. The stream stays
//!   open and keeps delivering subsequent records.
//!
//! ## Cancellation
//!
//! Every subscription forwards the underlying stream's [`CancelHandle`].
//! Cancellation is explicit, idempotent, and caller-driven; dropping
//! listeners does not cancel anything.

// Nursery lints that are too strict
#![allow(clippy::missing_const_for_fn)]
// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod payments;
pub mod peers;
#[cfg(any(test, feature = "test-utils"))]
pub mod testing;
pub mod transport;

// Re-export main types
pub use payments::{subscribe_to_payments, PaymentEvent, PaymentEventStream, PaymentSubscription};
pub use peers::{subscribe_to_peers, PeerEvent, PeerEventStream, PeerSubscription};
pub use transport::{
    CancelHandle, EventTransport, LndConnection, RawStream, StreamSignal, SubscribeError,
    TransportError,
};
