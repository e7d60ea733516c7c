//! Cross-crate integration flows.

pub mod payment_events;
pub mod peer_events;
