//! Peer presence event normalization.

use ln_wire::{PeerEventRecord, PEER_OFFLINE, PEER_ONLINE};
use thiserror::Error;

/// Validation failures of the peer event normalizer.
///
/// Variant names are the stable error identifiers; callers branch on the
/// variant, not on message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PeerEventError {
    /// No peer record arrived where one was expected.
    #[error("ExpectedPeerInPeerEventData")]
    ExpectedPeerInPeerEventData,

    /// The peer record carries no public key.
    #[error("ExpectedPeerPublicKeyInPeerEventData")]
    ExpectedPeerPublicKeyInPeerEventData,
}

/// What happened to the peer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeerEventKind {
    /// The peer connected.
    Connected,
    /// The peer disconnected.
    Disconnected,
    /// An event kind this version does not know. Not an error: unknown
    /// kinds are forward-compatibility no-ops and are never republished.
    Unknown,
}

/// A normalized peer presence event.
///
/// `public_key` is the hex encoding of the wire key bytes, 66 characters
/// for a valid 33-byte key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeerPresenceEvent {
    /// What happened.
    pub kind: PeerEventKind,

    /// Hex-encoded public key of the peer.
    pub public_key: String,
}

/// Normalize a raw peer event record.
///
/// Pure and side-effect free. Fails when the record is absent or carries
/// no public key; any unrecognized event kind maps to
/// [`PeerEventKind::Unknown`] instead of failing.
pub fn peer_event_from_rpc(
    event: Option<&PeerEventRecord>,
) -> Result<PeerPresenceEvent, PeerEventError> {
    let event = event.ok_or(PeerEventError::ExpectedPeerInPeerEventData)?;

    let pub_key = event
        .pub_key
        .as_deref()
        .filter(|key| !key.is_empty())
        .ok_or(PeerEventError::ExpectedPeerPublicKeyInPeerEventData)?;

    let kind = match event.event_type.as_deref() {
        Some(PEER_ONLINE) => PeerEventKind::Connected,
        Some(PEER_OFFLINE) => PeerEventKind::Disconnected,
        _ => PeerEventKind::Unknown,
    };

    Ok(PeerPresenceEvent {
        kind,
        public_key: hex::encode(pub_key),
    })
}
