//! Peer presence events as pushed by the peer event stream.

use serde::{Deserialize, Serialize};

/// Wire name for a peer coming online.
pub const PEER_ONLINE: &str = "PEER_ONLINE";

/// Wire name for a peer going offline.
pub const PEER_OFFLINE: &str = "PEER_OFFLINE";

/// A raw peer event record.
///
/// The remote node may introduce new event kinds at any time, so
/// `event_type` is an open string rather than an enum.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeerEventRecord {
    /// Event kind name (`PEER_ONLINE`, `PEER_OFFLINE`, or a future kind).
    #[serde(rename = "type")]
    pub event_type: Option<String>,

    /// Raw public key bytes of the peer (33 bytes for a valid key).
    pub pub_key: Option<Vec<u8>>,
}
