//! Payment records as pushed by the payment event stream and returned from
//! payment list RPCs.
//!
//! A payment carries one HTLC record per attempted route; each HTLC wraps a
//! route of hops. Amount fields are duplicated on the wire in both token
//! (`*_sat`, `value`, `fee`) and millitoken (`*_msat`) denominations.

use serde::{Deserialize, Serialize};

/// Wire name for a payment still in flight.
pub const PAYMENT_IN_FLIGHT: &str = "IN_FLIGHT";

/// Wire name for a settled payment.
pub const PAYMENT_SUCCEEDED: &str = "SUCCEEDED";

/// Wire name for a failed payment.
pub const PAYMENT_FAILED: &str = "FAILED";

/// A raw payment record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRecord {
    /// Creation time as epoch seconds, decimal string.
    pub creation_date: Option<String>,

    /// Creation time as epoch nanoseconds, decimal string.
    pub creation_time_ns: Option<String>,

    /// Failure reason name, `FAILURE_REASON_NONE` when not failed.
    pub failure_reason: Option<String>,

    /// Total fee in tokens, decimal string.
    pub fee: Option<String>,

    /// Total fee in millitokens, decimal string.
    pub fee_msat: Option<String>,

    /// Total fee in tokens, decimal string (duplicate of `fee`).
    pub fee_sat: Option<String>,

    /// One record per attempted HTLC.
    pub htlcs: Option<Vec<HtlcRecord>>,

    /// Hex-encoded public keys of the payment route, sender first.
    pub path: Option<Vec<String>>,

    /// Hex-encoded payment hash.
    pub payment_hash: Option<String>,

    /// Monotonic payment index, decimal string.
    pub payment_index: Option<String>,

    /// Hex-encoded preimage, zero-filled until settled.
    pub payment_preimage: Option<String>,

    /// Original payment request, empty when paying without one.
    pub payment_request: Option<String>,

    /// Payment state name (`IN_FLIGHT`, `SUCCEEDED`, `FAILED`).
    pub status: Option<String>,

    /// Paid amount in tokens, decimal string.
    pub value: Option<String>,

    /// Paid amount in millitokens, decimal string.
    pub value_msat: Option<String>,

    /// Paid amount in tokens, decimal string (duplicate of `value`).
    pub value_sat: Option<String>,
}

/// A single conditional-payment attempt along one route.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HtlcRecord {
    /// Attempt time as epoch nanoseconds, decimal string.
    pub attempt_time_ns: Option<String>,

    /// Resolution time as epoch nanoseconds, decimal string.
    pub resolve_time_ns: Option<String>,

    /// Attempt state name (`IN_FLIGHT`, `SUCCEEDED`, `FAILED`).
    pub status: Option<String>,

    /// The route this attempt traverses.
    pub route: Option<RouteRecord>,
}

/// The ordered hop sequence of one HTLC attempt.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteRecord {
    /// Hops from the first forwarding node to the destination.
    pub hops: Option<Vec<HopRecord>>,

    /// Total amount in tokens, decimal string.
    pub total_amt: Option<String>,

    /// Total amount in millitokens, decimal string.
    pub total_amt_msat: Option<String>,

    /// Total routing fees in tokens, decimal string.
    pub total_fees: Option<String>,

    /// Total routing fees in millitokens, decimal string.
    pub total_fees_msat: Option<String>,

    /// Absolute timeout height of the route.
    pub total_time_lock: Option<u32>,
}

/// A single hop in a route.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HopRecord {
    /// Amount to forward in tokens, decimal string.
    pub amt_to_forward: Option<String>,

    /// Amount to forward in millitokens, decimal string.
    pub amt_to_forward_msat: Option<String>,

    /// Capacity of the outgoing channel in tokens, decimal string.
    pub chan_capacity: Option<String>,

    /// Numeric channel id of the outgoing channel, decimal string.
    pub chan_id: Option<String>,

    /// Absolute timeout height for this hop.
    pub expiry: Option<u32>,

    /// Hop fee in tokens, decimal string.
    pub fee: Option<String>,

    /// Hop fee in millitokens, decimal string.
    pub fee_msat: Option<String>,

    /// Multi-path payment record, present on the final hop only.
    pub mpp_record: Option<MppRecord>,

    /// Hex-encoded public key of the hop node.
    pub pub_key: Option<String>,

    /// Whether the hop payload uses the TLV format.
    pub tlv_payload: Option<bool>,
}

/// Multi-path payment metadata carried by the final hop.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MppRecord {
    /// Raw payment address bytes.
    pub payment_addr: Option<Vec<u8>>,

    /// Total amount across all paths in millitokens, decimal string.
    pub total_amt_msat: Option<String>,
}
