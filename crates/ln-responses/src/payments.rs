//! Pending payment normalization.
//!
//! A pending payment arrives as a deeply nested wire record: the payment
//! wraps HTLC attempts, each attempt wraps a route, each route wraps hops.
//! Normalization walks the whole tree and rejects the record on the first
//! missing or inconsistent required field.

use chrono::{SecondsFormat, TimeZone, Utc};
use ln_wire::{HopRecord, HtlcRecord, PaymentRecord};
use thiserror::Error;

/// Millitokens per displayed token.
const MTOKENS_PER_TOKEN: u64 = 1_000;

/// Nanoseconds per millisecond.
const NS_PER_MS: u64 = 1_000_000;

/// Zero-filled placeholder used when the final hop carries no payment
/// identifier.
const EMPTY_PAYMENT_ADDR: &str =
    "0000000000000000000000000000000000000000000000000000000000000000";

/// Validation failures of the pending payment normalizer.
///
/// Variant names are the stable error identifiers; callers branch on the
/// variant, not on message text. A field that is present but not a valid
/// decimal number fails with the same kind as a missing field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PendingPaymentError {
    /// No payment record arrived where one was expected.
    #[error("ExpectedPendingPaymentToDerivePendingDetails")]
    ExpectedPendingPaymentToDerivePendingDetails,

    /// The payment carries no creation timestamp.
    #[error("ExpectedPaymentCreationDateToDerivePendingDetails")]
    ExpectedPaymentCreationDateToDerivePendingDetails,

    /// The payment carries no fee millitokens amount.
    #[error("ExpectedPaymentFeeMillitokensAmountForPendingPayment")]
    ExpectedPaymentFeeMillitokensAmountForPendingPayment,

    /// The payment carries no HTLC attempt array.
    #[error("ExpectedArrayOfPaymentHtlcsInPendingPayment")]
    ExpectedArrayOfPaymentHtlcsInPendingPayment,

    /// An HTLC attempt is missing or fails to normalize.
    #[error("ExpectedPendingHtlcInPendingPayment")]
    ExpectedPendingHtlcInPendingPayment,

    /// The payment carries no payment hash.
    #[error("ExpectedPaymentHashForPaymentAsPendingPayment")]
    ExpectedPaymentHashForPaymentAsPendingPayment,

    /// The supplied token amount disagrees with its millitoken counterpart.
    #[error("ExpectedValueOfTokensAndMillitokensToBeConsistent")]
    ExpectedValueOfTokensAndMillitokensToBeConsistent,
}

/// A single hop of an attempted route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentHop {
    /// Composite channel id, `<block>x<index>x<output>`.
    pub channel: String,

    /// Capacity of the channel in tokens.
    pub channel_capacity: u64,

    /// Hop fee in tokens.
    pub fee: u64,

    /// Hop fee in millitokens, decimal string.
    pub fee_mtokens: String,

    /// Amount forwarded past this hop in tokens.
    pub forward: u64,

    /// Amount forwarded past this hop in millitokens, decimal string.
    pub forward_mtokens: String,

    /// Hex-encoded public key of the hop node.
    pub public_key: String,

    /// Absolute timeout height for this hop.
    pub timeout: Option<u32>,
}

/// One attempted route (HTLC) of a pending payment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentPath {
    /// Total routing fee in tokens.
    pub fee: u64,

    /// Total routing fee in millitokens, decimal string.
    pub fee_mtokens: String,

    /// Hops of the route, in traversal order.
    pub hops: Vec<PaymentHop>,

    /// Total amount in millitokens, decimal string.
    pub mtokens: String,

    /// Hex-encoded payment identifier, zero-filled when the final hop
    /// carries none.
    pub payment: String,

    /// Absolute timeout height of the route.
    pub timeout: Option<u32>,

    /// Total amount in tokens.
    pub tokens: u64,

    /// Total millitokens across all paths, decimal string.
    pub total_mtokens: Option<String>,
}

/// A normalized in-flight payment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingPayment {
    /// ISO-8601 creation time, millisecond precision.
    pub created_at: String,

    /// Hex-encoded public key of the final destination, when a route is
    /// known.
    pub destination: Option<String>,

    /// Hex-encoded payment hash.
    pub id: String,

    /// Total outgoing amount (value plus fee) in millitokens, decimal
    /// string.
    pub mtokens: String,

    /// One path per attempted HTLC.
    pub paths: Vec<PaymentPath>,

    /// Original payment request, absent when paying without one.
    pub request: Option<String>,

    /// Rounding-tolerant integer view of `mtokens`.
    pub safe_tokens: u64,

    /// Highest absolute timeout height across paths.
    pub timeout: Option<u32>,

    /// Total outgoing amount (value plus fee) in tokens.
    pub tokens: u64,
}

/// Normalize a raw payment record into a pending payment.
///
/// Validation order: record present, creation time present, fee
/// millitokens present, HTLC array present and every attempt well-formed,
/// payment hash present, token/millitoken amounts mutually consistent.
/// Pure and side-effect free.
pub fn pending_payment_from_rpc(
    payment: Option<&PaymentRecord>,
) -> Result<PendingPayment, PendingPaymentError> {
    let payment =
        payment.ok_or(PendingPaymentError::ExpectedPendingPaymentToDerivePendingDetails)?;

    let creation_ns = parse_u64(payment.creation_time_ns.as_deref())
        .ok_or(PendingPaymentError::ExpectedPaymentCreationDateToDerivePendingDetails)?;

    let created_at = Utc
        .timestamp_millis_opt((creation_ns / NS_PER_MS) as i64)
        .single()
        .ok_or(PendingPaymentError::ExpectedPaymentCreationDateToDerivePendingDetails)?
        .to_rfc3339_opts(SecondsFormat::Millis, true);

    let fee_mtokens = parse_u64(payment.fee_msat.as_deref())
        .ok_or(PendingPaymentError::ExpectedPaymentFeeMillitokensAmountForPendingPayment)?;

    let htlcs = payment
        .htlcs
        .as_ref()
        .ok_or(PendingPaymentError::ExpectedArrayOfPaymentHtlcsInPendingPayment)?;

    let paths = htlcs
        .iter()
        .map(path_from_htlc)
        .collect::<Result<Vec<_>, _>>()?;

    // A pending payment has at least one in-flight attempt.
    if paths.is_empty() {
        return Err(PendingPaymentError::ExpectedPendingHtlcInPendingPayment);
    }

    let id = payment
        .payment_hash
        .as_deref()
        .filter(|hash| !hash.is_empty())
        .ok_or(PendingPaymentError::ExpectedPaymentHashForPaymentAsPendingPayment)?
        .to_string();

    // Checked, never reconciled: a disagreement between the supplied token
    // amount and its millitoken counterpart is a validation failure, and a
    // token amount too large to express in millitokens cannot be consistent.
    let inconsistent = PendingPaymentError::ExpectedValueOfTokensAndMillitokensToBeConsistent;

    if let (Some(sat), Some(msat)) = (payment.value_sat.as_deref(), payment.value_msat.as_deref()) {
        let sat = parse_u64(Some(sat)).ok_or(inconsistent)?;
        let msat = parse_u64(Some(msat)).ok_or(inconsistent)?;

        if sat.checked_mul(MTOKENS_PER_TOKEN) != Some(msat) {
            return Err(inconsistent);
        }
    }

    let value_mtokens = match (
        parse_u64(payment.value_msat.as_deref()),
        parse_u64(payment.value_sat.as_deref()).or_else(|| parse_u64(payment.value.as_deref())),
    ) {
        (Some(msat), _) => msat,
        (None, Some(tokens)) => tokens.checked_mul(MTOKENS_PER_TOKEN).ok_or(inconsistent)?,
        (None, None) => 0,
    };

    let value_tokens = parse_u64(payment.value.as_deref())
        .or_else(|| parse_u64(payment.value_sat.as_deref()))
        .unwrap_or(value_mtokens / MTOKENS_PER_TOKEN);

    let fee_tokens =
        parse_u64(payment.fee.as_deref()).unwrap_or(fee_mtokens / MTOKENS_PER_TOKEN);

    let mtokens = value_mtokens
        .checked_add(fee_mtokens)
        .ok_or(inconsistent)?;
    let tokens = value_tokens.checked_add(fee_tokens).ok_or(inconsistent)?;

    Ok(PendingPayment {
        created_at,
        destination: payment
            .path
            .as_ref()
            .and_then(|path| path.last())
            .cloned(),
        id,
        mtokens: mtokens.to_string(),
        request: payment
            .payment_request
            .as_deref()
            .filter(|request| !request.is_empty())
            .map(ToString::to_string),
        safe_tokens: safe_tokens_from_mtokens(mtokens),
        timeout: paths.iter().filter_map(|path| path.timeout).max(),
        tokens,
        paths,
    })
}

/// Integer token view of a millitoken amount, rounded half up.
///
/// Carry and remainder are split so the rounding bump cannot overflow
/// even at `u64::MAX` millitokens.
fn safe_tokens_from_mtokens(mtokens: u64) -> u64 {
    mtokens / MTOKENS_PER_TOKEN + u64::from(mtokens % MTOKENS_PER_TOKEN >= MTOKENS_PER_TOKEN / 2)
}

/// Normalize one HTLC attempt into a path.
///
/// Every failure inside the attempt, route, or hops collapses to
/// [`PendingPaymentError::ExpectedPendingHtlcInPendingPayment`]: the HTLC
/// as a whole is what the payment requires.
fn path_from_htlc(htlc: &HtlcRecord) -> Result<PaymentPath, PendingPaymentError> {
    let malformed = PendingPaymentError::ExpectedPendingHtlcInPendingPayment;

    let route = htlc.route.as_ref().ok_or(malformed)?;

    let hops = route
        .hops
        .as_ref()
        .ok_or(malformed)?
        .iter()
        .map(hop_from_rpc)
        .collect::<Result<Vec<_>, _>>()?;

    let fee_mtokens = parse_u64(route.total_fees_msat.as_deref()).ok_or(malformed)?;
    let amount_mtokens = parse_u64(route.total_amt_msat.as_deref()).ok_or(malformed)?;

    // The final hop carries the multi-path payment metadata, when any.
    let mpp = route
        .hops
        .as_ref()
        .and_then(|hops| hops.last())
        .and_then(|hop| hop.mpp_record.as_ref());

    Ok(PaymentPath {
        fee: parse_u64(route.total_fees.as_deref())
            .unwrap_or(fee_mtokens / MTOKENS_PER_TOKEN),
        fee_mtokens: fee_mtokens.to_string(),
        hops,
        mtokens: amount_mtokens.to_string(),
        payment: mpp
            .and_then(|record| record.payment_addr.as_deref())
            .map_or_else(|| EMPTY_PAYMENT_ADDR.to_string(), hex::encode),
        timeout: route.total_time_lock,
        tokens: parse_u64(route.total_amt.as_deref())
            .unwrap_or(amount_mtokens / MTOKENS_PER_TOKEN),
        total_mtokens: mpp.and_then(|record| record.total_amt_msat.clone()),
    })
}

/// Normalize one hop of a route.
fn hop_from_rpc(hop: &HopRecord) -> Result<PaymentHop, PendingPaymentError> {
    let malformed = PendingPaymentError::ExpectedPendingHtlcInPendingPayment;

    let chan_id = parse_u64(hop.chan_id.as_deref()).ok_or(malformed)?;
    let fee_mtokens = parse_u64(hop.fee_msat.as_deref()).ok_or(malformed)?;
    let forward_mtokens = parse_u64(hop.amt_to_forward_msat.as_deref()).ok_or(malformed)?;

    Ok(PaymentHop {
        channel: channel_from_chan_id(chan_id),
        channel_capacity: parse_u64(hop.chan_capacity.as_deref()).ok_or(malformed)?,
        fee: parse_u64(hop.fee.as_deref()).unwrap_or(fee_mtokens / MTOKENS_PER_TOKEN),
        fee_mtokens: fee_mtokens.to_string(),
        forward: parse_u64(hop.amt_to_forward.as_deref())
            .unwrap_or(forward_mtokens / MTOKENS_PER_TOKEN),
        forward_mtokens: forward_mtokens.to_string(),
        public_key: hop
            .pub_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or(malformed)?
            .to_string(),
        timeout: hop.expiry,
    })
}

/// Compose the `<block>x<index>x<output>` channel id from the packed
/// numeric form: funding block height, transaction index within the block,
/// and output index within the transaction.
fn channel_from_chan_id(chan_id: u64) -> String {
    let block = chan_id >> 40;
    let index = (chan_id >> 16) & 0xFF_FFFF;
    let output = chan_id & 0xFFFF;

    format!("{block}x{index}x{output}")
}

/// Parse an optional decimal string field.
fn parse_u64(field: Option<&str>) -> Option<u64> {
    field.and_then(|value| value.parse().ok())
}
