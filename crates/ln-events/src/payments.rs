//! Payment subscription.
//!
//! Republishes in-flight payment records as `Paying` domain events.
//! Records in other states (settled, failed) belong to their own
//! normalizers and are dropped here, the same forward-compatibility
//! policy as unknown peer event kinds.

use crate::transport::{LndConnection, RawStream, StreamSignal, SubscribeError, TransportError};
use ln_responses::{pending_payment_from_rpc, PendingPayment, PendingPaymentError};
use ln_wire::{PaymentRecord, PAYMENT_IN_FLIGHT};
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio_stream::Stream;
use tracing::debug;

/// A domain event delivered by a payment subscription.
#[derive(Debug, Clone, PartialEq)]
pub enum PaymentEvent {
    /// A payment attempt is in flight.
    Paying(PendingPayment),

    /// A transport error, passed through unchanged.
    Error(TransportError),
}

/// Subscribe to payment events.
///
/// Fails synchronously, before any stream is opened, when the connection
/// has no stream capability.
pub fn subscribe_to_payments(lnd: &LndConnection) -> Result<PaymentSubscription, SubscribeError> {
    let transport = lnd
        .transport()
        .ok_or(SubscribeError::ExpectedAuthenticatedLndToSubscribeToPayments)?;

    let stream = transport.open_payment_events();

    debug!("Payment event subscription opened");

    Ok(PaymentSubscription { stream })
}

/// A live, cancellable payment event subscription.
pub struct PaymentSubscription {
    stream: RawStream<PaymentRecord>,
}

impl PaymentSubscription {
    /// Receive the next domain event.
    ///
    /// Same contract as
    /// [`PeerSubscription::recv`](crate::peers::PeerSubscription::recv):
    /// transport errors arrive in-band, validation failures return `Err`
    /// and are fatal to the single record only.
    pub async fn recv(&mut self) -> Result<Option<PaymentEvent>, PendingPaymentError> {
        loop {
            let Some(signal) = self.stream.recv().await else {
                return Ok(None);
            };

            if let Some(event) = event_from_signal(signal)? {
                return Ok(Some(event));
            }
            // Not an in-flight record, keep receiving
        }
    }

    /// Cancel the underlying stream. Idempotent.
    pub fn cancel(&self) {
        self.stream.cancel_handle().cancel();
    }

    /// The underlying stream's cancel capability.
    #[must_use]
    pub fn cancel_handle(&self) -> crate::transport::CancelHandle {
        self.stream.cancel_handle()
    }

    /// Convert into a [`Stream`] for use with stream combinators.
    #[must_use]
    pub fn into_stream(self) -> PaymentEventStream {
        PaymentEventStream { subscription: self }
    }
}

/// Map one raw signal to at most one domain event.
fn event_from_signal(
    signal: StreamSignal<PaymentRecord>,
) -> Result<Option<PaymentEvent>, PendingPaymentError> {
    let record = match signal {
        StreamSignal::Error(err) => return Ok(Some(PaymentEvent::Error(err))),
        StreamSignal::Data(record) => record,
    };

    // A null record still goes through the normalizer so the absence is
    // reported with its named error kind.
    let in_flight = match record.as_ref() {
        None => true,
        Some(record) => record.status.as_deref() == Some(PAYMENT_IN_FLIGHT),
    };

    if !in_flight {
        debug!("Dropping payment record in a non-pending state");
        return Ok(None);
    }

    let pending = pending_payment_from_rpc(record.as_ref())?;

    Ok(Some(PaymentEvent::Paying(pending)))
}

/// A stream wrapper for payment subscriptions.
pub struct PaymentEventStream {
    subscription: PaymentSubscription,
}

impl Stream for PaymentEventStream {
    type Item = Result<PaymentEvent, PendingPaymentError>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        loop {
            let signal = match self.subscription.stream.poll_recv(cx) {
                Poll::Pending => return Poll::Pending,
                Poll::Ready(None) => return Poll::Ready(None),
                Poll::Ready(Some(signal)) => signal,
            };

            match event_from_signal(signal) {
                Ok(Some(event)) => return Poll::Ready(Some(Ok(event))),
                Ok(None) => continue,
                Err(err) => return Poll::Ready(Some(Err(err))),
            }
        }
    }
}
