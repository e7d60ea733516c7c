//! Peer presence subscription.
//!
//! Republishes validated peer event records as connected/disconnected
//! domain events. Unknown event kinds are dropped silently; they are
//! forward-compatibility no-ops, not errors.

use crate::transport::{LndConnection, RawStream, StreamSignal, SubscribeError, TransportError};
use ln_responses::{peer_event_from_rpc, PeerEventError, PeerEventKind};
use ln_wire::PeerEventRecord;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio_stream::Stream;
use tracing::debug;

/// A domain event delivered by a peer subscription.
#[derive(Debug, Clone, PartialEq)]
pub enum PeerEvent {
    /// A peer connected.
    Connected {
        /// Hex-encoded public key of the peer.
        public_key: String,
    },

    /// A peer disconnected.
    Disconnected {
        /// Hex-encoded public key of the peer.
        public_key: String,
    },

    /// A transport error, passed through unchanged.
    Error(TransportError),
}

/// Subscribe to peer presence events.
///
/// Fails synchronously, before any stream is opened, when the connection
/// has no stream capability. The returned subscription owns the stream's
/// receiving half from this point on, so no event can be missed between
/// return and the first [`PeerSubscription::recv`].
pub fn subscribe_to_peers(lnd: &LndConnection) -> Result<PeerSubscription, SubscribeError> {
    let transport = lnd
        .transport()
        .ok_or(SubscribeError::ExpectedAuthenticatedLndToSubscribeToPeers)?;

    let stream = transport.open_peer_events();

    debug!("Peer event subscription opened");

    Ok(PeerSubscription { stream })
}

/// A live, cancellable peer event subscription.
pub struct PeerSubscription {
    stream: RawStream<PeerEventRecord>,
}

impl PeerSubscription {
    /// Receive the next domain event.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(event))` - The next event; transport errors arrive here
    ///   in-band as [`PeerEvent::Error`]
    /// - `Ok(None)` - The transport closed the stream
    /// - `Err(err)` - A pushed record failed validation. Fatal to that
    ///   record only: the stream stays open and the next call keeps
    ///   receiving
    pub async fn recv(&mut self) -> Result<Option<PeerEvent>, PeerEventError> {
        loop {
            let Some(signal) = self.stream.recv().await else {
                return Ok(None);
            };

            if let Some(event) = event_from_signal(signal)? {
                return Ok(Some(event));
            }
            // Unknown event kind, keep receiving
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
    pub fn into_stream(self) -> PeerEventStream {
        PeerEventStream { subscription: self }
    }
}

/// Map one raw signal to at most one domain event.
///
/// `Ok(None)` means the signal was a record of an unknown event kind and
/// is dropped.
fn event_from_signal(
    signal: StreamSignal<PeerEventRecord>,
) -> Result<Option<PeerEvent>, PeerEventError> {
    let record = match signal {
        StreamSignal::Error(err) => return Ok(Some(PeerEvent::Error(err))),
        StreamSignal::Data(record) => record,
    };

    let event = peer_event_from_rpc(record.as_ref())?;

    match event.kind {
        PeerEventKind::Connected => Ok(Some(PeerEvent::Connected {
            public_key: event.public_key,
        })),
        PeerEventKind::Disconnected => Ok(Some(PeerEvent::Disconnected {
            public_key: event.public_key,
        })),
        PeerEventKind::Unknown => {
            debug!(public_key = %event.public_key, "Dropping unknown peer event kind");
            Ok(None)
        }
    }
}

/// A stream wrapper for peer subscriptions.
///
/// Yields `Result` items: `Ok` for domain events (including in-band
/// transport errors), `Err` for per-record validation failures. The
/// stream does not end on `Err`.
pub struct PeerEventStream {
    subscription: PeerSubscription,
}

impl Stream for PeerEventStream {
    type Item = Result<PeerEvent, PeerEventError>;

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
