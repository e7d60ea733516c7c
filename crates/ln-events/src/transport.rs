//! The transport-facing side of a subscription: the capability port the
//! host connection implements, the raw stream handle it hands back, and
//! the cancellation primitive forwarded to callers.

use ln_wire::{PaymentRecord, PeerEventRecord};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::task::{Context, Poll};
use thiserror::Error;
use tokio::sync::mpsc;

/// Errors from opening a subscription.
///
/// Raised synchronously, before any stream is opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SubscribeError {
    /// The connection is absent or cannot open streams.
    #[error("ExpectedAuthenticatedLndToSubscribeToPeers")]
    ExpectedAuthenticatedLndToSubscribeToPeers,

    /// The connection is absent or cannot open streams.
    #[error("ExpectedAuthenticatedLndToSubscribeToPayments")]
    ExpectedAuthenticatedLndToSubscribeToPayments,
}

/// An error value delivered by the transport.
///
/// Passed through to subscribers exactly as it arrived, string or
/// structured: no wrapping, no classification. Only the transport
/// understands what these mean.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportError(pub serde_json::Value);

impl TransportError {
    /// A plain string error value.
    pub fn from_message(message: impl Into<String>) -> Self {
        Self(serde_json::Value::String(message.into()))
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            serde_json::Value::String(message) => write!(f, "{message}"),
            value => write!(f, "{value}"),
        }
    }
}

impl std::error::Error for TransportError {}

impl From<serde_json::Value> for TransportError {
    fn from(value: serde_json::Value) -> Self {
        Self(value)
    }
}

/// Cancellation capability of an open stream.
///
/// Cancelling is idempotent and is the only supported way to stop
/// delivery. The transport observes cancellation through
/// [`CancelHandle::is_cancelled`].
#[derive(Debug, Clone, Default)]
pub struct CancelHandle {
    cancelled: Arc<AtomicBool>,
}

impl CancelHandle {
    /// Create a fresh, uncancelled handle.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Safe to call any number of times.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation was requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// One signal on a raw push stream.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamSignal<T> {
    /// A pushed record. The transport may push a null record; presence is
    /// the normalizer's concern, not the stream's.
    Data(Option<T>),

    /// An error value from the remote side, delivered in-band.
    Error(TransportError),
}

/// Handle over one open server-push stream.
///
/// The receiving half is owned by the subscription before `subscribe`
/// returns, so no signal can be delivered past an unattached handler: the
/// channel buffers until the caller starts receiving.
pub struct RawStream<T> {
    signals: mpsc::Receiver<StreamSignal<T>>,
    cancel: CancelHandle,
}

impl<T> RawStream<T> {
    /// Wrap a signal channel and its cancel capability.
    #[must_use]
    pub fn new(signals: mpsc::Receiver<StreamSignal<T>>, cancel: CancelHandle) -> Self {
        Self { signals, cancel }
    }

    /// Receive the next signal, `None` when the transport closed the
    /// stream.
    pub(crate) async fn recv(&mut self) -> Option<StreamSignal<T>> {
        self.signals.recv().await
    }

    /// Poll for the next signal.
    pub(crate) fn poll_recv(&mut self, cx: &mut Context<'_>) -> Poll<Option<StreamSignal<T>>> {
        self.signals.poll_recv(cx)
    }

    /// The stream's cancel capability.
    #[must_use]
    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }
}

/// The capability a connection must expose to be subscribable.
///
/// Implementations open a live push stream synchronously; retries,
/// deadlines, and reconnection all belong to the transport, not here.
pub trait EventTransport: Send + Sync {
    /// Open the peer presence event stream.
    fn open_peer_events(&self) -> RawStream<PeerEventRecord>;

    /// Open the payment event stream.
    fn open_payment_events(&self) -> RawStream<PaymentRecord>;
}

/// Handle to a node connection, as produced by the transport layer.
///
/// The stream capability is optional: a connection that never
/// authenticated cannot open streams, and subscribing over it fails
/// synchronously.
#[derive(Clone, Default)]
pub struct LndConnection {
    transport: Option<Arc<dyn EventTransport>>,
}

impl LndConnection {
    /// A connection backed by an authenticated transport.
    #[must_use]
    pub fn new(transport: Arc<dyn EventTransport>) -> Self {
        Self {
            transport: Some(transport),
        }
    }

    /// A connection with no stream capability.
    #[must_use]
    pub fn unauthenticated() -> Self {
        Self::default()
    }

    pub(crate) fn transport(&self) -> Option<&Arc<dyn EventTransport>> {
        self.transport.as_ref()
    }
}

impl fmt::Debug for LndConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LndConnection")
            .field("authenticated", &self.transport.is_some())
            .finish()
    }
}
