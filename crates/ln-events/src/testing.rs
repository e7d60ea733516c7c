//! Scripted in-memory transport for tests.
//!
//! Plays back a fixed sequence of stream signals and then closes the
//! stream, with an observable shared cancel handle.

use crate::transport::{CancelHandle, EventTransport, LndConnection, RawStream, StreamSignal};
use ln_wire::{PaymentRecord, PeerEventRecord};
use std::sync::Arc;
use tokio::sync::mpsc;

/// An [`EventTransport`] that replays scripted signals.
#[derive(Default)]
pub struct ScriptedTransport {
    peer_signals: Vec<StreamSignal<PeerEventRecord>>,
    payment_signals: Vec<StreamSignal<PaymentRecord>>,
    cancel: CancelHandle,
}

impl ScriptedTransport {
    /// A transport with empty scripts: opened streams end immediately.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the peer event stream.
    #[must_use]
    pub fn with_peer_signals(mut self, signals: Vec<StreamSignal<PeerEventRecord>>) -> Self {
        self.peer_signals = signals;
        self
    }

    /// Script the payment event stream.
    #[must_use]
    pub fn with_payment_signals(mut self, signals: Vec<StreamSignal<PaymentRecord>>) -> Self {
        self.payment_signals = signals;
        self
    }

    /// The cancel handle shared with every opened stream, for asserting
    /// that cancellation reached the transport.
    #[must_use]
    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    /// Wrap into a connection carrying this transport as its capability.
    #[must_use]
    pub fn into_connection(self) -> LndConnection {
        LndConnection::new(Arc::new(self))
    }
}

impl EventTransport for ScriptedTransport {
    fn open_peer_events(&self) -> RawStream<PeerEventRecord> {
        scripted_stream(&self.peer_signals, &self.cancel)
    }

    fn open_payment_events(&self) -> RawStream<PaymentRecord> {
        scripted_stream(&self.payment_signals, &self.cancel)
    }
}

fn scripted_stream<T: Clone>(
    signals: &[StreamSignal<T>],
    cancel: &CancelHandle,
) -> RawStream<T> {
    let (sender, receiver) = mpsc::channel(signals.len().max(1));

    for signal in signals {
        // Capacity covers the whole script, send cannot fail.
        let _ = sender.try_send(signal.clone());
    }

    // Dropping the sender ends the stream after the script.
    RawStream::new(receiver, cancel.clone())
}
