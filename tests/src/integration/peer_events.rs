//! End-to-end peer subscription flow: JSON wire records through the
//! scripted transport to typed domain events.

#[cfg(test)]
mod tests {
    use ln_events::testing::ScriptedTransport;
    use ln_events::{subscribe_to_peers, PeerEvent, StreamSignal, TransportError};
    use ln_responses::PeerEventError;
    use ln_wire::PeerEventRecord;
    use std::time::Duration;
    use tokio::time::timeout;

    /// Decode a wire-format JSON record the way a transport adapter would.
    fn decode(json: &str) -> PeerEventRecord {
        serde_json::from_str(json).expect("valid wire record")
    }

    #[tokio::test]
    async fn test_interleaved_session() {
        // One online event, one unknown kind, one transport error, one
        // offline event, then the transport closes the stream.
        let online = decode(r#"{"type":"PEER_ONLINE","pub_key":[3,3,3]}"#);
        let unknown = decode(r#"{"type":"PEER_SYNCING","pub_key":[3,3,3]}"#);
        let offline = decode(r#"{"type":"PEER_OFFLINE","pub_key":[3,3,3]}"#);

        let lnd = ScriptedTransport::new()
            .with_peer_signals(vec![
                StreamSignal::Data(Some(online)),
                StreamSignal::Data(Some(unknown)),
                StreamSignal::Error(TransportError::from_message("err")),
                StreamSignal::Data(Some(offline)),
            ])
            .into_connection();

        let mut sub = subscribe_to_peers(&lnd).expect("subscribed");

        let first = timeout(Duration::from_millis(100), sub.recv())
            .await
            .expect("timeout")
            .expect("event");
        assert_eq!(
            first,
            Some(PeerEvent::Connected {
                public_key: "030303".to_string(),
            })
        );

        // The unknown kind was dropped; the error comes next, unchanged.
        assert_eq!(
            sub.recv().await.expect("event"),
            Some(PeerEvent::Error(TransportError::from_message("err")))
        );

        assert_eq!(
            sub.recv().await.expect("event"),
            Some(PeerEvent::Disconnected {
                public_key: "030303".to_string(),
            })
        );

        assert_eq!(sub.recv().await.expect("closed"), None);
    }

    #[tokio::test]
    async fn test_structured_error_passthrough() {
        let err: TransportError = serde_json::json!({"details": "Cancelled on client"}).into();
        let lnd = ScriptedTransport::new()
            .with_peer_signals(vec![StreamSignal::Error(err.clone())])
            .into_connection();

        let mut sub = subscribe_to_peers(&lnd).expect("subscribed");

        // Exact passthrough: the received value equals the emitted one.
        assert_eq!(
            sub.recv().await.expect("event"),
            Some(PeerEvent::Error(err))
        );
    }

    #[tokio::test]
    async fn test_malformed_record_does_not_tear_down_stream() {
        let missing_key = decode(r#"{"type":"PEER_ONLINE"}"#);
        let good = decode(r#"{"type":"PEER_ONLINE","pub_key":[3,3,3]}"#);

        let lnd = ScriptedTransport::new()
            .with_peer_signals(vec![
                StreamSignal::Data(Some(missing_key)),
                StreamSignal::Data(Some(good)),
            ])
            .into_connection();

        let mut sub = subscribe_to_peers(&lnd).expect("subscribed");

        assert_eq!(
            sub.recv().await,
            Err(PeerEventError::ExpectedPeerPublicKeyInPeerEventData)
        );

        // The record after the malformed one still arrives.
        assert_eq!(
            sub.recv().await.expect("event"),
            Some(PeerEvent::Connected {
                public_key: "030303".to_string(),
            })
        );
    }

    #[tokio::test]
    async fn test_cancellation_reaches_transport() {
        let transport = ScriptedTransport::new();
        let cancelled = transport.cancel_handle();

        let sub = subscribe_to_peers(&transport.into_connection()).expect("subscribed");
        assert!(!cancelled.is_cancelled());

        sub.cancel();
        sub.cancel();

        assert!(cancelled.is_cancelled());
    }
}
