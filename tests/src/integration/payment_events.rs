//! End-to-end payment subscription flow: a wire-format payment record
//! through normalization to a `Paying` event.

#[cfg(test)]
mod tests {
    use ln_events::testing::ScriptedTransport;
    use ln_events::{subscribe_to_payments, PaymentEvent, StreamSignal};
    use ln_responses::PendingPaymentError;
    use ln_wire::PaymentRecord;

    fn decode_in_flight() -> PaymentRecord {
        serde_json::from_str(
            r#"{
                "creation_date": "1",
                "creation_time_ns": "1",
                "failure_reason": "FAILURE_REASON_NONE",
                "fee": "1",
                "fee_msat": "1000",
                "fee_sat": "1",
                "htlcs": [{
                    "attempt_time_ns": "1",
                    "status": "IN_FLIGHT",
                    "route": {
                        "hops": [{
                            "amt_to_forward": "1",
                            "amt_to_forward_msat": "1000",
                            "chan_capacity": "1",
                            "chan_id": "1",
                            "expiry": 1,
                            "fee": "1",
                            "fee_msat": "1000",
                            "mpp_record": {
                                "payment_addr": [0, 0, 0, 0],
                                "total_amt_msat": "1000"
                            },
                            "pub_key": "020202020202020202020202020202020202020202020202020202020202020202",
                            "tlv_payload": true
                        }],
                        "total_amt": "1",
                        "total_amt_msat": "1000",
                        "total_fees": "1",
                        "total_fees_msat": "1000",
                        "total_time_lock": 1
                    }
                }],
                "path": ["020202020202020202020202020202020202020202020202020202020202020202"],
                "payment_hash": "0101010101010101010101010101010101010101010101010101010101010101",
                "payment_request": "",
                "status": "IN_FLIGHT",
                "value": "1",
                "value_msat": "1000",
                "value_sat": "1"
            }"#,
        )
        .expect("valid wire record")
    }

    #[tokio::test]
    async fn test_in_flight_payment_emits_paying() {
        let lnd = ScriptedTransport::new()
            .with_payment_signals(vec![StreamSignal::Data(Some(decode_in_flight()))])
            .into_connection();

        let mut sub = subscribe_to_payments(&lnd).expect("subscribed");

        let event = sub.recv().await.expect("event").expect("some");
        let PaymentEvent::Paying(pending) = event else {
            panic!("expected paying event");
        };

        assert_eq!(pending.created_at, "1970-01-01T00:00:00.000Z");
        assert_eq!(
            pending.id,
            "0101010101010101010101010101010101010101010101010101010101010101"
        );
        assert_eq!(pending.mtokens, "2000");
        assert_eq!(pending.safe_tokens, 2);
        assert_eq!(pending.tokens, 2);
        assert_eq!(
            pending.destination.as_deref(),
            Some("020202020202020202020202020202020202020202020202020202020202020202")
        );
        assert_eq!(pending.request, None);
        assert_eq!(pending.timeout, Some(1));
        assert_eq!(pending.paths.len(), 1);
        assert_eq!(pending.paths[0].hops[0].channel, "0x0x1");
    }

    #[tokio::test]
    async fn test_inconsistent_amounts_fail_validation() {
        let mut record = decode_in_flight();
        record.value_msat = Some("0".to_string());

        let lnd = ScriptedTransport::new()
            .with_payment_signals(vec![StreamSignal::Data(Some(record))])
            .into_connection();

        let mut sub = subscribe_to_payments(&lnd).expect("subscribed");

        assert_eq!(
            sub.recv().await,
            Err(PendingPaymentError::ExpectedValueOfTokensAndMillitokensToBeConsistent)
        );
    }

    #[tokio::test]
    async fn test_settled_and_failed_records_dropped() {
        let settled = PaymentRecord {
            status: Some("SUCCEEDED".to_string()),
            ..decode_in_flight()
        };
        let failed = PaymentRecord {
            status: Some("FAILED".to_string()),
            ..decode_in_flight()
        };

        let lnd = ScriptedTransport::new()
            .with_payment_signals(vec![
                StreamSignal::Data(Some(settled)),
                StreamSignal::Data(Some(failed)),
            ])
            .into_connection();

        let mut sub = subscribe_to_payments(&lnd).expect("subscribed");

        // Both records dropped, the stream just ends.
        assert_eq!(sub.recv().await, Ok(None));
    }
}
