//! # Bus Dispatch Properties
//!
//! Delivery guarantees of `shared-bus` observed from outside the crate with
//! the connector's own payload type.
//!
//! 1. No subscribers: publish is a no-op
//! 2. N subscribers: exactly N invocations per publish, queued or fallback
//! 3. Unsubscribe affects later publishes only
//! 4. A full queue never blocks the publisher
//! 5. `close()` succeeds once

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::{Duration, Instant};

    use parking_lot::Mutex;
    use shared_bus::{BusError, BusState, EventBus, EventContext, HandlerError, HandlerResult};
    use shared_types::{topics, ConnectorEvent, Transaction};
    use tokio::sync::{oneshot, Semaphore};
    use tokio::time::timeout;

    use crate::integration::eventually;

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    fn created(id: &str) -> ConnectorEvent {
        ConnectorEvent::TransactionCreated(Transaction {
            id: id.to_string(),
            chain: "ETH".to_string(),
            ..Default::default()
        })
    }

    /// Subscribe a handler that counts invocations.
    fn counting(bus: &EventBus<ConnectorEvent>, topic: &str) -> (Arc<AtomicUsize>, shared_bus::Subscription) {
        let count = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&count);
        let sub = bus.subscribe_fn(topic, move |_ctx, _event| {
            let seen = Arc::clone(&seen);
            async move {
                seen.fetch_add(1, Ordering::SeqCst);
                HandlerResult::Ok(())
            }
        });
        (count, sub)
    }

    /// Subscribe a handler that waits on `gate` before counting.
    fn gated(
        bus: &EventBus<ConnectorEvent>,
        topic: &str,
        gate: &Arc<Semaphore>,
    ) -> (Arc<AtomicUsize>, shared_bus::Subscription) {
        let count = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&count);
        let gate = Arc::clone(gate);
        let sub = bus.subscribe_fn(topic, move |_ctx, _event| {
            let seen = Arc::clone(&seen);
            let gate = Arc::clone(&gate);
            async move {
                let _permit = gate.acquire().await.map_err(HandlerError::failed)?;
                seen.fetch_add(1, Ordering::SeqCst);
                HandlerResult::Ok(())
            }
        });
        (count, sub)
    }

    // =============================================================================
    // DELIVERY
    // =============================================================================

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_publish_without_subscribers_is_noop() {
        let bus = EventBus::<ConnectorEvent>::new(2, 4);
        let (_count, _sub) = counting(&bus, "other.topic");

        bus.publish(EventContext::background(), topics::TRANSACTION_CREATED, created("a"));

        let stats = bus.stats();
        assert_eq!(stats.published, 1);
        assert_eq!(stats.queued, 0);
        assert_eq!(stats.fallback, 0);
        bus.close().await.unwrap();
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_every_subscriber_receives_same_payload() {
        // Tiny queue so some jobs take the fallback path.
        let bus = EventBus::<ConnectorEvent>::new(1, 1);
        let received = Arc::new(Mutex::new(Vec::new()));

        let _subs: Vec<_> = (0..5)
            .map(|_| {
                let received = Arc::clone(&received);
                bus.subscribe_fn(topics::TRANSACTION_CREATED, move |_ctx, event| {
                    let received = Arc::clone(&received);
                    async move {
                        received.lock().push(event);
                        HandlerResult::Ok(())
                    }
                })
            })
            .collect();

        let event = created("fan-out");
        bus.publish(EventContext::background(), topics::TRANSACTION_CREATED, event.clone());

        assert!(eventually(Duration::from_secs(2), || received.lock().len() == 5).await);
        tokio::time::sleep(Duration::from_millis(50)).await;

        let received = received.lock();
        assert_eq!(received.len(), 5, "exactly one invocation per subscriber");
        assert!(received.iter().all(|e| *e == event));

        let stats = bus.stats();
        assert_eq!(stats.queued + stats.fallback, 5);
        drop(received);
        bus.close().await.unwrap();
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_publishers_deliver_exactly_once() {
        const PUBLISHERS: usize = 8;
        const PER_PUBLISHER: usize = 100;
        const SUBSCRIBERS: usize = 3;

        let bus = Arc::new(EventBus::<ConnectorEvent>::new(2, 16));
        let counters: Vec<_> = (0..SUBSCRIBERS)
            .map(|_| counting(&bus, topics::TRANSACTION_CREATED))
            .collect();

        let publishers: Vec<_> = (0..PUBLISHERS)
            .map(|p| {
                let bus = Arc::clone(&bus);
                tokio::spawn(async move {
                    for i in 0..PER_PUBLISHER {
                        bus.publish(
                            EventContext::background(),
                            topics::TRANSACTION_CREATED,
                            created(&format!("{p}-{i}")),
                        );
                    }
                })
            })
            .collect();
        for publisher in publishers {
            publisher.await.unwrap();
        }

        let expected = PUBLISHERS * PER_PUBLISHER;
        let all_done = eventually(Duration::from_secs(5), || {
            counters
                .iter()
                .all(|(count, _)| count.load(Ordering::SeqCst) == expected)
        })
        .await;
        assert!(all_done, "every subscriber sees every publish");

        let stats = bus.stats();
        assert_eq!(stats.published, expected as u64);
        assert_eq!(stats.queued + stats.fallback, (expected * SUBSCRIBERS) as u64);
        assert_eq!(stats.handler_failures, 0);
        bus.close().await.unwrap();
    }

    // =============================================================================
    // UNSUBSCRIBE
    // =============================================================================

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_unsubscribe_lets_in_flight_job_finish() {
        let bus = EventBus::<ConnectorEvent>::new(1, 4);
        let gate = Arc::new(Semaphore::new(0));
        let (count, sub) = gated(&bus, topics::TRANSACTION_CREATED, &gate);

        bus.publish(EventContext::background(), topics::TRANSACTION_CREATED, created("a"));
        assert!(sub.unsubscribe());

        // Job created before the unsubscribe still runs.
        gate.add_permits(10);
        assert!(eventually(Duration::from_secs(1), || count.load(Ordering::SeqCst) == 1).await);

        // Later publishes do not reach it.
        bus.publish(EventContext::background(), topics::TRANSACTION_CREATED, created("b"));
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(bus.subscriber_count(topics::TRANSACTION_CREATED), 0);
        bus.close().await.unwrap();
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_unsubscribe_removes_only_its_own_handler() {
        let bus = EventBus::<ConnectorEvent>::new(2, 8);
        let (first, first_sub) = counting(&bus, topics::TRANSACTION_CREATED);
        let (second, _second_sub) = counting(&bus, topics::TRANSACTION_CREATED);

        first_sub.unsubscribe();
        first_sub.unsubscribe();
        bus.publish(EventContext::background(), topics::TRANSACTION_CREATED, created("a"));

        assert!(eventually(Duration::from_secs(1), || second.load(Ordering::SeqCst) == 1).await);
        assert_eq!(first.load(Ordering::SeqCst), 0);
        bus.close().await.unwrap();
    }

    // =============================================================================
    // NON-BLOCKING PUBLISH
    // =============================================================================

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_full_queue_does_not_block_publisher() {
        let bus = EventBus::<ConnectorEvent>::new(1, 1);
        let _sub = bus.subscribe_fn(topics::TRANSACTION_CREATED, |_ctx, _event| async {
            tokio::time::sleep(Duration::from_millis(500)).await;
            HandlerResult::Ok(())
        });

        let started = Instant::now();
        bus.publish(EventContext::background(), topics::TRANSACTION_CREATED, created("a"));
        bus.publish(EventContext::background(), topics::TRANSACTION_CREATED, created("b"));
        assert!(
            started.elapsed() < Duration::from_millis(200),
            "publish blocked for {:?}",
            started.elapsed()
        );
        bus.close().await.unwrap();
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_blocked_worker_both_publishes_eventually_run() {
        let bus = EventBus::<ConnectorEvent>::new(1, 1);
        let gate = Arc::new(Semaphore::new(0));
        let (count, _sub) = gated(&bus, topics::TRANSACTION_CREATED, &gate);

        let started = Instant::now();
        bus.publish(EventContext::background(), topics::TRANSACTION_CREATED, created("a"));
        bus.publish(EventContext::background(), topics::TRANSACTION_CREATED, created("b"));
        assert!(started.elapsed() < Duration::from_millis(200));
        assert_eq!(count.load(Ordering::SeqCst), 0);

        gate.add_permits(2);
        assert!(eventually(Duration::from_secs(2), || count.load(Ordering::SeqCst) == 2).await);
        bus.close().await.unwrap();
    }

    // =============================================================================
    // CONTEXT AND LIFECYCLE
    // =============================================================================

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_context_reaches_handler_untouched() {
        let bus = EventBus::<ConnectorEvent>::new(1, 4);
        let (tx, rx) = oneshot::channel();
        let tx = Arc::new(Mutex::new(Some(tx)));
        let _sub = bus.subscribe_fn(topics::TRANSACTION_CREATED, move |ctx, _event| {
            let tx = Arc::clone(&tx);
            async move {
                if let Some(tx) = tx.lock().take() {
                    let _ = tx.send((ctx.correlation_id(), ctx.deadline().is_some()));
                }
                HandlerResult::Ok(())
            }
        });

        let ctx = EventContext::background().with_timeout(Duration::from_secs(30));
        let correlation_id = ctx.correlation_id();
        bus.publish(ctx, topics::TRANSACTION_CREATED, created("a"));

        let (seen_id, has_deadline) = timeout(Duration::from_secs(1), rx)
            .await
            .expect("handler ran")
            .expect("sender kept");
        assert_eq!(seen_id, correlation_id);
        assert!(has_deadline);
        bus.close().await.unwrap();
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_default_sizes_deliver() {
        let bus = EventBus::<String>::new(0, 0);
        assert_eq!(bus.config().worker_count, 4);
        assert_eq!(bus.config().queue_capacity, 1024);

        let (tx, rx) = oneshot::channel();
        let tx = Arc::new(Mutex::new(Some(tx)));
        let _sub = bus.subscribe_fn("dft", move |_ctx, payload: String| {
            let tx = Arc::clone(&tx);
            async move {
                if let Some(tx) = tx.lock().take() {
                    let _ = tx.send(payload);
                }
                HandlerResult::Ok(())
            }
        });

        bus.publish(EventContext::background(), "dft", "ok".to_string());
        let seen = timeout(Duration::from_secs(1), rx).await.unwrap().unwrap();
        assert_eq!(seen, "ok");
        bus.close().await.unwrap();
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_close_succeeds_once() {
        let bus = EventBus::<ConnectorEvent>::new(2, 4);
        assert_eq!(bus.state(), BusState::Running);

        assert_eq!(bus.close().await, Ok(()));
        assert_eq!(bus.state(), BusState::Closed);
        assert_eq!(bus.close().await, Err(BusError::AlreadyClosed));
        assert_eq!(bus.close().await, Err(BusError::AlreadyClosed));
    }
}
