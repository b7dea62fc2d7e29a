//! # Concurrency Tests
//!
//! Shared-state guarantees under concurrent publish and query traffic:
//!
//! - **Single winner**: racing publishes of one id report it added exactly once
//! - **No lost updates**: every distinct id published by any thread is stored
//! - **No torn reads**: a query never observes part of a publish batch

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Arc, Barrier};
    use std::thread;

    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use tower::ServiceExt;

    use mr_01_bloom_filter::BloomFilter;
    use mr_02_message_store::{InMemoryMessageStore, MessageStore};
    use mr_03_reconciliation::{ReconciliationApi, ReconciliationService, ServerFilterConfig};
    use mr_04_api_gateway::{ApiGatewayService, GatewayConfig};

    const BATCH: usize = 25;

    fn service(expected: usize) -> Arc<ReconciliationService<InMemoryMessageStore>> {
        let config = ServerFilterConfig::default().with_expected_messages(expected);
        Arc::new(ReconciliationService::new(Arc::new(InMemoryMessageStore::new()), &config).unwrap())
    }

    fn batch(publisher: usize, round: usize) -> Vec<String> {
        (0..BATCH)
            .map(|i| format!("p{}-r{}-m{}", publisher, round, i))
            .collect()
    }

    #[test]
    fn test_racing_publishes_have_single_winner() {
        let service = service(1_000);
        let threads = 8;
        let barrier = Arc::new(Barrier::new(threads));

        let handles: Vec<_> = (0..threads)
            .map(|_| {
                let service = Arc::clone(&service);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    let ids: Vec<String> = (0..100).map(|i| format!("shared-{}", i)).collect();
                    service.publish(&ids).unwrap().added.len()
                })
            })
            .collect();

        let total_added: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
        assert_eq!(total_added, 100);
        assert_eq!(service.message_count().unwrap(), 100);
    }

    #[test]
    fn test_no_lost_updates_across_publishers() {
        // Small capacity forces server filter rebuilds mid-traffic
        let service = service(50);
        let publishers = 6;
        let rounds = 20;

        let handles: Vec<_> = (0..publishers)
            .map(|p| {
                let service = Arc::clone(&service);
                thread::spawn(move || {
                    for r in 0..rounds {
                        service.publish(&batch(p, r)).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let expected = publishers * rounds * BATCH;
        assert_eq!(service.message_count().unwrap(), expected);

        let stored: HashSet<String> = service.store().snapshot().unwrap().iter().cloned().collect();
        assert_eq!(stored.len(), expected);

        // Every stored id is known to the rebuilt server filter
        let all: Vec<String> = stored.into_iter().collect();
        assert!(service.filter_complement(&all).unwrap().is_empty());
        assert!(service.metrics().filter_rebuilds > 0);
    }

    #[test]
    fn test_queries_never_observe_partial_batches() {
        let service = service(10_000);
        let publishers = 4;
        let rounds = 30;

        let mut everything = BloomFilter::with_capacity(publishers * rounds * BATCH, 0.001).unwrap();
        for p in 0..publishers {
            for r in 0..rounds {
                for id in batch(p, r) {
                    everything.insert(&id);
                }
            }
        }
        let everything = Arc::new(everything);
        let done = Arc::new(AtomicBool::new(false));

        let readers: Vec<_> = (0..3)
            .map(|_| {
                let service = Arc::clone(&service);
                let everything = Arc::clone(&everything);
                let done = Arc::clone(&done);
                thread::spawn(move || {
                    let mut observations = 0;
                    while !done.load(Ordering::Acquire) {
                        let snapshot = service.store().snapshot().unwrap();
                        assert_eq!(snapshot.len() % BATCH, 0);

                        let matched = service.filter_out(&everything).unwrap();
                        assert_eq!(matched.len() % BATCH, 0);
                        observations += 1;
                    }
                    observations
                })
            })
            .collect();

        let writers: Vec<_> = (0..publishers)
            .map(|p| {
                let service = Arc::clone(&service);
                thread::spawn(move || {
                    for r in 0..rounds {
                        service.publish(&batch(p, r)).unwrap();
                    }
                })
            })
            .collect();
        for writer in writers {
            writer.join().unwrap();
        }
        done.store(true, Ordering::Release);

        for reader in readers {
            reader.join().unwrap();
        }
        assert_eq!(
            service.message_count().unwrap(),
            publishers * rounds * BATCH
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_http_publishes() {
        let service = service(10_000);
        let api: Arc<dyn ReconciliationApi> = service.clone();
        let router = ApiGatewayService::new(GatewayConfig::default(), api)
            .unwrap()
            .router();

        let tasks: Vec<_> = (0..16)
            .map(|p| {
                let router = router.clone();
                tokio::spawn(async move {
                    // Every task also republishes the shared ids
                    let mut ids = batch(p, 0);
                    ids.extend((0..5).map(|i| format!("common-{}", i)));
                    let body = serde_json::json!({ "messages": ids }).to_string();
                    let request = Request::builder()
                        .method("POST")
                        .uri("/publish?timeout=10s")
                        .header(header::CONTENT_TYPE, "application/json")
                        .body(Body::from(body))
                        .unwrap();
                    router.oneshot(request).await.unwrap().status()
                })
            })
            .collect();

        for task in tasks {
            assert_eq!(task.await.unwrap(), StatusCode::NO_CONTENT);
        }

        assert_eq!(service.message_count().unwrap(), 16 * BATCH + 5);
        let metrics = service.metrics();
        assert_eq!(metrics.messages_added as usize, 16 * BATCH + 5);
        assert_eq!(metrics.duplicates_skipped, 15 * 5);
    }
}
