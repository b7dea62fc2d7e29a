//! # HTTP Scenarios
//!
//! End-to-end request flows through the full gateway router:
//!
//! 1. **Publish → bloom-request**: overlap of stored ids with a requester filter
//! 2. **Notify**: novelty of candidates against the server filter
//! 3. **Error mapping**: malformed bodies and filters are client errors
//! 4. **Deadlines**: `timeout=1ns` and shutdown produce timeout responses

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use axum::response::Response;
    use axum::Router;
    use tower::ServiceExt;

    use mr_01_bloom_filter::BloomFilter;
    use mr_02_message_store::InMemoryMessageStore;
    use mr_03_reconciliation::{ReconciliationApi, ReconciliationService, ServerFilterConfig};
    use mr_04_api_gateway::{
        ApiGatewayService, BloomEncoding, BloomRequest, GatewayConfig, HealthResponse,
        MessagesResponse, NotifyResponse, ServerFilterResponse,
    };

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    fn gateway() -> ApiGatewayService {
        let config = GatewayConfig {
            server_filter: ServerFilterConfig::default()
                .with_expected_messages(20_000)
                .with_target_fpr(0.000_001),
            ..GatewayConfig::default()
        };
        let store = Arc::new(InMemoryMessageStore::new());
        let api: Arc<dyn ReconciliationApi> =
            Arc::new(ReconciliationService::new(store, &config.server_filter).unwrap());
        ApiGatewayService::new(config, api).unwrap()
    }

    async fn post(router: &Router, uri: &str, body: String) -> Response {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap();
        router.clone().oneshot(request).await.unwrap()
    }

    async fn get(router: &Router, uri: &str) -> Response {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        router.clone().oneshot(request).await.unwrap()
    }

    async fn read_json<T: serde::de::DeserializeOwned>(response: Response) -> T {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn publish(router: &Router, ids: &[String]) {
        let body = serde_json::json!({ "messages": ids }).to_string();
        let response = post(router, "/publish", body).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn bloom_request_body(filter: &BloomFilter) -> String {
        serde_json::to_string(&BloomRequest {
            bloom: BloomEncoding::from_filter(filter),
        })
        .unwrap()
    }

    fn requester_filter(items: &[&str]) -> BloomFilter {
        let mut filter = BloomFilter::with_capacity(1_000, 0.0001).unwrap();
        for item in items {
            filter.insert(item);
        }
        filter
    }

    // =============================================================================
    // RECONCILIATION FLOWS
    // =============================================================================

    #[tokio::test]
    async fn test_publish_then_bloom_request_returns_overlap() {
        let router = gateway().router();
        publish(&router, &strings(&["a", "b", "c"])).await;

        let response = post(
            &router,
            "/bloom-request",
            bloom_request_body(&requester_filter(&["a"])),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let body: MessagesResponse = read_json(response).await;
        assert_eq!(body.messages, strings(&["a"]));
    }

    #[tokio::test]
    async fn test_bloom_request_preserves_publish_order() {
        let router = gateway().router();
        publish(&router, &strings(&["c", "a"])).await;
        publish(&router, &strings(&["b", "a"])).await;

        let response = post(
            &router,
            "/bloom-request",
            bloom_request_body(&requester_filter(&["a", "b", "c"])),
        )
        .await;

        let body: MessagesResponse = read_json(response).await;
        assert_eq!(body.messages, strings(&["c", "a", "b"]));
    }

    #[tokio::test]
    async fn test_notify_against_empty_server_filter_returns_all() {
        let router = gateway().router();

        let response = post(&router, "/notify", r#"{"msgHashes":["x","y"]}"#.into()).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body: NotifyResponse = read_json(response).await;
        assert_eq!(body.msg_hashes, strings(&["x", "y"]));
    }

    #[tokio::test]
    async fn test_peer_sync_via_server_filter() {
        let router = gateway().router();
        publish(&router, &strings(&["m1", "m2"])).await;

        // Peer fetches the server filter and works out what the server lacks
        let server: ServerFilterResponse = read_json(get(&router, "/server-filter").await).await;
        let filter = server
            .bloom
            .decode(&GatewayConfig::default().limits)
            .unwrap();
        let local = strings(&["m2", "m3", "m4"]);
        let missing: Vec<String> = local
            .iter()
            .filter(|id| !filter.may_contain(id.as_str()))
            .cloned()
            .collect();
        assert_eq!(missing, strings(&["m3", "m4"]));

        publish(&router, &missing).await;

        // Nothing the peer holds is novel any more
        let body = serde_json::json!({ "msgHashes": local }).to_string();
        let notify: NotifyResponse = read_json(post(&router, "/notify", body).await).await;
        assert!(notify.msg_hashes.is_empty());

        let health: HealthResponse = read_json(get(&router, "/health").await).await;
        assert_eq!(health.messages, 4);
    }

    #[tokio::test]
    async fn test_republishing_is_idempotent() {
        let router = gateway().router();
        let ids = strings(&["a", "b"]);
        publish(&router, &ids).await;
        publish(&router, &ids).await;

        let health: HealthResponse = read_json(get(&router, "/health").await).await;
        assert_eq!(health.messages, 2);
    }

    // =============================================================================
    // ERROR MAPPING
    // =============================================================================

    #[tokio::test]
    async fn test_malformed_hex_is_client_error() {
        let router = gateway().router();

        let response = post(
            &router,
            "/bloom-request",
            r#"{"bloom":{"filter":"0g","k":2}}"#.into(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_odd_length_hex_is_client_error() {
        let router = gateway().router();

        let response = post(
            &router,
            "/bloom-request",
            r#"{"bloom":{"filter":"abc","k":2}}"#.into(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_missing_bloom_field_is_client_error() {
        let router = gateway().router();

        let response = post(&router, "/bloom-request", "{}".into()).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    // =============================================================================
    // DEADLINES AND CANCELLATION
    // =============================================================================

    #[tokio::test]
    async fn test_one_nanosecond_timeout_with_large_store() {
        let router = gateway().router();
        let ids: Vec<String> = (0..10_000).map(|i| format!("message-{:05}", i)).collect();
        publish(&router, &ids).await;

        let response = post(
            &router,
            "/bloom-request?timeout=1ns",
            bloom_request_body(&requester_filter(&["message-00001"])),
        )
        .await;

        assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(bytes.is_empty());
    }

    #[tokio::test]
    async fn test_requests_after_shutdown_time_out() {
        let gateway = gateway();
        let router = gateway.router();
        gateway.shutdown();

        let response = post(&router, "/notify", r#"{"msgHashes":["x"]}"#.into()).await;
        assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
        assert_eq!(gateway.metrics().snapshot().requests_timed_out, 1);
    }
}
