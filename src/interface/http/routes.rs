use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::application::TrendService;

use super::handlers::{
    all_trends_handler, block_time_trend_handler, clear_history_handler, gas_price_trend_handler,
    health_handler, network_handler, record_snapshot_handler, stats_handler,
    transaction_trend_handler, AppState,
};

pub fn create_router(
    trend_service: Arc<TrendService>,
    expected_chain_id: Option<u64>,
    static_dir: Option<PathBuf>,
) -> Router {
    let state = AppState {
        trend_service,
        expected_chain_id,
    };

    let router = Router::new()
        .route("/api/health", get(health_handler))
        .route("/api/network", get(network_handler))
        .route("/api/trends", get(all_trends_handler))
        .route("/api/trends/gas-price", get(gas_price_trend_handler))
        .route("/api/trends/block-time", get(block_time_trend_handler))
        .route("/api/trends/transactions", get(transaction_trend_handler))
        .route("/api/stats", get(stats_handler))
        .route(
            "/api/snapshots",
            post(record_snapshot_handler).delete(clear_history_handler),
        );

    // Dashboard assets
    let router = match static_dir {
        Some(dir) => router.fallback_service(ServeDir::new(dir)),
        None => router,
    };

    router
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};

    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::{Method, Request, StatusCode};
    use chrono::{Duration, Utc};
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::adapters::MemoryStore;
    use crate::domain::{MetricsSnapshot, NetworkMetrics, NetworkStatus};
    use crate::ports::{MetricStore, NetworkSource, SourceError};

    struct StubSource {
        online: bool,
        calls: AtomicU64,
    }

    #[async_trait]
    impl NetworkSource for StubSource {
        async fn fetch_metrics(&self) -> Result<NetworkMetrics, SourceError> {
            if !self.online {
                return Err("node unreachable".into());
            }
            let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            Ok(NetworkMetrics {
                best_block: 1000 + n,
                best_block_hash: "0xbeef".to_string(),
                block_time: 2.0,
                gas_price: 20.0,
                recent_transactions: 42,
                status: NetworkStatus::Healthy,
                timestamp: Utc::now(),
            })
        }

        async fn chain_id(&self) -> Result<u64, SourceError> {
            if self.online {
                Ok(1)
            } else {
                Err("node unreachable".into())
            }
        }
    }

    fn setup(online: bool) -> (Router, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new(100));
        let source = Arc::new(StubSource {
            online,
            calls: AtomicU64::new(0),
        });
        let service = Arc::new(TrendService::new(store.clone(), source));
        (create_router(service, Some(1), None), store)
    }

    fn seed(store: &MemoryStore) {
        let start = Utc::now() - Duration::minutes(3);
        for (i, gas) in [10.0, 20.0, 30.0].into_iter().enumerate() {
            store.append(MetricsSnapshot::new(
                start + Duration::minutes(i as i64),
                i as u64,
                gas,
                2.0,
                (i as u64 + 1) * 5,
            ));
        }
    }

    async fn send(router: Router, method: Method, uri: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_health() {
        let (router, store) = setup(true);
        seed(&store);
        let (status, body) = send(router, Method::GET, "/api/health").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["historySize"], 3);
        assert_eq!(body["capacity"], 100);
        assert_eq!(body["latestSnapshot"]["gasPrice"], 30.0);
    }

    #[tokio::test]
    async fn test_gas_price_trend_is_keyed_by_metric() {
        let (router, store) = setup(true);
        seed(&store);
        let (status, body) = send(router, Method::GET, "/api/trends/gas-price?hours=1").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        let trend = body["trend"].as_array().unwrap();
        assert_eq!(trend.len(), 3);
        assert_eq!(trend[0]["gasPrice"], 10.0);
        assert_eq!(trend[2]["gasPrice"], 30.0);
        assert!(trend[0]["time"].is_string());
        assert!(trend[0]["timestamp"].is_string());
    }

    #[tokio::test]
    async fn test_transaction_trend_uses_integers() {
        let (router, store) = setup(true);
        seed(&store);
        let (_, body) = send(router, Method::GET, "/api/trends/transactions").await;

        let trend = body["trend"].as_array().unwrap();
        assert_eq!(trend[1]["transactions"], 10);
        assert!(trend[1]["transactions"].is_u64());
    }

    #[tokio::test]
    async fn test_all_trends_are_aligned() {
        let (router, store) = setup(true);
        seed(&store);
        let (status, body) = send(router, Method::GET, "/api/trends?hours=24").await;

        assert_eq!(status, StatusCode::OK);
        let trends = &body["trends"];
        for key in ["gasPrice", "blockTime", "transactions"] {
            assert_eq!(trends[key].as_array().unwrap().len(), 3, "{}", key);
        }
        assert_eq!(trends["blockTime"][0]["value"], 2.0);
    }

    #[tokio::test]
    async fn test_hours_out_of_range_is_rejected() {
        for uri in [
            "/api/stats?hours=0",
            "/api/stats?hours=169",
            "/api/trends?hours=abc",
            "/api/trends/block-time?hours=-1",
        ] {
            let (router, _) = setup(true);
            let (status, body) = send(router, Method::GET, uri).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
            assert_eq!(body["success"], false);
            assert!(body["error"].is_string());
        }
    }

    #[tokio::test]
    async fn test_stats_empty_is_null() {
        let (router, _) = setup(true);
        let (status, body) = send(router, Method::GET, "/api/stats").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert!(body["stats"].is_null());
    }

    #[tokio::test]
    async fn test_stats_with_data() {
        let (router, store) = setup(true);
        seed(&store);
        let (_, body) = send(router, Method::GET, "/api/stats?hours=1").await;

        let stats = &body["stats"];
        assert_eq!(stats["gasPrice"]["average"], 20.0);
        assert_eq!(stats["gasPrice"]["max"], 30.0);
        assert_eq!(stats["gasPrice"]["min"], 10.0);
        assert_eq!(stats["transactions"]["total"], 30);
    }

    #[tokio::test]
    async fn test_record_snapshot() {
        let (router, store) = setup(true);
        let (status, body) = send(router, Method::POST, "/api/snapshots").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["snapshot"]["blockNumber"], 1001);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_record_snapshot_failure() {
        let (router, store) = setup(false);
        let (status, body) = send(router, Method::POST, "/api/snapshots").await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["success"], false);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_clear_history() {
        let (router, store) = setup(true);
        seed(&store);
        let (status, body) = send(router, Method::DELETE, "/api/snapshots").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_network_offline() {
        let (router, store) = setup(false);
        let (status, body) = send(router, Method::GET, "/api/network").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["status"], "offline");
        assert_eq!(body["connected"], false);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_network_online() {
        let (router, _) = setup(true);
        let (_, body) = send(router, Method::GET, "/api/network").await;

        assert_eq!(body["data"]["status"], "healthy");
        assert_eq!(body["data"]["gasPrice"], 20.0);
        assert_eq!(body["connected"], true);
    }
}
