mod common;

use axum::{extract::State, http::StatusCode, routing::get, Router};
use claims_agent::claims::{CachedClaimSource, ClaimSource, HttpClaimSource};
use claims_agent::AgentError;
use common::spawn_server;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

const DOCUMENT: &str = r#"{
    "3": {
        "root": "0x01",
        "data": [
            {
                "index": 1,
                "claimType": 4,
                "claimant": "0x1111111111111111111111111111111111111111",
                "claimableAmount": "7777",
                "proof": ["0x0101010101010101010101010101010101010101010101010101010101010101"]
            }
        ]
    },
    "0": {
        "root": "0x02",
        "data": [
            {
                "index": 9,
                "claimType": 0,
                "claimant": "0x1111111111111111111111111111111111111111",
                "claimableAmount": "10000",
                "proof": []
            }
        ]
    }
}"#;

async fn serve_document(State(hits): State<Arc<AtomicUsize>>) -> &'static str {
    hits.fetch_add(1, Ordering::SeqCst);
    DOCUMENT
}

async fn document_server() -> (String, Arc<AtomicUsize>) {
    let hits = Arc::new(AtomicUsize::new(0));
    let router = Router::new()
        .route("/merkle.json", get(serve_document))
        .route("/broken.json", get(|| async { "{\"1\": {\"root\": \"0x\"}}" }))
        .route("/down.json", get(|| async { StatusCode::SERVICE_UNAVAILABLE }))
        .with_state(hits.clone());
    (spawn_server(router).await, hits)
}

#[tokio::test]
async fn fetches_and_flattens_remote_document() {
    let (base, hits) = document_server().await;
    let source = HttpClaimSource::new(format!("{}/merkle.json", base), Duration::from_secs(5)).unwrap();

    let claims = source.fetch_claims().await.unwrap();
    assert_eq!(hits.load(Ordering::SeqCst), 1);
    assert_eq!(claims.len(), 2);
    // integer tranche keys come back in numeric order
    assert_eq!(claims[0].tranche_id, "0");
    assert_eq!(claims[0].index, 9);
    assert_eq!(claims[1].tranche_id, "3");
    assert_eq!(claims[1].claimable_amount.to_string(), "7777");
    assert_eq!(claims[1].proof.len(), 1);
}

#[tokio::test]
async fn non_success_status_is_source_unavailable() {
    let (base, _) = document_server().await;
    let source = HttpClaimSource::new(format!("{}/down.json", base), Duration::from_secs(5)).unwrap();
    let err = source.fetch_claims().await.unwrap_err();
    assert!(matches!(err, AgentError::SourceUnavailable(_)));

    let missing = HttpClaimSource::new(format!("{}/nope.json", base), Duration::from_secs(5)).unwrap();
    assert!(matches!(
        missing.fetch_claims().await.unwrap_err(),
        AgentError::SourceUnavailable(_)
    ));
}

#[tokio::test]
async fn malformed_document_is_source_unavailable() {
    let (base, _) = document_server().await;
    let source = HttpClaimSource::new(format!("{}/broken.json", base), Duration::from_secs(5)).unwrap();
    assert!(matches!(
        source.fetch_claims().await.unwrap_err(),
        AgentError::SourceUnavailable(_)
    ));
}

#[tokio::test]
async fn unreachable_host_is_source_unavailable() {
    // bind then drop to get a port nobody listens on
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let source = HttpClaimSource::new(format!("http://{}/merkle.json", addr), Duration::from_secs(2)).unwrap();
    assert!(matches!(
        source.fetch_claims().await.unwrap_err(),
        AgentError::SourceUnavailable(_)
    ));
}

#[tokio::test]
async fn cache_serves_repeat_requests_from_one_download() {
    let (base, hits) = document_server().await;
    let source = HttpClaimSource::new(format!("{}/merkle.json", base), Duration::from_secs(5)).unwrap();
    let cached = Arc::new(CachedClaimSource::new(source, Duration::from_secs(60)));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let cached = cached.clone();
            tokio::spawn(async move { cached.fetch_claims().await.unwrap().len() })
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.await.unwrap(), 2);
    }
    assert_eq!(hits.load(Ordering::SeqCst), 1);

    cached.invalidate().await;
    cached.fetch_claims().await.unwrap();
    assert_eq!(hits.load(Ordering::SeqCst), 2);
}
