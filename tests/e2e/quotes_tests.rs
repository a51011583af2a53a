//! End-to-end coverage for POST /quote

use std::sync::atomic::Ordering;

use dexquote_aggregator::mocks::MockQuoteAdapter;

use super::{post_quote, quick_strategy, quote_body, MockWiring, TestServer};

#[tokio::test]
async fn test_best_quote_wins_composite_scoring() {
	// fast, high-confidence, slightly worse price vs slow, low-confidence,
	// best price: the fast provider must win
	let fast = MockWiring::new(
		MockQuoteAdapter::new(
			"scored-fast",
			dexquote_aggregator::mocks::MockBehavior::Respond {
				delay_ms: 50,
				amount_out: "995".to_string(),
			},
		)
		.with_confidence(0.95),
		1,
	);
	let slow = MockWiring::new(
		MockQuoteAdapter::new(
			"scored-slow",
			dexquote_aggregator::mocks::MockBehavior::Respond {
				delay_ms: 400,
				amount_out: "1000".to_string(),
			},
		)
		.with_confidence(0.80),
		2,
	);

	let mut strategy = quick_strategy();
	strategy.preferred_providers = 2;
	let server = TestServer::spawn(&[fast, slow], strategy).await.unwrap();

	let (status, body) = post_quote(&server.base_url, &quote_body()).await;
	assert_eq!(status, reqwest::StatusCode::OK);
	assert_eq!(body["success"], true);
	assert_eq!(body["data"]["best_aggregator"], "scored-fast-provider");
	assert_eq!(body["data"]["amount_out"], "995");
	assert_eq!(body["data"]["cache_hit"], false);
}

#[tokio::test]
async fn test_cache_round_trip_identical_amount() {
	let wiring = MockWiring::new(MockQuoteAdapter::fast("cached"), 1);
	let calls = wiring.adapter.call_counter();
	let server = TestServer::spawn(&[wiring], quick_strategy()).await.unwrap();

	let body = quote_body();
	let (_, first) = post_quote(&server.base_url, &body).await;
	assert_eq!(first["data"]["cache_hit"], false);

	// same logical swap again, inside the TTL
	let (_, second) = post_quote(&server.base_url, &body).await;
	assert_eq!(second["data"]["cache_hit"], true);
	assert_eq!(second["data"]["amount_out"], first["data"]["amount_out"]);
	assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_validation_error_envelope() {
	let wiring = MockWiring::new(MockQuoteAdapter::fast("strict"), 1);
	let server = TestServer::spawn(&[wiring], quick_strategy()).await.unwrap();

	let mut body = quote_body();
	body["slippage"] = serde_json::json!("0.9");
	let (status, response) = post_quote(&server.base_url, &body).await;

	assert_eq!(status, reqwest::StatusCode::BAD_REQUEST);
	assert_eq!(response["success"], false);
	assert_eq!(response["error"]["code"], "INVALID_REQUEST");
}

#[tokio::test]
async fn test_unsupported_chain_rejected() {
	let wiring = MockWiring::new(MockQuoteAdapter::fast("mainnet-only"), 1);
	let server = TestServer::spawn(&[wiring], quick_strategy()).await.unwrap();

	let mut body = quote_body();
	body["chain_id"] = serde_json::json!(42_161);
	let (status, response) = post_quote(&server.base_url, &body).await;

	assert_eq!(status, reqwest::StatusCode::BAD_REQUEST);
	assert_eq!(response["error"]["code"], "INVALID_REQUEST");
}

#[tokio::test]
async fn test_all_providers_failing_returns_insufficient() {
	let broken_a = MockWiring::new(MockQuoteAdapter::failing("broken-a"), 1);
	let broken_b = MockWiring::new(MockQuoteAdapter::failing("broken-b"), 2);
	let server = TestServer::spawn(&[broken_a, broken_b], quick_strategy())
		.await
		.unwrap();

	let body = quote_body();
	let (status, response) = post_quote(&server.base_url, &body).await;
	assert_eq!(status, reqwest::StatusCode::SERVICE_UNAVAILABLE);
	assert_eq!(response["error"]["code"], "INSUFFICIENT_PROVIDERS");

	// the failure must not have been cached; a healthy retry path would
	// still see a miss, so the same request fails the same way
	let (status, _) = post_quote(&server.base_url, &body).await;
	assert_eq!(status, reqwest::StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_concurrent_duplicates_share_one_fanout() {
	let wiring = MockWiring::new(
		MockQuoteAdapter::new(
			"slow-shared",
			dexquote_aggregator::mocks::MockBehavior::Respond {
				delay_ms: 300,
				amount_out: "995".to_string(),
			},
		),
		1,
	);
	let calls = wiring.adapter.call_counter();
	let server = TestServer::spawn(&[wiring], quick_strategy()).await.unwrap();

	// identical logical swaps, distinct request ids, fired together
	let base_url = server.base_url.clone();
	let mut handles = Vec::new();
	for _ in 0..4 {
		let base_url = base_url.clone();
		handles.push(tokio::spawn(async move {
			post_quote(&base_url, &quote_body()).await
		}));
	}

	for handle in handles {
		let (status, body) = handle.await.unwrap();
		assert_eq!(status, reqwest::StatusCode::OK);
		assert_eq!(body["data"]["amount_out"], "995");
	}
	assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_partial_failure_still_served() {
	let healthy = MockWiring::new(MockQuoteAdapter::fast("healthy"), 1);
	let broken = MockWiring::new(MockQuoteAdapter::failing("flaky"), 2);
	let server = TestServer::spawn(&[healthy, broken], quick_strategy())
		.await
		.unwrap();

	let (status, body) = post_quote(&server.base_url, &quote_body()).await;
	assert_eq!(status, reqwest::StatusCode::OK);
	assert_eq!(body["data"]["best_aggregator"], "healthy-provider");
}
