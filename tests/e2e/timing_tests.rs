//! Progressive-window timing behavior through the full stack

use std::time::{Duration, Instant};

use dexquote_aggregator::mocks::MockQuoteAdapter;
use dexquote_aggregator::AggregationStrategy;

use super::{post_quote, quote_body, MockWiring, TestServer};

#[tokio::test]
async fn test_min_wait_floor_holds_under_fast_provider() {
	// one provider answering at 50ms must not produce a response
	// before the 300ms floor
	let wiring = MockWiring::new(MockQuoteAdapter::fast("floor-fast"), 1);
	let strategy = AggregationStrategy {
		min_wait_ms: 300,
		max_wait_ms: 1_000,
		emergency_timeout_ms: 2_000,
		min_providers: 1,
		preferred_providers: 1,
		optimal_providers: 1,
		..AggregationStrategy::default()
	};
	let server = TestServer::spawn(&[wiring], strategy).await.unwrap();

	let started = Instant::now();
	let (status, body) = post_quote(&server.base_url, &quote_body()).await;
	let elapsed = started.elapsed();

	assert_eq!(status, reqwest::StatusCode::OK);
	assert!(elapsed >= Duration::from_millis(300), "answered at {elapsed:?}");
	assert!(body["data"]["total_duration_ms"].as_u64().unwrap() >= 300);
}

#[tokio::test]
async fn test_emergency_ceiling_with_hung_providers() {
	// both providers hang; the engine must give up at the emergency
	// ceiling, never later
	let hung_a = MockWiring::new(MockQuoteAdapter::hung("hung-a"), 1);
	let hung_b = MockWiring::new(MockQuoteAdapter::hung("hung-b"), 2);
	let strategy = AggregationStrategy {
		min_wait_ms: 100,
		max_wait_ms: 500,
		emergency_timeout_ms: 1_500,
		min_providers: 1,
		..AggregationStrategy::default()
	};
	let server = TestServer::spawn(&[hung_a, hung_b], strategy).await.unwrap();

	let started = Instant::now();
	let (status, body) = post_quote(&server.base_url, &quote_body()).await;
	let elapsed = started.elapsed();

	assert_eq!(status, reqwest::StatusCode::SERVICE_UNAVAILABLE);
	assert_eq!(body["error"]["code"], "INSUFFICIENT_PROVIDERS");
	assert!(elapsed < Duration::from_millis(2_500), "answered at {elapsed:?}");
}

#[tokio::test]
async fn test_early_exit_does_not_wait_for_stragglers() {
	// fast provider satisfies the quorum right after the floor; the
	// slow one is abandoned
	let fast = MockWiring::new(MockQuoteAdapter::fast("quorum-fast"), 1);
	let slow = MockWiring::new(MockQuoteAdapter::slow("quorum-slow"), 2);
	let strategy = AggregationStrategy {
		min_wait_ms: 100,
		max_wait_ms: 3_000,
		fast_response_ms: 300,
		emergency_timeout_ms: 5_000,
		min_providers: 1,
		preferred_providers: 1,
		optimal_providers: 2,
		..AggregationStrategy::default()
	};
	let server = TestServer::spawn(&[fast, slow], strategy).await.unwrap();

	let started = Instant::now();
	let (status, body) = post_quote(&server.base_url, &quote_body()).await;
	let elapsed = started.elapsed();

	assert_eq!(status, reqwest::StatusCode::OK);
	assert_eq!(body["data"]["best_aggregator"], "quorum-fast-provider");
	assert!(elapsed < Duration::from_millis(1_000), "answered at {elapsed:?}");
}

#[tokio::test]
async fn test_provider_timeout_isolated_from_result() {
	// per-provider timeout (2s on mock providers) trips for the hung
	// provider; the healthy one still answers well before that
	let healthy = MockWiring::new(MockQuoteAdapter::fast("iso-ok"), 1);
	let hung = MockWiring::new(MockQuoteAdapter::hung("iso-hung"), 2);
	let strategy = AggregationStrategy {
		min_wait_ms: 100,
		max_wait_ms: 800,
		emergency_timeout_ms: 3_000,
		min_providers: 1,
		preferred_providers: 2,
		optimal_providers: 2,
		..AggregationStrategy::default()
	};
	let server = TestServer::spawn(&[healthy, hung], strategy).await.unwrap();

	let (status, body) = post_quote(&server.base_url, &quote_body()).await;
	assert_eq!(status, reqwest::StatusCode::OK);
	assert_eq!(body["data"]["best_aggregator"], "iso-ok-provider");
}
