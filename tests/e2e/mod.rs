//! End-to-end test utilities and shared fixtures

use std::sync::Arc;

use dexquote_aggregator::mocks::{mock_provider, MockQuoteAdapter};
use dexquote_aggregator::{
	AggregationStrategy, AggregatorBuilder, ProviderAdapter, ProviderConfig, Settings,
};
use tokio::task::JoinHandle;

pub mod health_tests;
pub mod quotes_tests;
pub mod timing_tests;

/// A provider wired to a scriptable adapter
pub struct MockWiring {
	pub adapter: Arc<MockQuoteAdapter>,
	pub provider: ProviderConfig,
}

impl MockWiring {
	pub fn new(adapter: MockQuoteAdapter, priority: u32) -> Self {
		let adapter = Arc::new(adapter);
		let provider = mock_provider(
			&format!("{}-provider", adapter.id()),
			adapter.id(),
			priority,
		);
		Self { adapter, provider }
	}
}

/// Test server bound to an ephemeral port
pub struct TestServer {
	pub base_url: String,
	pub handle: JoinHandle<()>,
}

impl TestServer {
	/// Spawn a server wired to the given mocks and strategy
	pub async fn spawn(
		wirings: &[MockWiring],
		strategy: AggregationStrategy,
	) -> Result<Self, Box<dyn std::error::Error>> {
		let mut settings = Settings::default();
		settings.strategy = strategy;

		let mut builder = AggregatorBuilder::default().with_settings(settings);
		for wiring in wirings {
			builder = builder
				.with_adapter(Arc::clone(&wiring.adapter) as Arc<dyn ProviderAdapter>)
				.with_provider(wiring.provider.clone());
		}

		let (app, _state) = builder.start().await?;

		let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
			.await
			.expect("bind test port");
		let addr = listener.local_addr()?;
		let base_url = format!("http://{}:{}", addr.ip(), addr.port());

		let handle = tokio::spawn(async move {
			let _ = axum::serve(listener, app).await;
		});

		// give the server a moment to accept connections
		tokio::time::sleep(tokio::time::Duration::from_millis(10)).await;

		Ok(Self { base_url, handle })
	}
}

impl Drop for TestServer {
	fn drop(&mut self) {
		self.handle.abort();
	}
}

/// A strategy with short windows so tests run quickly
pub fn quick_strategy() -> AggregationStrategy {
	AggregationStrategy {
		min_wait_ms: 100,
		max_wait_ms: 1_000,
		fast_response_ms: 300,
		emergency_timeout_ms: 2_000,
		min_providers: 1,
		preferred_providers: 1,
		optimal_providers: 2,
		..AggregationStrategy::default()
	}
}

/// Standard request body for an ETH-ish swap on chain 1
pub fn quote_body() -> serde_json::Value {
	serde_json::json!({
		"request_id": uuid_like(),
		"chain_id": 1,
		"from_token": "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48",
		"to_token": "0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2",
		"amount_in": "1000000000000000000",
		"slippage": "0.005"
	})
}

fn uuid_like() -> String {
	format!("req-{}", std::time::UNIX_EPOCH.elapsed().unwrap_or_default().as_nanos())
}

/// POST a quote request and return status and parsed body
pub async fn post_quote(
	base_url: &str,
	body: &serde_json::Value,
) -> (reqwest::StatusCode, serde_json::Value) {
	let client = reqwest::Client::new();
	let response = client
		.post(format!("{base_url}/quote"))
		.json(body)
		.send()
		.await
		.expect("request failed");

	let status = response.status();
	let body = response.json().await.expect("invalid json body");
	(status, body)
}
