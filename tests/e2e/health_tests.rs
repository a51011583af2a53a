//! Health surface coverage

use dexquote_aggregator::mocks::MockQuoteAdapter;

use super::{post_quote, quick_strategy, quote_body, MockWiring, TestServer};

#[tokio::test]
async fn test_health_lists_providers_and_cache() {
	let wiring = MockWiring::new(MockQuoteAdapter::fast("health-fast"), 1);
	let server = TestServer::spawn(&[wiring], quick_strategy()).await.unwrap();

	let response = reqwest::get(format!("{}/health", server.base_url))
		.await
		.unwrap();
	assert_eq!(response.status(), reqwest::StatusCode::OK);

	let body: serde_json::Value = response.json().await.unwrap();
	assert_eq!(body["status"], "ok");
	assert_eq!(body["providers"][0]["name"], "health-fast-provider");
	assert_eq!(body["providers"][0]["enabled"], true);
	assert_eq!(body["providers"][0]["degraded"], false);
	assert_eq!(body["cache"]["entries"], 0);
}

#[tokio::test]
async fn test_health_reflects_traffic() {
	let wiring = MockWiring::new(MockQuoteAdapter::fast("traffic"), 1);
	let server = TestServer::spawn(&[wiring], quick_strategy()).await.unwrap();

	let body = quote_body();
	let (status, _) = post_quote(&server.base_url, &body).await;
	assert_eq!(status, reqwest::StatusCode::OK);
	// cache hit
	let (_, second) = post_quote(&server.base_url, &body).await;
	assert_eq!(second["data"]["cache_hit"], true);

	// metrics recording is async and best-effort; let it land
	tokio::time::sleep(std::time::Duration::from_millis(50)).await;

	let health: serde_json::Value = reqwest::get(format!("{}/health", server.base_url))
		.await
		.unwrap()
		.json()
		.await
		.unwrap();

	assert_eq!(health["cache"]["entries"], 1);
	assert_eq!(health["cache"]["hits"], 1);
	assert!(health["providers"][0]["total_requests"].as_u64().unwrap() >= 1);
	assert!(health["providers"][0]["success_rate"].as_f64().unwrap() > 0.99);
}
