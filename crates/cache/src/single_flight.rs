//! Single-flight guard for concurrent identical requests
//!
//! Identical requests that miss the cache at the same moment should not
//! each fan out upstream. The first caller per fingerprint becomes the
//! leader and runs the aggregation; the rest await the leader's cell and
//! clone its result. If the leader fails, a waiter takes over with its
//! own closure, so a transient failure does not poison the key.

use dashmap::DashMap;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::OnceCell;

use dexquote_types::{AggregatedQuote, AggregationResult};

/// Collapses concurrent work per key into one execution
#[derive(Default)]
pub struct SingleFlight {
	in_flight: DashMap<String, Arc<OnceCell<AggregatedQuote>>>,
}

impl SingleFlight {
	pub fn new() -> Self {
		Self {
			in_flight: DashMap::new(),
		}
	}

	/// Number of keys currently in flight
	pub fn len(&self) -> usize {
		self.in_flight.len()
	}

	pub fn is_empty(&self) -> bool {
		self.in_flight.is_empty()
	}

	/// Run `work` for `key`, sharing the result with every concurrent
	/// caller of the same key.
	pub async fn run<F, Fut>(&self, key: &str, work: F) -> AggregationResult<AggregatedQuote>
	where
		F: FnOnce() -> Fut,
		Fut: Future<Output = AggregationResult<AggregatedQuote>>,
	{
		let cell = self
			.in_flight
			.entry(key.to_string())
			.or_insert_with(|| Arc::new(OnceCell::new()))
			.clone();

		let result: AggregationResult<AggregatedQuote> =
			cell.get_or_try_init(work).await.cloned();

		// Drop the key once the flight is settled; later callers are
		// served by the response cache, not by this cell.
		self.in_flight
			.remove_if(key, |_, existing| Arc::ptr_eq(existing, &cell));

		result
	}
}
