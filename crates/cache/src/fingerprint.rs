//! Deterministic request fingerprinting
//!
//! Two requests share a fingerprint when they would receive an
//! equivalent answer: same chain, same normalized token pair, same
//! slippage (at basis-point resolution) and an input amount in the same
//! bucket. Bucketing keeps the leading `digits` significant digits of
//! the decimal amount and zeroes the rest, so near-identical sizes reuse
//! one cached fan-out.

use dexquote_types::SwapQuoteRequest;

/// Bucket a decimal amount string to `digits` significant digits.
///
/// `digits == 0` disables bucketing and returns the amount unchanged.
/// Leading zeros are stripped first so "0100" and "100" land together.
pub fn bucket_amount(amount: &str, digits: usize) -> String {
	let trimmed = amount.trim_start_matches('0');
	if trimmed.is_empty() {
		return "0".to_string();
	}
	if digits == 0 || trimmed.len() <= digits {
		return trimmed.to_string();
	}

	let mut bucketed = String::with_capacity(trimmed.len());
	bucketed.push_str(&trimmed[..digits]);
	bucketed.extend(std::iter::repeat('0').take(trimmed.len() - digits));
	bucketed
}

/// Build the cache key for a request
pub fn fingerprint(prefix: &str, request: &SwapQuoteRequest, amount_bucket_digits: usize) -> String {
	let slippage_bps = (request.slippage * 10_000.0).round() as u64;
	format!(
		"{}:{}:{}:{}:{}:{}",
		prefix,
		request.chain_id,
		request.from_token.to_lowercase(),
		request.to_token.to_lowercase(),
		bucket_amount(request.amount_in.as_str(), amount_bucket_digits),
		slippage_bps
	)
}
