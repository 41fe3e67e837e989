// self
use crate::obs::{ExchangeKind, ExchangeOutcome};

/// Counts one exchange outcome on the global recorder.
pub fn record_exchange_outcome(kind: ExchangeKind, outcome: ExchangeOutcome) {
	#[cfg(feature = "metrics")]
	metrics::counter!(
		"refresh_coordinator_exchange_total",
		"exchange" => kind.as_str(),
		"outcome" => outcome.as_str()
	)
	.increment(1);

	#[cfg(not(feature = "metrics"))]
	let _ = (kind, outcome);
}

/// Counts a settled refresh episode and the queued requests it released.
pub fn record_episode_settled(released: usize, succeeded: bool) {
	#[cfg(feature = "metrics")]
	{
		let outcome =
			if succeeded { ExchangeOutcome::Success } else { ExchangeOutcome::Failure };

		metrics::counter!("refresh_coordinator_episode_total", "outcome" => outcome.as_str())
			.increment(1);
		metrics::counter!("refresh_coordinator_waiters_released_total")
			.increment(u64::try_from(released).unwrap_or(u64::MAX));
	}

	#[cfg(not(feature = "metrics"))]
	let _ = (released, succeeded);
}
