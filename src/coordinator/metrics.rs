// std
use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe counters for coordinator activity.
#[derive(Debug, Default)]
pub struct CoordinatorMetrics {
	requests: AtomicU64,
	retries: AtomicU64,
	refresh_attempts: AtomicU64,
	refresh_success: AtomicU64,
	refresh_failure: AtomicU64,
	queued_waiters: AtomicU64,
	reauth_signals: AtomicU64,
}
impl CoordinatorMetrics {
	/// Returns the number of requests handed to `send`.
	pub fn requests(&self) -> u64 {
		self.requests.load(Ordering::Relaxed)
	}

	/// Returns the number of replays issued after a refresh.
	pub fn retries(&self) -> u64 {
		self.retries.load(Ordering::Relaxed)
	}

	/// Returns the number of refresh exchanges issued.
	pub fn refresh_attempts(&self) -> u64 {
		self.refresh_attempts.load(Ordering::Relaxed)
	}

	/// Returns the number of successful refresh exchanges.
	pub fn refresh_successes(&self) -> u64 {
		self.refresh_success.load(Ordering::Relaxed)
	}

	/// Returns the number of failed refresh exchanges.
	pub fn refresh_failures(&self) -> u64 {
		self.refresh_failure.load(Ordering::Relaxed)
	}

	/// Returns the number of requests that waited on another request's refresh.
	pub fn queued_waiters(&self) -> u64 {
		self.queued_waiters.load(Ordering::Relaxed)
	}

	/// Returns the number of re-authentication signals raised.
	pub fn reauth_signals(&self) -> u64 {
		self.reauth_signals.load(Ordering::Relaxed)
	}

	pub(crate) fn record_request(&self) {
		self.requests.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_retry(&self) {
		self.retries.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_refresh_attempt(&self) {
		self.refresh_attempts.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_refresh_success(&self) {
		self.refresh_success.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_refresh_failure(&self) {
		self.refresh_failure.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_queued_waiter(&self) {
		self.queued_waiters.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_reauth_signal(&self) {
		self.reauth_signals.fetch_add(1, Ordering::Relaxed);
	}
}
