//! What the coordinator reports about itself.
//!
//! With the `tracing` feature (on by default) every [`send`](crate::coordinator::Coordinator::send)
//! runs inside a `refresh_coordinator.exchange` span carrying `exchange`, `method`, `path`, and
//! the last observed `status`; the refresh exchange opens a span of the same name. Events:
//!
//! - `DEBUG` when a request observes an expired session, when it queues behind an in-flight
//!   refresh, and when an episode settles (`released` waiters, `succeeded`).
//! - `WARN` when a refresh fails and when re-authentication is requested.
//!
//! With the `metrics` feature:
//!
//! - `refresh_coordinator_exchange_total{exchange, outcome}` for requests, refreshes, and
//!   replays.
//! - `refresh_coordinator_episode_total{outcome}` once per settled refresh episode.
//! - `refresh_coordinator_waiters_released_total`, increased by the number of queued requests
//!   each episode releases.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

/// Emits a tracing event at `$level` (`DEBUG`, `WARN`, ...); expands to nothing when the
/// `tracing` feature is off.
macro_rules! event {
	($level:ident, $($arg:tt)*) => {{
		#[cfg(feature = "tracing")]
		::tracing::event!(::tracing::Level::$level, $($arg)*);
	}};
}
pub(crate) use event;

// self
use crate::_prelude::*;

/// Which leg of a coordinated call an exchange belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ExchangeKind {
	/// First attempt of a caller's request.
	Request,
	/// Credential refresh exchange.
	Refresh,
	/// Single replay after a refresh.
	Retry,
}
impl ExchangeKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			ExchangeKind::Request => "request",
			ExchangeKind::Refresh => "refresh",
			ExchangeKind::Retry => "retry",
		}
	}
}
impl Display for ExchangeKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded per exchange.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ExchangeOutcome {
	/// Exchange issued.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl ExchangeOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			ExchangeOutcome::Attempt => "attempt",
			ExchangeOutcome::Success => "success",
			ExchangeOutcome::Failure => "failure",
		}
	}
}
impl Display for ExchangeOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
