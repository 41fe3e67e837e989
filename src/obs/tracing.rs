// self
use crate::{_prelude::*, obs::ExchangeKind};

/// Future returned by [`ExchangeSpan::instrument`].
#[cfg(feature = "tracing")]
pub type InstrumentedExchange<F> = tracing::instrument::Instrumented<F>;
/// Future returned by [`ExchangeSpan::instrument`].
#[cfg(not(feature = "tracing"))]
pub type InstrumentedExchange<F> = F;

/// Span covering one coordinated call or one refresh exchange.
#[derive(Clone, Debug)]
pub struct ExchangeSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl ExchangeSpan {
	/// Opens a span for `method` against `path`; `status` stays empty until recorded.
	pub fn new(kind: ExchangeKind, method: &Method, path: &str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!(
				"refresh_coordinator.exchange",
				exchange = kind.as_str(),
				method = method.as_str(),
				path,
				status = tracing::field::Empty
			);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (kind, method, path);

			Self {}
		}
	}

	/// Records the latest HTTP status; a replay overwrites the first attempt's value.
	pub fn record_status(&self, status: u16) {
		#[cfg(feature = "tracing")]
		self.span.record("status", status);
		#[cfg(not(feature = "tracing"))]
		let _ = status;
	}

	/// Runs `fut` inside the span without holding an entered guard across `.await`.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedExchange<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[tokio::test]
	async fn status_can_be_recorded_while_instrumented() {
		let span = ExchangeSpan::new(ExchangeKind::Refresh, &Method::POST, "/api/auth/refresh");
		let status = span
			.instrument(async {
				span.record_status(401);

				204
			})
			.await;

		span.record_status(status);

		assert_eq!(status, 204);
	}
}
