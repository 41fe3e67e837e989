//! Request dispatch with expiry detection, single-flight refresh, and a single replay.

// self
use crate::{
	_prelude::*,
	coordinator::{Coordinator, RefreshTicket},
	error::{ApiError, TerminalAuthError},
	http::{self, HttpResponse, HttpTransport},
	obs::{self, ExchangeKind, ExchangeOutcome, ExchangeSpan},
	policy::ResponseClass,
	reauth::ReauthSignal,
	request::PendingRequest,
};

impl<T> Coordinator<T>
where
	T: ?Sized + HttpTransport,
{
	/// Sends `request`, absorbing one session expiry by refreshing and replaying once.
	///
	/// - A success per the response policy is returned as-is.
	/// - Non-expiry failures and transport errors are returned verbatim, never retried.
	/// - An expiry triggers (or joins) a refresh episode; on success the request is replayed
	///   once and whatever that replay yields is final. On refresh failure the request fails
	///   with [`Error::AuthTerminal`].
	/// - An expiry reported by the refresh target itself fails immediately with
	///   [`TerminalAuthError::RefreshTargetExpired`].
	pub async fn send(&self, request: PendingRequest) -> Result<HttpResponse> {
		let span = ExchangeSpan::new(ExchangeKind::Request, &request.method, &request.target);

		span.instrument(self.send_with_refresh(request, &span)).await
	}

	async fn send_with_refresh(
		&self,
		mut request: PendingRequest,
		span: &ExchangeSpan,
	) -> Result<HttpResponse> {
		self.metrics.record_request();

		let url = self.config.resolve(&request.target)?;
		let response = self.dispatch(ExchangeKind::Request, &url, &request).await?;
		let status = response.status().as_u16();

		span.record_status(status);

		match self.policy.classify(status) {
			ResponseClass::Success => {
				obs::record_exchange_outcome(ExchangeKind::Request, ExchangeOutcome::Success);

				return Ok(response);
			},
			ResponseClass::AuthExpired if !request.is_retried() => {},
			ResponseClass::AuthExpired | ResponseClass::Failure =>
				return Err(self.reject(ExchangeKind::Request, response)),
		}

		request.mark_retried();

		if self.config.is_refresh_target(&request.target) {
			obs::record_exchange_outcome(ExchangeKind::Request, ExchangeOutcome::Failure);

			return Err(self.terminate(TerminalAuthError::RefreshTargetExpired { status }));
		}

		obs::event!(DEBUG, status, "session expired; waiting for credential refresh");

		self.await_refresh().await?;

		let response = self.dispatch(ExchangeKind::Retry, &url, &request).await?;
		let status = response.status().as_u16();

		self.metrics.record_retry();
		span.record_status(status);

		match self.policy.classify(status) {
			ResponseClass::Success => {
				obs::record_exchange_outcome(ExchangeKind::Retry, ExchangeOutcome::Success);

				Ok(response)
			},
			ResponseClass::AuthExpired | ResponseClass::Failure =>
				Err(self.reject(ExchangeKind::Retry, response)),
		}
	}

	async fn await_refresh(&self) -> Result<()> {
		match self.refresh_state.join() {
			RefreshTicket::Initiator(guard) => {
				let outcome = self.refresh().await;
				let released = guard.settle(&outcome);

				obs::record_episode_settled(released, outcome.is_ok());
				obs::event!(DEBUG, released, succeeded = outcome.is_ok(), "refresh episode settled");

				outcome.map_err(|reason| self.terminate(reason))
			},
			RefreshTicket::Waiter(waiter) => {
				self.metrics.record_queued_waiter();

				obs::event!(DEBUG, "refresh already in flight; request queued");

				waiter.wait().await.map_err(Error::from)
			},
		}
	}

	async fn refresh(&self) -> Result<(), TerminalAuthError> {
		const KIND: ExchangeKind = ExchangeKind::Refresh;

		let span = ExchangeSpan::new(KIND, &Method::POST, &self.config.refresh_path);

		span.instrument(async {
			self.metrics.record_refresh_attempt();
			obs::record_exchange_outcome(KIND, ExchangeOutcome::Attempt);

			let result = self.exchange_refresh(&span).await;

			match &result {
				Ok(()) => {
					self.metrics.record_refresh_success();
					obs::record_exchange_outcome(KIND, ExchangeOutcome::Success);
				},
				Err(reason) => {
					self.metrics.record_refresh_failure();
					obs::record_exchange_outcome(KIND, ExchangeOutcome::Failure);

					obs::event!(WARN, %reason, "credential refresh failed");

					#[cfg(not(feature = "tracing"))]
					let _ = reason;
				},
			}

			result
		})
		.await
	}

	// Goes straight to the transport; routing it through `send` could recurse into itself.
	async fn exchange_refresh(&self, span: &ExchangeSpan) -> Result<(), TerminalAuthError> {
		let unreachable = |message: String| TerminalAuthError::RefreshUnreachable { message };
		let url = self.config.refresh_url().map_err(|e| unreachable(e.to_string()))?;
		let request = PendingRequest::post(self.config.refresh_path.clone());
		let response =
			self.transport.execute(&url, &request).await.map_err(|e| unreachable(e.to_string()))?;
		let status = response.status().as_u16();

		span.record_status(status);

		match self.policy.classify(status) {
			ResponseClass::Success => Ok(()),
			ResponseClass::AuthExpired | ResponseClass::Failure =>
				Err(TerminalAuthError::RefreshRejected { status }),
		}
	}

	async fn dispatch(
		&self,
		kind: ExchangeKind,
		url: &Url,
		request: &PendingRequest,
	) -> Result<HttpResponse> {
		obs::record_exchange_outcome(kind, ExchangeOutcome::Attempt);

		self.transport.execute(url, request).await.map_err(|e| {
			obs::record_exchange_outcome(kind, ExchangeOutcome::Failure);

			Error::from(e)
		})
	}

	fn reject(&self, kind: ExchangeKind, response: HttpResponse) -> Error {
		obs::record_exchange_outcome(kind, ExchangeOutcome::Failure);

		let retry_after = http::parse_retry_after(response.headers());
		let (parts, body) = response.into_parts();

		ApiError::from_parts(parts.status.as_u16(), body, retry_after).into()
	}

	// Raises the re-authentication signal exactly once per terminal event.
	fn terminate(&self, reason: TerminalAuthError) -> Error {
		self.metrics.record_reauth_signal();

		match self.config.login_url() {
			Ok(login_url) =>
				self.reauth.reauthenticate(&ReauthSignal { login_url, reason: reason.clone() }),
			Err(e) => {
				obs::event!(
					WARN,
					error = %e,
					"login entry point cannot be resolved; signal dropped"
				);

				#[cfg(not(feature = "tracing"))]
				let _ = e;
			},
		}

		reason.into()
	}
}
