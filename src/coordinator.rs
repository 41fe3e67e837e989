//! Authenticated request coordinator.
//!
//! Every request goes through [`Coordinator::send`]. When the backend reports an expired
//! session, the first request to notice opens a refresh episode and performs the refresh
//! exchange; requests that notice while it is in flight park behind it. Once the episode
//! settles, each affected request is replayed exactly once, or all of them fail with the
//! same [`TerminalAuthError`](crate::error::TerminalAuthError).

mod metrics;
mod send;
mod state;

pub use metrics::CoordinatorMetrics;
pub use state::*;

// crates.io
use serde::de::DeserializeOwned;
// self
use crate::{
	_prelude::*,
	config::CoordinatorConfig,
	error::DecodeError,
	http::{HttpResponse, HttpTransport},
	policy::{DefaultResponsePolicy, ResponsePolicy},
	reauth::{LoggingReauthHook, ReauthHook},
	request::PendingRequest,
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestTransport;

#[cfg(feature = "reqwest")]
/// Coordinator specialized for the crate's default reqwest transport.
pub type ReqwestCoordinator = Coordinator<ReqwestTransport>;

/// Wraps a transport with session-expiry detection, single-flight refresh, and replay.
///
/// Clones share the transport, policy, hook, metrics, and refresh state, so every clone
/// participates in the same refresh episodes.
pub struct Coordinator<T>
where
	T: ?Sized + HttpTransport,
{
	/// Transport used for every outbound exchange.
	pub transport: Arc<T>,
	/// Policy that classifies response statuses.
	pub policy: Arc<dyn ResponsePolicy>,
	/// Hook notified on terminal authentication failures.
	pub reauth: Arc<dyn ReauthHook>,
	/// Backend location and well-known targets.
	pub config: CoordinatorConfig,
	/// Shared activity counters.
	pub metrics: Arc<CoordinatorMetrics>,
	refresh_state: Arc<RefreshState>,
}
impl<T> Coordinator<T>
where
	T: ?Sized + HttpTransport,
{
	/// Creates a coordinator over a caller-provided transport.
	///
	/// The response policy treats [`CoordinatorConfig::expiry_status`] as the expiry signal
	/// and terminal failures are only logged until [`Coordinator::with_reauth_hook`] installs
	/// a host hook.
	pub fn with_transport(config: CoordinatorConfig, transport: impl Into<Arc<T>>) -> Self {
		Self {
			transport: transport.into(),
			policy: Arc::new(DefaultResponsePolicy::new(config.expiry_status)),
			reauth: Arc::new(LoggingReauthHook),
			config,
			metrics: Default::default(),
			refresh_state: Default::default(),
		}
	}

	/// Replaces the response policy.
	pub fn with_policy(mut self, policy: impl 'static + ResponsePolicy) -> Self {
		self.policy = Arc::new(policy);

		self
	}

	/// Replaces the re-authentication hook.
	pub fn with_reauth_hook(mut self, hook: impl 'static + ReauthHook) -> Self {
		self.reauth = Arc::new(hook);

		self
	}

	/// Injects a refresh state, letting several coordinators share refresh episodes.
	pub fn with_refresh_state(mut self, state: Arc<RefreshState>) -> Self {
		self.refresh_state = state;

		self
	}

	/// Refresh state this coordinator participates in.
	pub fn refresh_state(&self) -> &Arc<RefreshState> {
		&self.refresh_state
	}

	/// Sends `request` and decodes a successful JSON body into `R`.
	pub async fn send_json<R>(&self, request: PendingRequest) -> Result<R>
	where
		R: DeserializeOwned,
	{
		let response = self.send(request).await?;

		decode_json(&response)
	}
}
#[cfg(feature = "reqwest")]
impl Coordinator<ReqwestTransport> {
	/// Creates a coordinator backed by a fresh reqwest transport with an empty cookie jar.
	pub fn new(config: CoordinatorConfig) -> Result<Self> {
		Ok(Self::with_transport(config, ReqwestTransport::new()?))
	}
}
impl<T> Clone for Coordinator<T>
where
	T: ?Sized + HttpTransport,
{
	fn clone(&self) -> Self {
		Self {
			transport: self.transport.clone(),
			policy: self.policy.clone(),
			reauth: self.reauth.clone(),
			config: self.config.clone(),
			metrics: self.metrics.clone(),
			refresh_state: self.refresh_state.clone(),
		}
	}
}
impl<T> Debug for Coordinator<T>
where
	T: ?Sized + HttpTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Coordinator")
			.field("base_url", &self.config.base_url.as_str())
			.field("refresh_path", &self.config.refresh_path)
			.field("refreshing", &self.refresh_state.is_refreshing())
			.finish()
	}
}

fn decode_json<R>(response: &HttpResponse) -> Result<R>
where
	R: DeserializeOwned,
{
	let status = response.status().as_u16();
	let mut deserializer = serde_json::Deserializer::from_slice(response.body());

	serde_path_to_error::deserialize(&mut deserializer)
		.map_err(|source| DecodeError { source, status }.into())
}
