//! Scripted in-memory transport and fixtures shared by integration tests.

#![allow(dead_code)]

// std
use std::{
	collections::HashMap,
	sync::{
		Arc,
		atomic::{AtomicU16, AtomicU64, Ordering},
	},
};
// crates.io
use parking_lot::Mutex;
use tokio::sync::Semaphore;
// self
use refresh_coordinator::{
	config::CoordinatorConfig,
	coordinator::RefreshState,
	error::TransportError,
	http::{HttpResponse, HttpTransport, TransportFuture},
	http_types::{HeaderMap, Method},
	reauth::{ReauthHook, ReauthSignal},
	request::PendingRequest,
	url::Url,
};

pub const BASE_URL: &str = "https://console.test";
pub const REFRESH_PATH: &str = "/api/auth/refresh";

/// Behavior of one scripted path.
#[derive(Clone, Copy, Debug)]
pub enum Route {
	/// Expired until a refresh succeeds, then `200`.
	Protected,
	/// Always answers with the expiry status, even after a refresh.
	AlwaysExpired,
	/// Always answers with the given status.
	Fixed(u16),
	/// Never produces a response.
	Unreachable,
}

/// One exchange observed by the scripted transport.
#[derive(Clone, Debug)]
pub struct Call {
	pub method: Method,
	pub path: String,
	pub headers: HeaderMap,
	pub body: Option<Vec<u8>>,
	pub retried: bool,
}

/// In-memory transport whose session becomes valid once the refresh exchange succeeds.
pub struct ScriptedTransport {
	routes: HashMap<String, Route>,
	refresh_status: AtomicU16,
	refresh_gate: Option<Arc<Semaphore>>,
	session: AtomicU64,
	calls: Mutex<Vec<Call>>,
}
impl ScriptedTransport {
	pub fn new() -> Self {
		Self {
			routes: HashMap::new(),
			refresh_status: AtomicU16::new(200),
			refresh_gate: None,
			session: AtomicU64::new(0),
			calls: Mutex::new(Vec::new()),
		}
	}

	pub fn route(mut self, path: &str, route: Route) -> Self {
		self.routes.insert(path.into(), route);

		self
	}

	/// Holds every refresh exchange until the gate hands out a permit.
	pub fn refresh_gate(mut self, gate: Arc<Semaphore>) -> Self {
		self.refresh_gate = Some(gate);

		self
	}

	pub fn refresh_status(self, status: u16) -> Self {
		self.set_refresh_status(status);

		self
	}

	pub fn set_refresh_status(&self, status: u16) {
		self.refresh_status.store(status, Ordering::SeqCst);
	}

	pub fn calls(&self) -> Vec<Call> {
		self.calls.lock().clone()
	}

	pub fn calls_to(&self, path: &str) -> usize {
		self.calls.lock().iter().filter(|call| call.path.trim_end_matches('/') == path).count()
	}

	pub fn retried_calls_to(&self, path: &str) -> usize {
		self.calls.lock().iter().filter(|call| call.path == path && call.retried).count()
	}

	fn respond(status: u16, body: String) -> HttpResponse {
		let mut response = HttpResponse::new(body.into_bytes());

		*response.status_mut() =
			http_status(status).expect("Scripted statuses should be valid HTTP statuses.");

		response
	}
}
impl HttpTransport for ScriptedTransport {
	fn execute<'a>(&'a self, url: &'a Url, request: &'a PendingRequest) -> TransportFuture<'a> {
		Box::pin(async move {
			let path = url.path().to_owned();

			self.calls.lock().push(Call {
				method: request.method.clone(),
				path: path.clone(),
				headers: request.headers.clone(),
				body: request.body.clone(),
				retried: request.is_retried(),
			});

			if path.trim_end_matches('/') == REFRESH_PATH {
				if let Some(gate) = &self.refresh_gate {
					let _permit =
						gate.acquire().await.expect("Refresh gate should never be closed.");
				}

				let status = self.refresh_status.load(Ordering::SeqCst);

				if (200..300).contains(&status) {
					self.session.fetch_add(1, Ordering::SeqCst);

					return Ok(Self::respond(status, "{}".into()));
				}

				return Ok(Self::respond(status, r#"{"message":"Refresh token expired"}"#.into()));
			}

			match self.routes.get(&path).copied() {
				Some(Route::Protected) if self.session.load(Ordering::SeqCst) > 0 =>
					Ok(Self::respond(200, format!(r#"{{"path":"{path}","ok":true}}"#))),
				Some(Route::Protected | Route::AlwaysExpired) =>
					Ok(Self::respond(401, r#"{"message":"Access token expired"}"#.into())),
				Some(Route::Fixed(status)) =>
					Ok(Self::respond(status, format!(r#"{{"error":"scripted {status}"}}"#))),
				Some(Route::Unreachable) => Err(TransportError::Io(std::io::Error::new(
					std::io::ErrorKind::TimedOut,
					"scripted timeout",
				))),
				None => Ok(Self::respond(404, r#"{"message":"No such route"}"#.into())),
			}
		})
	}
}

fn http_status(status: u16) -> Option<refresh_coordinator::http_types::StatusCode> {
	refresh_coordinator::http_types::StatusCode::from_u16(status).ok()
}

/// Re-authentication hook that records every signal.
#[derive(Clone, Default)]
pub struct RecordingReauth(Arc<Mutex<Vec<ReauthSignal>>>);
impl RecordingReauth {
	pub fn signals(&self) -> Vec<ReauthSignal> {
		self.0.lock().clone()
	}
}
impl ReauthHook for RecordingReauth {
	fn reauthenticate(&self, signal: &ReauthSignal) {
		self.0.lock().push(signal.clone());
	}
}

pub fn config() -> CoordinatorConfig {
	CoordinatorConfig::builder(Url::parse(BASE_URL).expect("Base URL fixture should parse."))
		.build()
		.expect("Test configuration should validate.")
}

/// Yields until `count` requests are parked behind the in-flight refresh.
pub async fn wait_until_queued(state: &RefreshState, count: usize) {
	while state.waiting() < count {
		tokio::task::yield_now().await;
	}
}
