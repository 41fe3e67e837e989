//! Coordinator-level error types shared across the transport, refresh, and decode paths.

// self
use crate::_prelude::*;

/// Coordinator-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical coordinator error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Backend answered with a non-success status that the coordinator does not absorb.
	#[error(transparent)]
	Status(#[from] ApiError),
	/// Session cannot be renewed; the user must sign in again.
	#[error(transparent)]
	AuthTerminal(#[from] TerminalAuthError),
	/// Transport failure (DNS, TCP, TLS, timeouts).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Local configuration or request-construction problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Success body could not be decoded into the requested type.
	#[error(transparent)]
	Decode(#[from] DecodeError),
}
impl Error {
	/// Coarse classification used by hosts deciding between "show error" and "sign in again".
	pub fn class(&self) -> ErrorClass {
		match self {
			Self::AuthTerminal(_) => ErrorClass::AuthTerminal,
			_ => ErrorClass::Other,
		}
	}

	/// HTTP status attached to the failure, when one was observed.
	pub fn status(&self) -> Option<u16> {
		match self {
			Self::Status(e) => Some(e.status),
			Self::AuthTerminal(e) => e.status(),
			Self::Decode(e) => Some(e.status),
			Self::Transport(_) | Self::Config(_) => None,
		}
	}
}
impl From<crate::config::ConfigValidationError> for Error {
	fn from(e: crate::config::ConfigValidationError) -> Self {
		Self::Config(e.into())
	}
}

/// Surface-level classification of an [`Error`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorClass {
	/// No retry is possible; the host should route the user to the login entry point.
	AuthTerminal,
	/// Any other failure, returned verbatim on first occurrence.
	Other,
}

/// Terminal authentication failures. Cloned verbatim to every request queued behind one
/// refresh episode.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum TerminalAuthError {
	/// Refresh exchange answered with a non-success status.
	#[error("Credential refresh was rejected with HTTP status {status}.")]
	RefreshRejected {
		/// Status returned by the refresh exchange.
		status: u16,
	},
	/// Refresh exchange never produced an HTTP response.
	#[error("Credential refresh could not reach the backend: {message}.")]
	RefreshUnreachable {
		/// Rendered transport failure.
		message: String,
	},
	/// The request that owned the refresh episode was dropped before it settled.
	#[error("Credential refresh was abandoned before it completed.")]
	RefreshAbandoned,
	/// A request against the refresh exchange itself reported an expired session.
	#[error("The refresh endpoint reported an expired session (HTTP status {status}).")]
	RefreshTargetExpired {
		/// Status returned by the refresh endpoint.
		status: u16,
	},
}
impl TerminalAuthError {
	/// HTTP status behind the failure, if any.
	pub fn status(&self) -> Option<u16> {
		match self {
			Self::RefreshRejected { status } | Self::RefreshTargetExpired { status } =>
				Some(*status),
			Self::RefreshUnreachable { .. } | Self::RefreshAbandoned => None,
		}
	}
}

/// Status families the console distinguishes when presenting backend failures.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiErrorKind {
	/// 400.
	BadRequest,
	/// 401 that survived the single retry.
	Unauthorized,
	/// 403.
	Forbidden,
	/// 404.
	NotFound,
	/// 409.
	Conflict,
	/// 422.
	Validation,
	/// 500.
	Server,
	/// 503.
	ServiceUnavailable,
	/// Anything else.
	Other,
}
impl ApiErrorKind {
	/// Maps an HTTP status code onto its kind.
	pub const fn from_status(status: u16) -> Self {
		match status {
			400 => Self::BadRequest,
			401 => Self::Unauthorized,
			403 => Self::Forbidden,
			404 => Self::NotFound,
			409 => Self::Conflict,
			422 => Self::Validation,
			500 => Self::Server,
			503 => Self::ServiceUnavailable,
			_ => Self::Other,
		}
	}

	/// Returns a stable label suitable for log fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::BadRequest => "bad_request",
			Self::Unauthorized => "unauthorized",
			Self::Forbidden => "forbidden",
			Self::NotFound => "not_found",
			Self::Conflict => "conflict",
			Self::Validation => "validation",
			Self::Server => "server",
			Self::ServiceUnavailable => "service_unavailable",
			Self::Other => "other",
		}
	}
}
impl Display for ApiErrorKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Non-success HTTP response surfaced to the caller unchanged.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
#[error("Backend responded with HTTP status {status}: {message}.")]
pub struct ApiError {
	/// HTTP status code.
	pub status: u16,
	/// Status family.
	pub kind: ApiErrorKind,
	/// Message extracted from the body (`message`, then `error`), or a generic fallback.
	pub message: String,
	/// Retry-After hint from upstream, if supplied.
	pub retry_after: Option<Duration>,
	/// Raw response body.
	pub body: Vec<u8>,
}
impl ApiError {
	/// Message used when the body carries no usable text.
	pub const FALLBACK_MESSAGE: &'static str = "An error occurred";

	/// Builds an error from a status code and raw body.
	pub fn from_parts(status: u16, body: Vec<u8>, retry_after: Option<Duration>) -> Self {
		let message = extract_message(&body).unwrap_or_else(|| Self::FALLBACK_MESSAGE.into());

		Self { status, kind: ApiErrorKind::from_status(status), message, retry_after, body }
	}

	/// One-line, user-facing description of the failure.
	pub fn summary(&self) -> String {
		match self.kind {
			ApiErrorKind::BadRequest => format!("Bad Request: {}", self.message),
			ApiErrorKind::Unauthorized => "Unauthorized: Please login again".into(),
			ApiErrorKind::Forbidden =>
				"Forbidden: You don't have permission to perform this action".into(),
			ApiErrorKind::NotFound => "Not Found: Resource does not exist".into(),
			ApiErrorKind::Conflict => format!("Conflict: {}", self.message),
			ApiErrorKind::Validation => format!("Validation Error: {}", self.message),
			ApiErrorKind::Server => "Server Error: Something went wrong on the server".into(),
			ApiErrorKind::ServiceUnavailable =>
				"Service Unavailable: Server is under maintenance".into(),
			ApiErrorKind::Other => self.message.clone(),
		}
	}
}

#[derive(Deserialize)]
struct ErrorBody {
	message: Option<String>,
	error: Option<String>,
}

fn extract_message(body: &[u8]) -> Option<String> {
	let parsed: ErrorBody = serde_json::from_slice(body).ok()?;

	[parsed.message, parsed.error].into_iter().flatten().find(|text| !text.trim().is_empty())
}

/// Configuration and request-construction failures.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// Request target could not be resolved against the base URL.
	#[error("Request target `{target}` cannot be resolved against the base URL.")]
	InvalidTarget {
		/// Target as supplied by the caller.
		target: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Header name or value is not valid HTTP.
	#[error("Header `{name}` is invalid.")]
	InvalidHeader {
		/// Header name as supplied by the caller.
		name: String,
	},
	/// Request body could not be serialized.
	#[error("Request body could not be serialized to JSON.")]
	BodySerialize(#[source] serde_json::Error),
	/// Coordinator configuration failed validation.
	#[error(transparent)]
	Validation(#[from] crate::config::ConfigValidationError),
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Transport-level failures (network, IO). Never retried by the coordinator.
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the backend.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying HTTP client gave up waiting for the backend.
	#[error("Request to the backend timed out.")]
	Timeout {
		/// Transport-specific timeout error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the backend.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}

	/// Wraps a transport-specific timeout error.
	pub fn timeout(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Timeout { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		if e.is_timeout() { Self::timeout(e) } else { Self::network(e) }
	}
}

/// Success body did not match the caller's expected shape.
#[derive(Debug, ThisError)]
#[error("Response body with HTTP status {status} is not valid JSON for the requested type.")]
pub struct DecodeError {
	/// Structured parsing failure, including the JSON path that failed.
	#[source]
	pub source: serde_path_to_error::Error<serde_json::Error>,
	/// HTTP status of the decoded response.
	pub status: u16,
}
