//! Request descriptors handed to the coordinator.

// crates.io
use ::http::header::{CONTENT_TYPE, HeaderName, HeaderValue};
// self
use crate::{_prelude::*, error::ConfigError};

/// One call the coordinator may issue and, at most once, replay.
///
/// The coordinator never touches the method, target, headers, or body; it only flips the
/// retry marker before the single replay that follows a refresh.
#[derive(Clone, Debug)]
pub struct PendingRequest {
	/// HTTP method.
	pub method: Method,
	/// Path relative to the configured base URL, or an absolute URL.
	pub target: String,
	/// Caller-supplied headers.
	pub headers: HeaderMap,
	/// Optional request body.
	pub body: Option<Vec<u8>>,
	/// Whether ambient credentials (session cookies) accompany the request.
	pub with_credentials: bool,
	retried: bool,
}
impl PendingRequest {
	/// Creates a credentialed request with no headers and no body.
	pub fn new(method: Method, target: impl Into<String>) -> Self {
		Self {
			method,
			target: target.into(),
			headers: HeaderMap::new(),
			body: None,
			with_credentials: true,
			retried: false,
		}
	}

	/// Shorthand for a `GET` request.
	pub fn get(target: impl Into<String>) -> Self {
		Self::new(Method::GET, target)
	}

	/// Shorthand for a `POST` request.
	pub fn post(target: impl Into<String>) -> Self {
		Self::new(Method::POST, target)
	}

	/// Shorthand for a `PUT` request.
	pub fn put(target: impl Into<String>) -> Self {
		Self::new(Method::PUT, target)
	}

	/// Shorthand for a `PATCH` request.
	pub fn patch(target: impl Into<String>) -> Self {
		Self::new(Method::PATCH, target)
	}

	/// Shorthand for a `DELETE` request.
	pub fn delete(target: impl Into<String>) -> Self {
		Self::new(Method::DELETE, target)
	}

	/// Appends a header, validating both name and value.
	pub fn header(mut self, name: &str, value: &str) -> Result<Self, ConfigError> {
		let invalid = || ConfigError::InvalidHeader { name: name.into() };
		let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|_| invalid())?;
		let header_value = HeaderValue::from_str(value).map_err(|_| invalid())?;

		self.headers.append(header_name, header_value);

		Ok(self)
	}

	/// Serializes `payload` as the JSON body and sets `content-type`.
	pub fn json<T>(mut self, payload: &T) -> Result<Self, ConfigError>
	where
		T: ?Sized + Serialize,
	{
		let body = serde_json::to_vec(payload).map_err(ConfigError::BodySerialize)?;

		self.headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
		self.body = Some(body);

		Ok(self)
	}

	/// Sets a raw body.
	pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
		self.body = Some(body.into());

		self
	}

	/// Overrides whether session cookies accompany the request.
	pub fn with_credentials(mut self, with_credentials: bool) -> Self {
		self.with_credentials = with_credentials;

		self
	}

	/// Returns `true` once the coordinator has spent this request's single replay.
	pub fn is_retried(&self) -> bool {
		self.retried
	}

	pub(crate) fn mark_retried(&mut self) {
		self.retried = true;
	}
}
