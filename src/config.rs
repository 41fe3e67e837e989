//! Coordinator configuration: where the backend lives and which targets carry the
//! refresh exchange and the login entry point.

/// Builder API and environment loader for [`CoordinatorConfig`].
pub mod builder;

pub use builder::*;

// self
use crate::{_prelude::*, error::ConfigError};

/// Immutable configuration consumed by the coordinator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CoordinatorConfig {
	/// Base URL every relative request target is joined onto.
	pub base_url: Url,
	/// Path of the credential refresh exchange.
	pub refresh_path: String,
	/// Path (or absolute URL) of the login entry point used for re-authentication.
	pub login_path: String,
	/// Status code that signals an expired session.
	pub expiry_status: u16,
}
impl CoordinatorConfig {
	/// Default refresh exchange path.
	pub const DEFAULT_REFRESH_PATH: &'static str = "/api/auth/refresh";
	/// Default login entry point.
	pub const DEFAULT_LOGIN_PATH: &'static str = "/login";
	/// Default session-expiry status.
	pub const DEFAULT_EXPIRY_STATUS: u16 = 401;

	/// Creates a new builder for the provided base URL.
	pub fn builder(base_url: Url) -> CoordinatorConfigBuilder {
		CoordinatorConfigBuilder::new(base_url)
	}

	/// Resolves a request target into an absolute URL.
	///
	/// Absolute targets pass through untouched. Relative targets are appended under the base
	/// URL's path, so `/api/games` on `https://host/backend` becomes
	/// `https://host/backend/api/games`.
	pub fn resolve(&self, target: &str) -> Result<Url, ConfigError> {
		let invalid = |source| ConfigError::InvalidTarget { target: target.into(), source };

		match Url::parse(target) {
			Ok(url) => Ok(url),
			Err(url::ParseError::RelativeUrlWithoutBase) =>
				self.base_directory().join(target.trim_start_matches('/')).map_err(invalid),
			Err(source) => Err(invalid(source)),
		}
	}

	/// Absolute URL of the refresh exchange.
	pub fn refresh_url(&self) -> Result<Url, ConfigError> {
		self.resolve(&self.refresh_path)
	}

	/// Absolute URL of the login entry point.
	pub fn login_url(&self) -> Result<Url, ConfigError> {
		self.resolve(&self.login_path)
	}

	/// Checks whether `target` addresses the refresh exchange.
	///
	/// Origin and path must match the refresh URL; query, fragment, and a trailing `/` are
	/// ignored.
	pub fn is_refresh_target(&self, target: &str) -> bool {
		let (Ok(url), Ok(refresh)) = (self.resolve(target), self.refresh_url()) else {
			return false;
		};

		url.origin() == refresh.origin()
			&& normalize_path(url.path()) == normalize_path(refresh.path())
	}

	// Base URL with a trailing `/` so joins keep its path prefix.
	fn base_directory(&self) -> Url {
		let mut base = self.base_url.clone();

		if !base.path().ends_with('/') {
			let path = format!("{}/", base.path());

			base.set_path(&path);
		}

		base
	}
}

fn normalize_path(path: &str) -> &str {
	let trimmed = path.trim_end_matches('/');

	if trimmed.is_empty() { "/" } else { trimmed }
}
