// self
use crate::{_prelude::*, config::CoordinatorConfig};

/// Errors raised while constructing or validating a [`CoordinatorConfig`].
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum ConfigValidationError {
	/// Base URL must be an `http(s)` URL with a host.
	#[error("Base URL must use http or https and include a host: {url}.")]
	InvalidBaseUrl {
		/// Base URL that failed validation.
		url: String,
	},
	/// Refresh path must be absolute.
	#[error("Refresh path must start with `/`: {path}.")]
	RelativeRefreshPath {
		/// Refresh path that failed validation.
		path: String,
	},
	/// Login entry point must be present.
	#[error("Login path must not be empty.")]
	EmptyLoginPath,
	/// Expiry status must be a client error code.
	#[error("Session-expiry status must be a 4xx code, got {status}.")]
	InvalidExpiryStatus {
		/// Status that failed validation.
		status: u16,
	},
	/// Required environment variable is absent.
	#[error("Environment variable `{name}` is not set.")]
	MissingVariable {
		/// Variable name.
		name: &'static str,
	},
	/// Environment variable holds an unparsable value.
	#[error("Environment variable `{name}` holds an invalid value: {value}.")]
	InvalidVariable {
		/// Variable name.
		name: &'static str,
		/// Offending value.
		value: String,
	},
}

/// Builder for [`CoordinatorConfig`] values.
#[derive(Debug)]
pub struct CoordinatorConfigBuilder {
	/// Base URL for relative request targets.
	pub base_url: Url,
	/// Refresh exchange path.
	pub refresh_path: String,
	/// Login entry point.
	pub login_path: String,
	/// Session-expiry status.
	pub expiry_status: u16,
}
impl CoordinatorConfigBuilder {
	/// Environment variable holding the backend base URL.
	pub const ENV_BASE_URL: &'static str = "BACKEND_API_URL";
	/// Environment variable overriding the refresh path.
	pub const ENV_REFRESH_PATH: &'static str = "BACKEND_REFRESH_PATH";
	/// Environment variable overriding the login path.
	pub const ENV_LOGIN_PATH: &'static str = "BACKEND_LOGIN_PATH";

	/// Creates a new builder seeded with defaults.
	pub fn new(base_url: Url) -> Self {
		Self {
			base_url,
			refresh_path: CoordinatorConfig::DEFAULT_REFRESH_PATH.into(),
			login_path: CoordinatorConfig::DEFAULT_LOGIN_PATH.into(),
			expiry_status: CoordinatorConfig::DEFAULT_EXPIRY_STATUS,
		}
	}

	/// Creates a builder from variables returned by `lookup`.
	///
	/// `BACKEND_API_URL` is required; `BACKEND_REFRESH_PATH` and `BACKEND_LOGIN_PATH`
	/// override the defaults when present.
	pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigValidationError>
	where
		F: Fn(&str) -> Option<String>,
	{
		let raw = lookup(Self::ENV_BASE_URL)
			.ok_or(ConfigValidationError::MissingVariable { name: Self::ENV_BASE_URL })?;
		let base_url = Url::parse(raw.trim()).map_err(|_| {
			ConfigValidationError::InvalidVariable { name: Self::ENV_BASE_URL, value: raw.clone() }
		})?;
		let mut builder = Self::new(base_url);

		if let Some(path) = lookup(Self::ENV_REFRESH_PATH) {
			builder = builder.refresh_path(path.trim());
		}
		if let Some(path) = lookup(Self::ENV_LOGIN_PATH) {
			builder = builder.login_path(path.trim());
		}

		Ok(builder)
	}

	/// Overrides the refresh exchange path.
	pub fn refresh_path(mut self, path: impl Into<String>) -> Self {
		self.refresh_path = path.into();

		self
	}

	/// Overrides the login entry point.
	pub fn login_path(mut self, path: impl Into<String>) -> Self {
		self.login_path = path.into();

		self
	}

	/// Overrides the session-expiry status.
	pub fn expiry_status(mut self, status: u16) -> Self {
		self.expiry_status = status;

		self
	}

	/// Consumes the builder and validates the resulting configuration.
	pub fn build(self) -> Result<CoordinatorConfig, ConfigValidationError> {
		let config = CoordinatorConfig {
			base_url: self.base_url,
			refresh_path: self.refresh_path,
			login_path: self.login_path,
			expiry_status: self.expiry_status,
		};

		config.validate()?;

		Ok(config)
	}
}

impl CoordinatorConfig {
	/// Loads and validates the configuration from the process environment.
	pub fn from_env() -> Result<Self, ConfigValidationError> {
		Self::from_lookup(|name| std::env::var(name).ok())
	}

	/// Loads and validates the configuration from an arbitrary variable source.
	pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigValidationError>
	where
		F: Fn(&str) -> Option<String>,
	{
		CoordinatorConfigBuilder::from_lookup(lookup)?.build()
	}

	fn validate(&self) -> Result<(), ConfigValidationError> {
		if !matches!(self.base_url.scheme(), "http" | "https") || self.base_url.host().is_none() {
			return Err(ConfigValidationError::InvalidBaseUrl { url: self.base_url.to_string() });
		}
		if !self.refresh_path.starts_with('/') {
			return Err(ConfigValidationError::RelativeRefreshPath {
				path: self.refresh_path.clone(),
			});
		}
		if self.login_path.trim().is_empty() {
			return Err(ConfigValidationError::EmptyLoginPath);
		}
		if !(400..500).contains(&self.expiry_status) {
			return Err(ConfigValidationError::InvalidExpiryStatus { status: self.expiry_status });
		}

		Ok(())
	}
}

#[cfg(test)]
mod tests {
	// std
	use std::collections::HashMap;
	// self
	use super::*;

	fn url(value: &str) -> Url {
		Url::parse(value).expect("URL fixture should parse.")
	}

	#[test]
	fn builder_applies_defaults_and_overrides() {
		let config = CoordinatorConfig::builder(url("https://console.example.com"))
			.build()
			.expect("Defaults should validate.");

		assert_eq!(config.refresh_path, "/api/auth/refresh");
		assert_eq!(config.login_path, "/login");
		assert_eq!(config.expiry_status, 401);

		let config = CoordinatorConfig::builder(url("http://localhost:8080"))
			.refresh_path("/v2/session/renew")
			.login_path("/signin")
			.expiry_status(419)
			.build()
			.expect("Overrides should validate.");

		assert_eq!(config.refresh_path, "/v2/session/renew");
		assert_eq!(config.expiry_status, 419);
	}

	#[test]
	fn builder_rejects_invalid_values() {
		let err = CoordinatorConfig::builder(url("ftp://files.example.com"))
			.build()
			.expect_err("Non-HTTP base URLs should be rejected.");

		assert!(matches!(err, ConfigValidationError::InvalidBaseUrl { .. }));

		let err = CoordinatorConfig::builder(url("https://console.example.com"))
			.refresh_path("api/auth/refresh")
			.build()
			.expect_err("Relative refresh paths should be rejected.");

		assert!(matches!(err, ConfigValidationError::RelativeRefreshPath { .. }));

		let err = CoordinatorConfig::builder(url("https://console.example.com"))
			.login_path("  ")
			.build()
			.expect_err("Blank login paths should be rejected.");

		assert_eq!(err, ConfigValidationError::EmptyLoginPath);

		let err = CoordinatorConfig::builder(url("https://console.example.com"))
			.expiry_status(500)
			.build()
			.expect_err("Non-4xx expiry statuses should be rejected.");

		assert_eq!(err, ConfigValidationError::InvalidExpiryStatus { status: 500 });
	}

	#[test]
	fn lookup_reads_backend_variables() {
		let vars = HashMap::from([
			("BACKEND_API_URL", "https://api.example.com "),
			("BACKEND_LOGIN_PATH", "/auth/login"),
		]);
		let config = CoordinatorConfig::from_lookup(|name| vars.get(name).map(|v| v.to_string()))
			.expect("Lookup-based configuration should validate.");

		assert_eq!(config.base_url.as_str(), "https://api.example.com/");
		assert_eq!(config.refresh_path, CoordinatorConfig::DEFAULT_REFRESH_PATH);
		assert_eq!(config.login_path, "/auth/login");

		let err = CoordinatorConfig::from_lookup(|_| None)
			.expect_err("A missing base URL should be reported.");

		assert_eq!(err, ConfigValidationError::MissingVariable { name: "BACKEND_API_URL" });

		let err = CoordinatorConfig::from_lookup(|_| Some("not a url".into()))
			.expect_err("An unparsable base URL should be reported.");

		assert!(matches!(err, ConfigValidationError::InvalidVariable { .. }));
	}
}
