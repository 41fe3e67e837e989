//! Response classification hooks.
//!
//! The coordinator never interprets status codes itself; it asks a [`ResponsePolicy`]
//! whether a response is a success, an expired session, or an ordinary failure.

// self
use crate::_prelude::*;

/// Outcome categories a policy assigns to a response status.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ResponseClass {
	/// Return the response to the caller as-is.
	Success,
	/// Session expired; refresh may make the request succeed.
	AuthExpired,
	/// Any other failure; surfaced verbatim, never retried.
	Failure,
}

/// Strategy hook that classifies response statuses.
///
/// Implementors are required to be `Send + Sync` so one policy can be shared across
/// concurrent calls.
pub trait ResponsePolicy: Send + Sync {
	/// Classifies an HTTP status.
	fn classify(&self, status: u16) -> ResponseClass;
}

/// Default policy: `2xx` succeeds, the configured expiry status expires, everything else fails.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DefaultResponsePolicy {
	/// Status treated as [`ResponseClass::AuthExpired`].
	pub expiry_status: u16,
}
impl DefaultResponsePolicy {
	/// Creates a policy that treats `expiry_status` as an expired session.
	pub const fn new(expiry_status: u16) -> Self {
		Self { expiry_status }
	}
}
impl Default for DefaultResponsePolicy {
	fn default() -> Self {
		Self::new(crate::config::CoordinatorConfig::DEFAULT_EXPIRY_STATUS)
	}
}
impl Display for DefaultResponsePolicy {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "default-response-policy(expiry={})", self.expiry_status)
	}
}
impl ResponsePolicy for DefaultResponsePolicy {
	fn classify(&self, status: u16) -> ResponseClass {
		match status {
			200..=299 => ResponseClass::Success,
			code if code == self.expiry_status => ResponseClass::AuthExpired,
			_ => ResponseClass::Failure,
		}
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn default_policy_splits_success_expiry_and_failure() {
		let policy = DefaultResponsePolicy::default();

		assert_eq!(policy.classify(200), ResponseClass::Success);
		assert_eq!(policy.classify(204), ResponseClass::Success);
		assert_eq!(policy.classify(401), ResponseClass::AuthExpired);
		assert_eq!(policy.classify(403), ResponseClass::Failure);
		assert_eq!(policy.classify(500), ResponseClass::Failure);
		assert_eq!(policy.classify(302), ResponseClass::Failure);
	}

	#[test]
	fn custom_policies_can_widen_success() {
		struct AcceptNotModified;
		impl ResponsePolicy for AcceptNotModified {
			fn classify(&self, status: u16) -> ResponseClass {
				match status {
					304 => ResponseClass::Success,
					other => DefaultResponsePolicy::new(419).classify(other),
				}
			}
		}

		let policy = AcceptNotModified;

		assert_eq!(policy.classify(304), ResponseClass::Success);
		assert_eq!(policy.classify(419), ResponseClass::AuthExpired);
		assert_eq!(policy.classify(401), ResponseClass::Failure);
	}
}
