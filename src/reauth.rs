//! Re-authentication signal raised when a session cannot be renewed.

// self
use crate::{_prelude::*, error::TerminalAuthError};

/// Notification that the user must sign in again.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReauthSignal {
	/// Login entry point the host should navigate to.
	pub login_url: Url,
	/// Why the session could not be renewed.
	pub reason: TerminalAuthError,
}

/// Host callback invoked on terminal authentication failures.
///
/// The call is fire-and-forget: the coordinator never waits on the host and the hook must
/// not block. Implementations typically navigate to [`ReauthSignal::login_url`] or clear
/// local session state.
pub trait ReauthHook: Send + Sync {
	/// Handles one terminal authentication failure.
	fn reauthenticate(&self, signal: &ReauthSignal);
}
impl<F> ReauthHook for F
where
	F: Fn(&ReauthSignal) + Send + Sync,
{
	fn reauthenticate(&self, signal: &ReauthSignal) {
		self(signal)
	}
}

/// Default hook that only records the event in the log.
#[derive(Clone, Copy, Debug, Default)]
pub struct LoggingReauthHook;
impl ReauthHook for LoggingReauthHook {
	fn reauthenticate(&self, signal: &ReauthSignal) {
		crate::obs::event!(
			WARN,
			login_url = %signal.login_url,
			reason = %signal.reason,
			"session cannot be renewed; re-authentication required"
		);

		#[cfg(not(feature = "tracing"))]
		let _ = signal;
	}
}

#[cfg(test)]
mod tests {
	// std
	use std::sync::atomic::{AtomicUsize, Ordering};
	// self
	use super::*;

	#[test]
	fn closures_act_as_hooks() {
		let fired = Arc::new(AtomicUsize::new(0));
		let counter = fired.clone();
		let hook: Arc<dyn ReauthHook> = Arc::new(move |signal: &ReauthSignal| {
			assert_eq!(signal.login_url.path(), "/login");

			counter.fetch_add(1, Ordering::SeqCst);
		});
		let signal = ReauthSignal {
			login_url: Url::parse("https://console.example.com/login")
				.expect("Login URL fixture should parse."),
			reason: TerminalAuthError::RefreshRejected { status: 401 },
		};

		hook.reauthenticate(&signal);
		LoggingReauthHook.reauthenticate(&signal);

		assert_eq!(fired.load(Ordering::SeqCst), 1);
	}
}
