//! Refresh episode bookkeeping: the `refreshing` flag plus the FIFO queue of requests parked
//! behind the in-flight refresh.
//!
//! The mutex is only ever held for queue edits and is never held across `.await`, so the
//! state is safe to share between tasks on any executor.

// crates.io
use tokio::sync::oneshot;
// self
use crate::{_prelude::*, error::TerminalAuthError};

/// Result of one refresh episode, delivered identically to every participant.
pub type EpisodeOutcome = Result<(), TerminalAuthError>;

/// Shared refresh state injected into a coordinator.
///
/// Coordinators that share one `RefreshState` share refresh episodes; independent instances
/// (for example, one per test) never observe each other.
#[derive(Debug, Default)]
pub struct RefreshState(Mutex<EpisodeQueue>);

#[derive(Debug, Default)]
struct EpisodeQueue {
	refreshing: bool,
	waiters: VecDeque<oneshot::Sender<EpisodeOutcome>>,
}

impl RefreshState {
	/// Joins the current refresh episode, opening a new one when none is in flight.
	///
	/// Exactly one caller per episode receives [`RefreshTicket::Initiator`]; everyone
	/// arriving while it is in flight is queued and receives [`RefreshTicket::Waiter`].
	pub fn join(&self) -> RefreshTicket<'_> {
		let mut queue = self.0.lock();

		if queue.refreshing {
			let (tx, rx) = oneshot::channel();

			queue.waiters.push_back(tx);

			RefreshTicket::Waiter(EpisodeWaiter(rx))
		} else {
			queue.refreshing = true;

			RefreshTicket::Initiator(EpisodeGuard { state: self, settled: false })
		}
	}

	/// Returns `true` while a refresh episode is in flight.
	pub fn is_refreshing(&self) -> bool {
		self.0.lock().refreshing
	}

	/// Number of requests parked behind the in-flight refresh.
	pub fn waiting(&self) -> usize {
		self.0.lock().waiters.len()
	}

	// Settles every waiter in arrival order, then clears the flag, in one critical section.
	fn release(&self, outcome: &EpisodeOutcome) -> usize {
		let mut queue = self.0.lock();
		let mut released = 0;

		while let Some(waiter) = queue.waiters.pop_front() {
			// A waiter whose caller went away simply misses the outcome.
			let _ = waiter.send(outcome.clone());

			released += 1;
		}

		queue.refreshing = false;

		released
	}
}

/// Role assigned by [`RefreshState::join`].
#[derive(Debug)]
pub enum RefreshTicket<'a> {
	/// Caller owns the episode and must perform the refresh exchange.
	Initiator(EpisodeGuard<'a>),
	/// Caller must wait for the episode owner to settle.
	Waiter(EpisodeWaiter),
}

/// Ownership of an in-flight refresh episode.
///
/// Dropping the guard without calling [`EpisodeGuard::settle`] settles the episode as
/// [`TerminalAuthError::RefreshAbandoned`], so a cancelled owner never strands waiters.
#[derive(Debug)]
pub struct EpisodeGuard<'a> {
	state: &'a RefreshState,
	settled: bool,
}
impl EpisodeGuard<'_> {
	/// Delivers `outcome` to every waiter in FIFO order and closes the episode.
	///
	/// Returns the number of waiters released.
	pub fn settle(mut self, outcome: &EpisodeOutcome) -> usize {
		self.settled = true;

		self.state.release(outcome)
	}
}
impl Drop for EpisodeGuard<'_> {
	fn drop(&mut self) {
		if !self.settled {
			self.state.release(&Err(TerminalAuthError::RefreshAbandoned));
		}
	}
}

/// Single-resolution handle for a request parked behind a refresh episode.
#[derive(Debug)]
pub struct EpisodeWaiter(oneshot::Receiver<EpisodeOutcome>);
impl EpisodeWaiter {
	/// Suspends until the episode settles.
	pub async fn wait(self) -> EpisodeOutcome {
		self.0.await.unwrap_or(Err(TerminalAuthError::RefreshAbandoned))
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn expect_initiator(ticket: RefreshTicket<'_>) -> EpisodeGuard<'_> {
		match ticket {
			RefreshTicket::Initiator(guard) => guard,
			RefreshTicket::Waiter(_) => panic!("Expected to own the refresh episode."),
		}
	}

	fn expect_waiter(ticket: RefreshTicket<'_>) -> EpisodeWaiter {
		match ticket {
			RefreshTicket::Waiter(waiter) => waiter,
			RefreshTicket::Initiator(_) => panic!("Expected to wait on the refresh episode."),
		}
	}

	#[tokio::test]
	async fn one_initiator_per_episode_and_waiters_share_success() {
		let state = RefreshState::default();
		let guard = expect_initiator(state.join());
		let first = expect_waiter(state.join());
		let second = expect_waiter(state.join());

		assert!(state.is_refreshing());
		assert_eq!(state.waiting(), 2);
		assert_eq!(guard.settle(&Ok(())), 2);
		assert!(!state.is_refreshing());
		assert_eq!(state.waiting(), 0);
		assert_eq!(first.wait().await, Ok(()));
		assert_eq!(second.wait().await, Ok(()));

		let next = expect_initiator(state.join());

		assert_eq!(next.settle(&Ok(())), 0);
	}

	#[tokio::test]
	async fn failed_episode_rejects_every_waiter_with_the_same_error() {
		let state = RefreshState::default();
		let guard = expect_initiator(state.join());
		let waiters = (0..3).map(|_| expect_waiter(state.join())).collect::<Vec<_>>();
		let failure = TerminalAuthError::RefreshRejected { status: 401 };

		assert_eq!(guard.settle(&Err(failure.clone())), 3);

		for waiter in waiters {
			assert_eq!(waiter.wait().await, Err(failure.clone()));
		}

		assert!(!state.is_refreshing());
	}

	#[tokio::test(flavor = "current_thread")]
	async fn waiters_resume_in_arrival_order() {
		let state = RefreshState::default();
		let guard = expect_initiator(state.join());
		let resumed = Arc::new(Mutex::new(Vec::new()));
		let tasks = (0..4)
			.map(|index| {
				let waiter = expect_waiter(state.join());
				let resumed = resumed.clone();

				tokio::spawn(async move {
					assert_eq!(waiter.wait().await, Ok(()));

					resumed.lock().push(index);
				})
			})
			.collect::<Vec<_>>();

		// Park every task on its receiver before the episode settles.
		tokio::task::yield_now().await;

		assert_eq!(state.waiting(), 4);
		assert_eq!(guard.settle(&Ok(())), 4);

		for task in tasks {
			task.await.expect("Waiter task should not panic.");
		}

		assert_eq!(*resumed.lock(), [0, 1, 2, 3]);
	}

	#[tokio::test]
	async fn dropped_initiator_abandons_the_episode() {
		let state = RefreshState::default();
		let guard = expect_initiator(state.join());
		let waiter = expect_waiter(state.join());

		drop(guard);

		assert_eq!(waiter.wait().await, Err(TerminalAuthError::RefreshAbandoned));
		assert!(!state.is_refreshing());

		let _reopened = expect_initiator(state.join());

		assert!(state.is_refreshing());
	}

	#[test]
	fn cancelled_waiters_do_not_block_settlement() {
		let state = RefreshState::default();
		let guard = expect_initiator(state.join());

		drop(expect_waiter(state.join()));

		assert_eq!(state.waiting(), 1);
		assert_eq!(guard.settle(&Ok(())), 1);
		assert_eq!(state.waiting(), 0);
	}
}
