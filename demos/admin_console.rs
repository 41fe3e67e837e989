//! Fetches a couple of admin-console resources through one coordinator.
//!
//! ```sh
//! BACKEND_API_URL=http://localhost:8080 SESSION_COOKIE="session=abc" \
//! 	cargo run --example admin_console
//! ```

// crates.io
use color_eyre::{Result, eyre::eyre};
use serde::Deserialize;
// self
use refresh_coordinator::{
	config::CoordinatorConfig,
	coordinator::Coordinator,
	error::{Error, ErrorClass},
	http::ReqwestTransport,
	reauth::ReauthSignal,
	request::PendingRequest,
};

#[derive(Debug, Deserialize)]
struct Game {
	id: u64,
	title: String,
}

#[derive(Debug, Deserialize)]
struct User {
	id: u64,
	email: String,
}

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let config = CoordinatorConfig::from_env()?;
	let mut transport = ReqwestTransport::new()?;

	if let Ok(cookies) = std::env::var("SESSION_COOKIE") {
		transport = transport.with_cookie_header(&config.base_url, &cookies);
	}

	let coordinator = Coordinator::with_transport(config, transport).with_reauth_hook(
		|signal: &ReauthSignal| {
			eprintln!("Session cannot be renewed ({}); sign in at {}.", signal.reason, signal.login_url)
		},
	);
	let (games, users) = tokio::join!(
		coordinator.send_json::<Vec<Game>>(PendingRequest::get("/api/games")),
		coordinator.send_json::<Vec<User>>(PendingRequest::get("/api/users")),
	);

	match (games, users) {
		(Ok(games), Ok(users)) => {
			for game in games {
				println!("game #{}: {}", game.id, game.title);
			}
			for user in users {
				println!("user #{}: {}", user.id, user.email);
			}
		},
		(Err(e), _) | (_, Err(e)) => return Err(describe(e)),
	}

	println!(
		"requests={} refreshes={} retries={}",
		coordinator.metrics.requests(),
		coordinator.metrics.refresh_attempts(),
		coordinator.metrics.retries()
	);

	Ok(())
}

fn describe(error: Error) -> color_eyre::Report {
	if error.class() == ErrorClass::AuthTerminal {
		return eyre!("Signed out: {error}");
	}

	match error {
		Error::Status(api) => eyre!("{}", api.summary()),
		other => eyre!(other),
	}
}
