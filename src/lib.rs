//! Cookie-session request coordinator: every call goes through one place that notices an
//! expired session, performs a single credential refresh no matter how many calls noticed it
//! at once, and replays each affected call exactly once.
//!
//! The crate is transport-agnostic at its core ([`http::HttpTransport`]) and ships a
//! reqwest + cookie-jar transport behind the default `reqwest` feature.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod config;
pub mod coordinator;
pub mod error;
pub mod http;
pub mod obs;
pub mod policy;
pub mod reauth;
pub mod request;

mod _prelude {
	pub use std::{
		collections::VecDeque,
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		sync::Arc,
	};

	pub use ::http::{HeaderMap, Method};
	pub use parking_lot::Mutex;
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

pub use ::http as http_types;
#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _};
