//! Transport primitives the coordinator drives.
//!
//! [`HttpTransport`] is the coordinator's only dependency on an HTTP stack. A transport
//! performs exactly one network exchange per [`HttpTransport::execute`] call and reports
//! every HTTP status, including 4xx/5xx, as an `Ok` response; only failures that never
//! produced a response (DNS, TLS, timeouts) come back as [`TransportError`]. Status
//! classification belongs to [`crate::policy::ResponsePolicy`].

// crates.io
#[cfg(feature = "reqwest")] use ::http::header::{COOKIE, SET_COOKIE};
use ::http::header::RETRY_AFTER;
#[cfg(feature = "reqwest")] use reqwest::cookie::{CookieStore, Jar};
use time::format_description::well_known::Rfc2822;
// self
use crate::{_prelude::*, error::TransportError, request::PendingRequest};

/// Response produced by a transport.
pub type HttpResponse = ::http::Response<Vec<u8>>;

/// Boxed future returned by [`HttpTransport::execute`].
pub type TransportFuture<'a> =
	Pin<Box<dyn Future<Output = Result<HttpResponse, TransportError>> + 'a + Send>>;

/// Abstraction over HTTP stacks capable of executing coordinator requests.
///
/// Implementations must be `Send + Sync + 'static` so one transport can be shared by
/// every clone of a coordinator, and the returned future must be `Send` so callers can
/// spawn coordinator calls on multi-threaded executors.
pub trait HttpTransport
where
	Self: 'static + Send + Sync,
{
	/// Issues `request` against the already-resolved `url`.
	///
	/// The transport must honor [`PendingRequest::with_credentials`]: session cookies are
	/// attached (and `Set-Cookie` answers absorbed) only when it is `true`.
	fn execute<'a>(&'a self, url: &'a Url, request: &'a PendingRequest) -> TransportFuture<'a>;
}

/// Reqwest-backed transport that keeps session cookies in a shared jar.
///
/// Redirects are never followed so an expired session surfaces as its real status
/// instead of the HTML of a login page.
#[cfg(feature = "reqwest")]
#[derive(Clone)]
pub struct ReqwestTransport {
	client: ReqwestClient,
	jar: Arc<Jar>,
}
#[cfg(feature = "reqwest")]
impl ReqwestTransport {
	/// Builds a transport with an empty cookie jar.
	pub fn new() -> Result<Self, crate::error::ConfigError> {
		let client = ReqwestClient::builder().redirect(reqwest::redirect::Policy::none()).build()?;

		Ok(Self::with_client(client))
	}

	/// Wraps an existing reqwest [`ReqwestClient`].
	///
	/// The client should not carry its own cookie provider; the transport manages cookies
	/// per request so it can honor [`PendingRequest::with_credentials`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self { client, jar: Default::default() }
	}

	/// Seeds the jar from a `Cookie` header value (`a=1; b=2`) scoped to `url`.
	///
	/// Server-side hosts use this to forward the cookies of an incoming request.
	pub fn with_cookie_header(self, url: &Url, header: &str) -> Self {
		for pair in header.split(';').map(str::trim).filter(|pair| !pair.is_empty()) {
			self.jar.add_cookie_str(pair, url);
		}

		self
	}

	/// Cookie jar shared by every clone of this transport.
	pub fn jar(&self) -> &Arc<Jar> {
		&self.jar
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestTransport {
	fn as_ref(&self) -> &ReqwestClient {
		&self.client
	}
}
#[cfg(feature = "reqwest")]
impl Debug for ReqwestTransport {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ReqwestTransport").finish_non_exhaustive()
	}
}
#[cfg(feature = "reqwest")]
impl HttpTransport for ReqwestTransport {
	fn execute<'a>(&'a self, url: &'a Url, request: &'a PendingRequest) -> TransportFuture<'a> {
		Box::pin(async move {
			let mut builder = self
				.client
				.request(request.method.clone(), url.clone())
				.headers(request.headers.clone());

			let cookies = if request.with_credentials && !request.headers.contains_key(COOKIE) {
				self.jar.cookies(url)
			} else {
				None
			};

			if let Some(cookies) = cookies {
				builder = builder.header(COOKIE, cookies);
			}
			if let Some(body) = &request.body {
				builder = builder.body(body.clone());
			}

			let response = builder.send().await?;
			let status = response.status();
			let headers = response.headers().to_owned();

			if request.with_credentials {
				let mut set_cookies = headers.get_all(SET_COOKIE).iter();

				self.jar.set_cookies(&mut set_cookies, url);
			}

			let mut response_new = HttpResponse::new(response.bytes().await?.to_vec());

			*response_new.status_mut() = status;
			*response_new.headers_mut() = headers;

			Ok(response_new)
		})
	}
}

/// Reads a `Retry-After` hint expressed either in seconds or as an RFC 2822 date.
pub fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
	let value = headers.get(RETRY_AFTER)?;
	let raw = value.to_str().ok()?.trim();

	if let Ok(secs) = raw.parse::<u64>() {
		return Some(Duration::seconds(i64::try_from(secs).unwrap_or(i64::MAX)));
	}
	if let Ok(moment) = OffsetDateTime::parse(raw, &Rfc2822) {
		let delta = moment - OffsetDateTime::now_utc();

		if delta.is_positive() {
			return Some(delta);
		}
	}

	None
}
