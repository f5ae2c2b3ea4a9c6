//! Mailer service async client implementation.

use crate::{Error, Result};
use reqwest::Url;
use reqwest::cookie::CookieStore;
use reqwest::header::HeaderValue;
use std::sync::Arc;
use std::time::Duration;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// The name of the authentication cookie expected by the mailer service.
const AUTH_COOKIE: &str = "auth";

/// Async client for the mailer service.
///
/// Use [`Client::new`] for defaults or [`Client::builder`] for custom settings
/// like a proxy, TLS behavior, and a non-default timeout.
///
/// The base URL is resolved against with standard relative-reference rules,
/// so it should end in `/` if the service lives under a path prefix
/// (`https://host/mailer/`, not `https://host/mailer`).
#[derive(Debug, Clone)]
pub struct Client {
    base_url: Url,
    auth_token: String,
    timeout: Duration,
    proxy: Option<String>,
    danger_accept_invalid_certs: bool,
}

impl Client {
    /// Create a builder for configuring the client.
    pub fn builder(base_url: Url) -> ClientBuilder {
        ClientBuilder::new(base_url)
    }

    /// Create a new mailer service client.
    ///
    /// If `auth_token` is empty, no credential will ever be sent, restricting
    /// the client to [`Client::status`] and [`Client::unsubscribe`].
    ///
    /// # Examples
    /// ```no_run
    /// # use mailer_client::{Client, Url};
    /// let base = Url::parse("https://mailer.example.com/").unwrap();
    /// let client = Client::new(base, "s3cret-token");
    /// ```
    pub fn new(base_url: Url, auth_token: impl Into<String>) -> Self {
        Self {
            base_url,
            auth_token: auth_token.into(),
            timeout: DEFAULT_TIMEOUT,
            proxy: None,
            danger_accept_invalid_certs: false,
        }
    }

    /// Get the request timeout currently in effect.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Set the time limit for requests. Takes effect on subsequent calls.
    pub fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = timeout;
    }

    /// Enqueue a mail for every recipient of a mailing list.
    ///
    /// `template` selects the server-side rendering template; `data` is
    /// encoded as JSON and handed to it. Requires an auth token.
    ///
    /// # Arguments
    /// * `mailing_list` - Identifier of the recipient group
    /// * `template` - Server-side template identifier
    /// * `data` - Template context, any serializable value
    /// * `email` - Sender address for the mail
    /// * `subject` - Subject line
    ///
    /// # Examples
    /// ```no_run
    /// # use mailer_client::{Client, Url};
    /// # use std::collections::BTreeMap;
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), mailer_client::Error> {
    /// # let client = Client::new(Url::parse("https://mailer.example.com/").unwrap(), "token");
    /// let data = BTreeMap::from([("name", "Ada")]);
    /// client
    ///     .send("announcements", "welcome", &data, "news@example.com", "Hello")
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn send<T>(
        &self,
        mailing_list: &str,
        template: &str,
        data: &T,
        email: &str,
        subject: &str,
    ) -> Result<()>
    where
        T: serde::Serialize + ?Sized,
    {
        let http = self.transport(true)?;
        let data = serde_json::to_string(data)?;

        let response = http
            .post(self.endpoint("send"))
            .form(&[
                ("mailing_list", mailing_list),
                ("template", template),
                ("data", data.as_str()),
                ("email", email),
                ("subject", subject),
            ])
            .send()
            .await?;

        match response.status() {
            reqwest::StatusCode::ACCEPTED => Ok(()),
            status => Err(Error::InvalidServiceBehavior(status)),
        }
    }

    /// Check that the service is alive.
    ///
    /// Purely a liveness probe; the response carries no body. Needs no auth
    /// token.
    ///
    /// # Examples
    /// ```no_run
    /// # use mailer_client::{Client, Url};
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), mailer_client::Error> {
    /// # let client = Client::new(Url::parse("https://mailer.example.com/").unwrap(), "");
    /// client.status().await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn status(&self) -> Result<()> {
        let http = self.transport(false)?;

        let response = http.get(self.endpoint("status")).send().await?;

        match response.status() {
            reqwest::StatusCode::NO_CONTENT => Ok(()),
            status => Err(Error::InvalidServiceBehavior(status)),
        }
    }

    /// Unsubscribe an email address from the given mailing list.
    ///
    /// Needs no auth token; the service accepts unsubscribe requests from
    /// anyone holding the address.
    ///
    /// # Examples
    /// ```no_run
    /// # use mailer_client::{Client, Url};
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), mailer_client::Error> {
    /// # let client = Client::new(Url::parse("https://mailer.example.com/").unwrap(), "");
    /// client.unsubscribe(42, "user@example.com").await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn unsubscribe(&self, mailing_list: u32, email: &str) -> Result<()> {
        let http = self.transport(false)?;

        let response = http
            .post(self.endpoint(&format!("unsubscribe/{mailing_list}")))
            .form(&[("email", email)])
            .send()
            .await?;

        match response.status() {
            reqwest::StatusCode::OK => Ok(()),
            status => Err(Error::InvalidServiceBehavior(status)),
        }
    }

    /// Build the per-call transport, reading the timeout at call time.
    ///
    /// With `auth`, the fixed `auth=<token>` cookie is attached to every
    /// outgoing request through [`AuthCookieJar`]; without it, no cookie
    /// handling is installed at all. Each call gets a fresh transport, so no
    /// connection or cookie state survives between calls.
    fn transport(&self, auth: bool) -> Result<reqwest::Client> {
        let mut builder = reqwest::Client::builder()
            .timeout(self.timeout)
            .danger_accept_invalid_certs(self.danger_accept_invalid_certs);

        if let Some(proxy_url) = &self.proxy {
            builder = builder.proxy(reqwest::Proxy::all(proxy_url)?);
        }

        if auth {
            if self.auth_token.is_empty() {
                return Err(Error::AuthTokenRequired);
            }
            builder = builder.cookie_provider(Arc::new(AuthCookieJar(self.auth_token.clone())));
        }

        Ok(builder.build()?)
    }

    /// Resolve an endpoint path against the base URL.
    fn endpoint(&self, path: &str) -> Url {
        // The paths are fixed; failure to join them indicates a programming
        // error.
        self.base_url
            .join(path)
            .expect("endpoint path is a valid relative reference")
    }
}

/// Cookie store that offers one fixed `auth` cookie and swallows everything
/// the server sets.
///
/// The client is not a session manager: credentials only ever flow outward,
/// and nothing a response sets is persisted or replayed.
#[derive(Debug)]
struct AuthCookieJar(String);

impl CookieStore for AuthCookieJar {
    fn set_cookies(&self, _cookie_headers: &mut dyn Iterator<Item = &HeaderValue>, _url: &Url) {}

    fn cookies(&self, _url: &Url) -> Option<HeaderValue> {
        // A token with bytes that cannot appear in a Cookie header is not
        // sendable; the request then goes out bare and the server refuses it.
        HeaderValue::from_str(&format!("{AUTH_COOKIE}={}", self.0)).ok()
    }
}

/// Builder for configuring a mailer service client.
///
/// Start with [`Client::builder`] to override defaults.
#[derive(Debug, Clone)]
pub struct ClientBuilder {
    base_url: Url,
    auth_token: String,
    timeout: Duration,
    proxy: Option<String>,
    danger_accept_invalid_certs: bool,
}

impl ClientBuilder {
    /// Create a new builder with default settings.
    ///
    /// Defaults:
    /// - No auth token (unauthenticated operations only)
    /// - 5 second request timeout
    /// - No proxy
    /// - `danger_accept_invalid_certs = false`
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            auth_token: String::new(),
            timeout: DEFAULT_TIMEOUT,
            proxy: None,
            danger_accept_invalid_certs: false,
        }
    }

    /// Set the auth token sent with authenticated operations.
    pub fn auth_token(mut self, auth_token: impl Into<String>) -> Self {
        self.auth_token = auth_token.into();
        self
    }

    /// Set the time limit for requests (default: 5 seconds).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set a proxy URL (e.g., "socks5://127.0.0.1:9050") for all requests.
    ///
    /// The URL is validated when the first request is made.
    pub fn proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    /// Control whether to accept invalid TLS certificates (default: false).
    pub fn danger_accept_invalid_certs(mut self, value: bool) -> Self {
        self.danger_accept_invalid_certs = value;
        self
    }

    /// Build the client. Purely local; no request is made.
    pub fn build(self) -> Client {
        Client {
            base_url: self.base_url,
            auth_token: self.auth_token,
            timeout: self.timeout,
            proxy: self.proxy,
            danger_accept_invalid_certs: self.danger_accept_invalid_certs,
        }
    }
}
