//! # Mailer Client
//! Asynchronous client for the mailer service HTTP API, providing methods to enqueue templated mails, probe service liveness, and unsubscribe addresses from mailing lists using [`Client`] and [`ClientBuilder`].
//!
//! ## Audience and uses
//! For Rust applications that delegate outgoing mailing-list traffic to a mailer service instance: construct a [`Client`] with the service's base URL and an auth token, call [`Client::send`] to enqueue mails, and [`Client::status`] or [`Client::unsubscribe`] for the unauthenticated operations.
//!
//! ## Runtime requirements
//! Async-only; run inside a Tokio (v1) runtime. HTTP calls use `reqwest`, so ensure the chosen Tokio features (`rt-multi-thread` or `current_thread`) are available in your application.
//!
//! ## Authentication
//! Authenticated operations attach the configured token as an `auth` cookie on every request. The client never stores cookies the server sets; a client constructed without a token can only invoke the unauthenticated operations.
//!
//! ## Out of scope
//! Not a mail composer or SMTP sender, and not a session manager. The client performs no retries and parses no response bodies; it only reports whether each call was accepted by the service.
//!
//! ## Errors
//! Invoking an authenticated operation without a token fails locally with [`Error::AuthTokenRequired`]; a response with an unexpected status code becomes [`Error::InvalidServiceBehavior`]; transport failures and unencodable template data surface as [`Error::Request`] and [`Error::Json`]. The crate-wide [`Result`] alias wraps these errors.
//!
//! ## Example
//! ```no_run
//! use mailer_client::{Client, Url};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), mailer_client::Error> {
//!     let base = Url::parse("https://mailer.example.com/").unwrap();
//!     let client = Client::new(base, "s3cret-token");
//!
//!     client.status().await?;
//!
//!     let data = std::collections::BTreeMap::from([("name", "Ada")]);
//!     client
//!         .send("announcements", "welcome", &data, "news@example.com", "Hello")
//!         .await?;
//!     Ok(())
//! }
//! ```

mod client;
mod error;

pub use client::{Client, ClientBuilder};
pub use error::Error;
pub use reqwest::Url;

/// Result type alias for mailer service operations.
///
/// This is equivalent to `std::result::Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
