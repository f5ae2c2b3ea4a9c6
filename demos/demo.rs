//! Small end-to-end demo against a running mailer service.
//!
//! ```sh
//! MAILER_URL=https://mailer.example.com/ MAILER_TOKEN=... cargo run --example demo
//! ```

use mailer_client::{Client, Url};
use std::collections::BTreeMap;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let base = std::env::var("MAILER_URL").unwrap_or_else(|_| "http://localhost:8000/".to_string());
    let token = std::env::var("MAILER_TOKEN").unwrap_or_default();

    let client = Client::builder(Url::parse(&base)?)
        .auth_token(token)
        .build();

    client.status().await?;
    println!("service at {base} is up");

    let data = BTreeMap::from([("name", "Ada"), ("plan", "pro")]);
    client
        .send("announcements", "welcome", &data, "news@example.com", "Welcome aboard")
        .await?;
    println!("mail enqueued");

    Ok(())
}
