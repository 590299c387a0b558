//! Drives one session against a RwandaBill backend:
//! bootstrap, login, redirect, logout.
//!
//! ```text
//! session-cli http://localhost:8080 user@example.com user123
//! ```
//!
//! Runs in development mode, so a backend that is down falls back to the
//! seeded mock accounts. Set `RUST_LOG=debug` to watch each step.

use rwandabill::prelude::*;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage: session-cli <base-url> <email> <password>";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let (Some(base_url), Some(email), Some(password)) =
        (args.next(), args.next(), args.next())
    else {
        eprintln!("{USAGE}");
        std::process::exit(2);
    };

    let mut session = SessionBuilder::new()
        .base_url(&base_url)
        .mode(RunMode::Development)
        .build(MemoryTokenStore::new())?;
    let mut redirects = Redirector::new(session.subscribe());

    let bootstrap = session.check_auth().await?;
    tracing::info!(outcome = ?bootstrap, "bootstrap finished");

    match session.login(&email, &password).await {
        Ok(outcome) => {
            let user = outcome.identity();
            println!(
                "logged in as {} ({}){}",
                user.email,
                user.role(),
                if outcome.is_fallback() { " [mock]" } else { "" }
            );
        }
        Err(e) => {
            eprintln!("login failed: {e}");
            std::process::exit(1);
        }
    }

    match redirects.poll() {
        Some(route) => println!("landing route: {route}"),
        None => println!("no redirect pending"),
    }

    session.logout().await;
    println!("logged out");
    Ok(())
}
