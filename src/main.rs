#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
	// Enable backtraces in debug mode.
	if cfg!(debug_assertions) && std::env::var_os("RUST_BACKTRACE").is_none() {
		std::env::set_var("RUST_BACKTRACE", "1");
	}

	// Load the .env file, if there is one. Variables already in the environment take precedence.
	match dotenvy::dotenv() {
		Ok(_) => {},
		Err(error) if error.not_found() => {},
		Err(error) => return Err(error).context("Failed to load the .env file."),
	}

	// Setup tracing.
	setup_tracing()?;

	// Parse the arguments.
	let args = shortener::Args::parse();

	// Validate the config.
	let config = shortener::Config::from_args(args)?;

	// Run the bot.
	shortener::run(config).await?;

	Ok(())
}

fn setup_tracing() -> Result<()> {
	// Create the env layer.
	let env_layer = match std::env::var("SHORTENER_TRACING") {
		Ok(filter) => tracing_subscriber::EnvFilter::try_new(filter)
			.context("Failed to parse SHORTENER_TRACING.")?,
		Err(_) => tracing_subscriber::EnvFilter::new("shortener=info"),
	};

	// Debug builds print for people, release builds print JSON lines for the log collector.
	let format_layer = if cfg!(debug_assertions) {
		tracing_subscriber::fmt::layer().pretty().boxed()
	} else {
		tracing_subscriber::fmt::layer().json().boxed()
	};

	tracing_subscriber::registry()
		.with(env_layer)
		.with(format_layer)
		.init();

	Ok(())
}
