use crate::{
	bot::Bot,
	config::Config,
	error::{Result, WrapErr},
	health,
	shortener::ViralBox,
	store::Mongo,
	telegram,
};
use std::{future::Future, sync::Arc};
use tokio_util::sync::CancellationToken;

/// Run the bot and the health check server until a shutdown signal arrives or either of them fails.
pub async fn run(config: Config) -> Result<()> {
	// Create the clients.
	let telegram = telegram::Reqwest::new(&config.telegram_api_url, &config.bot_token)?;
	let shortener = ViralBox::new(config.viralbox_api_url.clone(), config.api_key.clone())?;
	let store = Mongo::connect(&config.mongodb_uri, &config.mongo_db_name).await?;

	// Create the bot.
	let bot = Bot::new(
		Arc::new(telegram),
		Arc::new(shortener),
		Arc::new(store),
		config.admin_ids.clone(),
		config.max_workers,
	);

	// Bind the health check server before polling so a taken port fails fast.
	let health = health::Server::bind(
		config.health_addr(),
		config.max_workers,
		config.admin_ids.len(),
	)
	.await?;

	// Cancel the shutdown token on SIGINT or SIGTERM.
	let shutdown = CancellationToken::new();
	tokio::spawn(cancel_on_signal(shutdown_signal(), shutdown.clone()));

	let mut health_task = tokio::spawn(health.serve(shutdown.clone()));
	let mut bot_task = tokio::spawn({
		let shutdown = shutdown.clone();
		async move { bot.run(shutdown).await }
	});

	// When either task ends, stop the other.
	let (first, second) = tokio::select! {
		result = &mut bot_task => (result, health_task),
		result = &mut health_task => (result, bot_task),
	};
	shutdown.cancel();
	let second = second.await;
	first.wrap_err("A task panicked.")??;
	second.wrap_err("A task panicked.")??;

	Ok(())
}

/// Cancel `shutdown` once `signal` resolves. A listener that fails leaves `shutdown` untouched.
async fn cancel_on_signal(signal: impl Future<Output = Result<()>>, shutdown: CancellationToken) {
	match signal.await {
		Ok(()) => {
			tracing::info!("Received a shutdown signal.");
			shutdown.cancel();
		},
		Err(error) => {
			tracing::error!(error = %error.trace(), "Failed to listen for shutdown signals.");
		},
	}
}

#[cfg(unix)]
async fn shutdown_signal() -> Result<()> {
	use tokio::signal::unix::{signal, SignalKind};
	let mut terminate = signal(SignalKind::terminate())?;
	tokio::select! {
		result = tokio::signal::ctrl_c() => result?,
		_ = terminate.recv() => {},
	}
	Ok(())
}

#[cfg(not(unix))]
async fn shutdown_signal() -> Result<()> {
	tokio::signal::ctrl_c().await?;
	Ok(())
}
