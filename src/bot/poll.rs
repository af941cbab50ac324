use super::Bot;
use crate::{
	error::Result,
	telegram::{Message, POLL_TIMEOUT},
};
use itertools::Itertools;
use std::time::Duration;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

/// How long to wait after a failed poll before polling again.
pub const POLL_BACKOFF: Duration = Duration::from_secs(2);

impl Bot {
	/// Long poll for updates and process their messages until `shutdown` is cancelled. Messages still being processed when it is cancelled are allowed to finish.
	pub async fn run(&self, shutdown: CancellationToken) -> Result<()> {
		tracing::info!("🤖 Admin-only shortener bot running.");
		tracing::info!(
			admins = self.admin_ids().len(),
			workers = self.max_workers(),
			admin_ids = %self.admin_ids().iter().join(", "),
			"🔐 Authorized admins loaded."
		);

		let mut offset: Option<i64> = None;
		let mut tasks = JoinSet::new();
		loop {
			let result = tokio::select! {
				biased;
				() = shutdown.cancelled() => break,
				result = self.state.telegram.get_updates(offset, POLL_TIMEOUT) => result,
			};

			match result {
				Ok(updates) => {
					for update in updates {
						let next = update.update_id + 1;
						offset = Some(offset.map_or(next, |offset| offset.max(next)));
						if let Some(message) = update.message {
							self.spawn_message(&mut tasks, message);
						}
					}
				},
				Err(error) => {
					tracing::error!(error = %error.trace(), "Failed to poll for updates.");
					tokio::select! {
						biased;
						() = shutdown.cancelled() => break,
						() = tokio::time::sleep(POLL_BACKOFF) => {},
					}
				},
			}

			// Reap the tasks that have finished.
			while let Some(result) = tasks.try_join_next() {
				log_join_result(result);
			}
		}

		tracing::info!(pending = tasks.len(), "Stopping. Waiting for messages in progress.");
		while let Some(result) = tasks.join_next().await {
			log_join_result(result);
		}

		Ok(())
	}

	/// Queue a message on the worker pool. This never waits for a free worker.
	fn spawn_message(&self, tasks: &mut JoinSet<()>, message: Message) {
		let bot = self.clone();
		let workers = self.state.workers.clone();
		tasks.spawn(async move {
			let Ok(_permit) = workers.acquire_owned().await else {
				return;
			};
			bot.handle_message(&message).await;
		});
	}
}

fn log_join_result(result: Result<(), tokio::task::JoinError>) {
	if let Err(error) = result {
		tracing::error!(?error, "A message task panicked.");
	}
}
