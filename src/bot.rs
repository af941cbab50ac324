use crate::{
	error::{Result, WrapErr},
	link::{extract_url, Link},
	shortener::Shortener,
	store::Store,
	telegram::{Media, Message, Telegram},
};
use std::{collections::BTreeSet, sync::Arc};
use tokio::sync::Semaphore;

mod poll;
pub mod reply;


/// The bot. Clones share the same clients and worker pool.
#[derive(Clone)]
pub struct Bot {
	state: Arc<State>,
}

struct State {
	telegram: Arc<dyn Telegram>,
	shortener: Arc<dyn Shortener>,
	store: Arc<dyn Store>,
	admin_ids: BTreeSet<i64>,

	/// Each message being processed holds one permit.
	workers: Arc<Semaphore>,
	max_workers: usize,
}

/// What a message asks for, once its sender is known to be an admin.
#[derive(Debug, PartialEq, Eq)]
enum Request<'a> {
	Start,
	MyId,
	Text(&'a str),
	Media(Media, &'a str),
	Ignore,
}

impl Bot {
	#[must_use]
	pub fn new(
		telegram: Arc<dyn Telegram>,
		shortener: Arc<dyn Shortener>,
		store: Arc<dyn Store>,
		admin_ids: BTreeSet<i64>,
		max_workers: usize,
	) -> Bot {
		let state = State {
			telegram,
			shortener,
			store,
			admin_ids,
			workers: Arc::new(Semaphore::new(max_workers)),
			max_workers,
		};
		Bot {
			state: Arc::new(state),
		}
	}

	#[must_use]
	pub fn is_admin(&self, user_id: i64) -> bool {
		self.state.admin_ids.contains(&user_id)
	}

	#[must_use]
	pub fn admin_ids(&self) -> &BTreeSet<i64> {
		&self.state.admin_ids
	}

	#[must_use]
	pub fn max_workers(&self) -> usize {
		self.state.max_workers
	}

	/// Process one message. Failures are logged and reported to the chat, never returned.
	pub async fn handle_message(&self, message: &Message) {
		let chat_id = message.chat.id;
		if let Err(error) = self.try_handle_message(message).await {
			tracing::error!(chat_id, error = %error.trace(), "Failed to process the message.");
			self.send_message(chat_id, reply::ERROR).await;
		}
	}

	async fn try_handle_message(&self, message: &Message) -> Result<()> {
		let chat_id = message.chat.id;
		let user = message
			.from
			.as_ref()
			.wrap_err("The message has no sender.")?;

		if !self.is_admin(user.id) {
			tracing::warn!(
				user_id = user.id,
				username = user.username(),
				"⛔ Unauthorized access attempt."
			);
			self.send_message(chat_id, &reply::access_denied(user.id))
				.await;
			return Ok(());
		}

		match Request::parse(message) {
			Request::Start => {
				let text = reply::welcome(user.first_name(), user.id);
				self.send_message(chat_id, &text).await;
			},

			Request::MyId => {
				self.send_message(chat_id, &reply::user_id(user.id)).await;
			},

			Request::Text(text) => {
				let Some(long_url) = extract_url(text) else {
					self.send_message(chat_id, reply::INVALID_LINK).await;
					return Ok(());
				};
				let Some(short_url) = self.shorten(long_url).await else {
					self.send_message(chat_id, reply::SHORTENER_FAILED).await;
					return Ok(());
				};
				self.save(long_url, &short_url).await;
				self.send_message(chat_id, &reply::shortened(&short_url))
					.await;
				tracing::info!(
					user_id = user.id,
					username = user.username(),
					"✅ Link shortened."
				);
			},

			Request::Media(media, caption) => {
				let Some(long_url) = extract_url(caption) else {
					self.send_message(chat_id, reply::INVALID_CAPTION_LINK)
						.await;
					return Ok(());
				};
				let Some(short_url) = self.shorten(long_url).await else {
					self.send_message(chat_id, reply::MEDIA_SHORTENER_FAILED)
						.await;
					return Ok(());
				};
				self.save(long_url, &short_url).await;
				let caption = reply::short_link(&short_url);
				if let Err(error) = self
					.state
					.telegram
					.send_media(chat_id, &media, &caption)
					.await
				{
					tracing::error!(chat_id, kind = %media.kind, error = %error.trace(), "Failed to send the media.");
				}
				tracing::info!(
					user_id = user.id,
					username = user.username(),
					kind = %media.kind,
					"✅ Media link shortened."
				);
			},

			Request::Ignore => {},
		}

		Ok(())
	}

	/// Shorten a link, treating a service failure the same as a declined link.
	async fn shorten(&self, long_url: &str) -> Option<String> {
		match self.state.shortener.shorten(long_url).await {
			Ok(short_url) => short_url,
			Err(error) => {
				tracing::error!(error = %error.trace(), "Failed to shorten the link.");
				None
			},
		}
	}

	/// Record a link. A failure here does not keep the user from getting their link.
	async fn save(&self, long_url: &str, short_url: &str) {
		let link = Link::new(long_url, short_url);
		if let Err(error) = self.state.store.insert(&link).await {
			tracing::error!(error = %error.trace(), "Failed to save the link.");
		}
	}

	async fn send_message(&self, chat_id: i64, text: &str) {
		if let Err(error) = self.state.telegram.send_message(chat_id, text).await {
			tracing::error!(chat_id, error = %error.trace(), "Failed to send the message.");
		}
	}
}

impl<'a> Request<'a> {
	fn parse(message: &'a Message) -> Request<'a> {
		let text = message.text.as_deref().unwrap_or_default();
		if text.starts_with("/start") {
			return Request::Start;
		}
		if text.starts_with("/myid") {
			return Request::MyId;
		}
		if let Some(text) = message.text() {
			return Request::Text(text);
		}
		if let Some(media) = message.media() {
			let caption = message.caption.as_deref().unwrap_or_default();
			return Request::Media(media, caption);
		}
		Request::Ignore
	}
}
