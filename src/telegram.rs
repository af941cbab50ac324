use crate::error::Result;
use async_trait::async_trait;

pub mod reqwest;

pub use self::reqwest::Reqwest;

/// The long polling timeout passed to `getUpdates`, in seconds.
pub const POLL_TIMEOUT: u64 = 50;

/// A Telegram API client.
#[async_trait]
pub trait Telegram: Send + Sync + 'static {
	/// Wait for updates with an id of at least `offset`.
	async fn get_updates(&self, offset: Option<i64>, timeout: u64) -> Result<Vec<Update>>;

	async fn send_message(&self, chat_id: i64, text: &str) -> Result<()>;

	/// Send an already uploaded file back to a chat with a new caption.
	async fn send_media(&self, chat_id: i64, media: &Media, caption: &str) -> Result<()>;
}

#[derive(Clone, Debug, serde::Deserialize)]
pub struct Update {
	pub update_id: i64,
	#[serde(default)]
	pub message: Option<Message>,
}

#[derive(Clone, Debug, Default, serde::Deserialize)]
pub struct Message {
	pub message_id: i64,
	pub chat: Chat,
	#[serde(default)]
	pub from: Option<User>,
	#[serde(default)]
	pub text: Option<String>,
	#[serde(default)]
	pub caption: Option<String>,
	#[serde(default)]
	pub photo: Vec<File>,
	#[serde(default)]
	pub video: Option<File>,
	#[serde(default)]
	pub document: Option<File>,
	#[serde(default)]
	pub audio: Option<File>,
	#[serde(default)]
	pub voice: Option<File>,
	#[serde(default)]
	pub animation: Option<File>,
}

#[derive(Clone, Debug, Default, serde::Deserialize)]
pub struct Chat {
	pub id: i64,
}

#[derive(Clone, Debug, Default, serde::Deserialize)]
pub struct User {
	pub id: i64,
	#[serde(default)]
	pub username: Option<String>,
	#[serde(default)]
	pub first_name: Option<String>,
}

/// Any uploaded file. Only the id is needed to send it again.
#[derive(Clone, Debug, PartialEq, Eq, serde::Deserialize)]
pub struct File {
	pub file_id: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Media {
	pub kind: MediaKind,
	pub file_id: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MediaKind {
	Photo,
	Video,
	Document,
	Audio,
	Voice,
	Animation,
}

impl Message {
	/// The text, if the message has any.
	#[must_use]
	pub fn text(&self) -> Option<&str> {
		self.text.as_deref().filter(|text| !text.is_empty())
	}

	/// The first attached media, checked in the order of `MediaKind::ALL`.
	#[must_use]
	pub fn media(&self) -> Option<Media> {
		MediaKind::ALL.into_iter().find_map(|kind| {
			let file = match kind {
				MediaKind::Photo => self.photo.last(),
				MediaKind::Video => self.video.as_ref(),
				MediaKind::Document => self.document.as_ref(),
				MediaKind::Audio => self.audio.as_ref(),
				MediaKind::Voice => self.voice.as_ref(),
				MediaKind::Animation => self.animation.as_ref(),
			}?;
			Some(Media {
				kind,
				file_id: file.file_id.clone(),
			})
		})
	}
}

impl User {
	#[must_use]
	pub fn username(&self) -> &str {
		self.username.as_deref().unwrap_or("Unknown")
	}

	#[must_use]
	pub fn first_name(&self) -> &str {
		self.first_name.as_deref().unwrap_or("User")
	}
}

impl MediaKind {
	pub const ALL: [MediaKind; 6] = [
		MediaKind::Photo,
		MediaKind::Video,
		MediaKind::Document,
		MediaKind::Audio,
		MediaKind::Voice,
		MediaKind::Animation,
	];

	/// The field name used for this kind in messages and send requests.
	#[must_use]
	pub fn as_str(self) -> &'static str {
		match self {
			MediaKind::Photo => "photo",
			MediaKind::Video => "video",
			MediaKind::Document => "document",
			MediaKind::Audio => "audio",
			MediaKind::Voice => "voice",
			MediaKind::Animation => "animation",
		}
	}

	/// The Bot API method that sends this kind.
	#[must_use]
	pub fn method(self) -> &'static str {
		match self {
			MediaKind::Photo => "sendPhoto",
			MediaKind::Video => "sendVideo",
			MediaKind::Document => "sendDocument",
			MediaKind::Audio => "sendAudio",
			MediaKind::Voice => "sendVoice",
			MediaKind::Animation => "sendAnimation",
		}
	}
}

impl std::fmt::Display for MediaKind {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use pretty_assertions::assert_eq;

	#[test]
	fn decode_text_update() {
		let update: Update = serde_json::from_value(serde_json::json!({
			"update_id": 7,
			"message": {
				"message_id": 1,
				"date": 1_700_000_000,
				"chat": { "id": -100, "type": "private" },
				"from": { "id": 42, "is_bot": false, "first_name": "Ada", "username": "ada" },
				"text": "https://example.com"
			}
		}))
		.unwrap();
		assert_eq!(update.update_id, 7);
		let message = update.message.unwrap();
		assert_eq!(message.chat.id, -100);
		let from = message.from.as_ref().unwrap();
		assert_eq!((from.id, from.username(), from.first_name()), (42, "ada", "Ada"));
		assert_eq!(message.text(), Some("https://example.com"));
		assert_eq!(message.media(), None);
	}

	#[test]
	fn decode_update_without_message() {
		let update: Update = serde_json::from_value(serde_json::json!({
			"update_id": 8,
			"edited_message": { "message_id": 1, "chat": { "id": 1 } }
		}))
		.unwrap();
		assert!(update.message.is_none());
	}

	#[test]
	fn photo_uses_the_largest_size() {
		let message: Message = serde_json::from_value(serde_json::json!({
			"message_id": 1,
			"chat": { "id": 1 },
			"caption": "https://example.com",
			"photo": [
				{ "file_id": "small", "width": 90, "height": 90 },
				{ "file_id": "large", "width": 1280, "height": 1280 }
			]
		}))
		.unwrap();
		assert_eq!(message.text(), None);
		assert_eq!(
			message.media(),
			Some(Media {
				kind: MediaKind::Photo,
				file_id: "large".to_owned(),
			})
		);
	}

	#[test]
	fn media_kinds_are_checked_in_order() {
		let message: Message = serde_json::from_value(serde_json::json!({
			"message_id": 1,
			"chat": { "id": 1 },
			"animation": { "file_id": "gif" },
			"document": { "file_id": "doc" }
		}))
		.unwrap();
		assert_eq!(message.media().unwrap().kind, MediaKind::Document);
	}

	#[test]
	fn missing_names_have_fallbacks() {
		let user = User {
			id: 1,
			..Default::default()
		};
		assert_eq!(user.username(), "Unknown");
		assert_eq!(user.first_name(), "User");
	}

	#[test]
	fn empty_text_is_no_text() {
		let message = Message {
			text: Some(String::new()),
			..Default::default()
		};
		assert_eq!(message.text(), None);
	}

	#[test]
	fn methods() {
		let methods = MediaKind::ALL.map(MediaKind::method);
		assert_eq!(
			methods,
			[
				"sendPhoto",
				"sendVideo",
				"sendDocument",
				"sendAudio",
				"sendVoice",
				"sendAnimation"
			]
		);
	}
}
