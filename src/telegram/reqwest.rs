use super::{Media, Telegram, Update};
use crate::error::{Error, Result, WrapErr};
use async_trait::async_trait;
use std::{sync::Arc, time::Duration};
use url::Url;

/// Requests to `getUpdates` are held open by Telegram for up to the poll timeout, so allow some slack on top of it.
const POLL_SLACK: Duration = Duration::from_secs(10);

const SEND_TIMEOUT: Duration = Duration::from_secs(10);

/// A Telegram Bot API client over HTTPS.
#[derive(Clone)]
pub struct Reqwest {
	state: Arc<State>,
}

struct State {
	client: reqwest::Client,
	url: String,
}

#[derive(Debug, serde::Serialize)]
struct GetUpdatesQuery {
	timeout: u64,
	#[serde(skip_serializing_if = "Option::is_none")]
	offset: Option<i64>,
}

#[derive(Debug, serde::Serialize)]
struct SendMessageBody<'a> {
	chat_id: i64,
	text: &'a str,
}

/// Every Bot API response is wrapped in this envelope, whatever the HTTP status.
#[derive(Debug, serde::Deserialize)]
struct Envelope<T> {
	ok: bool,
	#[serde(default)]
	description: Option<String>,
	result: Option<T>,
}

impl Reqwest {
	pub fn new(api_url: &Url, token: &str) -> Result<Self> {
		let client = reqwest::Client::builder()
			.build()
			.wrap_err("Failed to create the HTTP client.")?;
		let url = format!("{}/bot{token}", api_url.as_str().trim_end_matches('/'));
		let state = Arc::new(State { client, url });
		Ok(Self { state })
	}

	fn request(&self, method: reqwest::Method, name: &str) -> reqwest::RequestBuilder {
		let url = format!("{}/{name}", self.state.url);
		self.state.client.request(method, url)
	}
}

impl std::fmt::Debug for Reqwest {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		// The URL embeds the bot token.
		f.debug_struct("Reqwest").finish_non_exhaustive()
	}
}

#[async_trait]
impl Telegram for Reqwest {
	async fn get_updates(&self, offset: Option<i64>, timeout: u64) -> Result<Vec<Update>> {
		let query = GetUpdatesQuery { timeout, offset };
		let response = self
			.request(reqwest::Method::GET, "getUpdates")
			.query(&query)
			.timeout(Duration::from_secs(timeout) + POLL_SLACK)
			.send()
			.await
			.wrap_err("Failed to send the request.")?;
		let updates = read_envelope(response, "getUpdates").await?;
		Ok(updates.unwrap_or_default())
	}

	async fn send_message(&self, chat_id: i64, text: &str) -> Result<()> {
		let body = SendMessageBody { chat_id, text };
		let response = self
			.request(reqwest::Method::POST, "sendMessage")
			.json(&body)
			.timeout(SEND_TIMEOUT)
			.send()
			.await
			.wrap_err("Failed to send the request.")?;
		read_envelope::<serde_json::Value>(response, "sendMessage").await?;
		Ok(())
	}

	async fn send_media(&self, chat_id: i64, media: &Media, caption: &str) -> Result<()> {
		let method = media.kind.method();
		let mut body = serde_json::json!({
			"chat_id": chat_id,
			"caption": caption,
		});
		body[media.kind.as_str()] = serde_json::Value::String(media.file_id.clone());
		let response = self
			.request(reqwest::Method::POST, method)
			.json(&body)
			.timeout(SEND_TIMEOUT)
			.send()
			.await
			.wrap_err("Failed to send the request.")?;
		read_envelope::<serde_json::Value>(response, method).await?;
		Ok(())
	}
}

async fn read_envelope<T>(response: reqwest::Response, method: &str) -> Result<Option<T>>
where
	T: serde::de::DeserializeOwned,
{
	let status = response.status();
	let envelope: Envelope<T> = response
		.json()
		.await
		.wrap_err_with(|| format!("Failed to decode the {method} response ({status})."))?;
	if !envelope.ok {
		return Err(Error::api(method, status, envelope.description.as_deref()));
	}
	Ok(envelope.result)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{telegram::MediaKind, util::capture};
	use pretty_assertions::assert_eq;
	use serde_json::json;

	#[test]
	fn envelope_with_error() {
		let envelope: Envelope<Vec<Update>> = serde_json::from_str(
			r#"{"ok":false,"error_code":401,"description":"Unauthorized"}"#,
		)
		.unwrap();
		assert!(!envelope.ok);
		assert_eq!(envelope.description.as_deref(), Some("Unauthorized"));
		assert!(envelope.result.is_none());
	}

	#[test]
	fn envelope_with_updates() {
		let envelope: Envelope<Vec<Update>> = serde_json::from_str(
			r#"{"ok":true,"result":[{"update_id":1},{"update_id":2,"message":{"message_id":3,"chat":{"id":4}}}]}"#,
		)
		.unwrap();
		let updates = envelope.result.unwrap();
		assert_eq!(updates.len(), 2);
		assert_eq!(updates[1].message.as_ref().unwrap().chat.id, 4);
	}

	#[test]
	fn query_omits_a_missing_offset() {
		let query = serde_json::to_value(GetUpdatesQuery {
			timeout: 50,
			offset: None,
		})
		.unwrap();
		assert_eq!(query, serde_json::json!({ "timeout": 50 }));
	}

	#[test]
	fn debug_hides_the_token() {
		let url = "https://api.telegram.org".parse().unwrap();
		let client = Reqwest::new(&url, "123:secret").unwrap();
		assert!(!format!("{client:?}").contains("secret"));
		assert_eq!(client.state.url, "https://api.telegram.org/bot123:secret");
	}

	#[tokio::test]
	async fn get_updates_sends_the_offset_and_timeout() {
		let server = capture::Server::start(
			http::StatusCode::OK,
			json!({ "ok": true, "result": [{ "update_id": 9 }] }),
		)
		.await;
		let client = Reqwest::new(&server.url("/"), "123:abc").unwrap();
		let updates = client.get_updates(Some(9), 50).await.unwrap();
		assert_eq!(updates.len(), 1);

		let requests = server.requests();
		assert_eq!(requests.len(), 1);
		assert_eq!(requests[0].method, http::Method::GET);
		assert_eq!(requests[0].path, "/bot123:abc/getUpdates");
		assert_eq!(requests[0].query.as_deref(), Some("timeout=50&offset=9"));
	}

	#[tokio::test]
	async fn send_media_names_the_file_after_its_kind() {
		let server =
			capture::Server::start(http::StatusCode::OK, json!({ "ok": true, "result": {} })).await;
		let client = Reqwest::new(&server.url("/"), "123:abc").unwrap();
		let media = Media {
			kind: MediaKind::Voice,
			file_id: "f".to_owned(),
		};
		client.send_media(5, &media, "cap").await.unwrap();

		let requests = server.requests();
		assert_eq!(requests.len(), 1);
		assert_eq!(requests[0].method, http::Method::POST);
		assert_eq!(requests[0].path, "/bot123:abc/sendVoice");
		let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
		assert_eq!(body, json!({ "chat_id": 5, "caption": "cap", "voice": "f" }));
	}

	#[tokio::test]
	async fn refused_calls_fail_with_the_description() {
		let server = capture::Server::start(
			http::StatusCode::BAD_REQUEST,
			json!({ "ok": false, "error_code": 400, "description": "Bad Request: chat not found" }),
		)
		.await;
		let client = Reqwest::new(&server.url("/"), "123:abc").unwrap();
		let error = client.send_message(5, "hi").await.unwrap_err();
		assert_eq!(
			error.to_string(),
			"sendMessage failed (400 Bad Request): Bad Request: chat not found"
		);

		let requests = server.requests();
		assert_eq!(requests[0].path, "/bot123:abc/sendMessage");
		let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
		assert_eq!(body, json!({ "chat_id": 5, "text": "hi" }));
	}
}
