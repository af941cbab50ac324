use crate::error::{Result, WrapErr};
use async_trait::async_trait;
use std::time::Duration;
use url::Url;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// A link shortening service.
#[async_trait]
pub trait Shortener: Send + Sync + 'static {
	/// Shorten a link. `Ok(None)` means the service declined it.
	async fn shorten(&self, long_url: &str) -> Result<Option<String>>;
}

/// The ViralBox shortening API.
#[derive(Clone)]
pub struct ViralBox {
	client: reqwest::Client,
	url: Url,
	api_key: String,
}

#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct Response {
	#[serde(default)]
	status: Option<String>,
	#[serde(default)]
	shortened_url: Option<String>,
}

impl ViralBox {
	pub fn new(url: Url, api_key: impl Into<String>) -> Result<ViralBox> {
		let client = reqwest::Client::builder()
			.timeout(REQUEST_TIMEOUT)
			.build()
			.wrap_err("Failed to create the HTTP client.")?;
		Ok(ViralBox {
			client,
			url,
			api_key: api_key.into(),
		})
	}
}

impl std::fmt::Debug for ViralBox {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ViralBox")
			.field("url", &self.url.as_str())
			.finish_non_exhaustive()
	}
}

#[async_trait]
impl Shortener for ViralBox {
	async fn shorten(&self, long_url: &str) -> Result<Option<String>> {
		let response = self
			.client
			.get(self.url.clone())
			.query(&[("api", self.api_key.as_str()), ("url", long_url)])
			.send()
			.await
			.wrap_err("Failed to send the shorten request.")?;
		let response: Response = response
			.json()
			.await
			.wrap_err("Failed to decode the shorten response.")?;
		Ok(response.into_short_url())
	}
}

impl Response {
	fn into_short_url(self) -> Option<String> {
		if self.status.as_deref() != Some("success") {
			return None;
		}
		self.shortened_url.filter(|url| !url.is_empty())
	}
}
