use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

static URL_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"https?://\S+").unwrap());

/// A shortened link, as recorded in the store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Link {
	pub long_url: String,
	pub short_url: String,
	pub created_at: DateTime<Utc>,
}

impl Link {
	#[must_use]
	pub fn new(long_url: impl Into<String>, short_url: impl Into<String>) -> Link {
		Link {
			long_url: long_url.into(),
			short_url: short_url.into(),
			created_at: Utc::now(),
		}
	}
}

/// Find the first http or https link in the text.
#[must_use]
pub fn extract_url(text: &str) -> Option<&str> {
	URL_PATTERN.find(text).map(|m| m.as_str())
}
