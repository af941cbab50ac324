//! The texts the bot sends.

pub const INVALID_LINK: &str = "❌ Please send a valid link.";

pub const INVALID_CAPTION_LINK: &str = "❌ Please put a valid link in the caption.";

pub const SHORTENER_FAILED: &str = "❌ URL shortener failed. Please try again.";

pub const MEDIA_SHORTENER_FAILED: &str = "❌ Shortener failed.";

pub const ERROR: &str = "❌ An error occurred. Please try again.";

#[must_use]
pub fn access_denied(user_id: i64) -> String {
	format!(
		"❌ Access Denied!\n\n\
		⚠️ This bot is for authorized admins only.\n\
		Your User ID: `{user_id}`\n\n\
		Contact the bot owner to get access."
	)
}

#[must_use]
pub fn welcome(first_name: &str, user_id: i64) -> String {
	format!(
		"👋 Welcome Admin {first_name}!\n\n\
		🔗 Send me any link to shorten.\n\
		📷 You can also send media with URL in caption.\n\n\
		Your User ID: `{user_id}`"
	)
}

#[must_use]
pub fn user_id(user_id: i64) -> String {
	format!("Your User ID: `{user_id}`")
}

#[must_use]
pub fn shortened(short_url: &str) -> String {
	format!("✅ Shortened URL:\n\n{short_url}")
}

/// The caption of media sent back with its short link.
#[must_use]
pub fn short_link(short_url: &str) -> String {
	format!("✅ Short Link:\n\n{short_url}")
}
