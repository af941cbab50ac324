use crate::error::{error, Result, WrapErr};
use std::{collections::BTreeSet, net::SocketAddr};
use url::Url;

pub const DEFAULT_TELEGRAM_API_URL: &str = "https://api.telegram.org";

pub const DEFAULT_VIRALBOX_API_URL: &str = "https://viralbox.in/api";

/// The raw settings, read from flags or the environment.
#[derive(Clone, Debug, clap::Parser)]
#[command(about, version)]
pub struct Args {
	/// The Telegram bot token.
	#[arg(long, env = "SHORTENER_BOT_TOKEN", hide_env_values = true)]
	pub bot_token: Option<String>,

	/// The ViralBox API key.
	#[arg(long, env = "API_KEY", hide_env_values = true)]
	pub api_key: Option<String>,

	/// The MongoDB connection string.
	#[arg(long, env = "MONGODB_URI", hide_env_values = true)]
	pub mongodb_uri: Option<String>,

	/// The MongoDB database that holds the links collection.
	#[arg(long, env = "MONGO_DB_NAME", default_value = "viralbox_db")]
	pub mongo_db_name: String,

	/// The port the health check server listens on.
	#[arg(long, env = "PORT", default_value_t = 8000)]
	pub port: u16,

	/// The maximum number of messages processed at once.
	#[arg(long, env = "MAX_WORKERS", default_value_t = 10)]
	pub max_workers: usize,

	/// A comma separated list of the Telegram user ids allowed to use the bot.
	#[arg(long, env = "ADMIN_IDS", default_value = "")]
	pub admin_ids: String,

	#[arg(long, env = "TELEGRAM_API_URL", default_value = DEFAULT_TELEGRAM_API_URL)]
	pub telegram_api_url: Url,

	#[arg(long, env = "VIRALBOX_API_URL", default_value = DEFAULT_VIRALBOX_API_URL)]
	pub viralbox_api_url: Url,
}

/// The validated configuration.
#[derive(Clone, Debug)]
pub struct Config {
	pub bot_token: String,
	pub api_key: String,
	pub mongodb_uri: String,
	pub mongo_db_name: String,
	pub port: u16,
	pub max_workers: usize,
	pub admin_ids: BTreeSet<i64>,
	pub telegram_api_url: Url,
	pub viralbox_api_url: Url,
}

impl Config {
	pub fn from_args(args: Args) -> Result<Config> {
		let (Some(bot_token), Some(api_key), Some(mongodb_uri)) = (
			non_empty(args.bot_token),
			non_empty(args.api_key),
			non_empty(args.mongodb_uri),
		) else {
			return Err(error!(
				"SHORTENER_BOT_TOKEN, MONGODB_URI and API_KEY must be set."
			));
		};

		let admin_ids = parse_admin_ids(&args.admin_ids)?;
		if admin_ids.is_empty() {
			return Err(error!("ADMIN_IDS must be set."));
		}

		if args.max_workers == 0 {
			return Err(error!("MAX_WORKERS must be at least 1."));
		}

		Ok(Config {
			bot_token,
			api_key,
			mongodb_uri,
			mongo_db_name: args.mongo_db_name,
			port: args.port,
			max_workers: args.max_workers,
			admin_ids,
			telegram_api_url: args.telegram_api_url,
			viralbox_api_url: args.viralbox_api_url,
		})
	}

	/// The address the health check server binds.
	#[must_use]
	pub fn health_addr(&self) -> SocketAddr {
		SocketAddr::from(([0, 0, 0, 0], self.port))
	}
}

/// Parse a comma separated list of user ids. Blank entries are skipped.
pub fn parse_admin_ids(value: &str) -> Result<BTreeSet<i64>> {
	value
		.split(',')
		.map(str::trim)
		.filter(|id| !id.is_empty())
		.map(|id| {
			id.parse::<i64>()
				.wrap_err_with(|| format!(r#"Invalid admin id "{id}"."#))
		})
		.collect()
}

fn non_empty(value: Option<String>) -> Option<String> {
	value.filter(|value| !value.trim().is_empty())
}
