use super::Store;
use crate::{
	error::{Result, WrapErr},
	link::Link,
};
use async_trait::async_trait;
use mongodb::{bson, options::ClientOptions, Client, Collection};

const COLLECTION: &str = "links";

const MAX_POOL_SIZE: u32 = 50;

/// A store backed by the `links` collection of a MongoDB database.
#[derive(Clone, Debug)]
pub struct Mongo {
	collection: Collection<Document>,
}

/// The stored shape of a link.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
struct Document {
	#[serde(rename = "longURL")]
	long_url: String,
	#[serde(rename = "shortURL")]
	short_url: String,
	created_at: bson::DateTime,
}

impl Mongo {
	/// Configure a client for the database. Connections are opened lazily, on first use.
	pub async fn connect(uri: &str, database: &str) -> Result<Mongo> {
		let mut options = ClientOptions::parse(uri)
			.await
			.wrap_err("Failed to parse the MongoDB connection string.")?;
		options.max_pool_size = Some(MAX_POOL_SIZE);
		options.app_name.get_or_insert_with(|| "shortener".to_owned());
		let client =
			Client::with_options(options).wrap_err("Failed to create the MongoDB client.")?;
		let collection = client.database(database).collection(COLLECTION);
		Ok(Mongo { collection })
	}
}

#[async_trait]
impl Store for Mongo {
	async fn insert(&self, link: &Link) -> Result<()> {
		let document = Document::from(link);
		self.collection
			.insert_one(&document)
			.await
			.wrap_err("Failed to insert the link.")?;
		Ok(())
	}
}

impl From<&Link> for Document {
	fn from(link: &Link) -> Self {
		Document {
			long_url: link.long_url.clone(),
			short_url: link.short_url.clone(),
			created_at: bson::DateTime::from_millis(link.created_at.timestamp_millis()),
		}
	}
}
