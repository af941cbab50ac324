use crate::{error::Result, link::Link};
use async_trait::async_trait;

pub mod mongo;

pub use self::mongo::Mongo;

/// Where shortened links are recorded.
#[async_trait]
pub trait Store: Send + Sync + 'static {
	async fn insert(&self, link: &Link) -> Result<()>;
}

/// A store that keeps links in memory.
#[derive(Debug, Default)]
pub struct Memory {
	links: std::sync::Mutex<Vec<Link>>,
}

impl Memory {
	#[must_use]
	pub fn new() -> Memory {
		Memory::default()
	}

	#[must_use]
	pub fn links(&self) -> Vec<Link> {
		self.links.lock().unwrap().clone()
	}
}

#[async_trait]
impl Store for Memory {
	async fn insert(&self, link: &Link) -> Result<()> {
		self.links.lock().unwrap().push(link.clone());
		Ok(())
	}
}
