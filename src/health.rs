use crate::{
	error::{Result, WrapErr},
	util::http::{internal_server_error, json, not_found, not_implemented, Incoming, Outgoing},
};
use chrono::{SecondsFormat, Utc};
use hyper_util::rt::TokioIo;
use std::{convert::Infallible, net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

pub const BOT_NAME: &str = "shortener-admin";

/// The health check server.
pub struct Server {
	listener: TcpListener,
	inner: Arc<Inner>,
}

struct Inner {
	workers: usize,
	admins: usize,
}

/// The body of a health check response.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Status {
	pub status: String,
	pub bot: String,
	pub timestamp: String,
	pub workers: usize,
	pub admins: usize,
}

impl Server {
	pub async fn bind(addr: SocketAddr, workers: usize, admins: usize) -> Result<Server> {
		let listener = TcpListener::bind(addr)
			.await
			.wrap_err_with(|| format!("Failed to bind the health check server to {addr}."))?;
		let inner = Arc::new(Inner { workers, admins });
		Ok(Server { listener, inner })
	}

	pub fn local_addr(&self) -> Result<SocketAddr> {
		let addr = self.listener.local_addr()?;
		Ok(addr)
	}

	/// Accept connections until `shutdown` is cancelled.
	pub async fn serve(self, shutdown: CancellationToken) -> Result<()> {
		tracing::info!(addr = %self.local_addr()?, "✅ Health check server running.");

		loop {
			// Accept a new connection.
			let stream = tokio::select! {
				biased;
				() = shutdown.cancelled() => break,
				result = self.listener.accept() => {
					let (stream, _) = result.wrap_err("Failed to accept a new TCP connection.")?;
					TokioIo::new(stream)
				},
			};

			// Create the service.
			let service = hyper::service::service_fn({
				let inner = self.inner.clone();
				move |request: http::Request<Incoming>| {
					let inner = inner.clone();
					async move { Ok::<_, Infallible>(inner.handle_request(&request)) }
				}
			});

			// Spawn the connection.
			tokio::spawn(async move {
				let connection = hyper::server::conn::http1::Builder::new()
					.serve_connection(stream, service);
				if let Err(error) = connection.await {
					tracing::debug!(?error, "Failed to serve the connection.");
				}
			});
		}

		tracing::info!("Health check server stopped.");
		Ok(())
	}
}

impl Inner {
	fn handle_request<B>(&self, request: &http::Request<B>) -> http::Response<Outgoing> {
		tracing::debug!(method = ?request.method(), path = ?request.uri().path(), "Received request.");
		if request.method() != http::Method::GET {
			return not_implemented();
		}
		match request.uri().path() {
			"/" | "/health" => json(&self.status()).unwrap_or_else(|error| {
				tracing::error!(?error, "Failed to serialize the status.");
				internal_server_error()
			}),
			_ => not_found(),
		}
	}

	fn status(&self) -> Status {
		Status {
			status: "healthy".to_owned(),
			bot: BOT_NAME.to_owned(),
			timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true),
			workers: self.workers,
			admins: self.admins,
		}
	}
}
