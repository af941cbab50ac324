use super::http::{full, Incoming};
use bytes::Bytes;
use http_body_util::BodyExt;
use hyper_util::rt::TokioIo;
use std::{
	net::SocketAddr,
	sync::{Arc, Mutex},
};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use url::Url;

/// A local HTTP server that records every request and answers each with the same status and JSON body.
pub struct Server {
	addr: SocketAddr,
	requests: Arc<Mutex<Vec<Request>>>,
	shutdown: CancellationToken,
}

#[derive(Clone, Debug)]
pub struct Request {
	pub method: http::Method,
	pub path: String,
	pub query: Option<String>,
	pub body: Bytes,
}

impl Server {
	pub async fn start(status: http::StatusCode, body: serde_json::Value) -> Server {
		let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
		let addr = listener.local_addr().unwrap();
		let requests = Arc::new(Mutex::new(Vec::new()));
		let shutdown = CancellationToken::new();
		let body = Bytes::from(serde_json::to_vec(&body).unwrap());

		tokio::spawn({
			let requests = requests.clone();
			let shutdown = shutdown.clone();
			async move {
				loop {
					let stream = tokio::select! {
						biased;
						() = shutdown.cancelled() => break,
						result = listener.accept() => TokioIo::new(result.unwrap().0),
					};
					let service = hyper::service::service_fn({
						let requests = requests.clone();
						let body = body.clone();
						move |request: http::Request<Incoming>| {
							let requests = requests.clone();
							let body = body.clone();
							async move {
								let (parts, incoming) = request.into_parts();
								let received = incoming.collect().await?.to_bytes();
								requests.lock().unwrap().push(Request {
									method: parts.method,
									path: parts.uri.path().to_owned(),
									query: parts.uri.query().map(ToOwned::to_owned),
									body: received,
								});
								let response = http::Response::builder()
									.status(status)
									.header(http::header::CONTENT_TYPE, "application/json")
									.body(full(body))
									.unwrap();
								Ok::<_, hyper::Error>(response)
							}
						}
					});
					tokio::spawn(async move {
						hyper::server::conn::http1::Builder::new()
							.serve_connection(stream, service)
							.await
							.ok();
					});
				}
			}
		});

		Server {
			addr,
			requests,
			shutdown,
		}
	}

	pub fn url(&self, path: &str) -> Url {
		format!("http://{}{path}", self.addr).parse().unwrap()
	}

	pub fn requests(&self) -> Vec<Request> {
		self.requests.lock().unwrap().clone()
	}
}

impl Drop for Server {
	fn drop(&mut self) {
		self.shutdown.cancel();
	}
}
