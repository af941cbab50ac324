use bytes::Bytes;
use http_body_util::{combinators::BoxBody, BodyExt, Empty, Full};

pub type Incoming = hyper::body::Incoming;
pub type Outgoing = BoxBody<Bytes, Box<dyn std::error::Error + Send + Sync + 'static>>;

#[must_use]
pub fn empty() -> Outgoing {
	Empty::new().map_err(|_| unreachable!()).boxed()
}

pub fn full(chunk: impl Into<Bytes>) -> Outgoing {
	Full::new(chunk.into()).map_err(|_| unreachable!()).boxed()
}

/// 200 with a JSON body.
pub fn json<T>(value: &T) -> Result<http::Response<Outgoing>, serde_json::Error>
where
	T: serde::Serialize,
{
	let body = serde_json::to_vec(value)?;
	let response = http::Response::builder()
		.status(http::StatusCode::OK)
		.header(http::header::CONTENT_TYPE, "application/json")
		.body(full(body))
		.unwrap();
	Ok(response)
}

/// 404
#[must_use]
pub fn not_found() -> http::Response<Outgoing> {
	http::Response::builder()
		.status(http::StatusCode::NOT_FOUND)
		.body(empty())
		.unwrap()
}

/// 500
#[must_use]
pub fn internal_server_error() -> http::Response<Outgoing> {
	http::Response::builder()
		.status(http::StatusCode::INTERNAL_SERVER_ERROR)
		.body(full("Internal server error."))
		.unwrap()
}

/// 501
#[must_use]
pub fn not_implemented() -> http::Response<Outgoing> {
	http::Response::builder()
		.status(http::StatusCode::NOT_IMPLEMENTED)
		.body(empty())
		.unwrap()
}
