use std::sync::Arc;
use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// An error with the place it was raised and the error that caused it.
#[derive(Clone, Debug, Error)]
#[error("{message}")]
pub struct Error {
	message: String,
	location: Option<Location>,
	source: Option<Arc<Error>>,
}

/// Where in this crate an error was raised.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Location {
	pub file: &'static str,
	pub line: u32,
}

/// Renders an error and its causes on one line, so the chain stays within a single log field.
pub struct Trace<'a>(&'a Error);

pub trait WrapErr<T>: Sized {
	#[track_caller]
	fn wrap_err(self, message: impl std::fmt::Display) -> Result<T> {
		self.wrap_err_with(|| message)
	}

	#[track_caller]
	fn wrap_err_with<C, F>(self, f: F) -> Result<T>
	where
		C: std::fmt::Display,
		F: FnOnce() -> C;
}

impl Error {
	#[track_caller]
	pub fn with_message(message: impl std::fmt::Display) -> Error {
		Error {
			message: message.to_string(),
			location: Some(Location::caller()),
			source: None,
		}
	}

	/// Convert a foreign error, keeping its chain of sources as messages.
	pub fn with_error(error: &(dyn std::error::Error + 'static)) -> Error {
		Error {
			message: error.to_string(),
			location: None,
			source: error.source().map(|source| Arc::new(Error::with_error(source))),
		}
	}

	/// A Bot API call that Telegram answered with `ok: false`.
	#[track_caller]
	pub fn api(method: &str, status: http::StatusCode, description: Option<&str>) -> Error {
		let description = description.unwrap_or("no description");
		Error::with_message(format!("{method} failed ({status}): {description}"))
	}

	#[must_use]
	pub fn message(&self) -> &str {
		&self.message
	}

	#[must_use]
	pub fn location(&self) -> Option<Location> {
		self.location
	}

	#[must_use]
	pub fn trace(&self) -> Trace<'_> {
		Trace(self)
	}

	#[track_caller]
	fn wrap_with(self, message: impl std::fmt::Display) -> Error {
		Error {
			message: message.to_string(),
			location: Some(Location::caller()),
			source: Some(Arc::new(self)),
		}
	}
}

impl Location {
	#[must_use]
	#[track_caller]
	pub fn caller() -> Location {
		let location = std::panic::Location::caller();
		Location {
			file: location.file(),
			line: location.line(),
		}
	}
}

impl std::fmt::Display for Location {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}:{}", self.file, self.line)
	}
}

impl std::fmt::Display for Trace<'_> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let mut next = Some(self.0);
		let mut first = true;
		while let Some(error) = next {
			if !first {
				f.write_str(" <- ")?;
			}
			first = false;
			write!(f, "{}", error.message)?;
			if let Some(location) = &error.location {
				write!(f, " ({location})")?;
			}
			next = error.source.as_deref();
		}
		Ok(())
	}
}

impl<T, E> WrapErr<T> for Result<T, E>
where
	E: Into<Error>,
{
	#[track_caller]
	fn wrap_err_with<C, F>(self, f: F) -> Result<T>
	where
		C: std::fmt::Display,
		F: FnOnce() -> C,
	{
		match self {
			Ok(value) => Ok(value),
			Err(error) => Err(error.into().wrap_with(f())),
		}
	}
}

impl<T> WrapErr<T> for Option<T> {
	#[track_caller]
	fn wrap_err_with<C, F>(self, f: F) -> Result<T>
	where
		C: std::fmt::Display,
		F: FnOnce() -> C,
	{
		match self {
			Some(value) => Ok(value),
			None => Err(Error::with_message(f())),
		}
	}
}

macro_rules! from_error {
	($($ty:ty),* $(,)?) => {
		$(
			impl From<$ty> for Error {
				fn from(error: $ty) -> Error {
					Error::with_error(&error)
				}
			}
		)*
	};
}

from_error!(
	std::io::Error,
	std::num::ParseIntError,
	mongodb::error::Error,
	reqwest::Error,
	serde_json::Error,
	tokio::task::JoinError,
);

#[macro_export]
macro_rules! error {
	($($t:tt)*) => {{
		$crate::error::Error::with_message(format!($($t)*))
	}};
}

pub use error;
