#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub use self::{
	bot::Bot,
	config::{Args, Config},
	error::{Error, Result, WrapErr},
	run::run,
};

pub mod bot;
pub mod config;
pub mod error;
pub mod health;
pub mod link;
mod run;
pub mod shortener;
pub mod store;
pub mod telegram;
pub mod util;
