#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::module_name_repetitions)]

pub mod channels;
pub mod config;
pub mod errors;
pub mod gateway;
pub mod providers;
pub mod relay;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
