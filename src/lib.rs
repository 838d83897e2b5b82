pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliArgs;

pub use config::WatchConfig;
pub use core::watcher::{WatchReport, Watcher};
pub use domain::model::{Availability, Credentials, TripQuery};
pub use utils::error::{Result, WatchError};
