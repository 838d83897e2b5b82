pub mod results;
pub mod search;
pub mod watcher;

pub use crate::domain::model::{Availability, ResultRow, TripQuery};
pub use crate::domain::ports::{Browser, Clock, Notifier, SessionDriver};
pub use crate::utils::error::Result;
