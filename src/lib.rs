//! sales-dash: fetch sales transactions and turn them into a revenue, sales count and top sellers
//! dashboard.

pub mod aggregate;
pub mod api;
pub mod args;
pub mod commands;
mod config;
pub mod dashboard;
mod error;
mod format;
pub mod model;
#[cfg(test)]
mod test;
mod utils;

pub use api::Mode;
pub use config::Config;
pub use dashboard::{render, Dashboard, Filters};
pub use error::Error;
pub use error::Result;
pub use format::format_number;
pub use model::{Record, Records, Region};
