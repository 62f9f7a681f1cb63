//! Command handlers for the sales-dash CLI.
//!
//! This module contains implementations for all CLI subcommands.

mod init;
mod render;
mod schema;

use crate::api::{self, Mode};
use crate::dashboard::Filters;
use crate::model::Records;
use crate::{Config, Result};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Display, Formatter};
use tracing::{debug, info};

pub use init::init;
pub use render::{records, render, sellers};
pub use schema::schema;

/// The output type for a command. This allows the command to return a consistent message and,
/// optionally, structured data to print on stdout.
#[derive(Debug, Clone, Serialize)]
pub struct Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// A message that can be printed to the user regarding the outcome of the command execution.
    message: String,

    /// Any structured data that needs to be output from the call.
    structure: Option<T>,
}

impl<T, S> From<S> for Out<T>
where
    T: Debug + Clone + Serialize,
    S: Into<String>,
{
    fn from(value: S) -> Self {
        Out::new_message(value)
    }
}

impl<T> Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// Create a new `Out` object that has `Some(structure)`.
    pub fn new<S>(message: S, structure: T) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            structure: Some(structure),
        }
    }

    /// Create a new `Out` object that has `None` for `structure`.
    pub fn new_message<S>(message: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            structure: None,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn structure(&self) -> Option<&T> {
        self.structure.as_ref()
    }
}

impl<T> Out<T>
where
    T: Serialize + Clone + Debug + Display,
{
    /// Print the message to `info!` and the structured data (if it exists) to stdout.
    pub fn print(&self) {
        info!("{}", self.message);
        if let Some(structure) = self.structure() {
            println!("{structure}");
        }
    }
}

/// The format that `render` prints the dashboard in.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// The dashboard view model as pretty-printed JSON.
    #[default]
    Json,
    /// Plain text tables.
    Text,
}

serde_plain::derive_display_from_serialize!(OutputFormat);
serde_plain::derive_fromstr_from_deserialize!(OutputFormat);

/// Command output that is destined for stdout.
#[derive(Clone, Serialize)]
#[serde(untagged)]
pub enum Output {
    Json(serde_json::Value),
    Text(String),
    Csv(String),
}

impl Debug for Output {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Output::Json(v) => write!(f, "Output::Json({v:?})"),
            Output::Text(s) => write!(f, "Output::Text({} chars)", s.len()),
            Output::Csv(s) => write!(f, "Output::Csv({} chars)", s.len()),
        }
    }
}

impl Display for Output {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Output::Json(v) => match serde_json::to_string_pretty(v) {
                Ok(s) => write!(f, "{s}"),
                Err(_) => write!(f, "{v}"),
            },
            Output::Text(s) => write!(f, "{}", s.trim_end()),
            Output::Csv(s) => write!(f, "{}", s.trim_end()),
        }
    }
}

/// Fetches the records for `filters` from the source selected by `mode` and narrows them down to
/// the selected sellers.
async fn fetch(config: &Config, mode: Mode, filters: &Filters) -> Result<Records> {
    let mut source = api::source(config, mode).await?;
    let fetched = source.get(&filters.query()).await?;
    let fetched_len = fetched.len();
    let records = fetched.filter_sellers(filters.sellers());
    debug!(
        "Kept {} of {fetched_len} records after the seller filter",
        records.len()
    );
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_display() {
        let json = Output::Json(serde_json::json!({"a": 1}));
        assert_eq!(json.to_string(), "{\n  \"a\": 1\n}");
        assert_eq!(Output::Csv("a,b\n1,2\n".to_string()).to_string(), "a,b\n1,2");
    }

    #[test]
    fn test_output_format_from_str() {
        assert_eq!("text".parse::<OutputFormat>().unwrap(), OutputFormat::Text);
        assert_eq!(OutputFormat::Json.to_string(), "json");
        assert!("yaml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_out_from_message() {
        let out: Out<Output> = "done".into();
        assert_eq!(out.message(), "done");
        assert!(out.structure().is_none());
    }
}
