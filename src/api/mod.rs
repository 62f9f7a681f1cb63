//! Access to the sales data service.
//!
//! The `Source` trait is the seam between the dashboard pipeline and wherever the sales records
//! come from. `HttpSource` talks to the real service, `TestSource` serves seed data from memory.

mod http;
mod test_source;

use crate::model::{Records, Region};
use crate::{Config, Result};
use std::ops::RangeInclusive;
use tracing::{debug, warn};

pub(crate) use http::HttpSource;
pub(crate) use test_source::TestSource;

/// When set to a non-empty value, the app reads its records from `TestSource` instead of the
/// network.
pub const TEST_MODE_ENV: &str = "SALES_DASH_IN_TEST_MODE";

/// The years that the sales data service has data for. Other years are allowed but will most
/// likely come back empty.
pub const YEARS: RangeInclusive<i32> = 2020..=2023;

/// Selects which `Source` implementation is used.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq)]
pub enum Mode {
    #[default]
    Http,
    Test,
}

impl Mode {
    /// Returns `Mode::Test` if `SALES_DASH_IN_TEST_MODE` is set and non-empty, otherwise
    /// `Mode::Http`.
    pub fn from_env() -> Self {
        match std::env::var(TEST_MODE_ENV) {
            Ok(value) if !value.is_empty() => Mode::Test,
            _ => Mode::Http,
        }
    }
}

/// The server-side filters sent with a fetch.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq)]
pub struct Query {
    region: Region,
    year: Option<i32>,
}

impl Query {
    /// Creates a query. `year` of `None` means all years.
    pub fn new(region: Region, year: Option<i32>) -> Self {
        if let Some(year) = year {
            if !YEARS.contains(&year) {
                warn!(
                    "Year {year} is outside of {}-{}, the service may not have data for it",
                    YEARS.start(),
                    YEARS.end()
                );
            }
        }
        Self { region, year }
    }

    pub fn region(&self) -> Region {
        self.region
    }

    pub fn year(&self) -> Option<i32> {
        self.year
    }

    /// The value of the region query parameter.
    pub fn region_value(&self) -> String {
        self.region.query_value()
    }

    /// The value of the year query parameter, empty for all years.
    pub fn year_value(&self) -> String {
        self.year.map(|y| y.to_string()).unwrap_or_default()
    }

    /// The two query string pairs, using the given parameter names.
    pub fn params<'a>(&self, region_param: &'a str, year_param: &'a str) -> [(&'a str, String); 2] {
        [
            (region_param, self.region_value()),
            (year_param, self.year_value()),
        ]
    }
}

/// Something that can produce the sales records matching a `Query`.
#[async_trait::async_trait]
pub trait Source {
    async fn get(&mut self, query: &Query) -> Result<Records>;
}

/// Creates the `Source` selected by `mode`.
pub async fn source(config: &Config, mode: Mode) -> Result<Box<dyn Source + Send>> {
    debug!("Creating a {mode:?} source");
    Ok(match mode {
        Mode::Http => Box::new(HttpSource::new(config)?),
        Mode::Test => Box::new(TestSource::seeded()?),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_values() {
        let q = Query::new(Region::CentroOeste, Some(2021));
        assert_eq!(q.region_value(), "centro-oeste");
        assert_eq!(q.year_value(), "2021");

        let q = Query::default();
        assert_eq!(q.region_value(), "");
        assert_eq!(q.year_value(), "");
    }

    #[test]
    fn test_query_params() {
        let q = Query::new(Region::Nordeste, None);
        assert_eq!(
            q.params("regiao", "ano"),
            [("regiao", "nordeste".to_string()), ("ano", String::new())]
        );
    }

    #[test]
    fn test_query_out_of_range_year_is_kept() {
        let q = Query::new(Region::Sul, Some(2019));
        assert_eq!(q.year(), Some(2019));
    }
}
