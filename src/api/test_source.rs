//! Implements the `Source` trait using in-memory data for testing purposes.
//!
//! Note: this is compiled even in the "production" version of this app so that we can run the whole
//! app, top-to-bottom, without the sales data service.

use crate::api::{Query, Source};
use crate::model::{Record, Records};
use crate::Result;
use anyhow::Context;
use chrono::Datelike;
use tracing::debug;

/// Seed data in the same JSON shape that the sales data service returns.
const SEED_RECORDS: &str = include_str!("seed_records.json");

/// An implementation of the `Source` trait that does not use the network. It holds its records in
/// memory and applies the region and year filters the way the service does.
pub(crate) struct TestSource {
    records: Records,
}

impl TestSource {
    pub(crate) fn new(records: Records) -> Self {
        Self { records }
    }
}

impl TestSource {
    /// Loads the seed data from this module.
    pub(crate) fn seeded() -> Result<Self> {
        Self::from_json(SEED_RECORDS).context("Unable to load the built-in seed records")
    }

    fn from_json(json: &str) -> Result<Self> {
        Ok(Self::new(Records::from_json(json)?))
    }
}

#[async_trait::async_trait]
impl Source for TestSource {
    async fn get(&mut self, query: &Query) -> Result<Records> {
        let matches = |r: &&Record| {
            query.region().contains(r.place())
                && query.year().map_or(true, |year| r.date().year() == year)
        };
        let data: Vec<Record> = self.records.iter().filter(matches).cloned().collect();
        debug!(
            "Test source returned {} of {} records for {query:?}",
            data.len(),
            self.records.len()
        );
        Ok(Records::new(data))
    }
}
