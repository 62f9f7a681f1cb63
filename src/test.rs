//! Shared test utilities for building records.
//!
//! This module is only compiled when running tests (`#[cfg(test)]`).

use crate::model::{Record, Records};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::io::Write;
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use tracing::Level;
use tracing_subscriber::fmt::MakeWriter;

/// Parses a decimal literal such as `"92.45"`.
pub(crate) fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

pub(crate) fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// Approximate coordinates that the sales data service uses for a few states.
fn coordinates(place: &str) -> (f64, f64) {
    match place {
        "SP" => (-22.19, -48.79),
        "RJ" => (-22.25, -42.66),
        "MG" => (-18.1, -44.38),
        "BA" => (-13.29, -41.71),
        "RS" => (-30.17, -53.5),
        "PR" => (-24.89, -51.55),
        _ => (0.0, 0.0),
    }
}

/// Builds a record with coordinates looked up from `place`.
pub(crate) fn record(
    category: &str,
    price: &str,
    (year, month, day): (i32, u32, u32),
    place: &str,
    seller: &str,
) -> Record {
    let (lat, lon) = coordinates(place);
    Record::new(
        category,
        dec(price),
        date(year, month, day),
        place,
        lat,
        lon,
        seller,
    )
}

/// A small mixed record set with ties, several places, months and sellers.
pub(crate) fn sample_records() -> Records {
    Records::new(vec![
        record("livros", "92.45", (2022, 1, 1), "BA", "Ana"),
        record("moveis", "1200.00", (2022, 1, 15), "SP", "Bia"),
        record("eletronicos", "3500.10", (2022, 3, 2), "SP", "Caio"),
        record("livros", "45.00", (2022, 3, 2), "RJ", "Ana"),
        record("brinquedos", "45.00", (2022, 4, 20), "MG", "Davi"),
        record("moveis", "800.00", (2022, 6, 30), "RJ", "Bia"),
        record("eletronicos", "1500.00", (2023, 1, 5), "PR", "Caio"),
        record("livros", "30.25", (2023, 2, 14), "RS", "Ana"),
        record("brinquedos", "120.00", (2023, 2, 28), "SP", "Davi"),
        record("moveis", "999.99", (2023, 7, 7), "MG", "Bia"),
    ])
}

/// Collects formatted log lines in memory.
#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<u8>>>);

impl Write for Captured {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for Captured {
    type Writer = Captured;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Runs `f` and returns its result along with the `warn!` and `error!` lines it logged.
pub(crate) fn capture_warnings<T>(f: impl FnOnce() -> T) -> (T, Vec<String>) {
    let captured = Captured::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(captured.clone())
        .with_ansi(false)
        .with_max_level(Level::WARN)
        .finish();
    let value = tracing::subscriber::with_default(subscriber, f);
    let text = String::from_utf8_lossy(&captured.0.lock().unwrap()).to_string();
    (value, text.lines().map(str::to_string).collect())
}
