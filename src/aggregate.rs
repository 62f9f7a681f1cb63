//! Summary tables derived from a `Records` set.
//!
//! Every function here is total: an empty record set produces an empty table. Tables sorted by a
//! measure use a stable sort, so groups that tie keep the order in which they were first seen in
//! the record set.

use crate::model::{Record, Records};
use chrono::{Datelike, Month, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::hash::Hash;
use tracing::warn;

/// A measure keyed by place, along with the coordinates of the first record seen for that place.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaceTotal<M> {
    pub place: String,
    pub lat: f64,
    pub lon: f64,
    pub value: M,
}

/// A measure for one calendar month. `month_end` is the last day of the month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthTotal<M> {
    pub month_end: NaiveDate,
    pub year: i32,
    pub month: String,
    pub value: M,
}

/// A measure keyed by product category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryTotal<M> {
    pub category: String,
    pub value: M,
}

/// Revenue and number of sales for one salesperson.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SellerTotal {
    pub seller: String,
    pub revenue: Decimal,
    pub count: u64,
}

/// Revenue and sales count per salesperson, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SellerTable(Vec<SellerTotal>);

impl SellerTable {
    pub fn rows(&self) -> &[SellerTotal] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns `(revenue, count)` for `seller`.
    pub fn get(&self, seller: &str) -> Option<(Decimal, u64)> {
        self.0
            .iter()
            .find(|row| row.seller == seller)
            .map(|row| (row.revenue, row.count))
    }

    /// The `k` sellers with the highest revenue, highest first.
    pub fn top_by_revenue(&self, k: usize) -> Vec<SellerTotal> {
        let mut rows = self.0.clone();
        rows.sort_by(|a, b| b.revenue.cmp(&a.revenue));
        rows.truncate(k);
        rows
    }

    /// The `k` sellers with the most sales, most first.
    pub fn top_by_count(&self, k: usize) -> Vec<SellerTotal> {
        let mut rows = self.0.clone();
        rows.sort_by(|a, b| b.count.cmp(&a.count));
        rows.truncate(k);
        rows
    }
}

pub fn revenue_by_place(records: &Records) -> Vec<PlaceTotal<Decimal>> {
    let mut rows = by_place(records, |total: &mut Decimal, r| *total += r.price());
    rows.sort_by(|a, b| b.value.cmp(&a.value));
    rows
}

pub fn count_by_place(records: &Records) -> Vec<PlaceTotal<u64>> {
    let mut rows = by_place(records, |count: &mut u64, _| *count += 1);
    rows.sort_by(|a, b| b.value.cmp(&a.value));
    rows
}

pub fn revenue_by_month(records: &Records) -> Vec<MonthTotal<Decimal>> {
    by_month(records, |total: &mut Decimal, r| *total += r.price())
}

pub fn count_by_month(records: &Records) -> Vec<MonthTotal<u64>> {
    by_month(records, |count: &mut u64, _| *count += 1)
}

pub fn revenue_by_category(records: &Records) -> Vec<CategoryTotal<Decimal>> {
    let mut rows: Vec<CategoryTotal<Decimal>> =
        group_by(records, Record::category, |total: &mut Decimal, r| {
            *total += r.price()
        })
        .into_iter()
        .map(|(category, value)| CategoryTotal {
            category: category.to_string(),
            value,
        })
        .collect();
    rows.sort_by(|a, b| b.value.cmp(&a.value));
    rows
}

pub fn count_by_category(records: &Records) -> Vec<CategoryTotal<u64>> {
    let mut rows: Vec<CategoryTotal<u64>> =
        group_by(records, Record::category, |count: &mut u64, _| *count += 1)
            .into_iter()
            .map(|(category, value)| CategoryTotal {
                category: category.to_string(),
                value,
            })
            .collect();
    rows.sort_by(|a, b| b.value.cmp(&a.value));
    rows
}

pub fn by_salesperson(records: &Records) -> SellerTable {
    let rows = group_by(
        records,
        Record::seller,
        |(revenue, count): &mut (Decimal, u64), r| {
            *revenue += r.price();
            *count += 1;
        },
    )
    .into_iter()
    .map(|(seller, (revenue, count))| SellerTotal {
        seller: seller.to_string(),
        revenue,
        count,
    })
    .collect();
    SellerTable(rows)
}

/// Groups `records` by `key` and folds each record into its group's accumulator. Groups are
/// returned in first-seen order.
fn group_by<'a, K, A, FK, FA>(records: &'a Records, key: FK, mut fold: FA) -> Vec<(K, A)>
where
    K: Eq + Hash + Clone,
    A: Default,
    FK: Fn(&'a Record) -> K,
    FA: FnMut(&mut A, &'a Record),
{
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut groups: Vec<(K, A)> = Vec::new();
    for record in records.iter() {
        let k = key(record);
        let ix = *index.entry(k.clone()).or_insert_with(|| {
            groups.push((k, A::default()));
            groups.len() - 1
        });
        fold(&mut groups[ix].1, record);
    }
    groups
}

/// Groups by place. Coordinates come from the first record seen for each place; a later record
/// that disagrees is logged once per place and otherwise ignored.
fn by_place<M, F>(records: &Records, mut fold: F) -> Vec<PlaceTotal<M>>
where
    M: Default,
    F: FnMut(&mut M, &Record),
{
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut conflicts: HashSet<&str> = HashSet::new();
    let mut rows: Vec<PlaceTotal<M>> = Vec::new();
    for record in records.iter() {
        let place = record.place();
        let ix = match index.get(place) {
            Some(&ix) => {
                let row = &rows[ix];
                if (row.lat != record.lat() || row.lon != record.lon()) && conflicts.insert(place)
                {
                    warn!(
                        "Place '{place}' has conflicting coordinates ({}, {}) and ({}, {}), \
                        keeping the first",
                        row.lat,
                        row.lon,
                        record.lat(),
                        record.lon()
                    );
                }
                ix
            }
            None => {
                rows.push(PlaceTotal {
                    place: place.to_string(),
                    lat: record.lat(),
                    lon: record.lon(),
                    value: M::default(),
                });
                index.insert(place, rows.len() - 1);
                rows.len() - 1
            }
        };
        fold(&mut rows[ix].value, record);
    }
    rows
}

/// Buckets by calendar month. The result covers every month from the earliest to the latest
/// record, months without records carrying `M::default()`.
fn by_month<M, F>(records: &Records, mut fold: F) -> Vec<MonthTotal<M>>
where
    M: Default,
    F: FnMut(&mut M, &Record),
{
    let mut buckets: BTreeMap<(i32, u32), M> = BTreeMap::new();
    for record in records.iter() {
        let date = record.date();
        fold(buckets.entry((date.year(), date.month())).or_default(), record);
    }

    let (first, last) = match (buckets.keys().next(), buckets.keys().next_back()) {
        (Some(first), Some(last)) => (*first, *last),
        _ => return Vec::new(),
    };

    let mut rows = Vec::new();
    let (mut year, mut month) = first;
    while (year, month) <= last {
        let value = buckets.remove(&(year, month)).unwrap_or_default();
        if let Some(row) = month_total(year, month, value) {
            rows.push(row);
        }
        (year, month) = if month == 12 {
            (year + 1, 1)
        } else {
            (year, month + 1)
        };
    }
    rows
}

fn month_total<M>(year: i32, month: u32, value: M) -> Option<MonthTotal<M>> {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    let month_end = NaiveDate::from_ymd_opt(next_year, next_month, 1)?.pred_opt()?;
    let name = Month::try_from(u8::try_from(month).ok()?).ok()?.name();
    Some(MonthTotal {
        month_end,
        year,
        month: name.to_string(),
        value,
    })
}
