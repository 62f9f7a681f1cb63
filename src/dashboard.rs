//! The dashboard view model and the pure `render` function that builds it.
//!
//! A `Dashboard` is a description of what to draw, not a drawing: three tabs, each with two
//! metrics and a handful of chart descriptors, plus the record set they were computed from.

use crate::aggregate::{self, CategoryTotal, MonthTotal, PlaceTotal, SellerTotal};
use crate::api::Query;
use crate::format::{format_grouped, format_number};
use crate::model::{Records, Region};
use crate::Result;
use anyhow::ensure;
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt::Write;
use std::ops::RangeInclusive;
use tracing::debug;

/// How many places the "top places" bar charts show.
pub const TOP_PLACES: usize = 5;

/// The allowed number of sellers in the sellers tab.
pub const TOP_SELLERS: RangeInclusive<usize> = 2..=10;

/// The default number of sellers in the sellers tab.
pub const DEFAULT_TOP_SELLERS: usize = 5;

/// The user's choices for one render. Built once and never changed while rendering.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(try_from = "FiltersData")]
pub struct Filters {
    region: Region,
    year: Option<i32>,
    sellers: BTreeSet<String>,
    top_sellers: usize,
}

/// Unchecked `Filters` fields, validated by `Filters::new` when deserializing.
#[derive(Deserialize, JsonSchema)]
struct FiltersData {
    region: Region,
    year: Option<i32>,
    sellers: BTreeSet<String>,
    top_sellers: usize,
}

impl TryFrom<FiltersData> for Filters {
    type Error = crate::Error;

    fn try_from(data: FiltersData) -> Result<Self> {
        Filters::new(data.region, data.year, data.sellers, data.top_sellers)
    }
}

impl Default for Filters {
    fn default() -> Self {
        Self {
            region: Region::All,
            year: None,
            sellers: BTreeSet::new(),
            top_sellers: DEFAULT_TOP_SELLERS,
        }
    }
}

impl Filters {
    /// # Errors
    /// Returns an error if `top_sellers` is outside of `TOP_SELLERS`.
    pub fn new(
        region: Region,
        year: Option<i32>,
        sellers: impl IntoIterator<Item = String>,
        top_sellers: usize,
    ) -> Result<Self> {
        ensure!(
            TOP_SELLERS.contains(&top_sellers),
            "The number of sellers must be between {} and {}, got {top_sellers}",
            TOP_SELLERS.start(),
            TOP_SELLERS.end()
        );
        Ok(Self {
            region,
            year,
            sellers: sellers.into_iter().collect(),
            top_sellers,
        })
    }

    pub fn region(&self) -> Region {
        self.region
    }

    pub fn year(&self) -> Option<i32> {
        self.year
    }

    pub fn sellers(&self) -> &BTreeSet<String> {
        &self.sellers
    }

    pub fn top_sellers(&self) -> usize {
        self.top_sellers
    }

    /// The part of the filters that is applied by the sales data service.
    pub fn query(&self) -> Query {
        Query::new(self.region, self.year)
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    /// Points placed by latitude and longitude, sized by value.
    Map,
    /// One line per series.
    Line,
    Bar,
}

/// What a chart's values measure.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Measure {
    Revenue,
    Sales,
}

impl Measure {
    fn label(&self) -> &'static str {
        match self {
            Measure::Revenue => "Revenue",
            Measure::Sales => "Sales",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Point {
    pub label: String,
    #[serde(with = "rust_decimal::serde::float")]
    #[schemars(with = "f64")]
    pub value: Decimal,
    /// The line a point belongs to, e.g. the year of a monthly series.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub series: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lon: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Chart {
    pub kind: ChartKind,
    pub title: String,
    /// Name of the dimension the points are labelled with.
    pub dimension: String,
    pub measure: Measure,
    pub points: Vec<Point>,
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Metric {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Tab {
    pub title: String,
    pub metrics: Vec<Metric>,
    pub charts: Vec<Chart>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Dashboard {
    pub filters: Filters,
    pub tabs: Vec<Tab>,
    pub records: Records,
}

/// Builds the dashboard for `records`, which must already be narrowed down to `filters.sellers()`.
pub fn render(filters: &Filters, currency_prefix: &str, records: &Records) -> Dashboard {
    debug!("Rendering a dashboard for {} records", records.len());
    let metrics = vec![
        Metric {
            label: "Revenue".to_string(),
            value: format_number(records.total_revenue(), currency_prefix),
        },
        Metric {
            label: "Sales count".to_string(),
            value: format_number(records.len() as u64, ""),
        },
    ];

    let revenue_by_place = aggregate::revenue_by_place(records);
    let count_by_place = aggregate::count_by_place(records);
    let seller_table = aggregate::by_salesperson(records);
    let k = filters.top_sellers();

    let revenue = Tab {
        title: "Revenue".to_string(),
        metrics: metrics.clone(),
        charts: vec![
            map_chart("Revenue by state", Measure::Revenue, &revenue_by_place),
            month_chart(
                "Monthly revenue",
                Measure::Revenue,
                &aggregate::revenue_by_month(records),
            ),
            place_bar_chart(
                "Top states",
                Measure::Revenue,
                &revenue_by_place[..TOP_PLACES.min(revenue_by_place.len())],
            ),
            category_chart(
                "Revenue by category",
                Measure::Revenue,
                &aggregate::revenue_by_category(records),
            ),
        ],
    };

    let sales = Tab {
        title: "Sales count".to_string(),
        metrics: metrics.clone(),
        charts: vec![
            map_chart("Sales by state", Measure::Sales, &count_by_place),
            month_chart(
                "Monthly sales",
                Measure::Sales,
                &aggregate::count_by_month(records),
            ),
            place_bar_chart(
                &format!("Top {TOP_PLACES} states"),
                Measure::Sales,
                &count_by_place[..TOP_PLACES.min(count_by_place.len())],
            ),
            category_chart(
                "Sales by category",
                Measure::Sales,
                &aggregate::count_by_category(records),
            ),
        ],
    };

    let sellers = Tab {
        title: "Sellers".to_string(),
        metrics,
        charts: vec![
            seller_chart(
                &format!("Top {k} sellers (revenue)"),
                Measure::Revenue,
                &seller_table.top_by_revenue(k),
            ),
            seller_chart(
                &format!("Top {k} sellers (sales)"),
                Measure::Sales,
                &seller_table.top_by_count(k),
            ),
        ],
    };

    Dashboard {
        filters: filters.clone(),
        tabs: vec![revenue, sales, sellers],
        records: records.clone(),
    }
}

fn point(label: impl Into<String>, value: impl Into<Decimal>) -> Point {
    Point {
        label: label.into(),
        value: value.into(),
        series: None,
        lat: None,
        lon: None,
    }
}

fn map_chart<M>(title: &str, measure: Measure, rows: &[PlaceTotal<M>]) -> Chart
where
    M: Into<Decimal> + Copy,
{
    let points = rows
        .iter()
        .map(|row| Point {
            lat: Some(row.lat),
            lon: Some(row.lon),
            ..point(&row.place, row.value)
        })
        .collect();
    Chart {
        kind: ChartKind::Map,
        title: title.to_string(),
        dimension: "State".to_string(),
        measure,
        points,
    }
}

fn place_bar_chart<M>(title: &str, measure: Measure, rows: &[PlaceTotal<M>]) -> Chart
where
    M: Into<Decimal> + Copy,
{
    Chart {
        kind: ChartKind::Bar,
        title: title.to_string(),
        dimension: "State".to_string(),
        measure,
        points: rows.iter().map(|row| point(&row.place, row.value)).collect(),
    }
}

fn month_chart<M>(title: &str, measure: Measure, rows: &[MonthTotal<M>]) -> Chart
where
    M: Into<Decimal> + Copy,
{
    let points = rows
        .iter()
        .map(|row| Point {
            series: Some(row.year.to_string()),
            ..point(&row.month, row.value)
        })
        .collect();
    Chart {
        kind: ChartKind::Line,
        title: title.to_string(),
        dimension: "Month".to_string(),
        measure,
        points,
    }
}

fn category_chart<M>(title: &str, measure: Measure, rows: &[CategoryTotal<M>]) -> Chart
where
    M: Into<Decimal> + Copy,
{
    Chart {
        kind: ChartKind::Bar,
        title: title.to_string(),
        dimension: "Category".to_string(),
        measure,
        points: rows
            .iter()
            .map(|row| point(&row.category, row.value))
            .collect(),
    }
}

fn seller_chart(title: &str, measure: Measure, rows: &[SellerTotal]) -> Chart {
    let points = rows
        .iter()
        .map(|row| match measure {
            Measure::Revenue => point(&row.seller, row.revenue),
            Measure::Sales => point(&row.seller, row.count),
        })
        .collect();
    Chart {
        kind: ChartKind::Bar,
        title: title.to_string(),
        dimension: "Seller".to_string(),
        measure,
        points,
    }
}

impl Dashboard {
    /// Renders the tabs as plain text tables, for reading in a terminal.
    pub fn to_text(&self) -> String {
        let mut s = String::new();
        for tab in &self.tabs {
            let _ = writeln!(s, "== {} ==", tab.title);
            for metric in &tab.metrics {
                let _ = writeln!(s, "{}: {}", metric.label, metric.value.trim());
            }
            for chart in &tab.charts {
                let _ = writeln!(s);
                let _ = writeln!(
                    s,
                    "-- {} ({}) --",
                    chart.title,
                    serde_plain::to_string(&chart.kind).unwrap_or_default()
                );
                let _ = writeln!(s, "{:<24} {:>18}", chart.dimension, chart.measure.label());
                for p in &chart.points {
                    let label = match &p.series {
                        Some(series) => format!("{} {series}", p.label),
                        None => p.label.clone(),
                    };
                    let value = match chart.measure {
                        Measure::Revenue => format_grouped(p.value),
                        Measure::Sales => p.value.trunc().to_string(),
                    };
                    let _ = writeln!(s, "{label:<24} {value:>18}");
                }
            }
            let _ = writeln!(s);
        }
        s
    }
}
