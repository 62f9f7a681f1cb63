use crate::Result;
use anyhow::Context;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::io::Write;
use tracing::trace;

pub(crate) const CATEGORY_STR: &str = "Categoria do Produto";
pub(crate) const PRICE_STR: &str = "Preço";
pub(crate) const DATE_STR: &str = "Data da Compra";
pub(crate) const PLACE_STR: &str = "Local da compra";
pub(crate) const LAT_STR: &str = "lat";
pub(crate) const LON_STR: &str = "lon";
pub(crate) const SELLER_STR: &str = "Vendedor";

/// One sales transaction as returned by the sales data service.
///
/// Keys that the dashboard does not aggregate on (product name, freight, payment type and so on)
/// are kept untouched in `other_fields`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Record {
    #[serde(rename = "Categoria do Produto")]
    category: String,
    #[serde(
        rename = "Preço",
        serialize_with = "rust_decimal::serde::float::serialize"
    )]
    #[schemars(with = "f64")]
    price: Decimal,
    #[serde(rename = "Data da Compra", with = "purchase_date")]
    #[schemars(with = "String")]
    date: NaiveDate,
    #[serde(rename = "Local da compra")]
    place: String,
    lat: f64,
    lon: f64,
    #[serde(rename = "Vendedor")]
    seller: String,
    #[serde(flatten)]
    other_fields: BTreeMap<String, serde_json::Value>,
}

impl Record {
    pub fn new(
        category: impl Into<String>,
        price: Decimal,
        date: NaiveDate,
        place: impl Into<String>,
        lat: f64,
        lon: f64,
        seller: impl Into<String>,
    ) -> Self {
        Self {
            category: category.into(),
            price,
            date,
            place: place.into(),
            lat,
            lon,
            seller: seller.into(),
            other_fields: BTreeMap::new(),
        }
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn price(&self) -> Decimal {
        self.price
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn place(&self) -> &str {
        &self.place
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn lon(&self) -> f64 {
        self.lon
    }

    pub fn seller(&self) -> &str {
        &self.seller
    }

    pub fn other_fields(&self) -> &BTreeMap<String, serde_json::Value> {
        &self.other_fields
    }
}

/// The full record set for a single render. Order is the order in which the service returned the
/// rows and is significant: it decides ties in every aggregate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct Records(Vec<Record>);

impl Records {
    pub fn new(data: Vec<Record>) -> Self {
        Self(data)
    }

    /// Parses the JSON array body returned by the sales data service.
    pub fn from_json(json: &str) -> Result<Self> {
        let data: Vec<Record> =
            serde_json::from_str(json).context("Unable to parse the sales records JSON")?;
        trace!("Parsed {} sales records", data.len());
        Ok(Self(data))
    }

    pub fn data(&self) -> &[Record] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = &Record> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The sum of `Preço` over every record.
    pub fn total_revenue(&self) -> Decimal {
        self.iter().map(Record::price).sum()
    }

    /// Distinct salesperson names in first-seen order.
    pub fn sellers(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.iter()
            .map(Record::seller)
            .filter(|name| seen.insert(*name))
            .collect()
    }

    /// Keeps only the records sold by someone in `sellers`. An empty set keeps everything.
    pub fn filter_sellers(self, sellers: &BTreeSet<String>) -> Self {
        if sellers.is_empty() {
            return self;
        }
        Self(
            self.0
                .into_iter()
                .filter(|r| sellers.contains(r.seller()))
                .collect(),
        )
    }

    /// Writes every record as CSV, known columns first followed by any other fields in
    /// alphabetical order.
    pub fn write_csv<W: Write>(&self, w: W) -> Result<()> {
        let others: BTreeSet<&str> = self
            .iter()
            .flat_map(|r| r.other_fields.keys().map(String::as_str))
            .collect();

        let mut wtr = csv::Writer::from_writer(w);
        let mut headers = vec![
            CATEGORY_STR,
            PRICE_STR,
            DATE_STR,
            PLACE_STR,
            LAT_STR,
            LON_STR,
            SELLER_STR,
        ];
        headers.extend(others.iter().copied());
        wtr.write_record(&headers)
            .context("Unable to write the CSV header")?;

        for r in self.iter() {
            let mut row = vec![
                r.category.clone(),
                r.price.to_string(),
                r.date.format(purchase_date::FORMAT).to_string(),
                r.place.clone(),
                r.lat.to_string(),
                r.lon.to_string(),
                r.seller.clone(),
            ];
            row.extend(others.iter().map(|key| match r.other_fields.get(*key) {
                None => String::new(),
                Some(serde_json::Value::String(s)) => s.clone(),
                Some(value) => value.to_string(),
            }));
            wtr.write_record(&row)
                .context("Unable to write a CSV record")?;
        }
        wtr.flush().context("Unable to flush the CSV output")?;
        Ok(())
    }
}

impl From<Vec<Record>> for Records {
    fn from(value: Vec<Record>) -> Self {
        Records(value)
    }
}

/// `Data da Compra` is sent as `DD/MM/YYYY`.
mod purchase_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub(super) const FORMAT: &str = "%d/%m/%Y";

    pub(super) fn serialize<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&date.format(FORMAT).to_string())
    }

    pub(super) fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NaiveDate::parse_from_str(&s, FORMAT).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::{date, dec, record, sample_records};

    const ONE_ROW: &str = r#"[
        {
            "Produto": "Modelagem preditiva",
            "Categoria do Produto": "livros",
            "Preço": 92.45,
            "Frete": 5.6096965236,
            "Data da Compra": "01/01/2020",
            "Vendedor": "Thiago Silva",
            "Local da compra": "BA",
            "Avaliação da compra": 1,
            "Tipo de pagamento": "cartao_credito",
            "Quantidade de parcelas": 3,
            "lat": -13.29,
            "lon": -41.71
        }
    ]"#;

    #[test]
    fn test_from_json() {
        let records = Records::from_json(ONE_ROW).unwrap();
        assert_eq!(records.len(), 1);
        let r = &records.data()[0];
        assert_eq!(r.category(), "livros");
        assert_eq!(r.price(), dec("92.45"));
        assert_eq!(r.date(), date(2020, 1, 1));
        assert_eq!(r.place(), "BA");
        assert_eq!(r.lat(), -13.29);
        assert_eq!(r.lon(), -41.71);
        assert_eq!(r.seller(), "Thiago Silva");
        assert_eq!(
            r.other_fields().get("Produto"),
            Some(&serde_json::Value::from("Modelagem preditiva"))
        );
        assert_eq!(r.other_fields().len(), 5);
    }

    #[test]
    fn test_from_json_empty_array() {
        let records = Records::from_json("[]").unwrap();
        assert!(records.is_empty());
        assert_eq!(records.total_revenue(), Decimal::ZERO);
    }

    #[test]
    fn test_from_json_bad_date() {
        let json = ONE_ROW.replace("01/01/2020", "2020-01-01");
        assert!(Records::from_json(&json).is_err());
    }

    #[test]
    fn test_from_json_missing_field() {
        let json = ONE_ROW.replace("\"Vendedor\"", "\"Seller\"");
        assert!(Records::from_json(&json).is_err());
    }

    #[test]
    fn test_serialize_keeps_upstream_shape() {
        let records = Records::from_json(ONE_ROW).unwrap();
        let json = serde_json::to_value(&records).unwrap();
        let row = &json[0];
        assert_eq!(row["Data da Compra"], "01/01/2020");
        assert_eq!(row["Preço"], serde_json::json!(92.45));
        assert_eq!(row["Local da compra"], "BA");
        assert_eq!(row["Tipo de pagamento"], "cartao_credito");
    }

    #[test]
    fn test_filter_empty_set_is_identity() {
        let records = sample_records();
        let filtered = records.clone().filter_sellers(&BTreeSet::new());
        assert_eq!(filtered, records);
    }

    #[test]
    fn test_filter_keeps_exactly_selected_sellers() {
        let records = sample_records();
        let selected: BTreeSet<String> = ["Ana".to_string(), "Caio".to_string()].into();
        let filtered = records.clone().filter_sellers(&selected);

        let expected: Vec<&Record> = records
            .iter()
            .filter(|r| r.seller() == "Ana" || r.seller() == "Caio")
            .collect();
        let actual: Vec<&Record> = filtered.iter().collect();
        assert_eq!(actual, expected);
        assert!(!filtered.is_empty());
    }

    #[test]
    fn test_filter_is_idempotent() {
        let selected: BTreeSet<String> = ["Bia".to_string()].into();
        let once = sample_records().filter_sellers(&selected);
        let twice = once.clone().filter_sellers(&selected);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_filter_unknown_seller_is_empty() {
        let selected: BTreeSet<String> = ["Nobody".to_string()].into();
        assert!(sample_records().filter_sellers(&selected).is_empty());
    }

    #[test]
    fn test_sellers_first_seen_order() {
        let records = Records::new(vec![
            record("a", "10", (2023, 1, 1), "SP", "Zé"),
            record("a", "10", (2023, 1, 2), "SP", "Ana"),
            record("a", "10", (2023, 1, 3), "SP", "Zé"),
        ]);
        assert_eq!(records.sellers(), vec!["Zé", "Ana"]);
    }

    #[test]
    fn test_write_csv() {
        let records = Records::from_json(ONE_ROW).unwrap();
        let mut out = Vec::new();
        records.write_csv(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "Categoria do Produto,Preço,Data da Compra,Local da compra,lat,lon,Vendedor,\
            Avaliação da compra,Frete,Produto,Quantidade de parcelas,Tipo de pagamento"
        );
        assert_eq!(
            lines.next().unwrap(),
            "livros,92.45,01/01/2020,BA,-13.29,-41.71,Thiago Silva,1,5.6096965236,\
            Modelagem preditiva,3,cartao_credito"
        );
        assert!(lines.next().is_none());
    }
}
