use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// The regions offered by the sales data service. `All` covers the whole country and is sent to
/// the service as an empty filter.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    Eq,
    PartialEq,
    Ord,
    PartialOrd,
    Hash,
    Serialize,
    Deserialize,
    JsonSchema,
)]
#[serde(rename_all = "kebab-case")]
pub enum Region {
    #[default]
    #[serde(rename = "brasil", alias = "all")]
    All,
    CentroOeste,
    Nordeste,
    Norte,
    Sudeste,
    Sul,
}

serde_plain::derive_display_from_serialize!(Region);
serde_plain::derive_fromstr_from_deserialize!(Region);

impl Region {
    /// All selectable regions, in the order they are offered to the user.
    pub const ALL: [Region; 6] = [
        Region::All,
        Region::CentroOeste,
        Region::Nordeste,
        Region::Norte,
        Region::Sudeste,
        Region::Sul,
    ];

    /// The human-readable label, e.g. `Centro-Oeste`.
    pub fn label(&self) -> &'static str {
        match self {
            Region::All => "Brasil",
            Region::CentroOeste => "Centro-Oeste",
            Region::Nordeste => "Nordeste",
            Region::Norte => "Norte",
            Region::Sudeste => "Sudeste",
            Region::Sul => "Sul",
        }
    }

    /// The value sent as the region query parameter: the lower-cased label, or an empty string
    /// when no region is selected.
    pub fn query_value(&self) -> String {
        match self {
            Region::All => String::new(),
            other => other.label().to_lowercase(),
        }
    }

    /// The state codes (`Local da compra`) that belong to this region.
    pub fn places(&self) -> &'static [&'static str] {
        match self {
            Region::All => &[],
            Region::CentroOeste => &["DF", "GO", "MS", "MT"],
            Region::Nordeste => &["AL", "BA", "CE", "MA", "PB", "PE", "PI", "RN", "SE"],
            Region::Norte => &["AC", "AM", "AP", "PA", "RO", "RR", "TO"],
            Region::Sudeste => &["ES", "MG", "RJ", "SP"],
            Region::Sul => &["PR", "RS", "SC"],
        }
    }

    /// Whether a record purchased at `place` falls inside this region.
    pub fn contains(&self, place: &str) -> bool {
        match self {
            Region::All => true,
            _ => self.places().contains(&place),
        }
    }
}
