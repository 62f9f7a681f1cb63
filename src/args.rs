//! These structs provide the CLI interface for the sales-dash CLI.

use crate::api::Query;
use crate::commands::OutputFormat;
use crate::dashboard::{Filters, DEFAULT_TOP_SELLERS};
use crate::model::Region;
use crate::Result;
use clap::{Parser, Subcommand};
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::error;
use tracing_subscriber::filter::LevelFilter;

/// sales-dash: A command-line sales dashboard.
///
/// Fetches sales transactions from a sales data service, optionally narrowed down by region,
/// year and salesperson, and renders a dashboard of revenue, sales counts and top sellers.
///
/// Set SALES_DASH_IN_TEST_MODE to a non-empty value to use built-in sample data instead of the
/// network.
#[derive(Debug, Parser, Clone)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn new(common: Common, command: Command) -> Self {
        Self { common, command }
    }

    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create the home directory and a default configuration file.
    ///
    /// This is optional. Without a config file the public sales data service is used.
    Init(InitArgs),
    /// Fetch the sales records and print the dashboard.
    Render(RenderArgs),
    /// Fetch the sales records and print them as CSV.
    Records(FilterArgs),
    /// List the salespeople found in the sales records.
    Sellers(SellersArgs),
    /// Print the JSON Schema of the dashboard printed by `render`.
    Schema,
}

/// Arguments common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG.
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,

    /// The directory where the configuration is held. Defaults to ~/.sales-dash
    #[arg(long, env = "SALES_DASH_HOME", default_value_t = default_home())]
    home: DisplayPath,
}

impl Common {
    pub fn new(log_level: LevelFilter, home: PathBuf) -> Self {
        Self {
            log_level,
            home: home.into(),
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn home(&self) -> &DisplayPath {
        &self.home
    }
}

/// (Not shown): Args for the `sales-dash init` command.
#[derive(Debug, Parser, Clone)]
pub struct InitArgs {
    /// The sales data service endpoint. Defaults to https://labdados.com/produtos
    #[arg(long)]
    base_url: Option<String>,
}

impl InitArgs {
    pub fn new(base_url: Option<String>) -> Self {
        Self { base_url }
    }

    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }
}

/// The filters shared by the commands that fetch records.
#[derive(Debug, Parser, Clone)]
pub struct FilterArgs {
    /// The region: brasil (or all), centro-oeste, nordeste, norte, sudeste or sul.
    #[arg(long, default_value_t = Region::All)]
    region: Region,

    /// The year of purchase. Data exists for 2020 through 2023. All years when omitted.
    #[arg(long)]
    year: Option<i32>,

    /// Keep only sales by this salesperson. Can be repeated. All salespeople when omitted.
    #[arg(long = "seller")]
    sellers: Vec<String>,

    /// How many sellers the sellers tab shows, from 2 to 10.
    #[arg(long, default_value_t = DEFAULT_TOP_SELLERS)]
    top_sellers: usize,
}

impl FilterArgs {
    pub fn new(region: Region, year: Option<i32>, sellers: Vec<String>, top_sellers: usize) -> Self {
        Self {
            region,
            year,
            sellers,
            top_sellers,
        }
    }

    /// # Errors
    /// Returns an error if `top_sellers` is out of range.
    pub fn filters(&self) -> Result<Filters> {
        Filters::new(
            self.region,
            self.year,
            self.sellers.iter().cloned(),
            self.top_sellers,
        )
    }
}

/// (Not shown): Args for the `sales-dash render` command.
#[derive(Debug, Parser, Clone)]
pub struct RenderArgs {
    #[clap(flatten)]
    filters: FilterArgs,

    /// The output format: json or text.
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,
}

impl RenderArgs {
    pub fn new(filters: FilterArgs, format: OutputFormat) -> Self {
        Self { filters, format }
    }

    pub fn filters(&self) -> &FilterArgs {
        &self.filters
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }
}

/// (Not shown): Args for the `sales-dash sellers` command.
#[derive(Debug, Parser, Clone)]
pub struct SellersArgs {
    /// The region: brasil (or all), centro-oeste, nordeste, norte, sudeste or sul.
    #[arg(long, default_value_t = Region::All)]
    region: Region,

    /// The year of purchase. All years when omitted.
    #[arg(long)]
    year: Option<i32>,
}

impl SellersArgs {
    pub fn query(&self) -> Query {
        Query::new(self.region, self.year)
    }
}

fn default_home() -> DisplayPath {
    DisplayPath(match dirs::home_dir() {
        Some(home) => home.join(".sales-dash"),
        None => {
            error!(
                "There was an error when trying to get your home directory. You can get around \
                this by providing --home or SALES_DASH_HOME instead of relying on the default \
                home directory.",
            );
            PathBuf::from(".sales-dash")
        }
    })
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct DisplayPath(PathBuf);

impl From<PathBuf> for DisplayPath {
    fn from(value: PathBuf) -> Self {
        DisplayPath(value)
    }
}

impl Deref for DisplayPath {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<Path> for DisplayPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl Display for DisplayPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_string_lossy())
    }
}

impl FromStr for DisplayPath {
    type Err = Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self(PathBuf::from(s)))
    }
}

impl DisplayPath {
    pub fn path(&self) -> &Path {
        &self.0
    }
}
