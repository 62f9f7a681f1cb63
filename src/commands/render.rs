use crate::api::{Mode, Query};
use crate::commands::{fetch, Out, Output, OutputFormat};
use crate::dashboard::{self, Filters};
use crate::{Config, Result};
use anyhow::Context;
use tracing::debug;

/// Fetches the records for `filters`, renders the dashboard and returns it in `format`.
pub async fn render(
    config: &Config,
    mode: Mode,
    filters: &Filters,
    format: OutputFormat,
) -> Result<Out<Output>> {
    let records = fetch(config, mode, filters).await?;
    let dashboard = dashboard::render(filters, config.currency_prefix(), &records);
    let output = match format {
        OutputFormat::Json => Output::Json(
            serde_json::to_value(&dashboard).context("Unable to serialize the dashboard")?,
        ),
        OutputFormat::Text => Output::Text(dashboard.to_text()),
    };
    Ok(Out::new(
        format!("Rendered a dashboard of {} records", records.len()),
        output,
    ))
}

/// Fetches the records for `filters` and returns them as CSV.
pub async fn records(config: &Config, mode: Mode, filters: &Filters) -> Result<Out<Output>> {
    let records = fetch(config, mode, filters).await?;
    let mut buf = Vec::new();
    records.write_csv(&mut buf)?;
    let csv = String::from_utf8(buf).context("The CSV output is not valid UTF-8")?;
    Ok(Out::new(
        format!("Wrote {} records", records.len()),
        Output::Csv(csv),
    ))
}

/// Lists the salespeople found in the records matching `query`, one per line.
pub async fn sellers(config: &Config, mode: Mode, query: Query) -> Result<Out<Output>> {
    let filters = Filters::new(
        query.region(),
        query.year(),
        Vec::new(),
        dashboard::DEFAULT_TOP_SELLERS,
    )?;
    let records = fetch(config, mode, &filters).await?;
    let names = records.sellers();
    debug!("Found {} sellers in {} records", names.len(), records.len());
    Ok(Out::new(
        format!("Found {} sellers", names.len()),
        Output::Text(names.join("\n")),
    ))
}
