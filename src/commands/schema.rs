use crate::commands::{Out, Output};
use crate::dashboard::Dashboard;
use crate::Result;
use anyhow::Context;

/// Returns the JSON Schema of the dashboard that `render` prints in JSON format.
pub async fn schema() -> Result<Out<Output>> {
    let schema = schemars::schema_for!(Dashboard);
    let value = serde_json::to_value(&schema).context("Unable to serialize the schema")?;
    Ok(Out::new("Dashboard JSON Schema", Output::Json(value)))
}
