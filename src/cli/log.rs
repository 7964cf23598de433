use clap::Args;
use serde_json::Value;
use tracing::info;

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::journal::{ResourceDirectory, RowLogger};
use crate::models::Row;
use crate::sheets::GoogleClient;

#[derive(Args, Debug)]
pub struct LogArgs {
    /// Title of the logging destination
    #[arg(long)]
    pub title: String,

    /// Description written to the first header cell
    #[arg(long)]
    pub description: String,

    /// Add a Timestamp field with the current UTC time
    #[arg(long)]
    pub stamp: bool,

    /// Fields as KEY=VALUE pairs; repeat a key to extend its sequence
    #[arg(required = true, value_name = "KEY=VALUE")]
    pub fields: Vec<String>,
}

pub(super) async fn execute(args: &LogArgs) -> Result<()> {
    let config = Config::load()?;
    let row = build_row(&args.fields, args.stamp)?;

    let client = GoogleClient::new(&config.google).await?;
    let directory = ResourceDirectory::open(client).await?;
    let logger = RowLogger::new(directory);

    let handle = logger.log_row(&args.title, &args.description, &row).await?;
    if let Some(url) = &handle.url {
        info!(url = %url, "Spreadsheet ready");
    }

    Ok(())
}

fn build_row(fields: &[String], stamp: bool) -> Result<Row> {
    let mut row = Row::new();
    for raw in fields {
        let (key, value) = split_field(raw)?;
        row.push(key, parse_value(value));
    }

    if stamp {
        row.push("Timestamp", chrono::Utc::now().to_rfc3339());
    }

    Ok(row)
}

fn split_field(raw: &str) -> Result<(&str, &str)> {
    raw.split_once('=')
        .filter(|(key, _)| !key.is_empty())
        .ok_or_else(|| AppError::InvalidField(raw.to_string()))
}

/// Interpret numbers, booleans and null; anything else stays a string.
fn parse_value(raw: &str) -> Value {
    match serde_json::from_str(raw) {
        Ok(value @ (Value::Number(_) | Value::Bool(_) | Value::Null)) => value,
        _ => Value::from(raw),
    }
}
