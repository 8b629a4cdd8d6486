//! Output formatting for CLI

use serde::Serialize;
use tabled::Tabled;

/// Output format options
pub enum OutputFormat {
    Text,
    Json,
    Table,
}

impl From<&str> for OutputFormat {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => OutputFormat::Json,
            "text" => OutputFormat::Text,
            _ => OutputFormat::Table,
        }
    }
}

/// Catalog row for table output
#[derive(Tabled)]
pub struct CatalogRow {
    #[tabled(rename = "#")]
    pub index: usize,
    #[tabled(rename = "ID")]
    pub id: String,
    #[tabled(rename = "Title")]
    pub title: String,
    #[tabled(rename = "Duration")]
    pub duration: String,
    #[tabled(rename = "URL")]
    pub url: String,
}

/// Serialize data as pretty JSON for machine output
pub fn to_json<T: Serialize>(data: &T) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(data)?)
}
