use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Descriptive metadata recorded by the crawler: which tool produced the catalog,
/// against which data source, through which driver.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CrawlInfo {
    pub crawler_name: Option<String>,
    pub crawler_version: Option<String>,
    pub product_name: Option<String>,
    pub product_version: Option<String>,
    pub driver_name: Option<String>,
    pub driver_version: Option<String>,
    pub connection_url: Option<String>,
    pub crawl_timestamp: Option<DateTime<Utc>>,
}

impl CrawlInfo {
    pub fn crawler(&self) -> String {
        join_name_version(&self.crawler_name, &self.crawler_version)
    }

    pub fn product(&self) -> String {
        join_name_version(&self.product_name, &self.product_version)
    }

    pub fn driver(&self) -> String {
        join_name_version(&self.driver_name, &self.driver_version)
    }
}

fn join_name_version(name: &Option<String>, version: &Option<String>) -> String {
    match (name.as_deref(), version.as_deref()) {
        (Some(name), Some(version)) => format!("{name} {version}"),
        (Some(name), None) => name.to_string(),
        (None, Some(version)) => version.to_string(),
        (None, None) => "unknown".to_string(),
    }
}

impl fmt::Display for CrawlInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:<16} {}", "Crawler", self.crawler())?;
        writeln!(f, "{:<16} {}", "Data source", self.product())?;
        writeln!(f, "{:<16} {}", "Driver", self.driver())?;
        if let Some(url) = &self.connection_url {
            writeln!(f, "{:<16} {}", "Connection", url)?;
        }
        let crawled_at = self
            .crawl_timestamp
            .map(|ts| ts.to_rfc3339())
            .unwrap_or_else(|| "n/a".to_string());
        write!(f, "{:<16} {}", "Crawled at", crawled_at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_and_version_are_joined() {
        let info = CrawlInfo {
            product_name: Some("PostgreSQL".into()),
            product_version: Some("16.2".into()),
            driver_name: Some("pgjdbc".into()),
            ..Default::default()
        };

        assert_eq!(info.product(), "PostgreSQL 16.2");
        assert_eq!(info.driver(), "pgjdbc");
        assert_eq!(info.crawler(), "unknown");
    }

    #[test]
    fn display_marks_missing_timestamp() {
        let rendered = CrawlInfo::default().to_string();
        assert!(rendered.contains("Crawled at"));
        assert!(rendered.ends_with("n/a"));
    }
}
