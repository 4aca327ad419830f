pub mod locate;
pub mod normalize;
pub mod rows;

use scraper::Html;
use tracing::{debug, info};

use crate::config::ExtractConfig;
use crate::db::Record;
use crate::error::Result;

pub fn parse_document(markup: &str) -> Html {
    Html::parse_document(markup)
}

/// Markup → document → `index`-th table → records, in row order.
pub fn extract_table(markup: &str, index: usize, config: &ExtractConfig) -> Result<Vec<Record>> {
    let doc = parse_document(markup);
    debug!("Document has {} tables", locate::count_tables(&doc));
    let table = locate::locate_table(&doc, index)?;
    debug!(class = ?table.element().value().attr("class"), "Using table #{}", index);
    let records = rows::extract_records(&table, config)?;
    info!("Extracted {} rows from table #{}", records.len(), index);
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScrapeError;

    fn fixture() -> String {
        std::fs::read_to_string("tests/fixtures/revenue.html").unwrap()
    }

    #[test]
    fn pipeline_on_fixture() {
        let records = extract_table(&fixture(), 1, &ExtractConfig::default()).unwrap();
        let years: Vec<u32> = records.iter().map(|r| r.year).collect();
        assert_eq!(years, vec![2023, 2022, 2021, 2020, 2019]);
        assert_eq!(records[2].revenue, 53.823e9);
        assert_eq!(records[2].change, 70.67);
    }

    #[test]
    fn quarterly_table_uses_million_units() {
        let records = extract_table(&fixture(), 2, &ExtractConfig::default()).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].revenue, 25_167e6);
        assert_eq!(records[2], Record { year: 0, revenue: 0.0, change: 0.0 });
    }

    #[test]
    fn summary_table_has_wrong_shape() {
        let err = extract_table(&fixture(), 0, &ExtractConfig::default()).unwrap_err();
        assert!(matches!(err, ScrapeError::RowShape { row: 1, cells: 2, required: 3 }));
    }

    #[test]
    fn missing_table_index() {
        let err = extract_table(&fixture(), 9, &ExtractConfig::default()).unwrap_err();
        assert!(matches!(err, ScrapeError::NotFound { index: 9, available: 3 }));
    }
}
