use scraper::ElementRef;

use super::locate::TableBlock;
use super::normalize::{normalize_currency, normalize_percentage, normalize_year, strip_noise};
use crate::config::ExtractConfig;
use crate::db::Record;
use crate::error::{Result, ScrapeError};

impl<'a> TableBlock<'a> {
    /// Lazily walk the data rows (everything after the first `<tr>`).
    /// Each call starts a fresh pass over the table.
    pub fn records(&self, config: &'a ExtractConfig) -> impl Iterator<Item = Result<Record>> + 'a {
        self.rows()
            .enumerate()
            .skip(1)
            .map(move |(position, row)| extract_row(row, position, config))
    }
}

/// Collect every record of the table, stopping at the first bad row.
pub fn extract_records(table: &TableBlock<'_>, config: &ExtractConfig) -> Result<Vec<Record>> {
    table.records(config).collect()
}

fn extract_row(row: ElementRef<'_>, position: usize, config: &ExtractConfig) -> Result<Record> {
    let cells = cell_texts(row);
    let cols = &config.columns;
    let required = cols.required_cells();
    if cells.len() < required {
        return Err(ScrapeError::RowShape {
            row: position,
            cells: cells.len(),
            required,
        });
    }

    build_record(&cells, config).map_err(|e| e.at_row(position))
}

fn build_record(cells: &[String], config: &ExtractConfig) -> Result<Record> {
    let cols = &config.columns;
    let cell = |i: usize| strip_noise(&cells[i], &config.noise);
    Ok(Record {
        year: normalize_year(&cell(cols.year))?,
        revenue: normalize_currency(&cell(cols.revenue))?,
        change: normalize_percentage(&cell(cols.change))?,
    })
}

/// Text of each direct `<td>`/`<th>` child, in order.
fn cell_texts(row: ElementRef<'_>) -> Vec<String> {
    row.children()
        .filter_map(ElementRef::wrap)
        .filter(|e| matches!(e.value().name(), "td" | "th"))
        .map(|e| e.text().collect::<String>())
        .collect()
}
