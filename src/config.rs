use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_TIMEOUT_SECS: u64 = 5;
pub const DEFAULT_TABLE_INDEX: usize = 0;
pub const DEFAULT_TABLE_NAME: &str = "revenue";
const DEFAULT_STORE_PATH: &str = "data/revenue.sqlite";
const USER_AGENT: &str = concat!("revenue_scraper/", env!("CARGO_PKG_VERSION"));

/// Store path: `REVENUE_DB_PATH` if set, else `data/revenue.sqlite`.
pub fn default_store() -> PathBuf {
    env::var("REVENUE_DB_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_STORE_PATH))
}

/// Fixed cell positions of the three record fields within a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMap {
    pub year: usize,
    pub revenue: usize,
    pub change: usize,
}

impl Default for ColumnMap {
    fn default() -> Self {
        Self {
            year: 0,
            revenue: 1,
            change: 2,
        }
    }
}

impl ColumnMap {
    /// Minimum number of cells a data row must have.
    pub fn required_cells(&self) -> usize {
        self.year.max(self.revenue).max(self.change) + 1
    }
}

#[derive(Debug, Clone, Default)]
pub struct ExtractConfig {
    pub columns: ColumnMap,
    /// Substrings removed from every cell before normalization (footnote markers etc).
    pub noise: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: USER_AGENT.to_string(),
        }
    }
}

impl FetchConfig {
    pub fn with_timeout_secs(secs: u64) -> Self {
        Self {
            timeout: Duration::from_secs(secs),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_columns() {
        let c = ColumnMap::default();
        assert_eq!((c.year, c.revenue, c.change), (0, 1, 2));
        assert_eq!(c.required_cells(), 3);
    }

    #[test]
    fn required_cells_follows_largest_index() {
        let c = ColumnMap {
            year: 0,
            revenue: 4,
            change: 2,
        };
        assert_eq!(c.required_cells(), 5);
    }

    #[test]
    fn fetch_timeout_is_explicit() {
        assert_eq!(FetchConfig::default().timeout, Duration::from_secs(5));
        assert_eq!(
            FetchConfig::with_timeout_secs(12).timeout,
            Duration::from_secs(12)
        );
    }
}
