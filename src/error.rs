use thiserror::Error;

/// Which record field a cell was being normalized into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Year,
    Revenue,
    Change,
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Field::Year => "year",
            Field::Revenue => "revenue",
            Field::Change => "change",
        })
    }
}

#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error("GET {url} returned {status}")]
    Fetch {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("GET {url} failed")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to build HTTP client")]
    Client(#[source] reqwest::Error),

    #[error("table #{index} not found (document has {available})")]
    NotFound { index: usize, available: usize },

    #[error("row {row} has {cells} cells, need at least {required}")]
    RowShape {
        row: usize,
        cells: usize,
        required: usize,
    },

    #[error("{}cannot read {field} from {text:?}", row_prefix(.row))]
    Format {
        field: Field,
        text: String,
        row: Option<usize>,
    },

    #[error("invalid table name {0:?}")]
    InvalidTableName(String),

    #[error("store error")]
    Store(#[from] rusqlite::Error),

    #[error("I/O error")]
    Io(#[from] std::io::Error),
}

impl ScrapeError {
    pub fn format(field: Field, text: &str) -> Self {
        Self::Format {
            field,
            text: text.to_string(),
            row: None,
        }
    }

    /// Attach a table row position to a format error; other kinds pass through.
    pub fn at_row(self, position: usize) -> Self {
        match self {
            Self::Format { field, text, .. } => Self::Format {
                field,
                text,
                row: Some(position),
            },
            other => other,
        }
    }
}

fn row_prefix(row: &Option<usize>) -> String {
    row.map(|r| format!("row {r}: ")).unwrap_or_default()
}

pub type Result<T> = std::result::Result<T, ScrapeError>;
