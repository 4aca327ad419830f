use scraper::{ElementRef, Html, Selector};

use crate::error::{Result, ScrapeError};

/// One `<table>` element of a parsed document.
#[derive(Debug, Clone, Copy)]
pub struct TableBlock<'a> {
    element: ElementRef<'a>,
}

impl<'a> TableBlock<'a> {
    pub fn element(&self) -> ElementRef<'a> {
        self.element
    }

    /// All `<tr>` elements of the table in document order, header included.
    pub fn rows(&self) -> impl Iterator<Item = ElementRef<'a>> + 'a {
        let element = self.element;
        element
            .descendants()
            .filter_map(ElementRef::wrap)
            .filter(|e| e.value().name() == "tr")
    }
}

pub fn count_tables(doc: &Html) -> usize {
    doc.select(&table_selector()).count()
}

/// Return the `index`-th table (zero-based) of the document.
pub fn locate_table(doc: &Html, index: usize) -> Result<TableBlock<'_>> {
    let selector = table_selector();
    let mut tables = doc.select(&selector);
    match tables.nth(index) {
        Some(element) => Ok(TableBlock { element }),
        None => Err(ScrapeError::NotFound {
            index,
            available: count_tables(doc),
        }),
    }
}

fn table_selector() -> Selector {
    Selector::parse("table").expect("selector should parse")
}
