use log::debug;

use super::model::{Cell, PriceLevel, Table};
use super::schema::{canonical_column, restaurant, travel};

/// How the normalizer coerces the cells of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnKind {
    Text,
    Numeric,
    PriceLevel,
}

impl ColumnKind {
    fn for_column(name: &str) -> Self {
        if travel::NUMERIC.contains(&name) {
            ColumnKind::Numeric
        } else if name == restaurant::PRICE {
            ColumnKind::PriceLevel
        } else {
            ColumnKind::Text
        }
    }

    fn coerce(self, raw: &str) -> Cell {
        match self {
            ColumnKind::Text => Cell::Text(raw.to_string()),
            ColumnKind::Numeric => parse_number(raw).map_or(Cell::Missing, Cell::Number),
            ColumnKind::PriceLevel => PriceLevel::parse(raw)
                .map_or(Cell::Missing, |level| Cell::Number(f64::from(level.get()))),
        }
    }
}

/// Parse a numeric cell; blank, non-numeric and non-finite input is `None`.
pub fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Turn a header row and ragged data rows into a [`Table`].
///
/// * column names are trimmed and lowercased
/// * short rows are padded with empty cells, long rows truncated
/// * entirely blank rows are dropped
/// * numeric columns are parsed; failures become [`Cell::Missing`]
///
/// Never fails: malformed input is completed, not rejected.
pub fn normalize<H, C>(header: &[H], rows: &[Vec<C>]) -> Table
where
    H: AsRef<str>,
    C: AsRef<str>,
{
    let columns: Vec<String> = header
        .iter()
        .map(|h| canonical_column(h.as_ref()))
        .collect();
    let kinds: Vec<ColumnKind> = columns
        .iter()
        .map(|c| ColumnKind::for_column(c))
        .collect();

    let mut padded = 0usize;
    let mut blank = 0usize;
    let mut missing_numbers = 0usize;
    let mut out = Vec::with_capacity(rows.len());

    for row in rows {
        if row.iter().all(|cell| cell.as_ref().trim().is_empty()) {
            blank += 1;
            continue;
        }
        if row.len() < columns.len() {
            padded += 1;
        }

        let cells: Vec<Cell> = kinds
            .iter()
            .enumerate()
            .map(|(i, kind)| {
                let raw = row.get(i).map_or("", |c| c.as_ref()).trim();
                let cell = kind.coerce(raw);
                if cell == Cell::Missing {
                    missing_numbers += 1;
                }
                cell
            })
            .collect();
        out.push(cells);
    }

    debug!(
        "normalized {} rows x {} columns ({padded} padded, {blank} blank dropped, {missing_numbers} missing numeric cells)",
        out.len(),
        columns.len()
    );

    Table::from_parts(columns, out)
}
