use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::schema::{restaurant, split_multi, travel};
use crate::error::ParseError;

// ---------------------------------------------------------------------------
// Cell – a single normalized value
// ---------------------------------------------------------------------------

/// A normalized cell. Text columns always hold `Text` (possibly empty);
/// numeric columns hold `Number` or `Missing` when the source was not a number.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Text(String),
    Number(f64),
    Missing,
}

impl Cell {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Number(v) => Some(*v),
            _ => None,
        }
    }

    /// Text form used for option lists and display; `Missing` is empty.
    pub fn to_text(&self) -> Cow<'_, str> {
        match self {
            Cell::Text(s) => Cow::Borrowed(s),
            Cell::Number(v) => Cow::Owned(format_number(*v)),
            Cell::Missing => Cow::Borrowed(""),
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

/// Whole numbers print without a fractional part (`7`, not `7.0`).
pub fn format_number(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{v:.0}")
    } else {
        v.to_string()
    }
}

// ---------------------------------------------------------------------------
// Table – the normalized dataset
// ---------------------------------------------------------------------------

/// A row-oriented table. Every row has exactly `columns.len()` cells and rows
/// keep their source order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    pub(crate) fn from_parts(columns: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        debug_assert!(rows.iter().all(|r| r.len() == columns.len()));
        Table { columns, rows }
    }

    /// A table with no columns and no rows ("no data").
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Position of a column; the first occurrence wins on duplicate headers.
    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.column_index(column).is_some()
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, index: usize) -> Option<Row<'_>> {
        self.rows.get(index).map(|cells| Row { table: self, cells })
    }

    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> + '_ {
        self.rows.iter().map(move |cells| Row { table: self, cells })
    }

    /// Copy of the rows at `indices`, in the order given.
    pub fn select(&self, indices: &[usize]) -> Table {
        let rows = indices
            .iter()
            .filter_map(|&i| self.rows.get(i).cloned())
            .collect();
        Table {
            columns: self.columns.clone(),
            rows,
        }
    }

    /// Rows that form a complete destination record.
    pub fn travel_records(&self) -> Vec<TravelRecord> {
        self.rows().filter_map(TravelRecord::from_row).collect()
    }

    /// Rows that form a restaurant record (non-empty name).
    pub fn restaurant_records(&self) -> Vec<RestaurantRecord> {
        self.rows().filter_map(RestaurantRecord::from_row).collect()
    }
}

/// Borrowed view of one table row with by-name access.
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    table: &'a Table,
    cells: &'a [Cell],
}

impl<'a> Row<'a> {
    pub fn get(&self, column: &str) -> Option<&'a Cell> {
        self.table
            .column_index(column)
            .and_then(|i| self.cells.get(i))
    }

    /// Text content of a column, empty when absent or non-text.
    pub fn text(&self, column: &str) -> &'a str {
        match self.get(column) {
            Some(Cell::Text(s)) => s,
            _ => "",
        }
    }

    pub fn number(&self, column: &str) -> Option<f64> {
        self.get(column).and_then(Cell::as_f64)
    }

    pub fn cells(&self) -> &'a [Cell] {
        self.cells
    }
}

fn optional_text(row: &Row<'_>, column: &str) -> Option<String> {
    let value = row.text(column);
    (!value.is_empty()).then(|| value.to_string())
}

// ---------------------------------------------------------------------------
// Price level and meals
// ---------------------------------------------------------------------------

/// Restaurant price level on the ordinal scale 1–4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct PriceLevel(u8);

impl PriceLevel {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 4;

    pub fn new(level: u8) -> Option<Self> {
        (Self::MIN..=Self::MAX)
            .contains(&level)
            .then_some(PriceLevel(level))
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// Accepts a whole number (`"2"`, `"3.0"`) or a run of one repeated
    /// symbol whose length is the level (`"€€"`, `"$$$"`).
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        let mut chars = raw.chars();
        let first = chars.next()?;

        if let Ok(n) = raw.parse::<f64>() {
            if n.fract() != 0.0 || !(0.0..=f64::from(u8::MAX)).contains(&n) {
                return None;
            }
            return Self::new(n as u8);
        }
        if first.is_alphanumeric() || !chars.all(|c| c == first) {
            return None;
        }
        u8::try_from(raw.chars().count()).ok().and_then(Self::new)
    }

    pub fn symbols(self) -> String {
        "€".repeat(usize::from(self.0))
    }
}

/// The three meal slots of an itinerary day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Meal {
    Breakfast,
    Lunch,
    Dinner,
}

impl Meal {
    pub const ALL: [Meal; 3] = [Meal::Breakfast, Meal::Lunch, Meal::Dinner];

    /// Tag searched for (case-insensitively) in the `maaltijd` column.
    pub fn tag(self) -> &'static str {
        match self {
            Meal::Breakfast => "ontbijt",
            Meal::Lunch => "lunch",
            Meal::Dinner => "diner",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Meal::Breakfast => "Breakfast",
            Meal::Lunch => "Lunch",
            Meal::Dinner => "Dinner",
        }
    }
}

impl fmt::Display for Meal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Meal {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "breakfast" | "ontbijt" => Ok(Meal::Breakfast),
            "lunch" => Ok(Meal::Lunch),
            "dinner" | "diner" => Ok(Meal::Dinner),
            _ => Err(ParseError::Meal(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Typed records
// ---------------------------------------------------------------------------

/// One destination row with its required numeric fields present.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TravelRecord {
    pub name: String,
    pub country: String,
    pub region: String,
    pub city: String,
    pub continent: String,
    pub purpose: String,
    pub accommodation: String,
    /// `;`-delimited season tags as stored in the table.
    pub season: String,
    /// `;`-delimited transport modes as stored in the table.
    pub transport_mode: String,
    pub min_duration_days: f64,
    pub max_duration_days: f64,
    pub budget: f64,
    pub temperature: Option<f64>,
    pub remark: String,
    pub url: Option<String>,
    pub photo_url: Option<String>,
}

impl TravelRecord {
    /// `None` for rows without a name or with a missing budget or duration.
    pub fn from_row(row: Row<'_>) -> Option<Self> {
        let name = optional_text(&row, travel::NAME)?;
        Some(TravelRecord {
            name,
            country: row.text(travel::COUNTRY).to_string(),
            region: row.text(travel::REGION).to_string(),
            city: row.text(travel::CITY).to_string(),
            continent: row.text(travel::CONTINENT).to_string(),
            purpose: row.text(travel::PURPOSE).to_string(),
            accommodation: row.text(travel::ACCOMMODATION).to_string(),
            season: row.text(travel::SEASON).to_string(),
            transport_mode: row.text(travel::TRANSPORT).to_string(),
            min_duration_days: row.number(travel::MIN_DURATION)?,
            max_duration_days: row.number(travel::MAX_DURATION)?,
            budget: row.number(travel::BUDGET)?,
            temperature: row.number(travel::TEMPERATURE),
            remark: row.text(travel::REMARK).to_string(),
            url: optional_text(&row, travel::URL),
            photo_url: optional_text(&row, travel::PHOTO),
        })
    }

    pub fn seasons(&self) -> Vec<&str> {
        split_multi(&self.season).collect()
    }

    pub fn transport_modes(&self) -> Vec<&str> {
        split_multi(&self.transport_mode).collect()
    }
}

/// One restaurant row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RestaurantRecord {
    pub name: String,
    pub cuisine: String,
    pub country: String,
    pub region: String,
    pub city: String,
    pub location_label: String,
    pub price_level: Option<PriceLevel>,
    pub meal_tags: String,
    pub remark: String,
    pub url: Option<String>,
    pub photo_url: Option<String>,
}

impl RestaurantRecord {
    pub fn from_row(row: Row<'_>) -> Option<Self> {
        let name = optional_text(&row, restaurant::NAME)?;
        let price_level = row
            .number(restaurant::PRICE)
            .and_then(|level| PriceLevel::new(level as u8));
        Some(RestaurantRecord {
            name,
            cuisine: row.text(restaurant::CUISINE).to_string(),
            country: row.text(restaurant::COUNTRY).to_string(),
            region: row.text(restaurant::REGION).to_string(),
            city: row.text(restaurant::CITY).to_string(),
            location_label: row.text(restaurant::LOCATION).to_string(),
            price_level,
            meal_tags: row.text(restaurant::MEALS).to_string(),
            remark: row.text(restaurant::REMARK).to_string(),
            url: optional_text(&row, restaurant::URL),
            photo_url: optional_text(&row, restaurant::PHOTO),
        })
    }

    pub fn serves(&self, meal: Meal) -> bool {
        self.meal_tags.to_lowercase().contains(meal.tag())
    }

    /// Price level as a symbol run, empty when unknown.
    pub fn price_symbols(&self) -> String {
        self.price_level.map(PriceLevel::symbols).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_level_accepts_both_encodings() {
        assert_eq!(PriceLevel::parse("€€").map(PriceLevel::get), Some(2));
        assert_eq!(PriceLevel::parse(" $$$$ ").map(PriceLevel::get), Some(4));
        assert_eq!(PriceLevel::parse("3").map(PriceLevel::get), Some(3));
        assert_eq!(PriceLevel::parse("1.0").map(PriceLevel::get), Some(1));
    }

    #[test]
    fn price_level_rejects_out_of_scale() {
        assert_eq!(PriceLevel::parse(""), None);
        assert_eq!(PriceLevel::parse("€€€€€"), None);
        assert_eq!(PriceLevel::parse("0"), None);
        assert_eq!(PriceLevel::parse("2.5"), None);
        assert_eq!(PriceLevel::parse("€$"), None);
        assert_eq!(PriceLevel::parse("cheap"), None);
    }

    #[test]
    fn meal_parses_english_and_dutch() {
        assert_eq!("Ontbijt".parse::<Meal>(), Ok(Meal::Breakfast));
        assert_eq!("dinner".parse::<Meal>(), Ok(Meal::Dinner));
        assert!("brunch".parse::<Meal>().is_err());
    }

    #[test]
    fn number_formatting_drops_trailing_zero() {
        assert_eq!(format_number(7.0), "7");
        assert_eq!(format_number(-2.5), "-2.5");
        assert_eq!(Cell::Missing.to_text(), "");
    }
}
