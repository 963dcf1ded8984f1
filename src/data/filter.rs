use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use log::warn;
use serde::{Deserialize, Serialize};

use super::model::{Meal, Row, Table};
use super::schema::{restaurant, split_multi, travel};
use crate::error::ParseError;

// ---------------------------------------------------------------------------
// Bounds – inclusive numeric range
// ---------------------------------------------------------------------------

/// Inclusive range `[low, high]`. Inverted bounds are not rejected; they
/// simply match nothing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds<T> {
    pub low: T,
    pub high: T,
}

impl<T: PartialOrd + Copy> Bounds<T> {
    pub fn new(low: T, high: T) -> Self {
        Bounds { low, high }
    }

    pub fn contains(&self, value: T) -> bool {
        value >= self.low && value <= self.high
    }

    /// Interval overlap between `[min, max]` and these bounds.
    pub fn overlaps(&self, min: T, max: T) -> bool {
        max >= self.low && min <= self.high
    }
}

/// Parses `LOW..HIGH`, e.g. `7..14` or `-5..30`.
impl<T: FromStr> FromStr for Bounds<T> {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseError::Bounds(s.to_string());
        let (low, high) = s.split_once("..").ok_or_else(err)?;
        Ok(Bounds {
            low: low.trim().parse().map_err(|_| err())?,
            high: high.trim().parse().map_err(|_| err())?,
        })
    }
}

impl<T: fmt::Display> fmt::Display for Bounds<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.low, self.high)
    }
}

/// Any part of the `;`-delimited `value` is in `selected`.
fn any_match(value: &str, selected: &BTreeSet<String>) -> bool {
    split_multi(value).any(|part| selected.contains(part))
}

// ---------------------------------------------------------------------------
// Travel filtering
// ---------------------------------------------------------------------------

/// Categorical filter controls of the travel table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TravelDimension {
    Continent,
    Purpose,
    Accommodation,
    Season,
    TransportMode,
    Country,
    Region,
    City,
}

impl TravelDimension {
    pub const ALL: [TravelDimension; 8] = [
        TravelDimension::Continent,
        TravelDimension::Purpose,
        TravelDimension::Accommodation,
        TravelDimension::Season,
        TravelDimension::TransportMode,
        TravelDimension::Country,
        TravelDimension::Region,
        TravelDimension::City,
    ];

    pub fn column(self) -> &'static str {
        match self {
            TravelDimension::Continent => travel::CONTINENT,
            TravelDimension::Purpose => travel::PURPOSE,
            TravelDimension::Accommodation => travel::ACCOMMODATION,
            TravelDimension::Season => travel::SEASON,
            TravelDimension::TransportMode => travel::TRANSPORT,
            TravelDimension::Country => travel::COUNTRY,
            TravelDimension::Region => travel::REGION,
            TravelDimension::City => travel::CITY,
        }
    }

    /// Whether cells hold `;`-delimited tags matched with any-match semantics.
    pub fn is_multi_value(self) -> bool {
        matches!(self, TravelDimension::Season | TravelDimension::TransportMode)
    }
}

/// Travel query. Every `None` range and every empty set is a no-op.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TravelCriteria {
    pub duration: Option<Bounds<f64>>,
    pub budget: Option<Bounds<f64>>,
    pub temperature: Option<Bounds<f64>>,
    pub continents: BTreeSet<String>,
    pub purposes: BTreeSet<String>,
    pub accommodations: BTreeSet<String>,
    pub seasons: BTreeSet<String>,
    pub transport_modes: BTreeSet<String>,
    pub countries: BTreeSet<String>,
    pub regions: BTreeSet<String>,
    pub cities: BTreeSet<String>,
}

impl TravelCriteria {
    pub fn selection(&self, dimension: TravelDimension) -> &BTreeSet<String> {
        match dimension {
            TravelDimension::Continent => &self.continents,
            TravelDimension::Purpose => &self.purposes,
            TravelDimension::Accommodation => &self.accommodations,
            TravelDimension::Season => &self.seasons,
            TravelDimension::TransportMode => &self.transport_modes,
            TravelDimension::Country => &self.countries,
            TravelDimension::Region => &self.regions,
            TravelDimension::City => &self.cities,
        }
    }

    pub fn selection_mut(&mut self, dimension: TravelDimension) -> &mut BTreeSet<String> {
        match dimension {
            TravelDimension::Continent => &mut self.continents,
            TravelDimension::Purpose => &mut self.purposes,
            TravelDimension::Accommodation => &mut self.accommodations,
            TravelDimension::Season => &mut self.seasons,
            TravelDimension::TransportMode => &mut self.transport_modes,
            TravelDimension::Country => &mut self.countries,
            TravelDimension::Region => &mut self.regions,
            TravelDimension::City => &mut self.cities,
        }
    }

    /// No predicate narrows anything.
    pub fn is_empty(&self) -> bool {
        self.duration.is_none()
            && self.budget.is_none()
            && self.temperature.is_none()
            && TravelDimension::ALL
                .iter()
                .all(|&d| self.selection(d).is_empty())
    }
}

fn travel_row_matches(row: &Row<'_>, criteria: &TravelCriteria, has_temperature: bool) -> bool {
    // Incomplete rows never match, whatever the criteria.
    let (Some(budget), Some(min), Some(max)) = (
        row.number(travel::BUDGET),
        row.number(travel::MIN_DURATION),
        row.number(travel::MAX_DURATION),
    ) else {
        return false;
    };

    if criteria.duration.is_some_and(|d| !d.overlaps(min, max)) {
        return false;
    }
    if criteria.budget.is_some_and(|b| !b.contains(budget)) {
        return false;
    }
    if has_temperature {
        if let Some(range) = criteria.temperature {
            match row.number(travel::TEMPERATURE) {
                Some(t) if range.contains(t) => {}
                _ => return false,
            }
        }
    }

    TravelDimension::ALL.iter().all(|&dimension| {
        let selected = criteria.selection(dimension);
        if selected.is_empty() {
            return true;
        }
        let value = row.text(dimension.column());
        if dimension.is_multi_value() {
            any_match(value, selected)
        } else {
            selected.contains(value)
        }
    })
}

/// Indices of travel rows passing every active predicate, in table order.
pub fn filtered_travel_indices(table: &Table, criteria: &TravelCriteria) -> Vec<usize> {
    let has_temperature = table.has_column(travel::TEMPERATURE);
    table
        .rows()
        .enumerate()
        .filter(|(_, row)| travel_row_matches(row, criteria, has_temperature))
        .map(|(i, _)| i)
        .collect()
}

/// Apply `criteria` to the travel table. Pure: the input is not modified.
pub fn filter_travel(table: &Table, criteria: &TravelCriteria) -> Table {
    table.select(&filtered_travel_indices(table, criteria))
}

// ---------------------------------------------------------------------------
// Restaurant filtering
// ---------------------------------------------------------------------------

/// Categorical filter controls of the restaurant table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RestaurantDimension {
    Cuisine,
    Location,
    Country,
    Region,
    City,
}

impl RestaurantDimension {
    pub const ALL: [RestaurantDimension; 5] = [
        RestaurantDimension::Cuisine,
        RestaurantDimension::Location,
        RestaurantDimension::Country,
        RestaurantDimension::Region,
        RestaurantDimension::City,
    ];

    pub fn column(self) -> &'static str {
        match self {
            RestaurantDimension::Cuisine => restaurant::CUISINE,
            RestaurantDimension::Location => restaurant::LOCATION,
            RestaurantDimension::Country => restaurant::COUNTRY,
            RestaurantDimension::Region => restaurant::REGION,
            RestaurantDimension::City => restaurant::CITY,
        }
    }
}

/// Restaurant query. Every `None` and every empty set is a no-op.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RestaurantCriteria {
    pub cuisines: BTreeSet<String>,
    /// Exact match against the combined `locatie` label.
    pub locations: BTreeSet<String>,
    pub countries: BTreeSet<String>,
    pub regions: BTreeSet<String>,
    pub cities: BTreeSet<String>,
    /// Case-insensitive substring of the city (or the location label when
    /// the table has no city column).
    pub near: Option<String>,
    pub meal: Option<Meal>,
    pub price: Option<Bounds<u8>>,
}

impl RestaurantCriteria {
    pub fn selection(&self, dimension: RestaurantDimension) -> &BTreeSet<String> {
        match dimension {
            RestaurantDimension::Cuisine => &self.cuisines,
            RestaurantDimension::Location => &self.locations,
            RestaurantDimension::Country => &self.countries,
            RestaurantDimension::Region => &self.regions,
            RestaurantDimension::City => &self.cities,
        }
    }

    pub fn selection_mut(&mut self, dimension: RestaurantDimension) -> &mut BTreeSet<String> {
        match dimension {
            RestaurantDimension::Cuisine => &mut self.cuisines,
            RestaurantDimension::Location => &mut self.locations,
            RestaurantDimension::Country => &mut self.countries,
            RestaurantDimension::Region => &mut self.regions,
            RestaurantDimension::City => &mut self.cities,
        }
    }
}

struct RestaurantLayout {
    near_column: &'static str,
    has_meals: bool,
}

impl RestaurantLayout {
    fn of(table: &Table) -> Self {
        let near_column = if table.has_column(restaurant::CITY) {
            restaurant::CITY
        } else {
            restaurant::LOCATION
        };
        RestaurantLayout {
            near_column,
            has_meals: table.has_column(restaurant::MEALS),
        }
    }
}

fn restaurant_row_matches(
    row: &Row<'_>,
    criteria: &RestaurantCriteria,
    needle: Option<&str>,
    layout: &RestaurantLayout,
) -> bool {
    let categorical = RestaurantDimension::ALL.iter().all(|&dimension| {
        let selected = criteria.selection(dimension);
        selected.is_empty() || selected.contains(row.text(dimension.column()))
    });
    if !categorical {
        return false;
    }

    if let Some(needle) = needle {
        if !row.text(layout.near_column).to_lowercase().contains(needle) {
            return false;
        }
    }

    if let Some(meal) = criteria.meal {
        if !layout.has_meals || !row.text(restaurant::MEALS).to_lowercase().contains(meal.tag()) {
            return false;
        }
    }

    match criteria.price {
        Some(range) => row
            .number(restaurant::PRICE)
            .is_some_and(|level| range.contains(level as u8)),
        None => true,
    }
}

/// Indices of restaurant rows passing every active predicate, in table order.
pub fn filtered_restaurant_indices(table: &Table, criteria: &RestaurantCriteria) -> Vec<usize> {
    let layout = RestaurantLayout::of(table);
    if criteria.meal.is_some() && !layout.has_meals && !table.is_empty() {
        warn!("restaurant table has no '{}' column; meal filter matches nothing", restaurant::MEALS);
    }
    let needle = criteria
        .near
        .as_deref()
        .map(|n| n.trim().to_lowercase())
        .filter(|n| !n.is_empty());

    table
        .rows()
        .enumerate()
        .filter(|(_, row)| restaurant_row_matches(row, criteria, needle.as_deref(), &layout))
        .map(|(i, _)| i)
        .collect()
}

/// Apply `criteria` to the restaurant table. Pure: the input is not modified.
pub fn filter_restaurants(table: &Table, criteria: &RestaurantCriteria) -> Table {
    table.select(&filtered_restaurant_indices(table, criteria))
}
