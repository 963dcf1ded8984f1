//! Option lists for filter controls.
//!
//! Every list is the sorted set of distinct non-empty values of one column.
//! Dependent lists (region after country, city after region) are derived from
//! the table narrowed to the rows matching the upstream choices.

use std::collections::BTreeSet;

use super::filter::{filter_restaurants, RestaurantCriteria, RestaurantDimension, TravelDimension};
use super::model::{Cell, Meal, Table};
use super::normalize::parse_number;
use super::schema::{split_multi, travel};

/// Distinct values of `column`, sorted ascending. Multi-value cells are split
/// on `;` first. An absent column yields an empty set.
pub fn derive_options(table: &Table, column: &str, multi_value: bool) -> BTreeSet<String> {
    let mut options = BTreeSet::new();
    let Some(index) = table.column_index(column) else {
        return options;
    };

    for row in table.rows() {
        let Some(cell) = row.cells().get(index) else {
            continue;
        };
        let text = cell.to_text();
        if multi_value {
            options.extend(split_multi(&text).map(str::to_string));
        } else {
            let value = text.trim();
            if !value.is_empty() {
                options.insert(value.to_string());
            }
        }
    }
    options
}

/// Whether `cell` holds the upstream choice `value`. Numeric cells compare
/// by value, so `800.0` selects a stored `800`.
fn matches_choice(cell: &Cell, value: &str) -> bool {
    match cell {
        Cell::Number(n) => parse_number(value) == Some(*n),
        Cell::Text(text) => text == value,
        Cell::Missing => false,
    }
}

/// Rows whose cells equal every `(column, value)` pair, in table order.
pub fn narrow(table: &Table, upstream: &[(&str, &str)]) -> Table {
    let indices: Vec<usize> = table
        .rows()
        .enumerate()
        .filter(|(_, row)| {
            upstream.iter().all(|(column, value)| {
                row.get(column).is_some_and(|cell| matches_choice(cell, value))
            })
        })
        .map(|(i, _)| i)
        .collect();
    table.select(&indices)
}

/// `derive_options` over the table narrowed by the upstream choices.
pub fn cascade_options(
    table: &Table,
    upstream: &[(&str, &str)],
    column: &str,
    multi_value: bool,
) -> BTreeSet<String> {
    derive_options(&narrow(table, upstream), column, multi_value)
}

pub fn travel_options(table: &Table, dimension: TravelDimension) -> BTreeSet<String> {
    derive_options(table, dimension.column(), dimension.is_multi_value())
}

pub fn restaurant_options(table: &Table, dimension: RestaurantDimension) -> BTreeSet<String> {
    derive_options(table, dimension.column(), false)
}

/// Regions of the destinations in `country`.
pub fn regions_in(table: &Table, country: &str) -> BTreeSet<String> {
    cascade_options(table, &[(travel::COUNTRY, country)], travel::REGION, false)
}

/// Cities of the destinations in `country` / `region`.
pub fn cities_in(table: &Table, country: &str, region: &str) -> BTreeSet<String> {
    cascade_options(
        table,
        &[(travel::COUNTRY, country), (travel::REGION, region)],
        travel::CITY,
        false,
    )
}

/// Names of the restaurants near `city` that serve `meal`.
pub fn meal_options(restaurants: &Table, city: &str, meal: Meal) -> BTreeSet<String> {
    let criteria = RestaurantCriteria {
        near: Some(city.to_string()),
        meal: Some(meal),
        ..Default::default()
    };
    filter_restaurants(restaurants, &criteria)
        .restaurant_records()
        .into_iter()
        .map(|r| r.name)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::normalize::normalize;

    fn places() -> Table {
        normalize(
            &["land", "regio", "stad", "seizoen", "budget"],
            &[
                vec!["Italy", "Tuscany", "Florence", "Summer;Winter", "900"],
                vec!["Italy", "Tuscany", "Siena", "Autumn", "700"],
                vec!["Italy", "Lazio", "Rome", "", "1100"],
                vec!["Spain", "Andalusia", "Seville", "Summer", "n/a"],
            ],
        )
    }

    #[test]
    fn multi_value_options_are_split_and_sorted() {
        let options = derive_options(&places(), "seizoen", true);
        assert_eq!(
            options.into_iter().collect::<Vec<_>>(),
            ["Autumn", "Summer", "Winter"]
        );
    }

    #[test]
    fn numeric_cells_are_listed_as_text_and_missing_skipped() {
        let options = derive_options(&places(), "budget", false);
        assert_eq!(options.into_iter().collect::<Vec<_>>(), ["1100", "700", "900"]);
    }

    #[test]
    fn numeric_upstream_choices_compare_by_value() {
        let table = places();
        assert_eq!(narrow(&table, &[("budget", "900.0")]).len(), 1);
        assert_eq!(narrow(&table, &[("budget", " 700 ")]).len(), 1);
        assert!(narrow(&table, &[("budget", "n/a")]).is_empty());
        assert!(narrow(&table, &[("budget", "")]).is_empty());
    }

    #[test]
    fn absent_column_has_no_options() {
        assert!(derive_options(&places(), "continent", false).is_empty());
    }

    #[test]
    fn cascade_follows_upstream_choices() {
        let table = places();
        assert_eq!(
            regions_in(&table, "Italy").into_iter().collect::<Vec<_>>(),
            ["Lazio", "Tuscany"]
        );
        assert_eq!(
            cities_in(&table, "Italy", "Tuscany").into_iter().collect::<Vec<_>>(),
            ["Florence", "Siena"]
        );
        assert!(cities_in(&table, "Spain", "Tuscany").is_empty());
    }

    #[test]
    fn meal_options_match_city_and_meal() {
        let restaurants = normalize(
            &["naam", "stad", "maaltijd"],
            &[
                vec!["Zeta", "Florence", "ontbijt; lunch"],
                vec!["Alfa", "florence", "Lunch"],
                vec!["Beta", "Rome", "lunch"],
            ],
        );
        let lunch = meal_options(&restaurants, "Florence", Meal::Lunch);
        assert_eq!(lunch.into_iter().collect::<Vec<_>>(), ["Alfa", "Zeta"]);
        assert!(meal_options(&restaurants, "Rome", Meal::Dinner).is_empty());
    }
}
