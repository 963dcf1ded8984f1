use std::collections::BTreeSet;

use anyhow::Result;
use log::{error, info};

use crate::data::filter::{
    filtered_restaurant_indices, filtered_travel_indices, Bounds, RestaurantCriteria,
    RestaurantDimension, TravelCriteria, TravelDimension,
};
use crate::data::model::{Meal, Table};
use crate::data::options::{meal_options, restaurant_options, travel_options};
use crate::data::source::TableSource;
use crate::itinerary::{Itinerary, ItineraryDay};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// Everything one user session holds, independent of rendering.
///
/// Each session owns its own `AppState`; nothing here is shared.
#[derive(Debug, Default)]
pub struct AppState {
    /// Normalized destination table (empty until loaded).
    pub travel: Table,

    /// Normalized restaurant table (empty until loaded).
    pub restaurants: Table,

    pub travel_criteria: TravelCriteria,
    pub restaurant_criteria: RestaurantCriteria,

    /// Indices of travel rows passing the current criteria (cached).
    pub visible_travel: Vec<usize>,

    /// Indices of restaurant rows passing the current criteria (cached).
    pub visible_restaurants: Vec<usize>,

    /// The session's day plan.
    pub itinerary: Itinerary,

    /// Status / error message for the user.
    pub status_message: Option<String>,

    reload_requested: bool,
}

impl AppState {
    /// Ingest freshly loaded tables and recompute the visible rows.
    pub fn set_tables(&mut self, travel: Table, restaurants: Table) {
        self.travel = travel;
        self.restaurants = restaurants;
        self.refilter();
    }

    /// Fetch both tables from `source`.
    ///
    /// A failing table is left empty, the failure is put in
    /// `status_message` and the first error is returned.
    pub fn reload<S: TableSource>(&mut self, source: &mut S) -> Result<()> {
        self.reload_requested = false;
        self.status_message = None;

        let travel = source.load_travel();
        let restaurants = source.load_restaurants();

        let mut failures = Vec::new();
        let travel = match travel {
            Ok(raw) => raw.normalize(),
            Err(e) => {
                error!("loading destinations failed: {e:#}");
                failures.push(e.context("loading destinations"));
                Table::empty()
            }
        };
        let restaurants = match restaurants {
            Ok(raw) => raw.normalize(),
            Err(e) => {
                error!("loading restaurants failed: {e:#}");
                failures.push(e.context("loading restaurants"));
                Table::empty()
            }
        };

        info!(
            "loaded {} destinations and {} restaurants",
            travel.len(),
            restaurants.len()
        );
        self.set_tables(travel, restaurants);

        if failures.is_empty() {
            if self.travel.is_empty() {
                self.status_message = Some("No destinations found.".to_string());
            }
            return Ok(());
        }
        self.status_message = Some(
            failures
                .iter()
                .map(|e| format!("{e:#}"))
                .collect::<Vec<_>>()
                .join("; "),
        );
        Err(failures.remove(0))
    }

    /// Ask the data owner to fetch fresh tables. The current tables stay
    /// usable until the reload happens.
    pub fn invalidate(&mut self) {
        self.reload_requested = true;
    }

    /// Consume a pending reload request.
    pub fn take_reload_request(&mut self) -> bool {
        std::mem::take(&mut self.reload_requested)
    }

    /// Recompute the visible rows after a criteria change.
    pub fn refilter(&mut self) {
        self.visible_travel = filtered_travel_indices(&self.travel, &self.travel_criteria);
        self.visible_restaurants =
            filtered_restaurant_indices(&self.restaurants, &self.restaurant_criteria);
    }

    pub fn visible_travel_table(&self) -> Table {
        self.travel.select(&self.visible_travel)
    }

    pub fn visible_restaurant_table(&self) -> Table {
        self.restaurants.select(&self.visible_restaurants)
    }

    /// Toggle a single value in a travel filter.
    pub fn toggle_travel(&mut self, dimension: TravelDimension, value: &str) {
        toggle(self.travel_criteria.selection_mut(dimension), value);
        self.refilter();
    }

    /// Toggle a single value in a restaurant filter.
    pub fn toggle_restaurant(&mut self, dimension: RestaurantDimension, value: &str) {
        toggle(self.restaurant_criteria.selection_mut(dimension), value);
        self.refilter();
    }

    /// Clear a travel filter (no constraint).
    pub fn select_none(&mut self, dimension: TravelDimension) {
        self.travel_criteria.selection_mut(dimension).clear();
        self.refilter();
    }

    pub fn set_duration(&mut self, range: Option<Bounds<f64>>) {
        self.travel_criteria.duration = range;
        self.refilter();
    }

    pub fn set_budget(&mut self, range: Option<Bounds<f64>>) {
        self.travel_criteria.budget = range;
        self.refilter();
    }

    pub fn set_temperature(&mut self, range: Option<Bounds<f64>>) {
        self.travel_criteria.temperature = range;
        self.refilter();
    }

    pub fn set_price(&mut self, range: Option<Bounds<u8>>) {
        self.restaurant_criteria.price = range;
        self.refilter();
    }

    /// Option list for a travel control, from the full table.
    pub fn options(&self, dimension: TravelDimension) -> BTreeSet<String> {
        travel_options(&self.travel, dimension)
    }

    pub fn restaurant_options(&self, dimension: RestaurantDimension) -> BTreeSet<String> {
        restaurant_options(&self.restaurants, dimension)
    }

    /// Restaurants near `city` serving `meal`.
    pub fn meal_options(&self, city: &str, meal: Meal) -> BTreeSet<String> {
        meal_options(&self.restaurants, city, meal)
    }

    /// Append a day to the session itinerary; returns its 1-based number.
    pub fn plan_day(&mut self, day: ItineraryDay) -> usize {
        let number = self.itinerary.push(day);
        self.status_message = Some(format!("Day {number} added."));
        number
    }
}

fn toggle(selected: &mut BTreeSet<String>, value: &str) {
    if !selected.remove(value) {
        selected.insert(value.to_string());
    }
}
