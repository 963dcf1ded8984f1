//! Travel destination and restaurant filter with a day-by-day itinerary.
//!
//! Tables come in through a [`TableSource`](data::source::TableSource), are
//! normalized into a [`Table`](data::model::Table) and queried with the pure
//! functions in [`data::filter`] and [`data::options`]. A session's state,
//! including its [`Itinerary`](itinerary::Itinerary), lives in
//! [`AppState`](state::AppState).

pub mod data;
pub mod error;
pub mod export;
pub mod itinerary;
pub mod state;

pub use data::filter::{
    filter_restaurants, filter_travel, Bounds, RestaurantCriteria, RestaurantDimension,
    TravelCriteria, TravelDimension,
};
pub use data::model::{Meal, PriceLevel, RestaurantRecord, Table, TravelRecord};
pub use data::normalize::normalize;
pub use data::options::derive_options;
pub use itinerary::{Itinerary, ItineraryDay};
pub use state::AppState;
