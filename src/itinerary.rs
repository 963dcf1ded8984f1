use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::data::model::Meal;
use crate::error::ParseError;

/// One planned day: a destination and up to three restaurant choices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItineraryDay {
    pub destination: String,
    pub breakfast: Option<String>,
    pub lunch: Option<String>,
    pub dinner: Option<String>,
}

impl ItineraryDay {
    pub fn new(destination: impl Into<String>) -> Self {
        ItineraryDay {
            destination: destination.into(),
            breakfast: None,
            lunch: None,
            dinner: None,
        }
    }

    pub fn with_meal(mut self, meal: Meal, restaurant: impl Into<String>) -> Self {
        let slot = match meal {
            Meal::Breakfast => &mut self.breakfast,
            Meal::Lunch => &mut self.lunch,
            Meal::Dinner => &mut self.dinner,
        };
        *slot = Some(restaurant.into());
        self
    }

    pub fn meal(&self, meal: Meal) -> Option<&str> {
        match meal {
            Meal::Breakfast => self.breakfast.as_deref(),
            Meal::Lunch => self.lunch.as_deref(),
            Meal::Dinner => self.dinner.as_deref(),
        }
    }
}

/// Parses `destination|breakfast|lunch|dinner`; trailing fields may be
/// omitted and an empty field or `-` means no restaurant for that meal.
impl FromStr for ItineraryDay {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fields: Vec<&str> = s.split('|').map(str::trim).collect();
        if fields.len() > 4 {
            return Err(ParseError::TooManyFields(fields.len()));
        }
        let destination = fields[0];
        if destination.is_empty() {
            return Err(ParseError::MissingDestination);
        }

        let choice = |i: usize| {
            fields
                .get(i)
                .filter(|f| !f.is_empty() && **f != "-")
                .map(|f| f.to_string())
        };
        Ok(ItineraryDay {
            destination: destination.to_string(),
            breakfast: choice(1),
            lunch: choice(2),
            dinner: choice(3),
        })
    }
}

/// Where the itinerary stands; it only ever moves forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Empty,
    Populated(usize),
}

/// Append-only, ordered collection of days for one session.
///
/// Days cannot be edited, removed or reordered once appended; insertion
/// order is display order is export order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Itinerary {
    days: Vec<ItineraryDay>,
}

impl Itinerary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a day and return its 1-based day number. Names are not
    /// checked against any table.
    pub fn append_day(
        &mut self,
        destination: impl Into<String>,
        breakfast: Option<String>,
        lunch: Option<String>,
        dinner: Option<String>,
    ) -> usize {
        self.push(ItineraryDay {
            destination: destination.into(),
            breakfast,
            lunch,
            dinner,
        })
    }

    pub fn push(&mut self, day: ItineraryDay) -> usize {
        self.days.push(day);
        self.days.len()
    }

    pub fn phase(&self) -> Phase {
        match self.days.len() {
            0 => Phase::Empty,
            n => Phase::Populated(n),
        }
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// The full ordered sequence, for export.
    pub fn export(&self) -> &[ItineraryDay] {
        &self.days
    }

    /// Days paired with their 1-based number.
    pub fn numbered(&self) -> impl Iterator<Item = (usize, &ItineraryDay)> + '_ {
        self.days.iter().enumerate().map(|(i, day)| (i + 1, day))
    }
}
