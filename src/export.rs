//! Itinerary export: ordered days in, document bytes out.

use std::fmt::{self, Write as _};
use std::str::FromStr;

use anyhow::{anyhow, Context, Result};
use serde::Serialize;

use crate::data::model::Meal;
use crate::error::ParseError;
use crate::itinerary::ItineraryDay;

const TITLE: &str = "Itinerary: destinations and restaurants";
const NO_CHOICE: &str = "none selected";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExportFormat {
    #[default]
    Text,
    Json,
    Csv,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Text => "txt",
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" | "txt" => Ok(ExportFormat::Text),
            "json" => Ok(ExportFormat::Json),
            "csv" => Ok(ExportFormat::Csv),
            _ => Err(ParseError::Format(s.to_string())),
        }
    }
}

/// Flat, numbered view of a day as written by the JSON and CSV exports.
#[derive(Serialize)]
struct ExportedDay<'a> {
    day: usize,
    destination: &'a str,
    breakfast: Option<&'a str>,
    lunch: Option<&'a str>,
    dinner: Option<&'a str>,
}

fn exported(days: &[ItineraryDay]) -> impl Iterator<Item = ExportedDay<'_>> {
    days.iter().enumerate().map(|(i, day)| ExportedDay {
        day: i + 1,
        destination: &day.destination,
        breakfast: day.breakfast.as_deref(),
        lunch: day.lunch.as_deref(),
        dinner: day.dinner.as_deref(),
    })
}

/// Render `days` in `format`. Pure: same days, same bytes.
pub fn render(days: &[ItineraryDay], format: ExportFormat) -> Result<Vec<u8>> {
    match format {
        ExportFormat::Text => Ok(render_text(days)
            .context("formatting itinerary")?
            .into_bytes()),
        ExportFormat::Json => {
            let rows: Vec<ExportedDay<'_>> = exported(days).collect();
            serde_json::to_vec_pretty(&rows).context("serializing itinerary")
        }
        ExportFormat::Csv => render_csv(days),
    }
}

fn render_text(days: &[ItineraryDay]) -> Result<String, fmt::Error> {
    let mut out = String::new();
    writeln!(out, "{TITLE}\n")?;
    if days.is_empty() {
        writeln!(out, "No days planned.")?;
    }
    for (i, day) in days.iter().enumerate() {
        writeln!(out, "Day {}: {}", i + 1, day.destination)?;
        for meal in Meal::ALL {
            writeln!(out, "  {}: {}", meal.label(), day.meal(meal).unwrap_or(NO_CHOICE))?;
        }
        out.push('\n');
    }
    Ok(out)
}

fn render_csv(days: &[ItineraryDay]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in exported(days) {
        writer.serialize(row).context("writing itinerary row")?;
    }
    if days.is_empty() {
        writer
            .write_record(["day", "destination", "breakfast", "lunch", "dinner"])
            .context("writing itinerary header")?;
    }
    writer
        .into_inner()
        .map_err(|e| anyhow!("flushing itinerary CSV: {}", e.error()))
}
